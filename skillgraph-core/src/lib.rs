pub mod common;
pub mod domain;
pub mod graph;
pub mod storage;

pub use domain::*;
pub use graph::{EdgePolicy, GraphHandle, GraphStats, SkillGraph};
