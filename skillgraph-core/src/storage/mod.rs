pub mod canonical;
pub mod snapshot;

pub use canonical::CanonicalStore;
pub use snapshot::SnapshotStore;
