pub mod table;

pub use table::{cell_id_key, cell_string, id_display, id_key, parse_date, Table};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The recognized raw source kinds. Each maps to one canonical table name,
/// which doubles as the stable key under which the cleaned table is
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Employees,
    CourseParticipation,
    Qualifications,
    OrgStructure,
    SkillDictionary,
    SkillMapping,
    RoleQualifications,
    LearningEvents,
    LearningCatalog,
}

impl SourceKind {
    /// All source kinds in the recommended processing order. The order
    /// minimizes transient shadow nodes during graph construction but is
    /// not required for correctness.
    pub const ALL: [SourceKind; 9] = [
        SourceKind::Employees,
        SourceKind::SkillDictionary,
        SourceKind::Qualifications,
        SourceKind::CourseParticipation,
        SourceKind::SkillMapping,
        SourceKind::RoleQualifications,
        SourceKind::OrgStructure,
        SourceKind::LearningEvents,
        SourceKind::LearningCatalog,
    ];

    /// Stable canonical table name for this source.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            SourceKind::Employees => "employees",
            SourceKind::CourseParticipation => "course_participation",
            SourceKind::Qualifications => "qualifications",
            SourceKind::OrgStructure => "org_structure",
            SourceKind::SkillDictionary => "skill_dictionary",
            SourceKind::SkillMapping => "skill_mapping",
            SourceKind::RoleQualifications => "role_qualifications",
            SourceKind::LearningEvents => "learning_events",
            SourceKind::LearningCatalog => "learning_catalog",
        }
    }
}

/// One (course, skill) pair reachable from an employee via
/// `COMPLETED_COURSE` then `DEVELOPS_SKILL`. The same skill appears once
/// per course that teaches it; callers that want a distinct skill set
/// dedupe on `skill_id` themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquiredSkill {
    pub skill_id: String,
    pub skill_name: Option<String>,
    pub course_id: String,
    pub course_name: Option<String>,
    pub completed_on: Option<NaiveDate>,
}

/// A qualification an employee holds, with its validity attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldQualification {
    pub qualification_id: String,
    pub qualification_name: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub indefinite: bool,
}

/// A qualification reference without validity attributes, as returned by
/// the missing-qualifications gap analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationRef {
    pub qualification_id: String,
    pub qualification_name: Option<String>,
}

/// A course reference, as returned by the reverse skill lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    pub course_id: String,
    pub course_name: Option<String>,
}

/// An org unit reference, as returned by the ancestry walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnitRef {
    pub org_unit_id: String,
    pub short_code: Option<String>,
    pub name: Option<String>,
}
