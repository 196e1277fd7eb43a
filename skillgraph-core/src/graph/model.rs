//! Node and edge type definitions for the competence graph.
//!
//! Every node kind carries its own attribute struct and every edge kind
//! carries only the attributes meaningful to it, so "this attribute only
//! exists for some types" lookups cannot arise.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The six node kinds sharing one graph namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Employee,
    Skill,
    Course,
    Qualification,
    Position,
    OrgUnit,
}

impl NodeKind {
    /// Stable label used in composite ids and stats breakdowns.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Employee => "employee",
            NodeKind::Skill => "skill",
            NodeKind::Course => "course",
            NodeKind::Qualification => "qualification",
            NodeKind::Position => "position",
            NodeKind::OrgUnit => "org_unit",
        }
    }
}

/// Composite node id, `"{kind}:{raw_id}"`. Namespacing by kind guarantees
/// global uniqueness even when two entity kinds reuse the same raw
/// identifier.
pub fn composite_id(kind: NodeKind, raw_id: &str) -> String {
    format!("{}:{}", kind.label(), raw_id)
}

fn merge_field<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if src.is_some() {
        *dst = src.clone();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAttrs {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profession: Option<String>,
    pub planned_position: Option<String>,
    pub org_unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillAttrs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseAttrs {
    pub name: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualificationAttrs {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionAttrs {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgUnitAttrs {
    pub short_code: Option<String>,
    pub name_de: Option<String>,
    pub name_en: Option<String>,
}

/// Kind tag plus the attributes belonging to that kind, in one tagged
/// variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeData {
    Employee(EmployeeAttrs),
    Skill(SkillAttrs),
    Course(CourseAttrs),
    Qualification(QualificationAttrs),
    Position(PositionAttrs),
    OrgUnit(OrgUnitAttrs),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Employee(_) => NodeKind::Employee,
            NodeData::Skill(_) => NodeKind::Skill,
            NodeData::Course(_) => NodeKind::Course,
            NodeData::Qualification(_) => NodeKind::Qualification,
            NodeData::Position(_) => NodeKind::Position,
            NodeData::OrgUnit(_) => NodeKind::OrgUnit,
        }
    }

    /// Attribute-less data for a shadow node of the given kind.
    pub fn shadow(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Employee => NodeData::Employee(EmployeeAttrs::default()),
            NodeKind::Skill => NodeData::Skill(SkillAttrs::default()),
            NodeKind::Course => NodeData::Course(CourseAttrs::default()),
            NodeKind::Qualification => NodeData::Qualification(QualificationAttrs::default()),
            NodeKind::Position => NodeData::Position(PositionAttrs::default()),
            NodeKind::OrgUnit => NodeData::OrgUnit(OrgUnitAttrs::default()),
        }
    }

    /// Enrichment merge: every non-null field of `other` overwrites the
    /// current value; null fields never erase known attributes. Kind
    /// mismatches cannot happen through the composite-id index and are
    /// ignored here.
    pub fn merge_from(&mut self, other: &NodeData) {
        match (self, other) {
            (NodeData::Employee(dst), NodeData::Employee(src)) => {
                merge_field(&mut dst.first_name, &src.first_name);
                merge_field(&mut dst.last_name, &src.last_name);
                merge_field(&mut dst.profession, &src.profession);
                merge_field(&mut dst.planned_position, &src.planned_position);
                merge_field(&mut dst.org_unit, &src.org_unit);
            }
            (NodeData::Skill(dst), NodeData::Skill(src)) => {
                merge_field(&mut dst.name, &src.name);
                merge_field(&mut dst.description, &src.description);
                merge_field(&mut dst.category, &src.category);
            }
            (NodeData::Course(dst), NodeData::Course(src)) => {
                merge_field(&mut dst.name, &src.name);
                merge_field(&mut dst.provider, &src.provider);
            }
            (NodeData::Qualification(dst), NodeData::Qualification(src)) => {
                merge_field(&mut dst.name, &src.name);
            }
            (NodeData::Position(dst), NodeData::Position(src)) => {
                merge_field(&mut dst.title, &src.title);
            }
            (NodeData::OrgUnit(dst), NodeData::OrgUnit(src)) => {
                merge_field(&mut dst.short_code, &src.short_code);
                merge_field(&mut dst.name_de, &src.name_de);
                merge_field(&mut dst.name_en, &src.name_en);
            }
            _ => {}
        }
    }
}

/// A graph node. `id` is the composite id and never changes once
/// assigned; `raw_id` is the source identifier in its identity-key form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub raw_id: String,
    pub data: NodeData,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Best display name for this node, whichever attribute carries it.
    pub fn display_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Employee(a) => a.last_name.as_deref().or(a.first_name.as_deref()),
            NodeData::Skill(a) => a.name.as_deref(),
            NodeData::Course(a) => a.name.as_deref(),
            NodeData::Qualification(a) => a.name.as_deref(),
            NodeData::Position(a) => a.title.as_deref(),
            NodeData::OrgUnit(a) => a
                .name_en
                .as_deref()
                .or(a.name_de.as_deref())
                .or(a.short_code.as_deref()),
        }
    }
}

/// The seven directed edge kinds, each carrying only its own attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Employee → OrgUnit
    WorksIn,
    /// Employee → Position
    PlannedFor,
    /// Employee → Qualification
    HasQualification {
        valid_from: Option<NaiveDate>,
        valid_until: Option<NaiveDate>,
        indefinite: bool,
    },
    /// Employee → Course
    CompletedCourse { completed_on: Option<NaiveDate> },
    /// Course → Skill
    DevelopsSkill,
    /// Position → Qualification
    RequiresQualification,
    /// OrgUnit → OrgUnit (parent → child)
    ParentOf,
}

impl EdgeKind {
    /// Stable label used in stats breakdowns.
    pub fn label(&self) -> &'static str {
        match self {
            EdgeKind::WorksIn => "works_in",
            EdgeKind::PlannedFor => "planned_for",
            EdgeKind::HasQualification { .. } => "has_qualification",
            EdgeKind::CompletedCourse { .. } => "completed_course",
            EdgeKind::DevelopsSkill => "develops_skill",
            EdgeKind::RequiresQualification => "requires_qualification",
            EdgeKind::ParentOf => "parent_of",
        }
    }
}

/// A directed edge between two arena indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_ids_namespace_by_kind() {
        assert_eq!(composite_id(NodeKind::Employee, "7"), "employee:7");
        assert_eq!(composite_id(NodeKind::OrgUnit, "7"), "org_unit:7");
    }

    #[test]
    fn merge_overwrites_non_null_and_keeps_known_values() {
        let mut data = NodeData::Skill(SkillAttrs {
            name: Some("Python".into()),
            description: Some("scripting".into()),
            category: None,
        });
        data.merge_from(&NodeData::Skill(SkillAttrs {
            name: Some("Python 3".into()),
            description: None,
            category: Some("programming".into()),
        }));
        match data {
            NodeData::Skill(a) => {
                assert_eq!(a.name.as_deref(), Some("Python 3"));
                assert_eq!(a.description.as_deref(), Some("scripting"));
                assert_eq!(a.category.as_deref(), Some("programming"));
            }
            _ => unreachable!(),
        }
    }
}
