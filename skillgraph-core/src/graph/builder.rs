//! Incremental graph construction from canonical tables.
//!
//! Each loader is idempotent and tolerant of call order: endpoints that
//! have not been defined yet are created as shadow nodes and enriched
//! whenever their defining table arrives. Rows missing a required
//! identifier are skipped individually; a loader never fails a build.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::common::error::{Result, SkillGraphError};
use crate::domain::{cell_id_key, cell_string, parse_date, SourceKind, Table};
use crate::graph::model::{
    CourseAttrs, EdgeKind, EmployeeAttrs, NodeData, NodeKind, OrgUnitAttrs, PositionAttrs,
    QualificationAttrs, SkillAttrs,
};
use crate::graph::SkillGraph;
use crate::storage::canonical::CanonicalStore;

/// Qualifications whose end date falls in this year never expire.
const INDEFINITE_SENTINEL_YEAR: i32 = 9999;

/// Edge-append policy for a rebuild. `Additive` keeps every edge a loader
/// produces (re-running an import doubles counts); `Deduplicate` drops
/// edges identical in endpoints and attributes, which makes repeated
/// imports idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    #[default]
    Additive,
    Deduplicate,
}

pub struct GraphBuilder {
    graph: SkillGraph,
    policy: EdgePolicy,
}

fn cell_bool(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "x" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl GraphBuilder {
    pub fn new(policy: EdgePolicy) -> Self {
        Self {
            graph: SkillGraph::new(),
            policy,
        }
    }

    /// Continue building on an existing graph instance.
    pub fn with_graph(graph: SkillGraph, policy: EdgePolicy) -> Self {
        Self { graph, policy }
    }

    pub fn finish(self) -> SkillGraph {
        self.graph
    }

    /// Load employee master rows: one Employee node each, plus `WORKS_IN`
    /// and `PLANNED_FOR` edges for the org-unit and planned-position
    /// references present on the row.
    pub fn load_employees(&mut self, table: &Table) -> usize {
        let mut loaded = 0;
        for row in 0..table.row_count() {
            let Some(personal_number) = table.cell(row, "personal_number").and_then(cell_id_key)
            else {
                debug!(row, "employees row without personal_number, skipped");
                continue;
            };
            let org_unit = table.cell(row, "org_unit").and_then(cell_id_key);
            let planned_position = table.cell(row, "planned_position").and_then(cell_id_key);

            let employee = self.graph.upsert_node(
                NodeKind::Employee,
                &personal_number,
                &NodeData::Employee(EmployeeAttrs {
                    first_name: table.cell(row, "first_name").and_then(cell_string),
                    last_name: table.cell(row, "last_name").and_then(cell_string),
                    profession: table.cell(row, "profession").and_then(cell_string),
                    planned_position: planned_position.clone(),
                    org_unit: org_unit.clone(),
                }),
            );

            if let Some(org_unit) = org_unit {
                let unit = self.graph.ensure_node(NodeKind::OrgUnit, &org_unit);
                self.graph
                    .add_edge(employee, unit, EdgeKind::WorksIn, self.policy);
            }
            if let Some(position) = planned_position {
                let position = self.graph.ensure_node(NodeKind::Position, &position);
                self.graph
                    .add_edge(employee, position, EdgeKind::PlannedFor, self.policy);
            }
            loaded += 1;
        }
        loaded
    }

    /// Load skill dictionary rows: Skill nodes with display attributes.
    pub fn load_skill_dictionary(&mut self, table: &Table) -> usize {
        let mut loaded = 0;
        for row in 0..table.row_count() {
            let Some(skill_id) = table.cell(row, "skill_id").and_then(cell_id_key) else {
                debug!(row, "skill dictionary row without skill_id, skipped");
                continue;
            };
            self.graph.upsert_node(
                NodeKind::Skill,
                &skill_id,
                &NodeData::Skill(SkillAttrs {
                    name: table.cell(row, "skill_name").and_then(cell_string),
                    description: table.cell(row, "description").and_then(cell_string),
                    category: table.cell(row, "category").and_then(cell_string),
                }),
            );
            loaded += 1;
        }
        loaded
    }

    /// Load qualification rows: `HAS_QUALIFICATION` edges with validity
    /// attributes. The employee endpoint may well not be defined yet.
    pub fn load_qualifications(&mut self, table: &Table) -> usize {
        let mut loaded = 0;
        for row in 0..table.row_count() {
            let personal_number = table.cell(row, "personal_number").and_then(cell_id_key);
            let qualification_id = table.cell(row, "qualification_id").and_then(cell_id_key);
            let (Some(personal_number), Some(qualification_id)) =
                (personal_number, qualification_id)
            else {
                debug!(row, "qualifications row without both ids, skipped");
                continue;
            };

            let valid_from = table.cell(row, "valid_from").and_then(parse_date);
            let valid_until = table.cell(row, "valid_until").and_then(parse_date);
            let indefinite = cell_bool(table.cell(row, "indefinite")).unwrap_or_else(|| {
                valid_until
                    .map(|d| d.year() >= INDEFINITE_SENTINEL_YEAR)
                    .unwrap_or(false)
            });

            let employee = self.graph.ensure_node(NodeKind::Employee, &personal_number);
            let qualification = self.graph.upsert_node(
                NodeKind::Qualification,
                &qualification_id,
                &NodeData::Qualification(QualificationAttrs {
                    name: table.cell(row, "qualification_name").and_then(cell_string),
                }),
            );
            self.graph.add_edge(
                employee,
                qualification,
                EdgeKind::HasQualification {
                    valid_from,
                    valid_until,
                    indefinite,
                },
                self.policy,
            );
            loaded += 1;
        }
        loaded
    }

    /// Load course participation rows: `COMPLETED_COURSE` edges. Retakes
    /// are distinct edges distinguished by their completion date.
    pub fn load_course_participation(&mut self, table: &Table) -> usize {
        let mut loaded = 0;
        for row in 0..table.row_count() {
            let personal_number = table.cell(row, "personal_number").and_then(cell_id_key);
            let course_id = table.cell(row, "course_id").and_then(cell_id_key);
            let (Some(personal_number), Some(course_id)) = (personal_number, course_id) else {
                debug!(row, "participation row without both ids, skipped");
                continue;
            };

            let employee = self.graph.ensure_node(NodeKind::Employee, &personal_number);
            let course = self.graph.upsert_node(
                NodeKind::Course,
                &course_id,
                &NodeData::Course(CourseAttrs {
                    name: table.cell(row, "course_name").and_then(cell_string),
                    provider: None,
                }),
            );
            self.graph.add_edge(
                employee,
                course,
                EdgeKind::CompletedCourse {
                    completed_on: table.cell(row, "completion_date").and_then(parse_date),
                },
                self.policy,
            );
            loaded += 1;
        }
        loaded
    }

    /// Load skill mapping rows: `DEVELOPS_SKILL` edges between courses
    /// and skills, both possibly still shadows.
    pub fn load_skill_mappings(&mut self, table: &Table) -> usize {
        let mut loaded = 0;
        for row in 0..table.row_count() {
            let course_id = table.cell(row, "course_id").and_then(cell_id_key);
            let skill_id = table.cell(row, "skill_id").and_then(cell_id_key);
            let (Some(course_id), Some(skill_id)) = (course_id, skill_id) else {
                debug!(row, "skill mapping row without both ids, skipped");
                continue;
            };
            let course = self.graph.ensure_node(NodeKind::Course, &course_id);
            let skill = self.graph.ensure_node(NodeKind::Skill, &skill_id);
            self.graph
                .add_edge(course, skill, EdgeKind::DevelopsSkill, self.policy);
            loaded += 1;
        }
        loaded
    }

    /// Load role requirement rows: `REQUIRES_QUALIFICATION` edges from
    /// positions to qualifications.
    pub fn load_role_requirements(&mut self, table: &Table) -> usize {
        let mut loaded = 0;
        for row in 0..table.row_count() {
            let position_id = table.cell(row, "position_id").and_then(cell_id_key);
            let qualification_id = table.cell(row, "qualification_id").and_then(cell_id_key);
            let (Some(position_id), Some(qualification_id)) = (position_id, qualification_id)
            else {
                debug!(row, "role requirement row without both ids, skipped");
                continue;
            };
            let position = self.graph.upsert_node(
                NodeKind::Position,
                &position_id,
                &NodeData::Position(PositionAttrs {
                    title: table.cell(row, "position_title").and_then(cell_string),
                }),
            );
            let qualification = self.graph.upsert_node(
                NodeKind::Qualification,
                &qualification_id,
                &NodeData::Qualification(QualificationAttrs {
                    name: table.cell(row, "qualification_name").and_then(cell_string),
                }),
            );
            self.graph.add_edge(
                position,
                qualification,
                EdgeKind::RequiresQualification,
                self.policy,
            );
            loaded += 1;
        }
        loaded
    }

    /// Load org structure rows: OrgUnit nodes plus `PARENT_OF` edges from
    /// parent to child. Malformed hierarchies (cycles included) are
    /// stored as-is; traversal stays bounded regardless.
    pub fn load_org_hierarchy(&mut self, table: &Table) -> usize {
        let mut loaded = 0;
        for row in 0..table.row_count() {
            let Some(org_unit_id) = table.cell(row, "org_unit_id").and_then(cell_id_key) else {
                debug!(row, "org structure row without org_unit_id, skipped");
                continue;
            };
            let unit = self.graph.upsert_node(
                NodeKind::OrgUnit,
                &org_unit_id,
                &NodeData::OrgUnit(OrgUnitAttrs {
                    short_code: table.cell(row, "short_code").and_then(cell_string),
                    name_de: table.cell(row, "name_de").and_then(cell_string),
                    name_en: table.cell(row, "name_en").and_then(cell_string),
                }),
            );
            if let Some(parent_id) = table.cell(row, "parent_org_unit_id").and_then(cell_id_key) {
                let parent = self.graph.ensure_node(NodeKind::OrgUnit, &parent_id);
                self.graph
                    .add_edge(parent, unit, EdgeKind::ParentOf, self.policy);
            }
            loaded += 1;
        }
        loaded
    }

    /// Load learning catalog rows: pure Course enrichment (titles,
    /// providers), no edges.
    pub fn load_learning_catalog(&mut self, table: &Table) -> usize {
        let mut loaded = 0;
        for row in 0..table.row_count() {
            let Some(course_id) = table.cell(row, "course_id").and_then(cell_id_key) else {
                debug!(row, "learning catalog row without course_id, skipped");
                continue;
            };
            self.graph.upsert_node(
                NodeKind::Course,
                &course_id,
                &NodeData::Course(CourseAttrs {
                    name: table.cell(row, "course_title").and_then(cell_string),
                    provider: table.cell(row, "provider").and_then(cell_string),
                }),
            );
            loaded += 1;
        }
        loaded
    }

    /// Dispatch one canonical table to its loader. Learning events carry
    /// no key that joins reliably into the graph and are skipped.
    pub fn load_source(&mut self, kind: SourceKind, table: &Table) -> usize {
        match kind {
            SourceKind::Employees => self.load_employees(table),
            SourceKind::CourseParticipation => self.load_course_participation(table),
            SourceKind::Qualifications => self.load_qualifications(table),
            SourceKind::OrgStructure => self.load_org_hierarchy(table),
            SourceKind::SkillDictionary => self.load_skill_dictionary(table),
            SourceKind::SkillMapping => self.load_skill_mappings(table),
            SourceKind::RoleQualifications => self.load_role_requirements(table),
            SourceKind::LearningEvents => {
                debug!("learning events carry no graph-joinable key, skipped");
                0
            }
            SourceKind::LearningCatalog => self.load_learning_catalog(table),
        }
    }
}

/// Build a fresh graph from whatever canonical tables the store holds,
/// in the recommended order. Missing or unreadable tables are skipped;
/// the build only fails when no graph-consumable table exists at all.
pub fn build_from_store(store: &CanonicalStore, policy: EdgePolicy) -> Result<SkillGraph> {
    let mut builder = GraphBuilder::new(policy);
    let mut tables_consumed = 0;
    for kind in SourceKind::ALL {
        if kind == SourceKind::LearningEvents {
            continue;
        }
        let name = kind.canonical_name();
        match store.load_table(name) {
            Ok(Some(table)) => {
                let loaded = builder.load_source(kind, &table);
                debug!(table = name, rows = loaded, "loaded canonical table");
                tables_consumed += 1;
            }
            Ok(None) => {
                debug!(table = name, "canonical table absent, skipped");
            }
            Err(e) => {
                tracing::warn!(table = name, error = %e, "failed to read canonical table, skipped");
            }
        }
    }
    if tables_consumed == 0 {
        return Err(SkillGraphError::NoSourceData {
            message: format!(
                "no canonical tables found under {}",
                store.dir().display()
            ),
        });
    }
    let graph = builder.finish();
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph rebuild complete"
    );
    Ok(graph)
}
