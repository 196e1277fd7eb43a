//! Read-only traversal queries over a fully built graph.
//!
//! Every operation returns an empty result, never an error, when the
//! queried entity or relationship is absent, and every walk is bounded by
//! a visited set so malformed cyclic data cannot cause non-termination.

use std::collections::{BTreeSet, HashSet};

use crate::domain::{AcquiredSkill, CourseRef, HeldQualification, OrgUnitRef, QualificationRef};
use crate::graph::model::{EdgeKind, NodeData, NodeKind};
use crate::graph::SkillGraph;

impl SkillGraph {
    fn qualification_ref(&self, idx: usize) -> QualificationRef {
        let node = self.node(idx);
        QualificationRef {
            qualification_id: node.raw_id.clone(),
            qualification_name: node.display_name().map(|s| s.to_string()),
        }
    }

    /// Skills an employee has acquired: the two-hop walk
    /// `Employee --COMPLETED_COURSE--> Course --DEVELOPS_SKILL--> Skill`.
    /// One entry per reachable (course, skill) pair; a skill taught by
    /// several completed courses appears once per course.
    pub fn employee_skills(&self, employee_id: &str) -> Vec<AcquiredSkill> {
        let Some(employee) = self.node_index(NodeKind::Employee, employee_id) else {
            return Vec::new();
        };
        let mut acquired = Vec::new();
        for edge in self.outgoing_edges(employee) {
            let EdgeKind::CompletedCourse { completed_on } = &edge.kind else {
                continue;
            };
            let course = self.node(edge.target);
            for hop in self.outgoing_edges(edge.target) {
                if hop.kind != EdgeKind::DevelopsSkill {
                    continue;
                }
                let skill = self.node(hop.target);
                acquired.push(AcquiredSkill {
                    skill_id: skill.raw_id.clone(),
                    skill_name: skill.display_name().map(|s| s.to_string()),
                    course_id: course.raw_id.clone(),
                    course_name: course.display_name().map(|s| s.to_string()),
                    completed_on: *completed_on,
                });
            }
        }
        acquired
    }

    /// Qualifications an employee holds, with validity attributes.
    pub fn employee_qualifications(&self, employee_id: &str) -> Vec<HeldQualification> {
        let Some(employee) = self.node_index(NodeKind::Employee, employee_id) else {
            return Vec::new();
        };
        let mut held = Vec::new();
        for edge in self.outgoing_edges(employee) {
            let EdgeKind::HasQualification {
                valid_from,
                valid_until,
                indefinite,
            } = &edge.kind
            else {
                continue;
            };
            let qualification = self.node(edge.target);
            held.push(HeldQualification {
                qualification_id: qualification.raw_id.clone(),
                qualification_name: qualification.display_name().map(|s| s.to_string()),
                valid_from: *valid_from,
                valid_until: *valid_until,
                indefinite: *indefinite,
            });
        }
        held
    }

    /// Gap analysis against the employee's planned role: qualifications
    /// the first `PLANNED_FOR` position requires minus those held. Only
    /// the first planned position is considered when several exist.
    pub fn missing_qualifications(&self, employee_id: &str) -> Vec<QualificationRef> {
        let Some(employee) = self.node_index(NodeKind::Employee, employee_id) else {
            return Vec::new();
        };
        let Some(position) = self
            .outgoing_edges(employee)
            .find(|e| e.kind == EdgeKind::PlannedFor)
            .map(|e| e.target)
        else {
            return Vec::new();
        };

        let held: BTreeSet<usize> = self
            .outgoing_edges(employee)
            .filter(|e| matches!(e.kind, EdgeKind::HasQualification { .. }))
            .map(|e| e.target)
            .collect();

        let mut seen = BTreeSet::new();
        let mut missing = Vec::new();
        for edge in self.outgoing_edges(position) {
            if edge.kind != EdgeKind::RequiresQualification {
                continue;
            }
            if held.contains(&edge.target) || !seen.insert(edge.target) {
                continue;
            }
            missing.push(self.qualification_ref(edge.target));
        }
        missing
    }

    /// Reverse lookup: every course with a `DEVELOPS_SKILL` edge into the
    /// given skill.
    pub fn courses_for_skill(&self, skill_id: &str) -> Vec<CourseRef> {
        let Some(skill) = self.node_index(NodeKind::Skill, skill_id) else {
            return Vec::new();
        };
        let mut courses = Vec::new();
        for edge in self.incoming_edges(skill) {
            if edge.kind != EdgeKind::DevelopsSkill {
                continue;
            }
            let course = self.node(edge.source);
            courses.push(CourseRef {
                course_id: course.raw_id.clone(),
                course_name: course.display_name().map(|s| s.to_string()),
            });
        }
        courses
    }

    /// Ancestry chain of an org unit, nearest parent first. Follows the
    /// first `PARENT_OF` edge into each unit; the visited set terminates
    /// the walk on malformed cyclic hierarchies.
    pub fn org_unit_ancestors(&self, org_unit_id: &str) -> Vec<OrgUnitRef> {
        let Some(start) = self.node_index(NodeKind::OrgUnit, org_unit_id) else {
            return Vec::new();
        };
        let mut visited: HashSet<usize> = HashSet::from([start]);
        let mut ancestors = Vec::new();
        let mut current = start;
        while let Some(parent) = self
            .incoming_edges(current)
            .find(|e| e.kind == EdgeKind::ParentOf)
            .map(|e| e.source)
        {
            if !visited.insert(parent) {
                break;
            }
            let node = self.node(parent);
            let NodeData::OrgUnit(attrs) = &node.data else {
                break;
            };
            ancestors.push(OrgUnitRef {
                org_unit_id: node.raw_id.clone(),
                short_code: attrs.short_code.clone(),
                name: attrs
                    .name_en
                    .clone()
                    .or_else(|| attrs.name_de.clone())
                    .or_else(|| attrs.short_code.clone()),
            });
            current = parent;
        }
        ancestors
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::builder::{EdgePolicy, GraphBuilder};
    use crate::graph::model::{EdgeKind, NodeKind};
    use crate::graph::SkillGraph;
    use crate::Table;
    use serde_json::json;

    fn sample_graph() -> SkillGraph {
        let mut builder = GraphBuilder::new(EdgePolicy::Additive);
        builder.load_employees(&Table::from_rows(
            &["personal_number", "last_name", "planned_position", "org_unit"],
            vec![
                vec![json!("E1"), json!("Ibrahim"), serde_json::Value::Null, json!("U1")],
                vec![json!("E2"), json!("Sato"), json!("P1"), json!("U1")],
            ],
        ));
        builder.load_course_participation(&Table::from_rows(
            &["personal_number", "course_id", "completion_date"],
            vec![vec![json!("E1"), json!("C1"), json!("2024-02-01")]],
        ));
        builder.load_skill_dictionary(&Table::from_rows(
            &["skill_id", "skill_name"],
            vec![vec![json!("S1"), json!("Python")]],
        ));
        builder.load_skill_mappings(&Table::from_rows(
            &["course_id", "skill_id"],
            vec![vec![json!("C1"), json!("S1")]],
        ));
        builder.load_role_requirements(&Table::from_rows(
            &["position_id", "qualification_id", "qualification_name"],
            vec![vec![json!("P1"), json!("Q1"), json!("Electrical safety")]],
        ));
        builder.finish()
    }

    #[test]
    fn employee_skills_walks_two_hops() {
        let graph = sample_graph();
        let skills = graph.employee_skills("E1");
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].skill_name.as_deref(), Some("Python"));
        assert_eq!(skills[0].course_id, "C1");
    }

    #[test]
    fn absent_entities_yield_empty_results() {
        let graph = sample_graph();
        assert!(graph.employee_skills("nobody").is_empty());
        assert!(graph.employee_qualifications("nobody").is_empty());
        assert!(graph.courses_for_skill("no-skill").is_empty());
        assert!(graph.org_unit_ancestors("no-unit").is_empty());
        // an employee with no PLANNED_FOR edge has no gap to report
        assert!(graph.missing_qualifications("E1").is_empty());
    }

    #[test]
    fn missing_qualifications_is_required_minus_held() {
        let graph = sample_graph();
        let missing = graph.missing_qualifications("E2");
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].qualification_id, "Q1");
    }

    #[test]
    fn held_qualifications_shrink_the_gap() {
        let mut builder = GraphBuilder::with_graph(sample_graph(), EdgePolicy::Additive);
        builder.load_qualifications(&Table::from_rows(
            &["personal_number", "qualification_id"],
            vec![vec![json!("E2"), json!("Q1")]],
        ));
        let graph = builder.finish();
        assert!(graph.missing_qualifications("E2").is_empty());
    }

    #[test]
    fn courses_for_skill_reverse_lookup() {
        let graph = sample_graph();
        let courses = graph.courses_for_skill("S1");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course_id, "C1");
    }

    #[test]
    fn parent_cycle_terminates() {
        let mut graph = SkillGraph::new();
        let a = graph.ensure_node(NodeKind::OrgUnit, "A");
        let b = graph.ensure_node(NodeKind::OrgUnit, "B");
        let c = graph.ensure_node(NodeKind::OrgUnit, "C");
        graph.add_edge(a, b, EdgeKind::ParentOf, EdgePolicy::Additive);
        graph.add_edge(b, c, EdgeKind::ParentOf, EdgePolicy::Additive);
        graph.add_edge(c, a, EdgeKind::ParentOf, EdgePolicy::Additive);

        let ancestors = graph.org_unit_ancestors("C");
        // bounded: each unit appears at most once
        assert!(ancestors.len() <= 2);
        assert_eq!(ancestors[0].org_unit_id, "B");
    }

    #[test]
    fn stats_break_down_by_kind() {
        let stats = sample_graph().stats();
        assert_eq!(stats.nodes_by_kind["employee"], 2);
        assert_eq!(stats.edges_by_kind["develops_skill"], 1);
        assert_eq!(
            stats.node_count,
            stats.nodes_by_kind.values().sum::<usize>()
        );
    }
}
