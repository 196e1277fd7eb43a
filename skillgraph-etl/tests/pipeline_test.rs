use anyhow::Result;
use serde_json::{json, Value};
use tempfile::tempdir;

use skillgraph_core::storage::{CanonicalStore, SnapshotStore};
use skillgraph_core::{EdgePolicy, GraphHandle, SourceKind, Table};
use skillgraph_etl::pipeline::{rebuild_and_swap, rebuild_graph, EtlPipeline};

/// Raw exports the way they actually arrive: bilingual headers, padded
/// ids, duplicate rows, sentinel dates.
fn raw_sources() -> Vec<(SourceKind, Table)> {
    vec![
        (
            SourceKind::Employees,
            Table::from_rows(
                &["Personalnummer", "Nachname", "Zielposition", "Organisationseinheit"],
                vec![
                    vec![json!("007"), json!("Okafor"), Value::Null, json!("U1")],
                    // same person, differently padded: must collapse to the row above
                    vec![json!(7), json!("Duplicate"), json!("P9"), json!("U9")],
                    vec![json!("8"), json!("Sato"), json!("P1"), json!("U1")],
                ],
            ),
        ),
        (
            SourceKind::CourseParticipation,
            Table::from_rows(
                &["Personalnummer", "Kurs-Nr.", "Kursbezeichnung", "Abschlussdatum"],
                vec![vec![json!("7"), json!("C1"), json!("Rust Basics"), json!("15.03.2024")]],
            ),
        ),
        (
            SourceKind::SkillDictionary,
            Table::from_rows(
                &["Kompetenz-ID", "Kompetenzbezeichnung"],
                vec![vec![json!("S1"), json!("Python")]],
            ),
        ),
        (
            SourceKind::SkillMapping,
            Table::from_rows(
                &["Kursnummer", "Kompetenz-ID"],
                vec![vec![json!("C1"), json!("S1")]],
            ),
        ),
        (
            SourceKind::RoleQualifications,
            Table::from_rows(
                &["Planstellen-ID", "Qualifikations-ID", "Qualifikation"],
                vec![vec![json!("P1"), json!("Q1"), json!("Electrical safety")]],
            ),
        ),
        (
            SourceKind::OrgStructure,
            Table::from_rows(
                &["OrgEh", "Übergeordnete Einheit", "Kurztext"],
                vec![
                    vec![json!("U1"), json!("U0"), json!("OPS")],
                    vec![json!("U0"), Value::Null, json!("ROOT")],
                ],
            ),
        ),
    ]
}

#[test]
fn full_run_produces_canonical_tables_and_a_queryable_graph() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = EtlPipeline::new(CanonicalStore::new(dir.path().join("canonical"))?);

    let summary = pipeline.run(raw_sources())?;
    assert!(summary.tables_written.contains(&"employees".to_string()));
    assert!(summary
        .tables_written
        .contains(&"employee_learning_profile".to_string()));
    assert!(summary.tables_written.contains(&"skills_matrix".to_string()));

    // padded duplicate collapsed to the first occurrence
    let employees = pipeline.store().load_table("employees")?.unwrap();
    assert_eq!(employees.row_count(), 2);
    assert_eq!(employees.cell(0, "last_name"), Some(&json!("Okafor")));

    let graph = rebuild_graph(pipeline.store(), EdgePolicy::Additive)?;

    // two-hop skill lookup, queried with the padded spelling
    let skills = graph.employee_skills("007");
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].skill_name.as_deref(), Some("Python"));
    assert_eq!(skills[0].course_id, "C1");
    assert_eq!(
        skills[0].completed_on,
        chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
    );

    // gap analysis against the planned position
    let missing = graph.missing_qualifications("8");
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].qualification_id, "Q1");
    assert_eq!(missing[0].qualification_name.as_deref(), Some("Electrical safety"));

    // org nesting
    let ancestors = graph.org_unit_ancestors("U1");
    assert_eq!(ancestors.len(), 1);
    assert_eq!(ancestors[0].org_unit_id, "U0");

    // reverse lookup
    let courses = graph.courses_for_skill("S1");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course_id, "C1");

    Ok(())
}

#[test]
fn missing_key_column_degrades_but_pipeline_continues() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = EtlPipeline::new(CanonicalStore::new(dir.path().join("canonical"))?);

    let summary = pipeline.run(vec![
        (
            SourceKind::Employees,
            // no personal-number-equivalent column at all
            Table::from_rows(&["Nachname"], vec![vec![json!("Okafor")]]),
        ),
        (
            SourceKind::CourseParticipation,
            Table::from_rows(
                &["Personalnummer", "Kursnummer"],
                vec![vec![json!("7"), json!("C1")]],
            ),
        ),
        (
            SourceKind::SkillDictionary,
            Table::from_rows(
                &["Kompetenz-ID", "Kompetenzbezeichnung"],
                vec![vec![json!("S1"), json!("Python")]],
            ),
        ),
    ])?;

    // the profile view is the employees table unchanged
    let profile = pipeline
        .store()
        .load_table("employee_learning_profile")?
        .unwrap();
    assert_eq!(profile.columns, vec!["nachname"]);
    assert_eq!(profile.row_count(), 1);

    // the remaining canonical tables were still produced
    assert!(summary
        .tables_written
        .contains(&"course_participation".to_string()));
    assert!(summary
        .tables_written
        .contains(&"skill_dictionary".to_string()));
    Ok(())
}

#[test]
fn run_without_any_source_is_fatal() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = EtlPipeline::new(CanonicalStore::new(dir.path().join("canonical"))?);
    assert!(pipeline.run(Vec::new()).is_err());
    Ok(())
}

#[test]
fn snapshot_round_trip_and_atomic_swap() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = EtlPipeline::new(CanonicalStore::new(dir.path().join("canonical"))?);
    pipeline.run(raw_sources())?;

    let handle = GraphHandle::empty();
    let before_swap = handle.current();
    let stats = rebuild_and_swap(pipeline.store(), EdgePolicy::Additive, &handle)?;
    assert!(stats.node_count > 0);
    // the old reader still sees its pre-swap instance
    assert_eq!(before_swap.node_count(), 0);
    assert_eq!(handle.current().stats(), stats);

    let snapshot = SnapshotStore::new(dir.path().join("graph.snapshot"));
    snapshot.save(&handle.current())?;
    let restored = snapshot.load()?;
    assert_eq!(restored.stats(), stats);
    assert_eq!(restored.employee_skills("7").len(), 1);
    Ok(())
}

#[test]
fn edge_policy_controls_double_import_behavior() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = EtlPipeline::new(CanonicalStore::new(dir.path().join("canonical"))?);
    pipeline.run(raw_sources())?;

    let store = pipeline.store();
    let mapping = store.load_table("skill_mapping")?.unwrap();

    // additive: importing the same mapping twice doubles the edges
    let additive = {
        let mut builder =
            skillgraph_core::graph::GraphBuilder::new(EdgePolicy::Additive);
        builder.load_skill_mappings(&mapping);
        builder.load_skill_mappings(&mapping);
        builder.finish()
    };
    assert_eq!(additive.stats().edges_by_kind["develops_skill"], 2);

    // deduplicated: the second import is a no-op
    let deduped = {
        let mut builder =
            skillgraph_core::graph::GraphBuilder::new(EdgePolicy::Deduplicate);
        builder.load_skill_mappings(&mapping);
        builder.load_skill_mappings(&mapping);
        builder.finish()
    };
    assert_eq!(deduped.stats().edges_by_kind["develops_skill"], 1);
    Ok(())
}
