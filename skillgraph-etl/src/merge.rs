//! Best-effort merge stage producing the derived views.
//!
//! Every join here degrades instead of failing: if a required join key
//! is missing on either side, the merge is skipped with a warning and
//! the left side is returned unmodified. Joins are left joins in long
//! format, so a left row multiplies once per matching right row —
//! downstream consumers must not assume one row per employee.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use skillgraph_core::storage::canonical::views;
use skillgraph_core::{cell_id_key, SourceKind, Table};

use crate::observability::metrics;

/// Best-effort left join of `left` and `right` on the given key columns.
/// Rows whose key is null never match; their right-side cells stay null.
pub fn left_join(
    left: &Table,
    right: &Table,
    left_key: &str,
    right_key: &str,
    view: &str,
) -> Table {
    if !left.has_column(left_key) || !right.has_column(right_key) {
        warn!(
            view,
            left_key,
            right_key,
            "join key missing on one side, returning left table unmodified"
        );
        metrics::etl::merge_skipped(view);
        return left.clone();
    }

    // right-side columns carried over: everything except the join key and
    // name collisions (left wins on collision)
    let right_key_idx = right.column_index(right_key).unwrap_or_default();
    let mut carried = Vec::new();
    for (idx, column) in right.columns.iter().enumerate() {
        if idx == right_key_idx {
            continue;
        }
        if left.has_column(column) {
            debug!(view, column, "right-side column collides with left, dropped");
            continue;
        }
        carried.push(idx);
    }

    let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, row) in right.rows.iter().enumerate() {
        if let Some(key) = row.get(right_key_idx).and_then(cell_id_key) {
            by_key.entry(key).or_default().push(idx);
        }
    }

    let mut columns = left.columns.clone();
    columns.extend(carried.iter().map(|&i| right.columns[i].clone()));
    let mut merged = Table::new(columns);

    let left_key_idx = left.column_index(left_key).unwrap_or_default();
    for row in &left.rows {
        let matches = row
            .get(left_key_idx)
            .and_then(cell_id_key)
            .and_then(|key| by_key.get(&key).cloned())
            .unwrap_or_default();
        if matches.is_empty() {
            let mut out = row.clone();
            // pad ragged left rows before the right-side cells land
            out.resize(left.column_count(), Value::Null);
            merged.push_row(out);
        } else {
            for m in matches {
                let mut out = row.clone();
                out.resize(left.column_count(), Value::Null);
                out.extend(
                    carried
                        .iter()
                        .map(|&i| right.rows[m].get(i).cloned().unwrap_or(Value::Null)),
                );
                merged.push_row(out);
            }
        }
    }
    metrics::etl::merge_completed(view);
    merged
}

/// Join against a source that may be missing entirely. An absent right
/// side degrades the same way a missing join key does.
fn join_opt(left: &Table, right: Option<&Table>, left_key: &str, right_key: &str, view: &str) -> Table {
    match right {
        Some(right) => left_join(left, right, left_key, right_key, view),
        None => {
            warn!(view, "right-side source unavailable, returning left table unmodified");
            metrics::etl::merge_skipped(view);
            left.clone()
        }
    }
}

/// Build every derived view obtainable from the cleaned tables at hand.
/// Views whose base table is missing are skipped entirely. Learning
/// events are deliberately not joined anywhere: they share no reliable
/// key with the other sources.
pub fn build_views(cleaned: &HashMap<SourceKind, Table>) -> Vec<(&'static str, Table)> {
    let mut out = Vec::new();

    let employees = cleaned.get(&SourceKind::Employees);
    let participation = cleaned.get(&SourceKind::CourseParticipation);

    let profile = employees.map(|employees| {
        join_opt(
            employees,
            participation,
            "personal_number",
            "personal_number",
            views::EMPLOYEE_LEARNING_PROFILE,
        )
    });
    if let Some(profile) = &profile {
        out.push((views::EMPLOYEE_LEARNING_PROFILE, profile.clone()));
    } else {
        warn!(view = views::EMPLOYEE_LEARNING_PROFILE, "employees table unavailable, view skipped");
    }

    let matrix = cleaned.get(&SourceKind::SkillMapping).map(|mapping| {
        join_opt(
            mapping,
            cleaned.get(&SourceKind::SkillDictionary),
            "skill_id",
            "skill_id",
            views::SKILLS_MATRIX,
        )
    });
    if let Some(matrix) = &matrix {
        out.push((views::SKILLS_MATRIX, matrix.clone()));
    } else {
        warn!(view = views::SKILLS_MATRIX, "skill mapping table unavailable, view skipped");
    }

    if let Some(employees) = employees {
        let held = join_opt(
            employees,
            cleaned.get(&SourceKind::Qualifications),
            "personal_number",
            "personal_number",
            views::COMPLIANCE_TRACKING,
        );
        let compliance = join_opt(
            &held,
            cleaned.get(&SourceKind::RoleQualifications),
            "planned_position",
            "position_id",
            views::COMPLIANCE_TRACKING,
        );
        out.push((views::COMPLIANCE_TRACKING, compliance));
    }

    if let (Some(profile), Some(matrix)) = (&profile, &matrix) {
        out.push((
            views::GLOBAL_UNIFIED,
            left_join(profile, matrix, "course_id", "course_id", views::GLOBAL_UNIFIED),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employees() -> Table {
        Table::from_rows(
            &["personal_number", "last_name"],
            vec![
                vec![json!("1"), json!("Haddad")],
                vec![json!("2"), json!("Lindqvist")],
            ],
        )
    }

    #[test]
    fn left_join_fans_out_per_match() {
        let participation = Table::from_rows(
            &["personal_number", "course_id"],
            vec![
                vec![json!("1"), json!("C1")],
                vec![json!("1"), json!("C2")],
            ],
        );
        let merged = left_join(
            &employees(),
            &participation,
            "personal_number",
            "personal_number",
            "employee_learning_profile",
        );
        // employee 1 multiplies per course, employee 2 keeps one row with nulls
        assert_eq!(merged.row_count(), 3);
        assert_eq!(merged.cell(0, "course_id"), Some(&json!("C1")));
        assert_eq!(merged.cell(1, "course_id"), Some(&json!("C2")));
        assert_eq!(merged.cell(2, "course_id"), Some(&Value::Null));
    }

    #[test]
    fn missing_join_key_returns_left_unmodified() {
        let no_key = Table::from_rows(&["name_only"], vec![vec![json!("Haddad")]]);
        let participation = Table::from_rows(
            &["personal_number", "course_id"],
            vec![vec![json!("1"), json!("C1")]],
        );
        let merged = left_join(
            &no_key,
            &participation,
            "personal_number",
            "personal_number",
            "employee_learning_profile",
        );
        assert_eq!(merged.columns, no_key.columns);
        assert_eq!(merged.rows, no_key.rows);
    }

    #[test]
    fn join_keys_match_across_id_spellings() {
        let participation = Table::from_rows(
            &["personal_number", "course_id"],
            vec![vec![json!("001"), json!("C1")]],
        );
        let merged = left_join(
            &employees(),
            &participation,
            "personal_number",
            "personal_number",
            "employee_learning_profile",
        );
        assert_eq!(merged.cell(0, "course_id"), Some(&json!("C1")));
    }

    #[test]
    fn views_skip_what_their_base_is_missing() {
        let mut cleaned = HashMap::new();
        cleaned.insert(
            SourceKind::SkillMapping,
            Table::from_rows(&["course_id", "skill_id"], vec![vec![json!("C1"), json!("S1")]]),
        );
        let built = build_views(&cleaned);
        let names: Vec<_> = built.iter().map(|(n, _)| *n).collect();
        // no employees table: profile, compliance, and unified are skipped
        assert_eq!(names, vec![views::SKILLS_MATRIX]);
    }
}
