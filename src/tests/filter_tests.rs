use super::*;

fn record(raw: &str) -> PackageRecord {
    let parts = crate::naming::extract(raw);
    PackageRecord {
        raw_name: raw.to_string(),
        title: parts.title,
        tags: parts.tags,
        preview_ref: None,
        readme_ref: None,
        config_ref: None,
        created_at: None,
        updated_at: None,
        fetch_error: None,
    }
}

fn sample() -> Vec<PackageRecord> {
    vec![
        record("[UI] Widget A"),
        record("Widget B"),
        record("[Data] [UI] Chart"),
        record("[Data] Exporter"),
    ]
}

fn names(v: &[&PackageRecord]) -> Vec<String> {
    v.iter().map(|r| r.raw_name.clone()).collect()
}

#[test]
fn empty_query_shows_everything_in_order() {
    let rs = sample();
    let out = visible(&rs, &Query::default());
    assert_eq!(
        names(&out),
        rs.iter().map(|r| r.raw_name.clone()).collect::<Vec<_>>()
    );
}

#[test]
fn text_matches_title_case_insensitively() {
    let rs = sample();
    let out = visible(&rs, &Query::text("widget"));
    assert_eq!(names(&out), vec!["[UI] Widget A", "Widget B"]);
}

#[test]
fn text_matches_tags() {
    let rs = sample();
    let out = visible(&rs, &Query::text("dat"));
    assert_eq!(names(&out), vec!["[Data] [UI] Chart", "[Data] Exporter"]);
}

#[test]
fn any_policy_includes_records_with_one_selected_tag() {
    let rs = sample();
    let out = visible(&rs, &Query::default().with_tags(["UI", "Missing"]));
    assert_eq!(names(&out), vec!["[UI] Widget A", "[Data] [UI] Chart"]);
}

#[test]
fn all_policy_requires_every_selected_tag() {
    let rs = sample();
    let q = Query::default()
        .with_tags(["UI", "Data"])
        .with_policy(TagPolicy::All);
    assert_eq!(names(&visible(&rs, &q)), vec!["[Data] [UI] Chart"]);
}

#[test]
fn text_and_tags_must_both_match() {
    let rs = sample();
    let q = Query::text("widget").with_tags(["UI"]);
    assert_eq!(names(&visible(&rs, &q)), vec!["[UI] Widget A"]);
}

#[test]
fn filtering_is_idempotent_and_a_subset() {
    let rs = sample();
    let q = Query::text("a").with_tags(["Data"]);
    let once: Vec<PackageRecord> = visible(&rs, &q).into_iter().cloned().collect();
    let twice: Vec<PackageRecord> = visible(&once, &q).into_iter().cloned().collect();
    assert_eq!(once, twice);
    assert!(once.iter().all(|r| rs.contains(r)));
}

#[test]
fn toggle_tag_adds_then_removes() {
    let mut q = Query::default();
    q.toggle_tag("UI");
    assert!(q.tags.contains("UI"));
    q.toggle_tag("UI");
    assert!(q.is_empty());
}

#[test]
fn all_tags_is_sorted_and_unique() {
    let mut rs = sample();
    rs.push(record("Again [UI] [UI]"));
    assert_eq!(all_tags(&rs), vec!["Data", "UI"]);

    let counts = tag_counts(&rs);
    assert_eq!(counts.get("UI"), Some(&3));
    assert_eq!(counts.get("Data"), Some(&2));
}

#[test]
fn blank_query_text_matches_everything() {
    let rs = sample();
    let q = Query::text("   ");
    assert!(q.is_empty());
    assert_eq!(visible(&rs, &q).len(), rs.len());

    let padded = Query::text("  widget ");
    assert_eq!(
        visible(&rs, &padded).len(),
        visible(&rs, &Query::text("widget")).len()
    );
}
