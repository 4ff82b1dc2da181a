use dbal_sql::{Fields, Joiner, SqlError, Statement, render_filter, render_insert};
use serde_json::json;

fn filters(n: usize) -> Fields {
    (0..n).map(|i| (format!("col{i}"), json!(i))).collect()
}

#[test]
fn filter_has_one_placeholder_per_entry() {
    for n in 1..=6 {
        let r = render_filter(&filters(n), Joiner::And).unwrap();
        assert_eq!(r.placeholder_count(), n);
        assert_eq!(r.params.len(), n);
        assert_eq!(r.sql.matches(" AND ").count(), n - 1);
    }
}

#[test]
fn filter_values_follow_placeholder_order() {
    let f = Fields::new().with("name", "x").with("value", 5).with("flag", true);
    let r = render_filter(&f, Joiner::And).unwrap();
    assert_eq!(r.sql, "name = ? AND value = ? AND flag = ?");
    assert_eq!(r.params, vec![json!("x"), json!(5), json!(true)]);
}

#[test]
fn filter_joiners() {
    let f = Fields::new().with("a", 1).with("b", 2);
    assert_eq!(render_filter(&f, Joiner::Or).unwrap().sql, "a = ? OR b = ?");
    assert_eq!(render_filter(&f, Joiner::Comma).unwrap().sql, "a = ?, b = ?");
    assert_eq!(Joiner::default(), Joiner::And);
}

#[test]
fn empty_filter_renders_nothing() {
    let r = render_filter(&Fields::new(), Joiner::And).unwrap();
    assert_eq!(r, Statement::default());
}

#[test]
fn insert_columns_and_values_line_up() {
    let f = Fields::new().with("a", 1).with("b", 2);
    let r = render_insert(&f).unwrap();
    assert_eq!(r.sql, "(a, b) VALUES (?, ?)");
    assert_eq!(r.params, vec![json!(1), json!(2)]);
}

#[test]
fn insert_needs_fields() {
    assert_eq!(
        render_insert(&Fields::new()),
        Err(SqlError::EmptyFields("insert"))
    );
}

#[test]
fn bad_column_names_are_rejected() {
    let f = Fields::new().with("a = 1 OR 1", 1);
    assert!(matches!(
        render_filter(&f, Joiner::And),
        Err(SqlError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        render_insert(&f),
        Err(SqlError::InvalidIdentifier(_))
    ));
}
