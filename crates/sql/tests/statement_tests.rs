use dbal_sql::{Fields, SqlError, Statement};
use serde_json::json;

fn by_name() -> Fields {
    Fields::new().with("name", "x")
}

#[test]
fn select_with_and_without_filters() {
    let s = dbal_sql::select("items", &by_name(), "").unwrap();
    assert_eq!(s.sql, "SELECT * FROM items WHERE name = ?");
    assert_eq!(s.params, vec![json!("x")]);

    // no dangling WHERE when there is nothing to filter on
    let s = dbal_sql::select("items", &Fields::new(), "").unwrap();
    assert_eq!(s.sql, "SELECT * FROM items");
    assert!(s.params.is_empty());
}

#[test]
fn select_appends_extra_sql() {
    let s = dbal_sql::select("items", &by_name(), "ORDER BY id DESC").unwrap();
    assert_eq!(s.sql, "SELECT * FROM items WHERE name = ? ORDER BY id DESC");

    let s = dbal_sql::select("items", &Fields::new(), " LIMIT 2").unwrap();
    assert_eq!(s.sql, "SELECT * FROM items LIMIT 2");

    let s = dbal_sql::select("items", &Fields::new(), "   ").unwrap();
    assert_eq!(s.sql, "SELECT * FROM items");
}

#[test]
fn count_uses_aggregate() {
    let s = dbal_sql::count("items", &by_name()).unwrap();
    assert_eq!(s.sql, "SELECT COUNT(*) FROM items WHERE name = ?");
}

#[test]
fn insert_statement() {
    let fields = Fields::new().with("name", "x").with("value", 5);
    let s = dbal_sql::insert("items", &fields).unwrap();
    assert_eq!(s.sql, "INSERT INTO items (name, value) VALUES (?, ?)");
    assert_eq!(s.params, vec![json!("x"), json!(5)]);
}

#[test]
fn update_params_are_set_values_then_filters() {
    let fields = Fields::new().with("value", 7).with("name", "y");
    let s = dbal_sql::update("items", &fields, &Fields::new().with("id", 3)).unwrap();
    assert_eq!(s.sql, "UPDATE items SET value = ?, name = ? WHERE id = ?");
    assert_eq!(s.params, vec![json!(7), json!("y"), json!(3)]);
}

#[test]
fn unfiltered_writes_need_the_explicit_variant() {
    let fields = Fields::new().with("value", 0);
    assert_eq!(
        dbal_sql::update("items", &fields, &Fields::new()),
        Err(SqlError::UnfilteredWrite("update"))
    );
    assert_eq!(
        dbal_sql::delete("items", &Fields::new()),
        Err(SqlError::UnfilteredWrite("delete"))
    );

    let s = dbal_sql::update_all("items", &fields).unwrap();
    assert_eq!(s.sql, "UPDATE items SET value = ?");
    assert_eq!(dbal_sql::delete_all("items").unwrap().sql, "DELETE FROM items");
}

#[test]
fn delete_statement() {
    let s = dbal_sql::delete("items", &by_name()).unwrap();
    assert_eq!(s.sql, "DELETE FROM items WHERE name = ?");
    assert_eq!(s.params, vec![json!("x")]);
}

#[test]
fn table_name_is_checked_first() {
    assert_eq!(
        dbal_sql::select("", &by_name(), ""),
        Err(SqlError::MissingIdentifier)
    );
    assert_eq!(
        dbal_sql::delete("", &Fields::new()),
        Err(SqlError::MissingIdentifier)
    );
    assert!(matches!(
        dbal_sql::count("items where 1=1 --", &Fields::new()),
        Err(SqlError::InvalidIdentifier(_))
    ));
}

#[test]
fn update_needs_fields() {
    assert_eq!(
        dbal_sql::update("items", &Fields::new(), &by_name()),
        Err(SqlError::EmptyFields("update"))
    );
}

#[test]
fn raw_sql_must_not_be_blank() {
    assert_eq!(Statement::raw("  \n"), Err(SqlError::MissingSql));
    let s = Statement::raw("CREATE TABLE t (id INTEGER)").unwrap();
    assert!(s.params.is_empty());
}
