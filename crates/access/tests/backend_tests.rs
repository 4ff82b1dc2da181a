// Run with a single backend feature, e.g.
// `cargo test -p dbal_access --no-default-features --features sqlite`.

use dbal_access::Backend;

#[cfg(not(feature = "mysql"))]
#[test]
fn mysql_without_its_driver_is_unsupported() {
    use dbal_access::{ConnectionConfig, DataAccess, ErrorKind, Fields};

    let cfg = ConnectionConfig::new(Backend::MySql, "shop").unwrap();
    let db = DataAccess::new(cfg);

    let err = db.connect().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedBackend);
    assert!(err.to_string().contains("MySQL"));

    let err = db.count("items", &Fields::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedBackend);
}

#[cfg(not(feature = "sqlite"))]
#[test]
fn sqlite_without_its_driver_is_unsupported() {
    use dbal_access::{ConnectionConfig, DataAccess, ErrorKind};

    let cfg = ConnectionConfig::sqlite("unused.db").unwrap();
    let err = DataAccess::new(cfg).connect().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedBackend);
}

#[test]
fn backend_tags_parse_regardless_of_build() {
    // the tag is known even when the driver is compiled out
    assert_eq!("mysql".parse::<Backend>().unwrap(), Backend::MySql);
    assert_eq!("sqlite".parse::<Backend>().unwrap(), Backend::Sqlite);
}
