use offerlink_store::Store;

#[test]
fn migrations_apply_once() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");

    let version: i64 = store
        .connection()
        .query_row("SELECT version FROM offerlink_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .expect("schema version");
    assert_eq!(version, offerlink_store::migrate::latest_version());
    assert_eq!(store.schema_version().expect("schema version"), version);
}

#[test]
fn schema_version_is_zero_before_migrating() {
    let store = Store::open_in_memory().expect("open in memory");
    assert_eq!(store.schema_version().expect("schema version"), 0);
}
