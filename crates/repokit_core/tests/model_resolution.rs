use repokit_core::db::{open_db_in_memory, Migration};
use repokit_core::{
    Attributes, Columns, ModelRef, RepoError, Repository, RepositoryConfig, SqliteRepository,
};
use rusqlite::Connection;

const MIGRATIONS: &[Migration] = &[Migration::new(
    1,
    "CREATE TABLE invoice (id INTEGER PRIMARY KEY, total INTEGER NOT NULL);
     CREATE TABLE billing_invoice (id INTEGER PRIMARY KEY, total INTEGER NOT NULL);
     CREATE TABLE member (member_id INTEGER PRIMARY KEY, handle TEXT NOT NULL);
     CREATE TABLE audit_entry (note TEXT);
     CREATE TABLE session (token TEXT PRIMARY KEY NOT NULL, user_id INTEGER NOT NULL);",
)];

#[test]
fn repository_name_resolves_model_table() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();

    let repo =
        SqliteRepository::try_new(&conn, RepositoryConfig::for_repository("InvoiceRepository"))
            .unwrap();
    assert_eq!(repo.model().name(), "Invoice");
    assert_eq!(repo.model().table(), "invoice");
    assert_eq!(repo.table_columns(), ["id", "total"]);
}

#[test]
fn model_folder_selects_prefixed_table() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let config =
        RepositoryConfig::for_repository("app::repos::InvoiceRepository").model_folder("Billing");

    let repo = SqliteRepository::try_new(&conn, config).unwrap();
    assert_eq!(repo.model().qualified_name(), "Billing::Invoice");
    assert_eq!(repo.model().table(), "billing_invoice");
}

#[test]
fn missing_table_is_model_not_found() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();

    let result = SqliteRepository::try_new(&conn, RepositoryConfig::for_repository("OrderRepository"));
    match result {
        Err(RepoError::ModelNotFound { model, table }) => {
            assert_eq!(model, "Order");
            assert_eq!(table, "order");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected model not found"),
    }
}

#[test]
fn empty_store_has_no_models() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteRepository::try_new(&conn, RepositoryConfig::for_repository("InvoiceRepository"));
    assert!(matches!(result, Err(RepoError::ModelNotFound { .. })));
}

#[test]
fn custom_primary_key_is_used_for_lookups() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let config = RepositoryConfig::for_repository("MemberRepository").primary_key("member_id");
    let repo = SqliteRepository::try_new(&conn, config).unwrap();

    let created = repo
        .create(&Attributes::new().set("member_id", 42_i64).set("handle", "neo".to_string()))
        .unwrap();
    assert_eq!(created.get_i64("member_id"), Some(42));
    assert_eq!(
        repo.find(42, &Columns::All).unwrap().unwrap().get_text("handle"),
        Some("neo")
    );

    let err = repo.find_or_fail(7, &Columns::All).unwrap_err();
    assert!(matches!(err, RepoError::EntityNotFound { ref column, .. } if column == "member_id"));
}

#[test]
fn text_primary_key_supports_lookup_update_and_delete() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let config = RepositoryConfig::for_repository("SessionRepository").primary_key("token");
    let repo = SqliteRepository::try_new(&conn, config).unwrap();

    repo.create(
        &Attributes::new()
            .set("token", "abc-123".to_string())
            .set("user_id", 7_i64),
    )
    .unwrap();

    let found = repo
        .find("abc-123".to_string(), &Columns::All)
        .unwrap()
        .unwrap();
    assert_eq!(found.get_i64("user_id"), Some(7));

    let updated = repo
        .update("abc-123".to_string(), &Attributes::new().set("user_id", 8_i64))
        .unwrap();
    assert_eq!(updated.get_text("token"), Some("abc-123"));
    assert_eq!(updated.get_i64("user_id"), Some(8));

    let err = repo
        .find_or_fail("zzz".to_string(), &Columns::All)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "entity not found: Session with token = \"zzz\""
    );

    repo.delete("abc-123".to_string()).unwrap();
    assert!(repo
        .find("abc-123".to_string(), &Columns::All)
        .unwrap()
        .is_none());
}

#[test]
fn table_without_primary_key_column_is_rejected() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();

    let result =
        SqliteRepository::try_new(&conn, RepositoryConfig::for_repository("AuditEntryRepository"));
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn { ref table, ref column })
            if table == "audit_entry" && column == "id"
    ));
}

#[test]
fn set_model_rebinds_and_keeps_binding_on_failure() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let mut repo =
        SqliteRepository::try_new(&conn, RepositoryConfig::for_repository("InvoiceRepository"))
            .unwrap();

    let billing =
        ModelRef::resolve(&RepositoryConfig::for_model("Invoice").model_folder("Billing")).unwrap();
    repo.set_model(billing).unwrap();
    assert_eq!(repo.model().table(), "billing_invoice");

    let missing = ModelRef::resolve(&RepositoryConfig::for_model("Refund")).unwrap();
    let err = repo.set_model(missing).unwrap_err();
    assert!(matches!(err, RepoError::ModelNotFound { .. }));
    assert_eq!(repo.model().table(), "billing_invoice");
}
