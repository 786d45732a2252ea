use repokit_core::db::{open_db_in_memory, Migration};
use repokit_core::{
    Attributes, Columns, OrderBy, Pagination, RepoError, Repository, RepositoryConfig,
    SqliteRepository, Value,
};
use rusqlite::Connection;

const MIGRATIONS: &[Migration] = &[Migration::new(
    1,
    "CREATE TABLE user (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL,
        name TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at INTEGER,
        updated_at INTEGER
    );
    CREATE TABLE tag (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT
    );",
)];

fn user_repo(conn: &Connection) -> SqliteRepository<'_> {
    SqliteRepository::try_new(conn, RepositoryConfig::for_repository("UserRepository")).unwrap()
}

fn user(email: &str, status: &str) -> Attributes {
    Attributes::new()
        .set("email", email.to_string())
        .set("status", status.to_string())
}

#[test]
fn create_then_find_returns_stored_fields() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);

    let data = user("ada@example.com", "active").set("name", "Ada".to_string());
    let created = repo.create(&data).unwrap();
    let id = created.get_i64("id").unwrap();

    let found = repo.find(id, &Columns::All).unwrap().unwrap();
    for (column, value) in data.iter() {
        assert_eq!(found.get(column), Some(value), "column {column}");
    }
    assert_eq!(found, created);
}

#[test]
fn create_fills_timestamps_when_table_has_them() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);

    let created = repo.create(&user("ts@example.com", "active")).unwrap();
    let created_at = created.get_i64("created_at").unwrap();
    assert!(created_at > 0);
    assert_eq!(created.get_i64("updated_at"), Some(created_at));

    let explicit = repo
        .create(&user("old@example.com", "active").set("created_at", 1_000_i64))
        .unwrap();
    assert_eq!(explicit.get_i64("created_at"), Some(1_000));
}

#[test]
fn create_without_fields_uses_column_defaults() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = SqliteRepository::try_new(&conn, RepositoryConfig::for_model("Tag")).unwrap();

    let created = repo.create(&Attributes::new()).unwrap();
    assert_eq!(created.get_i64("id"), Some(1));
    assert_eq!(created.get("name"), Some(&Value::Null));
}

#[test]
fn find_missing_id_is_none_and_find_or_fail_errors() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);

    assert!(repo.find(404, &Columns::All).unwrap().is_none());

    let err = repo.find_or_fail(404, &Columns::All).unwrap_err();
    match err {
        RepoError::EntityNotFound {
            model,
            column,
            value,
        } => {
            assert_eq!(model, "User");
            assert_eq!(column, "id");
            assert_eq!(value, "404");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn find_projects_requested_columns_in_order() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    let id = repo
        .create(&user("p@example.com", "active"))
        .unwrap()
        .get_i64("id")
        .unwrap();

    let projected = repo
        .find(id, &Columns::only(["status", "email"]))
        .unwrap()
        .unwrap();
    assert_eq!(projected.columns().collect::<Vec<_>>(), ["status", "email"]);
    assert_eq!(projected.get_text("email"), Some("p@example.com"));
    assert!(projected.get("id").is_none());
}

#[test]
fn unknown_or_malformed_columns_are_rejected() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);

    let err = repo
        .find(1, &Columns::only(["password"]))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::UnknownColumn { ref table, ref column } if table == "user" && column == "password"
    ));

    let err = repo
        .find_by("email = email OR 1", "x".to_string(), &Columns::All)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidIdentifier(_)));

    let err = repo
        .create(&Attributes::new().set("nickname", "n".to_string()))
        .unwrap_err();
    assert!(matches!(err, RepoError::UnknownColumn { .. }));
}

#[test]
fn find_by_returns_first_match_by_primary_key() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    repo.create(&user("a@example.com", "active")).unwrap();
    repo.create(&user("b@example.com", "active")).unwrap();

    let first = repo
        .find_by("status", "active".to_string(), &Columns::All)
        .unwrap()
        .unwrap();
    assert_eq!(first.get_text("email"), Some("a@example.com"));

    assert!(repo
        .find_by("status", "banned".to_string(), &Columns::All)
        .unwrap()
        .is_none());

    let err = repo
        .find_or_fail_by("status", "banned".to_string(), &Columns::All)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "entity not found: User with status = \"banned\""
    );
}

#[test]
fn null_value_matches_null_columns() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    repo.create(&user("named@example.com", "active").set("name", "Ann".to_string()))
        .unwrap();
    repo.create(&user("anon1@example.com", "active")).unwrap();
    repo.create(&user("anon2@example.com", "active")).unwrap();

    let first = repo
        .find_by("name", Value::Null, &Columns::All)
        .unwrap()
        .unwrap();
    assert_eq!(first.get_text("email"), Some("anon1@example.com"));

    let unnamed = repo
        .find_all_by("name", Value::Null, &OrderBy::default(), &Columns::All)
        .unwrap();
    let emails: Vec<_> = unnamed
        .iter()
        .map(|record| record.get_text("email").unwrap())
        .collect();
    assert_eq!(emails, ["anon1@example.com", "anon2@example.com"]);

    let err = repo
        .find_or_fail_by("email", Value::Null, &Columns::All)
        .unwrap_err();
    assert_eq!(err.to_string(), "entity not found: User with email = null");
}

#[test]
fn find_all_orders_by_primary_key_by_default() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    for email in ["c@example.com", "a@example.com", "b@example.com"] {
        repo.create(&user(email, "active")).unwrap();
    }

    let ids: Vec<_> = repo
        .find_all(&OrderBy::default(), &Columns::All)
        .unwrap()
        .iter()
        .map(|record| record.get_i64("id").unwrap())
        .collect();
    assert_eq!(ids, [1, 2, 3]);

    let emails: Vec<_> = repo
        .find_all(&OrderBy::desc("email"), &Columns::only(["email"]))
        .unwrap()
        .iter()
        .map(|record| record.get_text("email").unwrap().to_string())
        .collect();
    assert_eq!(emails, ["c@example.com", "b@example.com", "a@example.com"]);
}

#[test]
fn find_all_by_filters_and_breaks_ties_by_primary_key() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    repo.create(&user("x@example.com", "active").set("name", "Sam".to_string()))
        .unwrap();
    repo.create(&user("y@example.com", "banned")).unwrap();
    repo.create(&user("z@example.com", "active").set("name", "Sam".to_string()))
        .unwrap();

    let active = repo
        .find_all_by(
            "status",
            "active".to_string(),
            &OrderBy::desc("name"),
            &Columns::All,
        )
        .unwrap();
    let emails: Vec<_> = active
        .iter()
        .map(|record| record.get_text("email").unwrap())
        .collect();
    assert_eq!(emails, ["x@example.com", "z@example.com"]);
}

#[test]
fn find_all_paginated_reports_totals() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    for index in 0..5 {
        repo.create(&user(&format!("u{index}@example.com"), "active"))
            .unwrap();
    }

    let page = repo
        .find_all_paginated(Pagination::new(2, 2), &OrderBy::default(), &Columns::All)
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.per_page, 2);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.last_page, 3);
    let ids: Vec<_> = page
        .items
        .iter()
        .map(|record| record.get_i64("id").unwrap())
        .collect();
    assert_eq!(ids, [3, 4]);

    let defaulted = repo
        .find_all_paginated(Pagination::new(0, 0), &OrderBy::default(), &Columns::All)
        .unwrap();
    assert_eq!(defaulted.per_page, 20);
    assert_eq!(defaulted.current_page, 1);
    assert_eq!(defaulted.items.len(), 5);

    let farthest = repo
        .find_all_paginated(
            Pagination::new(u32::MAX, u32::MAX),
            &OrderBy::default(),
            &Columns::All,
        )
        .unwrap();
    assert!(farthest.items.is_empty());
    assert_eq!(farthest.total, 5);

    let beyond = repo
        .find_all_paginated(Pagination::new(2, 9), &OrderBy::default(), &Columns::All)
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);
}

#[test]
fn update_changes_only_given_fields() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    let created = repo
        .create(&user("u@example.com", "pending").set("name", "Before".to_string()))
        .unwrap();
    let id = created.get_i64("id").unwrap();
    conn.execute("UPDATE user SET updated_at = 1 WHERE id = ?1;", [id])
        .unwrap();

    let updated = repo
        .update(id, &Attributes::new().set("status", "active".to_string()))
        .unwrap();

    assert_eq!(updated.get_text("status"), Some("active"));
    assert_eq!(updated.get_text("name"), Some("Before"));
    assert_eq!(updated.get_text("email"), Some("u@example.com"));
    assert_eq!(updated.get("created_at"), created.get("created_at"));
    assert!(updated.get_i64("updated_at").unwrap() > 1);
    assert_eq!(repo.find(id, &Columns::All).unwrap().unwrap(), updated);
}

#[test]
fn update_of_primary_key_returns_moved_record() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    repo.create(&user("move@example.com", "active")).unwrap();

    let moved = repo
        .update(1, &Attributes::new().set("id", "9".to_string()))
        .unwrap();
    assert_eq!(moved.get_i64("id"), Some(9));
    assert_eq!(moved.get_text("email"), Some("move@example.com"));
    assert!(repo.find(1, &Columns::All).unwrap().is_none());
    assert_eq!(repo.find(9, &Columns::All).unwrap().unwrap(), moved);
}

#[test]
fn update_with_no_fields_returns_record_unchanged() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    let created = repo.create(&user("same@example.com", "active")).unwrap();
    let id = created.get_i64("id").unwrap();

    let unchanged = repo.update(id, &Attributes::new()).unwrap();
    assert_eq!(unchanged, created);
}

#[test]
fn update_missing_id_fails_before_writing() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    repo.create(&user("keep@example.com", "active")).unwrap();

    let err = repo
        .update(77, &Attributes::new().set("status", "banned".to_string()))
        .unwrap_err();
    assert!(matches!(err, RepoError::EntityNotFound { ref value, .. } if value == "77"));

    let banned = repo
        .find_all_by("status", "banned".to_string(), &OrderBy::default(), &Columns::All)
        .unwrap();
    assert!(banned.is_empty());

    let err = repo
        .update(77, &Attributes::new().set("nickname", "n".to_string()))
        .unwrap_err();
    assert!(matches!(err, RepoError::EntityNotFound { ref value, .. } if value == "77"));
}

#[test]
fn delete_removes_record() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    let id = repo
        .create(&user("bye@example.com", "active"))
        .unwrap()
        .get_i64("id")
        .unwrap();

    repo.delete(id).unwrap();
    assert!(repo.find(id, &Columns::All).unwrap().is_none());
}

#[test]
fn delete_missing_id_fails_and_deletes_nothing() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    repo.create(&user("stay@example.com", "active")).unwrap();

    let err = repo.delete(12).unwrap_err();
    assert!(matches!(err, RepoError::EntityNotFound { .. }));
    assert_eq!(
        repo.find_all(&OrderBy::default(), &Columns::All)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn records_serialize_as_json_objects() {
    let conn = open_db_in_memory(MIGRATIONS).unwrap();
    let repo = user_repo(&conn);
    let created = repo
        .create(&user("json@example.com", "active").set("created_at", 5_i64))
        .unwrap();

    let json = serde_json::to_value(&created).unwrap();
    assert_eq!(json["email"], "json@example.com");
    assert_eq!(json["name"], serde_json::Value::Null);
    assert_eq!(json["created_at"], 5);
}
