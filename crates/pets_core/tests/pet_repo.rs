use pets_core::db::{open_db_in_memory, PETS_SCHEMA_VERSION};
use pets_core::{
    Field, PetColumn, PetRepository, PetValues, RepoError, Selection, SortOrder,
    SqlitePetRepository,
};
use rusqlite::Connection;

fn repo() -> SqlitePetRepository {
    SqlitePetRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

#[test]
fn insert_assigns_increasing_ids() {
    let repo = repo();
    let first = repo
        .insert_pet(&PetValues::new().name("A").gender_code(0))
        .unwrap();
    let second = repo
        .insert_pet(&PetValues::new().name("B").gender_code(2))
        .unwrap();
    assert!(second > first);
}

#[test]
fn default_order_is_ascending_id() {
    let repo = repo();
    for name in ["Zed", "Amy", "Max"] {
        repo.insert_pet(&PetValues::new().name(name).gender_code(0))
            .unwrap();
    }

    let names: Vec<_> = repo
        .query_pets(None, None)
        .unwrap()
        .into_iter()
        .map(|pet| pet.name)
        .collect();
    assert_eq!(names, ["Zed", "Amy", "Max"]);

    let sorted: Vec<_> = repo
        .query_pets(None, Some(SortOrder::asc(PetColumn::Name)))
        .unwrap()
        .into_iter()
        .map(|pet| pet.name)
        .collect();
    assert_eq!(sorted, ["Amy", "Max", "Zed"]);
}

#[test]
fn update_writes_only_present_fields() {
    let repo = repo();
    let id = repo
        .insert_pet(
            &PetValues::new()
                .name("Toto")
                .breed(Some("Terrier"))
                .gender_code(1)
                .weight(Some(7)),
        )
        .unwrap();

    let changed = repo
        .update_pets(
            &PetValues::new().name("Toto II"),
            Some(&Selection::by_id(id)),
        )
        .unwrap();
    assert_eq!(changed, 1);

    let pet = repo.query_pets(None, None).unwrap().remove(0);
    assert_eq!(pet.name, "Toto II");
    assert_eq!(pet.breed.as_deref(), Some("Terrier"));
    assert_eq!(pet.weight, Some(7));
}

#[test]
fn empty_update_returns_zero() {
    let repo = repo();
    repo.insert_pet(&PetValues::new().name("A").gender_code(0))
        .unwrap();
    assert_eq!(repo.update_pets(&PetValues::new(), None).unwrap(), 0);
}

#[test]
fn store_rejects_null_name_even_without_provider_checks() {
    let repo = repo();
    let values = PetValues {
        name: Field::Null,
        ..PetValues::new().gender_code(0)
    };
    let err = repo.insert_pet(&values).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn read_rejects_out_of_domain_gender() {
    let repo = repo();
    repo.connection()
        .execute("INSERT INTO pets (name, gender) VALUES ('Odd', 9);", [])
        .unwrap();

    let err = repo.query_pets(None, None).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("gender")));
}

#[test]
fn delete_with_selection_counts_removed_rows() {
    let repo = repo();
    for weight in [1, 5, 10] {
        repo.insert_pet(&PetValues::new().name("P").gender_code(0).weight(Some(weight)))
            .unwrap();
    }

    let removed = repo
        .delete_pets(Some(&Selection::raw(
            "weight >= ?",
            vec![rusqlite::types::Value::Integer(5)],
        )))
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(repo.delete_pets(None).unwrap(), 1);
}

#[test]
fn count_honors_selection() {
    let repo = repo();
    for (name, gender) in [("A", 1), ("B", 2), ("C", 2)] {
        repo.insert_pet(&PetValues::new().name(name).gender_code(gender))
            .unwrap();
    }

    assert_eq!(repo.count_pets(None).unwrap(), 3);
    assert_eq!(
        repo.count_pets(Some(&Selection::eq(PetColumn::Gender, 2_i64)))
            .unwrap(),
        2
    );
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqlitePetRepository::try_new(conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, PETS_SCHEMA_VERSION),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_pets_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {PETS_SCHEMA_VERSION};"))
        .unwrap();

    let result = SqlitePetRepository::try_new(conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("pets"))));
}

#[test]
fn repository_rejects_connection_missing_weight_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE pets (
            _id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            breed TEXT,
            gender INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {PETS_SCHEMA_VERSION};"))
        .unwrap();

    let result = SqlitePetRepository::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "pets",
            column: "weight"
        })
    ));
}

#[test]
fn close_releases_connection() {
    repo().close().unwrap();
}
