use platecheck_core::db::{open_db, open_db_in_memory};
use platecheck_core::{PlateRepository, RepoError, SqlitePlateRepository};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

#[test]
fn get_or_create_inserts_once_and_keeps_first_raw_text() {
    let conn = open_db_in_memory().unwrap();
    let plates = SqlitePlateRepository::new(&conn);

    let first = plates.get_or_create("AB123CD", "ab-123 cd").unwrap();
    let second = plates.get_or_create("AB123CD", "AB 123 CD").unwrap();
    assert_eq!(first, second);
    assert_eq!(plates.count().unwrap(), 1);

    let stored = plates.get(first).unwrap().unwrap();
    assert_eq!(stored.raw, "ab-123 cd");
    assert_eq!(stored.canonical, "AB123CD");
    assert_eq!(stored.country, None);
    assert_eq!(stored.region, None);
    assert!(stored.created_at > 0);
}

#[test]
fn find_by_canonical_returns_empty_for_unknown_key() {
    let conn = open_db_in_memory().unwrap();
    let plates = SqlitePlateRepository::new(&conn);

    assert!(plates.find_by_canonical("NOPE1").unwrap().is_empty());
    assert!(plates.get(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn duplicate_canonical_rows_are_reported_as_integrity_violation() {
    let conn = open_db_in_memory().unwrap();
    // Simulate a store whose unique index was lost.
    conn.execute_batch(
        "DROP INDEX ux_plates_canonical;
         INSERT INTO plates (id, raw, canonical)
         VALUES ('00000000-0000-0000-0000-000000000001', 'x1', 'X1'),
                ('00000000-0000-0000-0000-000000000002', 'X-1', 'X1');",
    )
    .unwrap();
    let plates = SqlitePlateRepository::new(&conn);

    assert_eq!(plates.find_by_canonical("X1").unwrap().len(), 2);
    let err = plates.get_or_create("X1", "x 1").unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateCanonical { ref canonical, count: 2 } if canonical == "X1"
    ));
}

#[test]
fn corrupt_plate_id_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO plates (id, raw, canonical) VALUES ('not-a-uuid', 'q', 'Q');",
        [],
    )
    .unwrap();
    let plates = SqlitePlateRepository::new(&conn);

    let err = plates.find_by_canonical("Q").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn concurrent_get_or_create_yields_one_row_and_one_id() {
    const WORKERS: usize = 8;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    drop(open_db(&path).unwrap());

    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let plates = SqlitePlateRepository::new(&conn);
                barrier.wait();
                plates
                    .get_or_create("RACE42", &format!("race-42 #{worker}"))
                    .unwrap()
            })
        })
        .collect();

    let ids: HashSet<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(ids.len(), 1);

    let conn = open_db(&path).unwrap();
    let plates = SqlitePlateRepository::new(&conn);
    let rows = plates.find_by_canonical("RACE42").unwrap();
    assert_eq!(rows.len(), 1);
    assert!(ids.contains(&rows[0].id));
}
