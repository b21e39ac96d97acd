use platecheck_core::db::{open_db_in_memory, provision_default_lists};
use platecheck_core::{
    ListKind, ListNames, ListRecord, ListRepository, MembershipOutcome, PlateRepository,
    RepoError, SqliteListRepository, SqlitePlateRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn provisioned() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    provision_default_lists(&mut conn, &ListNames::default()).unwrap();
    conn
}

fn list(conn: &Connection, name: &str) -> ListRecord {
    SqliteListRepository::new(conn)
        .get_by_name(name)
        .unwrap()
        .unwrap()
}

#[test]
fn get_by_name_returns_none_for_unknown_list() {
    let conn = provisioned();
    let lists = SqliteListRepository::new(&conn);

    assert!(lists.get_by_name("vip").unwrap().is_none());
    assert!(lists.get(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn add_membership_reports_already_member_and_keeps_first_note() {
    let conn = provisioned();
    let plate_id = SqlitePlateRepository::new(&conn)
        .get_or_create("AA1", "aa1")
        .unwrap();
    let allow = list(&conn, "default_allow");
    let lists = SqliteListRepository::new(&conn);

    let first = lists
        .add_membership(allow.id, plate_id, Some("staff"))
        .unwrap();
    let second = lists
        .add_membership(allow.id, plate_id, Some("visitor"))
        .unwrap();
    assert_eq!(first, MembershipOutcome::Added);
    assert_eq!(second, MembershipOutcome::AlreadyMember);

    let membership = lists.get_membership(allow.id, plate_id).unwrap().unwrap();
    assert_eq!(membership.note.as_deref(), Some("staff"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM list_items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn add_membership_for_unknown_plate_is_a_storage_error() {
    let conn = provisioned();
    let allow = list(&conn, "default_allow");
    let lists = SqliteListRepository::new(&conn);

    let err = lists
        .add_membership(allow.id, Uuid::new_v4(), None)
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn memberships_for_plate_lists_each_list_once_sorted_by_name() {
    let conn = provisioned();
    let plate_id = SqlitePlateRepository::new(&conn)
        .get_or_create("BB2", "bb2")
        .unwrap();
    let allow = list(&conn, "default_allow");
    let deny = list(&conn, "default_deny");
    let lists = SqliteListRepository::new(&conn);

    assert!(lists.list_memberships_for_plate(plate_id).unwrap().is_empty());

    lists.add_membership(deny.id, plate_id, None).unwrap();
    lists.add_membership(allow.id, plate_id, None).unwrap();
    lists.add_membership(allow.id, plate_id, None).unwrap();

    let hits = lists.list_memberships_for_plate(plate_id).unwrap();
    let names: Vec<_> = hits.iter().map(|hit| hit.list_name.as_str()).collect();
    assert_eq!(names, ["default_allow", "default_deny"]);
    assert_eq!(hits[0].list_kind, ListKind::Allow);
    assert_eq!(hits[1].list_id, deny.id);
}

#[test]
fn remove_membership_deletes_row_then_reports_not_found() {
    let conn = provisioned();
    let plate_id = SqlitePlateRepository::new(&conn)
        .get_or_create("CC3", "cc3")
        .unwrap();
    let deny = list(&conn, "default_deny");
    let lists = SqliteListRepository::new(&conn);

    lists.add_membership(deny.id, plate_id, None).unwrap();
    lists.remove_membership(deny.id, plate_id).unwrap();
    assert!(lists.get_membership(deny.id, plate_id).unwrap().is_none());

    let err = lists.remove_membership(deny.id, plate_id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::MembershipNotFound { list_id, plate_id: missing }
            if list_id == deny.id && missing == plate_id
    ));
}

#[test]
fn externally_provisioned_kinds_round_trip_as_other() {
    let conn = provisioned();
    conn.execute(
        "INSERT INTO lists (id, name, kind) VALUES (?1, 'watch', 'watch');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let watch = list(&conn, "watch");
    assert_eq!(watch.kind, ListKind::Other("watch".to_string()));
    assert_eq!(watch.description, None);
}
