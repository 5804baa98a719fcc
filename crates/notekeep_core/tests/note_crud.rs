use notekeep_core::db::open_db_in_memory;
use notekeep_core::{
    Category, NoteDraft, NotePatch, NoteService, NoteServiceError, NoteValidationError,
    SqliteNoteRepository, SqliteUserRepository, UserId, UserService,
};
use rusqlite::Connection;

fn register(conn: &Connection, username: &str) -> UserId {
    let service = UserService::new(SqliteUserRepository::try_new(conn).unwrap());
    service.register(username, "pw").unwrap().user.id
}

#[test]
fn create_binds_owner_and_trims_title() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let created = service
        .create_note(
            alice,
            NoteDraft::new("  Weekly sync  ", "agenda items").with_category(Category::Meeting),
        )
        .unwrap();

    assert_eq!(created.owner_id, alice);
    assert_eq!(created.title, "Weekly sync");
    assert_eq!(created.category, Some(Category::Meeting));
    assert!(!created.is_favorite);
    assert!(!created.is_archived);
    assert_eq!(created.created_at, created.updated_at);

    let loaded = service.get_note(alice, created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rejects_blank_title_and_content() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let err = service
        .create_note(alice, NoteDraft::new("   ", "body"))
        .unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::EmptyTitle)
    ));

    let err = service
        .create_note(alice, NoteDraft::new("title", " \n "))
        .unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::EmptyContent)
    ));
}

#[test]
fn foreign_notes_look_missing() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let bob = register(&conn, "bob");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service
        .create_note(alice, NoteDraft::new("private", "secret"))
        .unwrap();

    assert!(matches!(
        service.get_note(bob, note.id),
        Err(NoteServiceError::NoteNotFound(id)) if id == note.id
    ));
    assert!(matches!(
        service.toggle_favorite(bob, note.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));
    assert!(matches!(
        service.toggle_archive(bob, note.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));
    assert!(matches!(
        service.update_note(
            bob,
            note.id,
            NotePatch {
                title: Some("stolen".to_string()),
                ..NotePatch::default()
            }
        ),
        Err(NoteServiceError::NoteNotFound(_))
    ));
    assert!(matches!(
        service.delete_note(bob, note.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));

    let untouched = service.get_note(alice, note.id).unwrap();
    assert_eq!(untouched, note);
}

#[test]
fn double_favorite_toggle_restores_flag_and_bumps_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service
        .create_note(alice, NoteDraft::new("fav", "body"))
        .unwrap();

    let first = service.toggle_favorite(alice, note.id).unwrap();
    assert!(first.is_favorite);
    assert!(!first.is_archived);
    assert!(first.updated_at > note.updated_at);

    let second = service.toggle_favorite(alice, note.id).unwrap();
    assert!(!second.is_favorite);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.created_at, note.created_at);
}

#[test]
fn archive_toggle_flips_only_archived() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service
        .create_note(alice, NoteDraft::new("old", "body"))
        .unwrap();

    let archived = service.toggle_archive(alice, note.id).unwrap();
    assert!(archived.is_archived);
    assert!(!archived.is_favorite);
    assert_eq!(archived.title, note.title);
}

#[test]
fn partial_update_changes_only_given_fields() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service
        .create_note(
            alice,
            NoteDraft::new("draft", "body").with_category(Category::Work),
        )
        .unwrap();

    let renamed = service
        .update_note(
            alice,
            note.id,
            NotePatch {
                title: Some(" final ".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.title, "final");
    assert_eq!(renamed.content, "body");
    assert_eq!(renamed.category, Some(Category::Work));
    assert!(renamed.updated_at > note.updated_at);

    let cleared = service
        .update_note(
            alice,
            note.id,
            NotePatch {
                category: Some(None),
                is_favorite: Some(true),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(cleared.category, None);
    assert!(cleared.is_favorite);
    assert_eq!(cleared.title, "final");
}

#[test]
fn full_replacement_overwrites_every_field() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service
        .create_note(alice, NoteDraft::new("a", "b").with_category(Category::Ideas))
        .unwrap();

    let replaced = service
        .update_note(
            alice,
            note.id,
            NotePatch::replace_with(NoteDraft::new("c", "d")),
        )
        .unwrap();
    assert_eq!(replaced.title, "c");
    assert_eq!(replaced.content, "d");
    assert_eq!(replaced.category, None);
}

#[test]
fn update_rejects_blank_content() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service
        .create_note(alice, NoteDraft::new("a", "b"))
        .unwrap();

    let err = service
        .update_note(
            alice,
            note.id,
            NotePatch {
                content: Some("   ".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::EmptyContent)
    ));
    assert_eq!(service.get_note(alice, note.id).unwrap().content, "b");
}

#[test]
fn delete_is_permanent() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service
        .create_note(alice, NoteDraft::new("gone", "soon"))
        .unwrap();

    service.delete_note(alice, note.id).unwrap();
    assert!(matches!(
        service.get_note(alice, note.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));
    assert!(matches!(
        service.delete_note(alice, note.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));
}

#[test]
fn concurrent_toggles_on_separate_connections_do_not_lose_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toggles.db");
    let conn = notekeep_core::db::open_db(&path).unwrap();
    let alice = register(&conn, "alice");
    let note_id = {
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
        service
            .create_note(alice, NoteDraft::new("race", "body"))
            .unwrap()
            .id
    };

    let workers = (0..4)
        .map(|_| {
            let path = path.clone();
            std::thread::spawn(move || {
                let conn = notekeep_core::db::open_db(&path).unwrap();
                let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
                for _ in 0..5 {
                    service.toggle_favorite(alice, note_id).unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for worker in workers {
        worker.join().unwrap();
    }

    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    // 20 flips in total: an even count returns the flag to its start value.
    assert!(!service.get_note(alice, note_id).unwrap().is_favorite);
}
