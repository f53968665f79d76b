use speculate2::speculate;
use studyhub::db::Database;
use studyhub::models::*;
use uuid::Uuid;

fn create_test_user(db: &Database, username: &str) -> User {
    db.create_user(username, "$argon2id$fake-hash")
        .expect("Failed to create user")
}

fn note_input(title: &str, content: &str) -> CreateNoteInput {
    CreateNoteInput {
        title: title.to_string(),
        content: content.to_string(),
        tags: vec![],
    }
}

#[test]
fn file_backed_database_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("studyhub.db");

    {
        let db = Database::open(path.clone()).expect("Failed to open database");
        db.migrate().expect("Failed to run migrations");
        create_test_user(&db, "casey");
    }

    let db = Database::open(path).expect("Failed to reopen database");
    db.migrate().expect("Failed to run migrations");
    let found = db.find_user_by_username("casey").expect("Query failed");
    assert!(found.is_some());
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "users" {
        describe "create_user" {
            it "creates a user with a unique username" {
                let user = create_test_user(&db, "casey");
                assert_eq!(user.username, "casey");
                assert_ne!(user.id, Uuid::nil());
            }

            it "rejects a duplicate username" {
                create_test_user(&db, "casey");
                let result = db.create_user("casey", "$argon2id$other-hash");
                assert!(result.is_err());
            }
        }

        describe "find_user_by_username" {
            it "returns None for an unknown username" {
                let found = db.find_user_by_username("nobody").expect("Query failed");
                assert!(found.is_none());
            }

            it "returns the record including the password hash" {
                let created = create_test_user(&db, "casey");
                let found = db.find_user_by_username("casey")
                    .expect("Query failed")
                    .expect("User should exist");
                assert_eq!(found.user.id, created.id);
                assert_eq!(found.password_hash, "$argon2id$fake-hash");
            }
        }

        describe "get_user" {
            it "returns None for a non-existent id" {
                let found = db.get_user(Uuid::new_v4()).expect("Query failed");
                assert!(found.is_none());
            }

            it "returns the user by id" {
                let created = create_test_user(&db, "casey");
                let found = db.get_user(created.id).expect("Query failed");
                assert_eq!(found.expect("User should exist").username, "casey");
            }
        }
    }

    describe "notes" {
        describe "create_note and notes_for_user" {
            it "round trips a created note" {
                let user = create_test_user(&db, "casey");
                let created = db.create_note(user.id, CreateNoteInput {
                    title: "Biology".to_string(),
                    content: "Mitochondria are the powerhouse".to_string(),
                    tags: vec!["bio".to_string(), "exam".to_string()],
                }).expect("Failed to create note");

                let notes = db.notes_for_user(user.id).expect("Query failed");
                assert_eq!(notes.len(), 1);
                assert_eq!(notes[0].id, created.id);
                assert_eq!(notes[0].title, "Biology");
                assert_eq!(notes[0].content, "Mitochondria are the powerhouse");
                assert_eq!(notes[0].tags, vec!["bio", "exam"]);
            }

            it "lists newest notes first" {
                let user = create_test_user(&db, "casey");
                db.create_note(user.id, note_input("first", "a")).expect("create failed");
                db.create_note(user.id, note_input("second", "b")).expect("create failed");

                let notes = db.notes_for_user(user.id).expect("Query failed");
                assert_eq!(notes.len(), 2);
                assert_eq!(notes[0].title, "second");
                assert_eq!(notes[1].title, "first");
            }

            it "never returns another user's notes" {
                let casey = create_test_user(&db, "casey");
                let robin = create_test_user(&db, "robin");
                db.create_note(casey.id, note_input("private", "casey's note")).expect("create failed");

                let notes = db.notes_for_user(robin.id).expect("Query failed");
                assert!(notes.is_empty());
            }
        }

        describe "count_notes" {
            it "counts only the owner's notes" {
                let casey = create_test_user(&db, "casey");
                let robin = create_test_user(&db, "robin");
                db.create_note(casey.id, note_input("one", "x")).expect("create failed");
                db.create_note(casey.id, note_input("two", "y")).expect("create failed");
                db.create_note(robin.id, note_input("other", "z")).expect("create failed");

                assert_eq!(db.count_notes(casey.id).expect("count failed"), 2);
                assert_eq!(db.count_notes(robin.id).expect("count failed"), 1);
            }
        }

        describe "get_note" {
            it "treats a foreign owner like a missing id" {
                let casey = create_test_user(&db, "casey");
                let robin = create_test_user(&db, "robin");
                let note = db.create_note(casey.id, note_input("private", "text")).expect("create failed");

                assert!(db.get_note(note.id, casey.id).expect("Query failed").is_some());
                assert!(db.get_note(note.id, robin.id).expect("Query failed").is_none());
                assert!(db.get_note(Uuid::new_v4(), casey.id).expect("Query failed").is_none());
            }
        }

        describe "update_note" {
            it "updates provided fields and keeps the rest" {
                let user = create_test_user(&db, "casey");
                let note = db.create_note(user.id, note_input("title", "content")).expect("create failed");

                let updated = db.update_note(note.id, user.id, UpdateNoteInput {
                    title: Some("new title".to_string()),
                    content: None,
                    tags: None,
                }).expect("update failed").expect("note should exist");

                assert_eq!(updated.title, "new title");
                assert_eq!(updated.content, "content");
                assert_eq!(updated.created_at, note.created_at);
                assert!(updated.updated_at >= note.updated_at);
            }

            it "returns None when the caller does not own the note" {
                let casey = create_test_user(&db, "casey");
                let robin = create_test_user(&db, "robin");
                let note = db.create_note(casey.id, note_input("private", "text")).expect("create failed");

                let result = db.update_note(note.id, robin.id, UpdateNoteInput {
                    title: Some("hijacked".to_string()),
                    content: None,
                    tags: None,
                }).expect("update failed");
                assert!(result.is_none());

                // The note is untouched.
                let original = db.get_note(note.id, casey.id).expect("Query failed").unwrap();
                assert_eq!(original.title, "private");
            }
        }

        describe "delete_note" {
            it "deletes an owned note" {
                let user = create_test_user(&db, "casey");
                let note = db.create_note(user.id, note_input("gone", "soon")).expect("create failed");

                assert!(db.delete_note(note.id, user.id).expect("delete failed"));
                assert!(db.notes_for_user(user.id).expect("Query failed").is_empty());
            }

            it "refuses to delete a foreign note" {
                let casey = create_test_user(&db, "casey");
                let robin = create_test_user(&db, "robin");
                let note = db.create_note(casey.id, note_input("private", "text")).expect("create failed");

                assert!(!db.delete_note(note.id, robin.id).expect("delete failed"));
                assert_eq!(db.notes_for_user(casey.id).expect("Query failed").len(), 1);
            }

            it "returns false for a non-existent id" {
                let user = create_test_user(&db, "casey");
                assert!(!db.delete_note(Uuid::new_v4(), user.id).expect("delete failed"));
            }
        }
    }

    describe "note filtering" {
        it "matches case-insensitively over title content and tags" {
            let note = Note {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                title: "Organic Chemistry".to_string(),
                content: "Benzene rings everywhere".to_string(),
                tags: vec!["exam-prep".to_string()],
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            };

            assert!(note.matches("organic"));
            assert!(note.matches("BENZENE"));
            assert!(note.matches("exam"));
            assert!(!note.matches("physics"));
        }
    }
}
