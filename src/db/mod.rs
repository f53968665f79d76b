mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "studyhub")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("studyhub.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // User operations
    // ============================================================

    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO users (id, username, password_hash, created_at)
             VALUES (?, ?, ?, ?)",
            (id.to_string(), username, password_hash, now.to_rfc3339()),
        )?;

        Ok(User {
            id,
            username: username.to_string(),
            created_at: now,
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, created_at
             FROM users WHERE username = ?",
        )?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            Ok(Some(UserRecord {
                user: User {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    username: row.get(1)?,
                    created_at: parse_datetime(row.get::<_, String>(3)?),
                },
                password_hash: row.get(2)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, username, created_at FROM users WHERE id = ?")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(User {
                id: parse_uuid(row.get::<_, String>(0)?),
                username: row.get(1)?,
                created_at: parse_datetime(row.get::<_, String>(2)?),
            }))
        } else {
            Ok(None)
        }
    }

    // ============================================================
    // Note operations (all owner-scoped)
    // ============================================================

    pub fn notes_for_user(&self, user_id: Uuid) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, content, tags, created_at, updated_at
             FROM notes WHERE user_id = ? ORDER BY created_at DESC",
        )?;

        let notes = stmt
            .query_map([user_id.to_string()], |row| {
                Ok(Note {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    user_id: parse_uuid(row.get::<_, String>(1)?),
                    title: row.get(2)?,
                    content: row.get(3)?,
                    tags: parse_tags(row.get::<_, String>(4)?),
                    created_at: parse_datetime(row.get::<_, String>(5)?),
                    updated_at: parse_datetime(row.get::<_, String>(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn count_notes(&self, user_id: Uuid) -> Result<usize> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE user_id = ?",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Fetch one note, scoped to its owner. A foreign `user_id` behaves
    /// exactly like a missing id.
    pub fn get_note(&self, id: Uuid, user_id: Uuid) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, content, tags, created_at, updated_at
             FROM notes WHERE id = ? AND user_id = ?",
        )?;

        let mut rows = stmt.query([id.to_string(), user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Note {
                id: parse_uuid(row.get::<_, String>(0)?),
                user_id: parse_uuid(row.get::<_, String>(1)?),
                title: row.get(2)?,
                content: row.get(3)?,
                tags: parse_tags(row.get::<_, String>(4)?),
                created_at: parse_datetime(row.get::<_, String>(5)?),
                updated_at: parse_datetime(row.get::<_, String>(6)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn create_note(&self, user_id: Uuid, input: CreateNoteInput) -> Result<Note> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (id, user_id, title, content, tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                user_id.to_string(),
                &input.title,
                &input.content,
                serde_json::to_string(&input.tags)?,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Note {
            id,
            user_id,
            title: input.title,
            content: input.content,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        })
    }

    /// Last write wins on concurrent updates; there is no version check.
    pub fn update_note(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateNoteInput,
    ) -> Result<Option<Note>> {
        let Some(existing) = self.get_note(id, user_id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let title = input.title.unwrap_or(existing.title);
        let content = input.content.unwrap_or(existing.content);
        let tags = input.tags.unwrap_or(existing.tags);

        conn.execute(
            "UPDATE notes SET title = ?, content = ?, tags = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
            (
                &title,
                &content,
                serde_json::to_string(&tags)?,
                now.to_rfc3339(),
                id.to_string(),
                user_id.to_string(),
            ),
        )?;

        Ok(Some(Note {
            id,
            user_id,
            title,
            content,
            tags,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    pub fn delete_note(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM notes WHERE id = ? AND user_id = ?",
            [id.to_string(), user_id.to_string()],
        )?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_tags(s: String) -> Vec<String> {
    serde_json::from_str(&s).unwrap_or_default()
}
