//! SQLite database - schema definition and connection management
//!
//! Table operations live in the tables/ subdirectory as `impl Database`
//! blocks.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

/// Relief record store. One serialized connection behind a Mutex; every
/// operation locks, executes, and releases before returning.
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database and initialize the schema.
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    /// Create tables if absent and seed the inventory baseline.
    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS incidents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                severity TEXT NOT NULL,
                location TEXT NOT NULL,
                needs TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'OPEN',
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        // item is the primary key so re-seeding on restart is a no-op
        conn.execute(
            "CREATE TABLE IF NOT EXISTS inventory (
                item TEXT PRIMARY KEY,
                quantity INTEGER NOT NULL,
                location TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO inventory (item, quantity, location) VALUES ('Water Packs', 50, 'Shelter A')",
            [],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO inventory (item, quantity, location) VALUES ('First Aid Kits', 20, 'Shelter B')",
            [],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_schema_and_seed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resq.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();

        let conn = db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM inventory", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_reopen_does_not_duplicate_seed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resq.db");
        let url = path.to_str().unwrap();

        {
            Database::new(url).unwrap();
        }
        let db = Database::new(url).unwrap();

        let conn = db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM inventory", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }
}
