//! Incident table operations

use super::super::Database;
use crate::models::Incident;
use chrono::Utc;
use rusqlite::Result as SqliteResult;

impl Database {
    /// Insert a new incident with status OPEN and return its id.
    ///
    /// Deliberately not idempotent: duplicate reports still describe
    /// distinct calls for help, so every invocation creates a new row.
    pub fn insert_incident(
        &self,
        severity: &str,
        location: &str,
        needs: &str,
    ) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO incidents (severity, location, needs, status, created_at)
             VALUES (?1, ?2, ?3, 'OPEN', ?4)",
            rusqlite::params![severity, location, needs, &now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List logged incidents, newest first.
    pub fn list_incidents(&self) -> SqliteResult<Vec<Incident>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, severity, location, needs, status, created_at
             FROM incidents ORDER BY id DESC LIMIT 100",
        )?;

        let incidents = stmt
            .query_map([], |row| {
                Ok(Incident {
                    id: row.get(0)?,
                    severity: row.get(1)?,
                    location: row.get(2)?,
                    needs: row.get(3)?,
                    status: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(incidents)
    }
}
