//! Inventory table operations

use super::super::Database;
use crate::models::InventoryItem;
use rusqlite::Result as SqliteResult;

impl Database {
    /// Case-insensitive substring search against inventory item names.
    pub fn search_inventory(&self, item_query: &str) -> SqliteResult<Vec<InventoryItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT item, quantity, location FROM inventory
             WHERE item LIKE ?1 ORDER BY item",
        )?;

        let pattern = format!("%{}%", item_query);
        let items = stmt
            .query_map([&pattern], |row| {
                Ok(InventoryItem {
                    item: row.get(0)?,
                    quantity: row.get(1)?,
                    location: row.get(2)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resq.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        (dir, db)
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let (_dir, db) = test_db();

        let items = db.search_inventory("water").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item, "Water Packs");
        assert_eq!(items[0].quantity, 50);
        assert_eq!(items[0].location, "Shelter A");
    }

    #[test]
    fn test_search_no_match_returns_empty() {
        let (_dir, db) = test_db();
        assert!(db.search_inventory("xyz-nonexistent").unwrap().is_empty());
    }

    #[test]
    fn test_search_partial_match() {
        let (_dir, db) = test_db();

        let items = db.search_inventory("first aid").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item, "First Aid Kits");
        assert_eq!(items[0].quantity, 20);
    }
}
