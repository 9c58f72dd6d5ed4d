use crate::Database;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| query_value(conn, key))
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            upsert_value(conn, key, value)?;
            Ok(())
        })
    }

    /// Writes every entry or none of them.
    pub fn set_values(&self, entries: &[(&str, String)]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for (key, value) in entries {
                upsert_value(&tx, key, value)?;
            }
            tx.commit()?;
            Ok(())
        })
    }
}

fn upsert_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO entries (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        (key, value),
    )?;
    Ok(())
}

fn query_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM entries WHERE key = ?1")?;

    let value = stmt
        .query_row([key], |row| row.get::<_, String>(0))
        .optional()?;

    Ok(value)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_value("station_v_users").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let db = Database::open_in_memory().unwrap();
        db.set_value("k", "[]").unwrap();
        db.set_value("k", "[1]").unwrap();
        assert_eq!(db.get_value("k").unwrap().as_deref(), Some("[1]"));
        let rows: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM entries", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn batch_write_lands_together() {
        let db = Database::open_in_memory().unwrap();
        db.set_values(&[("a", "1".to_string()), ("b", "2".to_string())]).unwrap();
        assert_eq!(db.get_value("a").unwrap().as_deref(), Some("1"));
        assert_eq!(db.get_value("b").unwrap().as_deref(), Some("2"));
    }
}
