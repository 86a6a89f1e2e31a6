use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::{PhoneNumber, Session};

// ─── Session ─────────────────────────────────────────────────────────────────

/// At most one signed-in session per device.
pub struct SessionRepo;

impl SessionRepo {
    pub fn current(conn: &Connection) -> Result<Option<Session>> {
        let row = conn
            .query_row(
                "SELECT phone, signed_in_at FROM session WHERE id = 1",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((phone, signed_in_at)) => {
                let signed_in_at = DateTime::parse_from_rfc3339(&signed_in_at)
                    .with_context(|| format!("Bad session timestamp '{}'", signed_in_at))?
                    .with_timezone(&Utc);
                // Stored numbers are already normalised, so no dial code applies.
                let phone = PhoneNumber::parse(&phone, "")?;
                Ok(Some(Session {
                    phone,
                    signed_in_at,
                }))
            }
        }
    }

    pub fn save(conn: &Connection, session: &Session) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO session (id, phone, signed_in_at) VALUES (1, ?1, ?2)",
            params![session.phone.as_str(), session.signed_in_at.to_rfc3339()],
        )?;
        MetaRepo::set(conn, "last_phone", session.phone.as_str())?;
        Ok(())
    }

    /// Returns whether a session existed.
    pub fn clear(conn: &Connection) -> Result<bool> {
        let removed = conn.execute("DELETE FROM session", [])?;
        Ok(removed > 0)
    }
}

// ─── Meta ────────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        let value = conn
            .query_row(
                "SELECT value FROM app_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO app_meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::TimeZone;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn session(phone: &str) -> Session {
        Session {
            phone: PhoneNumber::parse(phone, "1").unwrap(),
            signed_in_at: Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn no_session_by_default() {
        let conn = memory_db();
        assert!(SessionRepo::current(&conn).unwrap().is_none());
    }

    #[test]
    fn saved_session_reads_back() {
        let conn = memory_db();
        let s = session("+15551234567");
        SessionRepo::save(&conn, &s).unwrap();
        assert_eq!(SessionRepo::current(&conn).unwrap(), Some(s));
    }

    #[test]
    fn saving_again_replaces_the_session() {
        let conn = memory_db();
        SessionRepo::save(&conn, &session("+15551234567")).unwrap();
        SessionRepo::save(&conn, &session("+923001234567")).unwrap();

        let current = SessionRepo::current(&conn).unwrap().unwrap();
        assert_eq!(current.phone.as_str(), "+923001234567");
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM session", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn clear_signs_out_but_remembers_the_phone() {
        let conn = memory_db();
        SessionRepo::save(&conn, &session("+15551234567")).unwrap();

        assert!(SessionRepo::clear(&conn).unwrap());
        assert!(!SessionRepo::clear(&conn).unwrap());
        assert!(SessionRepo::current(&conn).unwrap().is_none());
        assert_eq!(
            MetaRepo::get(&conn, "last_phone").unwrap().as_deref(),
            Some("+15551234567")
        );
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = memory_db();
        run_migrations(&conn).unwrap();
        MetaRepo::set(&conn, "k", "v").unwrap();
        assert_eq!(MetaRepo::get(&conn, "k").unwrap().as_deref(), Some("v"));
    }
}
