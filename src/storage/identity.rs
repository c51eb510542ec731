use rusqlite::{OptionalExtension, Result as SqlResult, params};
use std::path::Path;

use crate::common::{Identity, Role};

use super::database::Database;

/// On-device cache for the signed-in identity (user id + role).
///
/// Single-row table: logging in as someone else replaces the row. Loaded
/// once at startup and threaded explicitly into the chat layer rather than
/// read ambiently at call sites.
pub struct IdentityStore {
    db: Database,
}

impl IdentityStore {
    /// Open the store at a custom path.
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        let db = Database::new(path)?;
        let store = Self { db };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> SqlResult<Self> {
        let db = Database::in_memory()?;
        let store = Self { db };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.db.connection().execute(
            "CREATE TABLE IF NOT EXISTS identity (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                user_id TEXT NOT NULL,
                role TEXT NOT NULL,
                saved_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )?;
        Ok(())
    }

    /// Save the signed-in identity (replace if exists).
    pub fn save(&self, identity: &Identity) -> SqlResult<()> {
        self.db.connection().execute(
            "INSERT OR REPLACE INTO identity (id, user_id, role, saved_at)
             VALUES (1, ?1, ?2, strftime('%s', 'now'))",
            params![identity.user_id, identity.role.as_str()],
        )?;
        Ok(())
    }

    pub fn load(&self) -> SqlResult<Option<Identity>> {
        let row = self
            .db
            .connection()
            .query_row(
                "SELECT user_id, role FROM identity WHERE id = 1",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        Ok(row.and_then(|(user_id, role)| match Role::parse(&role) {
            Some(role) => Some(Identity { user_id, role }),
            None => {
                log::warn!("Stored identity has unknown role `{role}`; ignoring it");
                None
            }
        }))
    }

    pub fn clear(&self) -> SqlResult<()> {
        self.db
            .connection()
            .execute("DELETE FROM identity WHERE id = 1", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_has_no_identity() {
        let store = IdentityStore::in_memory().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn identity_round_trips() {
        let store = IdentityStore::in_memory().unwrap();
        let identity = Identity {
            user_id: "p-9".to_string(),
            role: Role::Passenger,
        };
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity));
    }

    #[test]
    fn saving_again_replaces_the_row() {
        let store = IdentityStore::in_memory().unwrap();
        store
            .save(&Identity {
                user_id: "p-9".to_string(),
                role: Role::Passenger,
            })
            .unwrap();
        store
            .save(&Identity {
                user_id: "d-1".to_string(),
                role: Role::Driver,
            })
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.user_id, "d-1");
        assert_eq!(loaded.role, Role::Driver);
    }

    #[test]
    fn clear_signs_out() {
        let store = IdentityStore::in_memory().unwrap();
        store
            .save(&Identity {
                user_id: "p-9".to_string(),
                role: Role::Passenger,
            })
            .unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
