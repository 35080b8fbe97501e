//! Storage accessor
//!
//! `Storage` only names the store file. Every request works through its own
//! [`Session`], which opens a read-only connection on first query and closes it
//! when dropped, so no connection outlives the request that opened it.

mod game;

pub use game::{Game, NewGame, PLACEHOLDER_GAME_URL, PLACEHOLDER_TITLE};

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::StorageError;
use game::GAME_COLUMNS;

/// Schema applied at provisioning time
pub const SCHEMA: &str = include_str!("../../schema.sql");

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the store file
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a request-scoped session; no connection is opened yet
    pub const fn session(&self) -> Session<'_> {
        Session {
            storage: self,
            conn: None,
        }
    }

    /// Run `f` against a fresh session on the blocking pool.
    ///
    /// The session, and its connection if one was opened, is dropped before
    /// this returns, on success, error, or panic alike.
    pub async fn run<T, F>(self: &Arc<Self>, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Session<'_>) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let mut session = storage.session();
            f(&mut session)
        })
        .await
        .map_err(|e| StorageError::Worker(e.to_string()))?
    }

    /// Read-only connection used by request sessions
    fn open_read_only(&self) -> Result<Connection, StorageError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;
        let conn = Connection::open_with_flags(&self.path, flags).map_err(|source| {
            StorageError::Open {
                path: self.path.clone(),
                source,
            }
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Read-write connection, creating the file; provisioning only
    pub(crate) fn open_read_write(&self) -> Result<Connection, StorageError> {
        let conn = Connection::open(&self.path).map_err(|source| StorageError::Open {
            path: self.path.clone(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }
}

/// Request-scoped access to the store
pub struct Session<'a> {
    storage: &'a Storage,
    conn: Option<Connection>,
}

impl Session<'_> {
    /// Whether a query has opened the connection yet
    #[cfg(test)]
    const fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn connection(&mut self) -> Result<&Connection, StorageError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.storage.open_read_only()?,
        };
        Ok(&*self.conn.insert(conn))
    }

    /// Every game, ordered by title
    pub fn list_games(&mut self) -> Result<Vec<Game>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {GAME_COLUMNS} FROM games ORDER BY title"
        ))?;
        let games = stmt
            .query_map([], Game::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(games)
    }

    /// The game with `id`, or `None` when no row matches
    pub fn get_game(&mut self, id: i64) -> Result<Option<Game>, StorageError> {
        let conn = self.connection()?;
        let game = conn
            .query_row(
                &format!("SELECT {GAME_COLUMNS} FROM games WHERE id = ?1"),
                [id],
                Game::from_row,
            )
            .optional()?;
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn provisioned(titles: &[&str]) -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("games.db"));
        let conn = storage.open_read_write().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        for title in titles {
            NewGame::titled(title).insert(&conn).unwrap();
        }
        (dir, storage)
    }

    #[test]
    fn test_list_games_orders_by_title() {
        let (_dir, storage) = provisioned(&["Zeta Protocol", "Alpha Strike", "Neon Drift"]);
        let titles: Vec<String> = storage
            .session()
            .list_games()
            .unwrap()
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(titles, ["Alpha Strike", "Neon Drift", "Zeta Protocol"]);
    }

    #[test]
    fn test_list_games_empty_table() {
        let (_dir, storage) = provisioned(&[]);
        assert!(storage.session().list_games().unwrap().is_empty());
    }

    #[test]
    fn test_get_game_found_and_missing() {
        let (_dir, storage) = provisioned(&["Neon Drift"]);
        let mut session = storage.session();

        let game = session.get_game(1).unwrap().unwrap();
        assert_eq!(game.id, 1);
        assert_eq!(game.title, "Neon Drift");

        assert_eq!(session.get_game(42).unwrap(), None);
        assert_eq!(session.get_game(-1).unwrap(), None);
    }

    #[test]
    fn test_session_connects_lazily_and_reuses_connection() {
        let (_dir, storage) = provisioned(&["Neon Drift"]);
        let mut session = storage.session();
        assert!(!session.is_connected());

        session.list_games().unwrap();
        assert!(session.is_connected());
        session.get_game(1).unwrap();
        assert!(session.is_connected());
    }

    #[test]
    fn test_missing_store_is_a_storage_failure() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("missing").join("games.db"));

        let err = storage.session().list_games().unwrap_err();
        assert!(matches!(err, StorageError::Open { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_missing_table_is_a_storage_failure() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("games.db"));
        storage
            .open_read_write()
            .unwrap()
            .execute_batch("CREATE TABLE settings (key TEXT PRIMARY KEY, value TEXT)")
            .unwrap();

        let err = storage.session().get_game(1).unwrap_err();
        assert!(matches!(err, StorageError::Query(_)));
    }

    #[test]
    fn test_session_cannot_write() {
        let (_dir, storage) = provisioned(&["Neon Drift"]);
        let mut session = storage.session();
        let conn = session.connection().unwrap();
        assert!(conn.execute("DELETE FROM games", []).is_err());
    }

    #[tokio::test]
    async fn test_run_on_blocking_pool() {
        let (_dir, storage) = provisioned(&["Neon Drift", "Circuit Breaker"]);
        let storage = Arc::new(storage);

        let games = storage.run(|s| s.list_games()).await.unwrap();
        assert_eq!(games.len(), 2);

        let missing = storage.run(|s| s.get_game(99)).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_run_contains_worker_panic() {
        let (_dir, storage) = provisioned(&[]);
        let storage = Arc::new(storage);

        let err = storage
            .run(|_| -> Result<(), StorageError> { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Worker(_)));
    }
}
