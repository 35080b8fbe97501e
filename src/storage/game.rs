//! The `Game` record and its mapping to and from `games` rows.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

/// Title stored when a seed row has none
pub const PLACEHOLDER_TITLE: &str = "N/A";

/// Link stored when a seed row has no playable URL
pub const PLACEHOLDER_GAME_URL: &str = "#";

/// Column list shared by every read query, in `Game` field order
pub(crate) const GAME_COLUMNS: &str =
    "id, title, description, genre, release_date, image_url, game_url, developer, rating";

/// A catalog entry as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub game_url: String,
    pub developer: String,
    pub rating: Option<f64>,
}

impl Game {
    /// Map a row selected with `GAME_COLUMNS`.
    ///
    /// NULL text columns collapse to the same defaults seeding applies, so
    /// rows written by other tools still serialize with the documented shape.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row
                .get::<_, Option<String>>("title")?
                .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
            genre: row.get::<_, Option<String>>("genre")?.unwrap_or_default(),
            release_date: row.get("release_date")?,
            image_url: row.get("image_url")?,
            game_url: row
                .get::<_, Option<String>>("game_url")?
                .unwrap_or_else(|| PLACEHOLDER_GAME_URL.to_string()),
            developer: row.get::<_, Option<String>>("developer")?.unwrap_or_default(),
            rating: row.get("rating")?,
        })
    }
}

/// One entry of the seed dataset; every field may be missing or null
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewGame {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub game_url: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl NewGame {
    /// Shorthand for a seed row carrying only a title
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    /// Insert with defaults applied; returns the id the store assigned
    pub fn insert(&self, conn: &Connection) -> rusqlite::Result<i64> {
        conn.execute(
            "INSERT INTO games (title, description, genre, release_date, image_url, game_url, developer, rating) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.title.as_deref().unwrap_or(PLACEHOLDER_TITLE),
                self.description.as_deref().unwrap_or_default(),
                self.genre.as_deref().unwrap_or_default(),
                self.release_date,
                self.image_url,
                self.game_url.as_deref().unwrap_or(PLACEHOLDER_GAME_URL),
                self.developer.as_deref().unwrap_or_default(),
                self.rating,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Title used in log lines
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(PLACEHOLDER_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(crate::storage::SCHEMA).unwrap();
        conn
    }

    fn read_back(conn: &Connection, id: i64) -> Game {
        conn.query_row(
            &format!("SELECT {GAME_COLUMNS} FROM games WHERE id = ?1"),
            [id],
            Game::from_row,
        )
        .unwrap()
    }

    #[test]
    fn test_title_only_row_gets_defaults() {
        let conn = memory_store();
        let id = NewGame::titled("Chrome Runner").insert(&conn).unwrap();

        let game = read_back(&conn, id);
        assert_eq!(game.title, "Chrome Runner");
        assert_eq!(game.description, "");
        assert_eq!(game.genre, "");
        assert_eq!(game.developer, "");
        assert_eq!(game.game_url, PLACEHOLDER_GAME_URL);
        assert_eq!(game.release_date, None);
        assert_eq!(game.image_url, None);
        assert_eq!(game.rating, None);
    }

    #[test]
    fn test_empty_seed_row_gets_placeholder_title() {
        let conn = memory_store();
        let id = NewGame::default().insert(&conn).unwrap();
        assert_eq!(read_back(&conn, id).title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_null_columns_written_elsewhere_are_coerced() {
        let conn = memory_store();
        conn.execute(
            "INSERT INTO games (title, description, genre, game_url, developer) \
             VALUES ('Raw', NULL, NULL, NULL, NULL)",
            [],
        )
        .unwrap();

        let game = read_back(&conn, conn.last_insert_rowid());
        assert_eq!(game.description, "");
        assert_eq!(game.genre, "");
        assert_eq!(game.developer, "");
        assert_eq!(game.game_url, PLACEHOLDER_GAME_URL);
    }

    #[test]
    fn test_integer_rating_reads_as_number() {
        let conn = memory_store();
        conn.execute("INSERT INTO games (title, rating) VALUES ('Int', 4)", [])
            .unwrap();
        let game = read_back(&conn, conn.last_insert_rowid());
        assert_eq!(game.rating, Some(4.0));
    }

    #[test]
    fn test_seed_row_accepts_nulls_and_missing_keys() {
        let row: NewGame =
            serde_json::from_str(r#"{"title": null, "genre": "Puzzle", "rating": 3.5}"#).unwrap();
        assert_eq!(row.title, None);
        assert_eq!(row.genre.as_deref(), Some("Puzzle"));
        assert_eq!(row.rating, Some(3.5));
        assert_eq!(row.display_title(), PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_serialized_keys_match_field_names() {
        let game = Game {
            id: 7,
            title: "Neon Drift".to_string(),
            description: String::new(),
            genre: "Racing".to_string(),
            release_date: None,
            image_url: None,
            game_url: "#".to_string(),
            developer: String::new(),
            rating: Some(4.5),
        };
        let value = serde_json::to_value(&game).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "id",
            "title",
            "description",
            "genre",
            "release_date",
            "image_url",
            "game_url",
            "developer",
            "rating",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert!(obj["release_date"].is_null());
    }
}
