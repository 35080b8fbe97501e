//! One-time store provisioning (`games-catalog init-db`)
//!
//! Applies the embedded schema, then loads the seed dataset unless the
//! `games` table already holds rows. Never runs during request handling.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::ProvisionError;
use crate::logger;
use crate::storage::{NewGame, Storage, SCHEMA};

/// Outcome of a provisioning run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Rows already present before seeding; non-zero means seeding was skipped
    pub existing: usize,
    pub inserted: usize,
    /// Seed rows rejected by the store
    pub failed: usize,
}

impl ProvisionReport {
    pub const fn seeding_skipped(&self) -> bool {
        self.existing > 0
    }
}

/// Provision the store named by `config`
pub fn init_db(config: &Config) -> Result<ProvisionReport, ProvisionError> {
    let db_path = config.storage.database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ProvisionError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let storage = Storage::new(db_path);
    provision(&storage, Path::new(&config.storage.seed_file))
}

/// Apply the schema to `storage` and seed it from `seed_file`
pub fn provision(storage: &Storage, seed_file: &Path) -> Result<ProvisionReport, ProvisionError> {
    let mut conn = storage.open_read_write()?;
    conn.execute_batch(SCHEMA)?;
    logger::log_info(&format!(
        "[INIT] Applied schema to {}",
        storage.path().display()
    ));

    let existing: i64 = conn.query_row("SELECT COUNT(id) FROM games", [], |r| r.get(0))?;
    let existing = usize::try_from(existing).unwrap_or_default();
    if existing > 0 {
        logger::log_info(&format!(
            "[INIT] Store already contains {existing} games, skipping seed data"
        ));
        return Ok(ProvisionReport {
            existing,
            ..ProvisionReport::default()
        });
    }

    let Some(seed) = read_seed(seed_file)? else {
        return Ok(ProvisionReport::default());
    };

    let tx = conn.transaction()?;
    let mut report = ProvisionReport::default();
    for (index, row) in seed.into_iter().enumerate() {
        let game = match serde_json::from_value::<NewGame>(row) {
            Ok(game) => game,
            Err(e) => {
                report.failed += 1;
                logger::log_warning(&format!("Skipping seed row {index}: {e}"));
                continue;
            }
        };
        match game.insert(&tx) {
            Ok(_) => report.inserted += 1,
            Err(e) => {
                report.failed += 1;
                logger::log_warning(&format!(
                    "Could not insert game '{}': {e}",
                    game.display_title()
                ));
            }
        }
    }
    tx.commit()?;

    if report.inserted > 0 {
        logger::log_info(&format!(
            "[INIT] Inserted {} games from {}",
            report.inserted,
            seed_file.display()
        ));
    } else {
        logger::log_info(&format!(
            "[INIT] No games inserted from {}; file is empty or every row failed",
            seed_file.display()
        ));
    }
    Ok(report)
}

/// Read the seed dataset as raw rows; `None` when the file does not exist.
///
/// Rows are typed one at a time by the caller, so a malformed row only
/// costs itself.
fn read_seed(seed_file: &Path) -> Result<Option<Vec<serde_json::Value>>, ProvisionError> {
    let raw = match fs::read_to_string(seed_file) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            logger::log_warning(&format!(
                "Seed file not found at {}, no initial data loaded",
                seed_file.display()
            ));
            return Ok(None);
        }
        Err(source) => {
            return Err(ProvisionError::Io {
                path: seed_file.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| ProvisionError::Seed {
            path: seed_file.to_path_buf(),
            source,
        })
}
