use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use osk_core::{CoreError, CoreResult, StateStorage};
use osk_domain::AppState;

/// Fixed storage key of the state document.
pub const STATE_KEY: &str = "oskMenagerData";
pub const BACKUP_PREFIX: &str = "osk_manager_backup_";

const STATE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const CORRUPT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Filesystem-backed JSON persistence: one document per data directory, last write wins.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    data_dir: PathBuf,
}

impl JsonStateStore {
    pub fn new(data_dir: PathBuf) -> CoreResult<Self> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{STATE_KEY}.{STATE_EXTENSION}"))
    }

    /// Moves an unreadable state file aside so the next save does not overwrite it.
    fn quarantine(&self, path: &Path) -> Option<PathBuf> {
        let stamp = Local::now().format(CORRUPT_TIMESTAMP_FORMAT);
        let target = self
            .data_dir
            .join(format!("{STATE_KEY}.corrupt_{stamp}.{STATE_EXTENSION}"));
        match fs::rename(path, &target) {
            Ok(()) => Some(target),
            Err(err) => {
                tracing::warn!(error = %err, "could not move unreadable state file aside");
                None
            }
        }
    }
}

impl StateStorage for JsonStateStore {
    fn load(&self) -> CoreResult<Option<AppState>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }
        match load_state_from_path(&path) {
            Ok(state) => Ok(Some(state)),
            Err(err @ CoreError::Serde(_)) => {
                if let Some(moved) = self.quarantine(&path) {
                    tracing::warn!(path = %moved.display(), "unreadable state file preserved");
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn save(&self, state: &AppState) -> CoreResult<()> {
        save_state_to_path(state, &self.state_path())
    }

    fn export_backup(
        &self,
        state: &AppState,
        directory: &Path,
        date: NaiveDate,
    ) -> CoreResult<PathBuf> {
        let path = directory.join(backup_file_name(date));
        save_state_to_path(state, &path)?;
        tracing::info!(path = %path.display(), "backup exported");
        Ok(path)
    }

    fn import_from_path(&self, path: &Path) -> CoreResult<AppState> {
        load_state_from_path(path)
    }
}

/// `osk_manager_backup_2024-03-01.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!(
        "{BACKUP_PREFIX}{}.{STATE_EXTENSION}",
        date.format("%Y-%m-%d")
    )
}

/// Backup files found in `directory`, newest name first.
pub fn list_backups(directory: &Path) -> CoreResult<Vec<PathBuf>> {
    if !directory.exists() {
        return Ok(Vec::new());
    }
    let mut backups = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let is_backup = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                name.starts_with(BACKUP_PREFIX) && name.ends_with(&format!(".{STATE_EXTENSION}"))
            });
        if path.is_file() && is_backup {
            backups.push(path);
        }
    }
    backups.sort();
    backups.reverse();
    Ok(backups)
}

/// Saves the state to an arbitrary path on disk.
pub fn save_state_to_path(state: &AppState, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_state(state)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a state document; missing or null top-level fields take their defaults.
pub fn load_state_from_path(path: &Path) -> CoreResult<AppState> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_state(state: &AppState) -> CoreResult<String> {
    serde_json::to_string_pretty(state).map_err(|err| CoreError::Serde(err.to_string()))
}
