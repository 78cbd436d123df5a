#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use assert_cmd::{assert::Assert, Command};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use osk_core::FixedClock;
use osk_domain::AppState;
use osk_manager::core::AppManager;
use osk_storage_json::{load_state_from_path, JsonStateStore, STATE_KEY};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const TODAY: &str = "2024-03-01";

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn today() -> NaiveDate {
    day(2024, 3, 1)
}

/// Fresh, isolated `OSK_MANAGER_HOME`.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let home = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    home
}

/// Manager over the same data directory the CLI uses for `home`.
pub fn open_manager(home: &Path) -> AppManager {
    let storage = JsonStateStore::new(home.join("data")).expect("create json store");
    AppManager::open(Box::new(storage), Box::new(FixedClock::on(today())))
}

pub fn data_file(home: &Path) -> PathBuf {
    home.join("data").join(format!("{STATE_KEY}.json"))
}

pub fn saved_state(home: &Path) -> AppState {
    load_state_from_path(&data_file(home)).expect("read saved state")
}

/// Runs `script` through the CLI in script mode with "today" pinned.
pub fn run_script(home: &Path, script: &str) -> Assert {
    Command::cargo_bin("osk_manager_cli")
        .expect("binary built")
        .env("OSK_MANAGER_CLI_SCRIPT", "1")
        .env("OSK_MANAGER_HOME", home)
        .env("OSK_MANAGER_TODAY", TODAY)
        .env_remove("RUST_LOG")
        .write_stdin(script.to_string())
        .assert()
}
