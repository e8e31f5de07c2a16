mod config;
pub mod store;

pub use config::{Config, UiConfig};
pub use store::Store;

use std::path::PathBuf;

/// Returns `~/.config/zerohour[-dev]/` based on ZEROHOUR_ENV.
///
/// Set ZEROHOUR_ENV=dev to use the development data directory, or
/// ZEROHOUR_DATA_DIR to point somewhere else entirely (tests use this).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    if let Ok(dir) = std::env::var("ZEROHOUR_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ZEROHOUR_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("zerohour-dev")
    } else {
        base_dir.join("zerohour")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
