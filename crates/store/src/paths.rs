//! Path helpers shared by the file-backed stores.

use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_tilde_path(path: PathBuf) -> PathBuf {
    let input = path.to_string_lossy();
    let trimmed = input.trim();

    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }

    if let Some(rest) = trimmed.strip_prefix("~\\") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }

    PathBuf::from(trimmed)
}

/// Resolve a store file path: the environment override when set, otherwise
/// `<config dir>/missive/<file_name>`.
pub(crate) fn default_store_path(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = env::var(env_var)
        && !path.trim().is_empty()
    {
        return expand_tilde_path(PathBuf::from(path));
    }

    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("missive").join(file_name)
}
