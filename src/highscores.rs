//! Persist the best score to disk (XDG config or ~/.config/swaptui).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const FILENAME: &str = "best";

/// Path to the best score file (config dir / swaptui / best).
pub fn best_score_path() -> PathBuf {
    let home_config = || {
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from("."))
    };
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => home_config(),
    };
    base.join("swaptui").join(FILENAME)
}

/// Best score stored at `path`; 0 if the file is missing or unreadable.
pub fn load_best_score(path: &Path) -> u32 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.lines().next().and_then(|l| l.trim().parse().ok()))
        .unwrap_or(0)
}

/// Write the best score, creating the config directory if needed.
pub fn save_best_score(path: &Path, best: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, format!("{best}\n")).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
