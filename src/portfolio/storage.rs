use super::types::PortfolioState;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const STATE_VERSION: u32 = 1;

/// Get the default portfolio state file path (~/.config/hrdd-risk/portfolio.json)
pub fn get_portfolio_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("portfolio.json"))
}

/// Load portfolio state from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_portfolio_state(path: &Path) -> Result<PortfolioState> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no portfolio state, starting empty");
        return Ok(PortfolioState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open portfolio state file at {}", path.display()))?;

    let mut state: PortfolioState =
        serde_json::from_reader(file).context("Failed to load portfolio state")?;

    if state.version != STATE_VERSION {
        anyhow::bail!("Unsupported portfolio state version: {}", state.version);
    }

    state.selection = state.selection.normalized();
    tracing::debug!(
        path = %path.display(),
        countries = state.selection.len(),
        "portfolio state loaded"
    );
    Ok(state)
}

/// Save portfolio state to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_portfolio_state(path: &Path, state: &PortfolioState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state)
        .context("Failed to serialize portfolio state")?;

    file.commit().context("Failed to save portfolio state")?;

    tracing::debug!(path = %path.display(), "portfolio state saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("hrdd_risk_test_portfolio_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let state = load_portfolio_state(&temp_path).unwrap();
        assert_eq!(state.version, 1);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("hrdd_risk_test_portfolio_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut state = PortfolioState::new();
        state.selection.add("DEU");
        state.selection.add("BRA");
        state.selection.set_volume("BRA", 30.0);
        state.touch();

        save_portfolio_state(&temp_path, &state).unwrap();
        let loaded = load_portfolio_state(&temp_path).unwrap();

        assert_eq!(loaded.version, 1);
        assert!(loaded.updated_at.is_some());
        assert_eq!(loaded.selection, state.selection);
        assert_eq!(loaded.selection.volume("DEU"), 10.0);
        assert_eq!(loaded.selection.volume("BRA"), 30.0);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version() {
        let temp_path = env::temp_dir().join("hrdd_risk_test_portfolio_version.json");
        std::fs::write(&temp_path, r#"{"version": 7, "selection": {}}"#).unwrap();

        let err = load_portfolio_state(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported portfolio state version: 7"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_corrupt_file() {
        let temp_path = env::temp_dir().join("hrdd_risk_test_portfolio_corrupt.json");
        std::fs::write(&temp_path, "not json").unwrap();

        assert!(load_portfolio_state(&temp_path).is_err());

        let _ = std::fs::remove_file(&temp_path);
    }
}
