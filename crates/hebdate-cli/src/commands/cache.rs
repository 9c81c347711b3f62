//! Cache maintenance commands

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use hebdate_core::{Config, FileStore, SystemClock};

/// Delete every cached lookup.
pub fn clear_cache<W: Write>(config: &Config, mut writer: W) -> Result<()> {
    let clock = Arc::new(SystemClock::new(config.clock.timezone));
    let store = FileStore::new(config.cache_dir()?, clock)?;
    let removed = store.clear()?;

    if removed == 0 {
        writeln!(writer, "{} Cache is already empty", "ℹ".blue())?;
    } else {
        writeln!(
            writer,
            "{} Removed {} cached lookup(s) from {}",
            "✓".green(),
            removed,
            store.dir().display()
        )?;
    }
    Ok(())
}

/// Print the directory cache entries live in.
pub fn print_cache_path<W: Write>(config: &Config, mut writer: W) -> Result<()> {
    writeln!(writer, "{}", config.cache_dir()?.display())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hebdate_core::{CacheStore, HebrewDateResult};
    use std::time::Duration;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.cache.dir = Some(dir.path().to_path_buf());
        config
    }

    #[tokio::test]
    async fn test_clear_reports_removed_entries() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let store = FileStore::new(dir.path(), Arc::new(SystemClock::default())).unwrap();
        store
            .set(
                "hebrew_date_2025-06-02",
                &HebrewDateResult::failure("unused"),
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let mut out = Vec::new();
        clear_cache(&config, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Removed 1 cached lookup(s)"), "{out}");

        let mut out = Vec::new();
        clear_cache(&config, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("already empty"));
    }

    #[test]
    fn test_cache_path_prints_configured_dir() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        print_cache_path(&config_in(&dir), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().trim_end(),
            dir.path().display().to_string()
        );
    }
}
