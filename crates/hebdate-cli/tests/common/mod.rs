#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a configured `hebdate` command with isolated cache and config dirs.
#[allow(dead_code)]
pub fn hebdate_cmd_with_dirs(data_dir: &Path, config_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hebdate"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("HEBDATE_DATA_DIR", data_dir);
    cmd.env("HEBDATE_CONFIG_DIR", config_dir);
    cmd.env("HEBDATE_TIMEZONE", "UTC");
    cmd.env_remove("HEBDATE_API_URL");
    cmd.env_remove("HEBDATE_TIMEOUT_SECS");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Number of cache entries on disk.
#[allow(dead_code)]
pub fn cached_entries(data_dir: &Path) -> usize {
    std::fs::read_dir(data_dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count()
        })
        .unwrap_or(0)
}
