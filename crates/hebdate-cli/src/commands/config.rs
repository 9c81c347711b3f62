//! Print the effective configuration

use std::io::Write;

use anyhow::Result;
use hebdate_core::Config;

/// Write `config` as TOML, the same shape `config.toml` accepts.
pub fn print_config<W: Write>(config: &Config, mut writer: W) -> Result<()> {
    write!(writer, "{}", toml::to_string_pretty(config)?)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_printed_config_parses_back() {
        let mut out = Vec::new();
        print_config(&Config::default(), &mut out).unwrap();
        let parsed: Config = toml::from_str(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
