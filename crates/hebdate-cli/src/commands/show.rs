//! Show today's Hebrew date

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use hebdate_core::{
    CacheStore, Clock, Config, DateFetcher, Fetcher, FileStore, HebrewDateResult, MemoryStore,
    SystemClock, render,
};
use tracing::warn;

use crate::cli::OutputFormat;

/// Flags that shape a single `show` invocation.
#[derive(Debug, Clone)]
pub struct ShowOptions {
    pub format: OutputFormat,
    pub no_cache: bool,
    pub icon_url: Option<String>,
}

/// Look up today's date and write it to `writer`.
///
/// A failed lookup still renders (the fallback message) and is not an error;
/// only setup problems and write failures are.
pub async fn show<W: Write>(config: &Config, options: &ShowOptions, writer: W) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.clock.timezone));
    let store = open_store(config, clock.clone());
    let fetcher = Fetcher::with_timeout(config.api.base_url.clone(), config.timeout())?;
    let dates = DateFetcher::new(fetcher, store, clock).with_ttl(config.ttl());

    let result = if options.no_cache {
        dates.fetch_uncached().await
    } else {
        dates.get_hebrew_date().await
    };

    write_result(&result, options, writer)
}

/// A cache directory that cannot be opened degrades to a per-process store.
fn open_store(config: &Config, clock: Arc<dyn Clock>) -> Arc<dyn CacheStore> {
    match config
        .cache_dir()
        .and_then(|dir| FileStore::new(dir, clock.clone()))
    {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Cache unavailable, continuing without it: {}", e);
            Arc::new(MemoryStore::new(clock))
        },
    }
}

fn write_result<W: Write>(
    result: &HebrewDateResult,
    options: &ShowOptions,
    mut writer: W,
) -> Result<()> {
    match options.format {
        OutputFormat::Text => writeln!(writer, "{}", render::plain_text(result))?,
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(result)?)?,
        OutputFormat::Html => writeln!(
            writer,
            "{}",
            render::widget_html(result, options.icon_url.as_deref())
        )?,
    }
    writer.flush()?;
    Ok(())
}
