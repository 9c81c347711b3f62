//! # hebdate-core
//!
//! Today's Hebrew date, fetched from the Hebcal converter and cached for a day.
//!
//! ## Architecture
//!
//! - **Service**: [`DateFetcher`] ties the pieces together and never fails;
//!   upstream problems come back as [`HebrewDateResult::Failure`]
//! - **Fetcher**: [`Fetcher`] issues the converter request and classifies failures
//! - **Cache**: the [`CacheStore`] trait with [`MemoryStore`] and [`FileStore`]
//! - **Clock**: [`Clock`] resolves "today" in the configured [`Timezone`]
//! - **Configuration**: [`Config`] layered from defaults, TOML and environment
//! - **Rendering**: [`render`] turns a result into escaped widget markup or text
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hebdate_core::{Config, DateFetcher, Fetcher, FileStore, SystemClock};
//!
//! # async fn run() -> hebdate_core::Result<()> {
//! let config = Config::load()?;
//! let clock = Arc::new(SystemClock::new(config.clock.timezone));
//! let store = Arc::new(FileStore::new(config.cache_dir()?, clock.clone())?);
//! let fetcher = Fetcher::with_timeout(config.api.base_url.clone(), config.timeout())?;
//!
//! let dates = DateFetcher::new(fetcher, store, clock).with_ttl(config.ttl());
//! let today = dates.get_hebrew_date().await;
//! println!("{}", hebdate_core::render::plain_text(&today));
//! # Ok(())
//! # }
//! ```

/// Time-bounded lookup stores
pub mod cache;
/// Time sources and timezone handling
pub mod clock;
/// Deployment configuration
pub mod config;
/// Error types and result aliases
pub mod error;
/// HTTP client for the converter API
pub mod fetcher;
/// Widget and terminal rendering
pub mod render;
/// Cached date lookup
pub mod service;
/// Lookup result and converter payload types
pub mod types;

pub use cache::{CacheEntry, CacheStore, FileStore, MemoryStore, cache_key};
pub use clock::{Clock, FixedClock, SystemClock, Timezone};
pub use config::Config;
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use service::DateFetcher;
pub use types::{HebrewDate, HebrewDateResult};
