//! Command implementations for the hebdate CLI

mod cache;
mod config;
mod show;

pub use cache::{clear_cache, print_cache_path};
pub use config::print_config;
pub use show::{ShowOptions, show};
