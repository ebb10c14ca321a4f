pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod markers;
pub mod output;
pub mod registry;
pub mod reports;
pub mod types;
pub mod util;
