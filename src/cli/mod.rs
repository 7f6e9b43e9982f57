//! CLI command handlers for Librarian.
//!
//! Headless access to the catalogs, the selection flow and the placement
//! protocol for scripting and testing.

pub mod catalog;
pub mod common;
pub mod config;
pub mod icons;
pub mod place;
pub mod preview;
pub mod repos;

// Re-export types used by main.rs and tests
pub use catalog::CatalogArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use icons::IconsArgs;
pub use place::PlaceArgs;
pub use preview::PreviewArgs;
pub use repos::ReposArgs;
