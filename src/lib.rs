//! Librarian
//!
//! Searchable catalogs of UI components, page blocks and icons, the
//! selection and configuration flow a user walks through before placing one,
//! and the message protocol that carries placement requests to a document
//! host and its replies back.

// Module declarations
pub mod bridge;
pub mod catalog;
pub mod cli;
pub mod color;
pub mod config;
pub mod constants;
pub mod host;
pub mod icons;
pub mod preview;
pub mod protocol;
pub mod selection;
pub mod sources;
pub mod storage;
