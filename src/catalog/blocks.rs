//! Built-in page block catalog.
//!
//! Every block has a variant axis; placing a block sends the chosen variant
//! to the host. Definitions are embedded from `blocks.json`. Marketing
//! sections come from the serp library; application blocks (auth and
//! dashboard) are tagged as shadcn blocks.

use anyhow::Result;

use super::{Family, Registry};

/// Builds the block registry from the embedded definitions.
pub fn load() -> Result<Registry> {
    Registry::from_json(Family::Blocks, include_str!("blocks.json"))
}
