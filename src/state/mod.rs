//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `ChainState`: Tracks where a single film's chain is (extracting, chaining, finalizing, done)
//! - `DomainState`: Tracks per-host request timing for the politeness delay

mod chain_state;
mod domain_state;

// Re-export main types
pub use chain_state::ChainState;
pub use domain_state::DomainState;
