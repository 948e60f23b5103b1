//! # Newshound
//!
//! A news discovery and posting pipeline: find a trending tech topic, dig a
//! fresh article out of a news search page, make sure it hasn't been covered
//! before and is actually worth talking about, then turn it into an
//! engagement post and publish it.
//!
//! ## Features
//!
//! - Asks an LLM for a trending topic, avoiding recently used ones
//! - Two-pass link extraction (DOM anchors + raw-text URL scan) over the
//!   search-results page
//! - Static denylist filtering, persistent already-seen ledger, and a
//!   topic-cooldown history
//! - LLM quality gate with a permissive panic tier as the final safety net
//! - Layered fallback plan: first accepted article wins
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Topic selection**: suggest a fresh topic, or take `--topic` verbatim
//! 2. **Discovery**: per attempt tier, search → extract → filter → fetch → gate
//! 3. **Composition**: generate the post text for the accepted article
//! 4. **Publish**: push to the social sink; only a confirmed publish updates
//!    the seen ledger and topic history

pub mod api;
pub mod cli;
pub mod compose;
pub mod config;
pub mod discovery;
pub mod fetch;
pub mod gate;
pub mod models;
pub mod pipeline;
pub mod publish;
pub mod store;
pub mod topics;
pub mod utils;
