//! Persistent state: the processed-URLs ledger and the topic-usage history.
//!
//! Both stores are small flat files read and written whole. Read failures
//! degrade to empty collections and write failures are logged and swallowed —
//! losing one ledger entry risks re-processing a URL later, which is an
//! accepted tradeoff; aborting the run is not.

pub mod seen;
pub mod topics;
