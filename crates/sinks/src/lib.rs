// FILE: crates/sinks/src/lib.rs
//! Timeline adapters
//!
//! [`PostSink`] is what the sync engine and the retention sweeper talk to.
//! [`MastodonSink`] is the real implementation, [`MemorySink`] the fake.
//! Token acquisition lives in [`auth`] and is kept out of the sync path.

pub mod auth;
mod mastodon;
mod memory;
mod traits;

pub use auth::{Authorizer, CredentialPrompt, PasswordLogin};
pub use mastodon::{classify_failure, parse_statuses, MastodonSink};
pub use memory::{MemorySink, PublishedPost};
pub use traits::{collect_own_posts, PostSink, PAGE_SIZE};

pub use scrobblecast_core::{SinkError, SinkResult};
