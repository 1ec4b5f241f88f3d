//! Domain types for scrobblecast
//!
//! - `event`: listening events and the watermark
//! - `post`: timeline posts, visibility and engagement
//! - `policy`: retention policy for old posts

mod event;
mod policy;
mod post;

pub use event::{ListeningEvent, Watermark};
pub use policy::SweepPolicy;
pub use post::{Engagement, PostId, TimelinePost, Visibility};
