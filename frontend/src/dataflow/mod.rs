//! Dataflow primitives the Today screen is wired with.
//!
//! - [`Relay`] carries view events (scrolls, presses, resizes) to domain code
//! - [`Actor`] owns one piece of reactive state the view renders from
//!
//! Relays follow the `{source}_{event}_relay` naming pattern.

pub mod actor;
pub mod relay;

pub use actor::Actor;
pub use relay::{Relay, relay};
