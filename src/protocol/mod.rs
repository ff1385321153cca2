//! Public message and introspection types.

mod types;

pub use types::{Counts, Message};
