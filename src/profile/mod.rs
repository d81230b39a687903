//! Slicer profile resolution and generation
//!
//! A base profile is picked from the profile directory by a naming
//! convention with a descending-specificity fallback chain; a dynamic
//! profile is then synthesized from it with the request's values substituted
//! for a fixed set of keys.

mod dynamic;
mod resolver;

pub use dynamic::{DynamicProfileGenerator, ProfileLine, load_profile};
pub use resolver::{DEFAULT_PROFILE, ProfileResolver};
