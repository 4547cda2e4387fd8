//! CLI command implementations

mod batch;
mod prefs;
mod read;
mod render;

pub use batch::batch;
pub use prefs::{load_preferences, prefs_reset, prefs_set, prefs_show};
pub use read::read;
pub use render::render;
