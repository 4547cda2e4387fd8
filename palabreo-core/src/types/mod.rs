//! Core domain types: works, chapters, profiles and interaction records

mod chapter;
mod interaction;
mod profile;
mod work;

pub use chapter::Chapter;
pub use interaction::{Comment, Interaction, InteractionSet, MAX_COMMENT_CHARS};
pub use profile::Profile;
pub use work::{Genre, Work};
