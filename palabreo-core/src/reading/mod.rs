//! Reading view state: preferences, their store, and chapter navigation

mod navigation;
mod preferences;
mod store;

pub use navigation::{
    clamp_chapter_index, reading_progress, ReadingSession, SINGLE_CHAPTER_PROGRESS,
};
pub use preferences::{
    ColumnWidth, FontFamily, PreferencesUpdate, ReadingPreferences, TextAlign, Theme,
    FONT_SIZE_RANGE, LINE_HEIGHT_RANGE,
};
pub use store::{
    load_preferences, ChangeSource, PreferencesEvent, PreferencesStore, PreferencesSubscription,
    READING_PREFERENCES_KEY,
};
