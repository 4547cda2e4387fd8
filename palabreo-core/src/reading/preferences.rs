//! Reading preferences: display settings for the reading view

use crate::error::PreferencesError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const FONT_SIZE_RANGE: RangeInclusive<u8> = 12..=32;
pub const LINE_HEIGHT_RANGE: RangeInclusive<f32> = 1.0..=3.0;

/// Font family used for the reading column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Serif,
    Sans,
    Mono,
}

impl FontFamily {
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::Serif => "Georgia, 'Times New Roman', serif",
            FontFamily::Sans => "system-ui, -apple-system, 'Segoe UI', sans-serif",
            FontFamily::Mono => "ui-monospace, 'SFMono-Regular', Menlo, monospace",
        }
    }
}

/// Colour theme of the reading view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
}

impl Theme {
    /// Background and text colours
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Light => ("#ffffff", "#1f2937"),
            Theme::Dark => ("#111827", "#e5e7eb"),
            Theme::Sepia => ("#f4ecd8", "#5b4636"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Justify,
    Center,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Justify => "justify",
            TextAlign::Center => "center",
        }
    }
}

/// Maximum width of the reading column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnWidth {
    Narrow,
    #[default]
    Medium,
    Wide,
}

impl ColumnWidth {
    pub fn max_width_px(&self) -> u16 {
        match self {
            ColumnWidth::Narrow => 560,
            ColumnWidth::Medium => 680,
            ColumnWidth::Wide => 820,
        }
    }
}

/// Per-installation display settings for the reading view.
///
/// Missing fields deserialize to their defaults, so older stored objects
/// keep loading as fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingPreferences {
    /// Font size in pixels
    pub font_size: u8,
    pub font_family: FontFamily,
    pub theme: Theme,
    pub line_height: f32,
    pub text_align: TextAlign,
    pub column_width: ColumnWidth,
    pub show_progress: bool,
}

impl Default for ReadingPreferences {
    fn default() -> Self {
        Self {
            font_size: 18,
            font_family: FontFamily::Serif,
            theme: Theme::Light,
            line_height: 1.8,
            text_align: TextAlign::Left,
            column_width: ColumnWidth::Medium,
            show_progress: true,
        }
    }
}

impl ReadingPreferences {
    /// Clamp numeric settings into their supported ranges
    pub fn normalized(mut self) -> Self {
        self.font_size = self
            .font_size
            .clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
        self.line_height = if self.line_height.is_finite() {
            self.line_height
                .clamp(*LINE_HEIGHT_RANGE.start(), *LINE_HEIGHT_RANGE.end())
        } else {
            Self::default().line_height
        };
        self
    }

    /// Inline CSS for a reading container
    pub fn css_declarations(&self) -> String {
        let (background, color) = self.theme.colors();
        format!(
            "font-size: {}px; font-family: {}; line-height: {}; text-align: {}; \
             max-width: {}px; background-color: {}; color: {};",
            self.font_size,
            self.font_family.css_stack(),
            self.line_height,
            self.text_align.as_css(),
            self.column_width.max_width_px(),
            background,
            color,
        )
    }
}

/// Partial change to reading preferences; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesUpdate {
    pub font_size: Option<u8>,
    pub font_family: Option<FontFamily>,
    pub theme: Option<Theme>,
    pub line_height: Option<f32>,
    pub text_align: Option<TextAlign>,
    pub column_width: Option<ColumnWidth>,
    pub show_progress: Option<bool>,
}

impl PreferencesUpdate {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn font_size(size: u8) -> Self {
        Self {
            font_size: Some(size),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the named fields, leaving the rest untouched
    pub fn apply_to(&self, prefs: &mut ReadingPreferences) {
        if let Some(v) = self.font_size {
            prefs.font_size = v;
        }
        if let Some(v) = self.font_family {
            prefs.font_family = v;
        }
        if let Some(v) = self.theme {
            prefs.theme = v;
        }
        if let Some(v) = self.line_height {
            prefs.line_height = v;
        }
        if let Some(v) = self.text_align {
            prefs.text_align = v;
        }
        if let Some(v) = self.column_width {
            prefs.column_width = v;
        }
        if let Some(v) = self.show_progress {
            prefs.show_progress = v;
        }
    }

    /// Build an update from a `field = value` pair.
    ///
    /// Field names are accepted in camelCase, snake_case or kebab-case
    /// (`fontSize`, `font_size`, `font-size`).
    pub fn from_assignment(field: &str, value: &str) -> Result<Self, PreferencesError> {
        let key: String = field
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        let value = value.trim();
        let invalid = || PreferencesError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        };

        let mut update = Self::default();
        match key.as_str() {
            "fontsize" => update.font_size = Some(value.parse().map_err(|_| invalid())?),
            "fontfamily" => update.font_family = Some(parse_keyword(value).ok_or_else(invalid)?),
            "theme" => update.theme = Some(parse_keyword(value).ok_or_else(invalid)?),
            "lineheight" => update.line_height = Some(value.parse().map_err(|_| invalid())?),
            "textalign" => update.text_align = Some(parse_keyword(value).ok_or_else(invalid)?),
            "columnwidth" => {
                update.column_width = Some(parse_keyword(value).ok_or_else(invalid)?)
            }
            "showprogress" => update.show_progress = Some(value.parse().map_err(|_| invalid())?),
            _ => return Err(PreferencesError::UnknownField(field.to_string())),
        }
        Ok(update)
    }
}

/// Parse a lowercase keyword through the type's serde representation
fn parse_keyword<T: for<'de> Deserialize<'de>>(value: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(value.to_lowercase())).ok()
}

impl FromStr for Theme {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_keyword(s.trim()).ok_or_else(|| PreferencesError::InvalidValue {
            field: "theme".to_string(),
            value: s.to_string(),
        })
    }
}
