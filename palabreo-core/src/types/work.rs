//! The Work type - a piece of writing owned by one author

use super::Chapter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Title given to text that precedes the first heading of an imported manuscript
const PROLOGUE_TITLE: &str = "Prologue";

/// Literary genre of a work
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Novel,
    ShortStory,
    Poem,
    Article,
    Newsletter,
    Essay,
    #[default]
    Other,
}

impl Genre {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Novel => "novel",
            Genre::ShortStory => "short_story",
            Genre::Poem => "poem",
            Genre::Article => "article",
            Genre::Newsletter => "newsletter",
            Genre::Essay => "essay",
            Genre::Other => "other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "novel" => Ok(Genre::Novel),
            "short_story" | "story" => Ok(Genre::ShortStory),
            "poem" | "poetry" => Ok(Genre::Poem),
            "article" => Ok(Genre::Article),
            "newsletter" => Ok(Genre::Newsletter),
            "essay" => Ok(Genre::Essay),
            "other" => Ok(Genre::Other),
            other => Err(format!("unknown genre: {other}")),
        }
    }
}

/// A titled piece of writing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Work {
    /// Unique identifier for this work
    pub id: Uuid,

    /// Owning profile
    pub author_id: Uuid,

    pub title: String,

    pub genre: Genre,

    /// Free-text body, used when the work has no chapters
    #[serde(default)]
    pub content: String,

    /// Ordered chapters; empty for single-piece works
    #[serde(default)]
    pub chapters: Vec<Chapter>,

    pub published: bool,

    /// Archived works are hidden from public listings whatever `published` says
    pub archived: bool,

    pub views: u64,

    pub likes: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Work {
    /// Create an unpublished, empty work
    pub fn new(author_id: Uuid, title: impl Into<String>, genre: Genre) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.into(),
            genre,
            content: String::new(),
            chapters: Vec::new(),
            published: false,
            archived: false,
            views: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the free-text body
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the chapter list
    pub fn with_chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.chapters = chapters;
        self
    }

    /// Append a chapter
    pub fn add_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Whether the work may appear in public listings
    pub fn is_listed(&self) -> bool {
        self.published && !self.archived
    }

    /// Chapters as a reader sees them.
    ///
    /// A work without chapters is read as one implicit chapter carrying the
    /// work's own title and content.
    pub fn reading_chapters(&self) -> Cow<'_, [Chapter]> {
        if self.chapters.is_empty() {
            Cow::Owned(vec![
                Chapter::new(self.title.clone()).with_content(self.content.clone())
            ])
        } else {
            Cow::Borrowed(&self.chapters)
        }
    }

    /// Number of chapters a reader navigates through (at least one)
    pub fn chapter_count(&self) -> usize {
        self.chapters.len().max(1)
    }

    /// Total words across the body and all chapters
    pub fn word_count(&self) -> usize {
        self.reading_chapters().iter().map(Chapter::word_count).sum()
    }

    /// Bump the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Build a work from a markdown manuscript.
    ///
    /// Top-level `# ` headings outside fenced code start new chapters. When
    /// `title` is `None` the first heading names the work. Text before the
    /// first heading becomes a prologue chapter. A manuscript without any
    /// top-level heading is kept whole as the work's content.
    pub fn from_markdown(
        author_id: Uuid,
        title: Option<&str>,
        genre: Genre,
        text: &str,
    ) -> Self {
        let (preamble, sections) = split_manuscript(text);

        let fallback_title = sections
            .first()
            .map(|c| c.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or(fallback_title);

        let work = Work::new(author_id, title, genre);
        if sections.is_empty() {
            return work.with_content(preamble);
        }

        let mut chapters = Vec::with_capacity(sections.len() + 1);
        if !preamble.trim().is_empty() {
            chapters.push(Chapter::new(PROLOGUE_TITLE).with_content(preamble));
        }
        chapters.extend(sections);
        work.with_chapters(chapters)
    }
}

/// Split a manuscript at top-level headings, ignoring headings inside fences
fn split_manuscript(text: &str) -> (String, Vec<Chapter>) {
    let mut preamble: Vec<&str> = Vec::new();
    let mut chapters: Vec<(String, Vec<&str>)> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }

        let heading = if in_fence {
            None
        } else {
            line.strip_prefix("# ")
        };

        if let Some(title) = heading {
            chapters.push((title.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = chapters.last_mut() {
            body.push(line);
        } else {
            preamble.push(line);
        }
    }

    let chapters = chapters
        .into_iter()
        .map(|(title, body)| Chapter::new(title).with_content(trim_blank_lines(&body)))
        .collect();

    (trim_blank_lines(&preamble), chapters)
}

/// Join lines, dropping leading and trailing blank ones
fn trim_blank_lines(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
