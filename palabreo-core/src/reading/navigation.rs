//! Chapter navigation and reading progress

use crate::render::{render_markdown_html, TrustedHtml};
use crate::types::{Chapter, Work};

/// Progress reported for single-chapter works.
///
/// Single-chapter works do not track scroll position; they report this fixed
/// value instead.
pub const SINGLE_CHAPTER_PROGRESS: f32 = 0.0;

/// Clamp a requested chapter index into `[0, chapter_count - 1]`
pub fn clamp_chapter_index(requested: i64, chapter_count: usize) -> usize {
    if chapter_count == 0 {
        return 0;
    }
    let last = i64::try_from(chapter_count - 1).unwrap_or(i64::MAX);
    // Both bounds are non-negative and within usize
    requested.clamp(0, last) as usize
}

/// Percentage read after reaching the chapter at `active`
pub fn reading_progress(active: usize, chapter_count: usize) -> f32 {
    if chapter_count <= 1 {
        return SINGLE_CHAPTER_PROGRESS;
    }
    let active = active.min(chapter_count - 1);
    (active + 1) as f32 / chapter_count as f32 * 100.0
}

/// A reader's position within one work
#[derive(Debug, Clone)]
pub struct ReadingSession {
    title: String,
    /// Never empty
    chapters: Vec<Chapter>,
    /// Always a valid index into `chapters`
    active: usize,
}

impl ReadingSession {
    /// Start reading a work at its first chapter
    pub fn new(work: &Work) -> Self {
        Self::from_chapters(work.title.clone(), work.reading_chapters().into_owned())
    }

    /// Start reading an explicit chapter list. An empty list reads as one
    /// empty chapter named after the title.
    pub fn from_chapters(title: impl Into<String>, mut chapters: Vec<Chapter>) -> Self {
        let title = title.into();
        if chapters.is_empty() {
            chapters.push(Chapter::new(title.clone()));
        }
        Self {
            title,
            chapters,
            active: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_chapter(&self) -> &Chapter {
        &self.chapters[self.active]
    }

    /// Move to a chapter, clamping out-of-range requests
    pub fn go_to(&mut self, index: i64) -> &Chapter {
        self.active = clamp_chapter_index(index, self.chapters.len());
        self.active_chapter()
    }

    pub fn has_next(&self) -> bool {
        self.active + 1 < self.chapters.len()
    }

    pub fn has_previous(&self) -> bool {
        self.active > 0
    }

    /// Advance one chapter. Returns false at the last chapter.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.active += 1;
        true
    }

    /// Go back one chapter. Returns false at the first chapter.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.active -= 1;
        true
    }

    pub fn progress(&self) -> f32 {
        reading_progress(self.active, self.chapters.len())
    }

    /// Render the active chapter's body
    pub fn render_active(&self) -> TrustedHtml {
        render_markdown_html(&self.active_chapter().content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Genre;
    use uuid::Uuid;

    fn three_chapters() -> ReadingSession {
        ReadingSession::from_chapters(
            "Trilogía",
            vec![
                Chapter::new("I").with_content("uno"),
                Chapter::new("II").with_content("dos"),
                Chapter::new("III").with_content("tres"),
            ],
        )
    }

    #[test]
    fn test_clamp_chapter_index() {
        assert_eq!(clamp_chapter_index(-1, 3), 0);
        assert_eq!(clamp_chapter_index(1, 3), 1);
        assert_eq!(clamp_chapter_index(99, 3), 2);
        assert_eq!(clamp_chapter_index(5, 0), 0);
        assert_eq!(clamp_chapter_index(i64::MIN, 1), 0);
    }

    #[test]
    fn test_reading_progress() {
        assert_eq!(reading_progress(0, 4), 25.0);
        assert_eq!(reading_progress(3, 4), 100.0);
        assert_eq!(reading_progress(10, 4), 100.0);
        assert_eq!(reading_progress(0, 1), SINGLE_CHAPTER_PROGRESS);
        assert_eq!(reading_progress(0, 0), SINGLE_CHAPTER_PROGRESS);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut session = three_chapters();
        assert_eq!(session.go_to(-1).content, "uno");
        assert_eq!(session.go_to(7).content, "tres");
        assert_eq!(session.active_index(), 2);
    }

    #[test]
    fn test_next_and_previous() {
        let mut session = three_chapters();
        assert!(!session.previous());
        assert!(session.next());
        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.active_chapter().title, "III");
        assert_eq!(session.progress(), 100.0);
        assert!(session.previous());
        assert_eq!(session.active_index(), 1);
    }

    #[test]
    fn test_single_chapter_work() {
        let work = Work::new(Uuid::new_v4(), "Haiku", Genre::Poem).with_content("**luna**");
        let session = ReadingSession::new(&work);
        assert_eq!(session.chapter_count(), 1);
        assert_eq!(session.progress(), SINGLE_CHAPTER_PROGRESS);
        assert_eq!(
            session.render_active().as_str(),
            "<p><strong>luna</strong></p>"
        );
    }

    #[test]
    fn test_empty_chapter_list() {
        let session = ReadingSession::from_chapters("Vacío", Vec::new());
        assert_eq!(session.chapter_count(), 1);
        assert_eq!(session.active_chapter().title, "Vacío");
    }
}
