//! Line classification for the block assembler

use regex::Regex;
use std::sync::OnceLock;

/// What a single input line contributes outside fenced code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Three or more backticks, with an optional info string
    Fence { info: &'a str },

    /// `- item` or `* item`
    Bullet(&'a str),

    /// Three or more `-`, `*` or `_`, optionally spaced
    Rule,

    /// `# ` or `## `
    Heading { level: u8, text: &'a str },

    /// `> quote`
    Quote(&'a str),

    Blank,

    Text(&'a str),
}

/// Classify one line. Rules are tried in a fixed order and the first match
/// wins; anything unmatched is paragraph text.
pub fn classify_line(line: &str) -> Line<'_> {
    static RE_BULLET: OnceLock<Regex> = OnceLock::new();
    static RE_RULE: OnceLock<Regex> = OnceLock::new();

    let re_bullet = RE_BULLET.get_or_init(|| Regex::new(r"^[-*]\s+").unwrap());
    let re_rule = RE_RULE.get_or_init(|| {
        Regex::new(r"^(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
    });

    let trimmed = line.trim();

    if let Some(info) = fence_info(trimmed) {
        return Line::Fence { info };
    }
    if let Some(marker) = re_bullet.find(trimmed) {
        return Line::Bullet(&trimmed[marker.end()..]);
    }
    if re_rule.is_match(trimmed) {
        return Line::Rule;
    }
    if let Some(text) = trimmed.strip_prefix("# ") {
        return Line::Heading { level: 1, text };
    }
    if let Some(text) = trimmed.strip_prefix("## ") {
        return Line::Heading { level: 2, text };
    }
    if let Some(text) = trimmed.strip_prefix("> ") {
        return Line::Quote(text);
    }
    if trimmed.is_empty() {
        return Line::Blank;
    }
    Line::Text(trimmed)
}

/// Whether the line opens or closes a fenced code block
pub fn is_fence(line: &str) -> bool {
    fence_info(line.trim()).is_some()
}

/// Info string after a run of three or more backticks
fn fence_info(trimmed: &str) -> Option<&str> {
    let ticks = trimmed.chars().take_while(|&c| c == '`').count();
    (ticks >= 3).then(|| trimmed[ticks..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fences() {
        assert_eq!(classify_line("```"), Line::Fence { info: "" });
        assert_eq!(classify_line("````rust"), Line::Fence { info: "rust" });
        assert_eq!(classify_line("``"), Line::Text("``"));
        assert!(is_fence("  ```  "));
    }

    #[test]
    fn test_bullets() {
        assert_eq!(classify_line("- item"), Line::Bullet("item"));
        assert_eq!(classify_line("*   spaced"), Line::Bullet("spaced"));
        assert_eq!(classify_line("-item"), Line::Text("-item"));
        assert_eq!(classify_line("*emphasis*"), Line::Text("*emphasis*"));
    }

    #[test]
    fn test_rules() {
        assert_eq!(classify_line("---"), Line::Rule);
        assert_eq!(classify_line("*****"), Line::Rule);
        assert_eq!(classify_line("_ _ _"), Line::Rule);
        assert_eq!(classify_line("--"), Line::Text("--"));
        assert_eq!(classify_line("-*-"), Line::Text("-*-"));
    }

    #[test]
    fn test_bullet_wins_over_spaced_rule() {
        assert_eq!(classify_line("- - -"), Line::Bullet("- -"));
    }

    #[test]
    fn test_headings_and_quotes() {
        assert_eq!(
            classify_line("# Title"),
            Line::Heading { level: 1, text: "Title" }
        );
        assert_eq!(
            classify_line("## Sub"),
            Line::Heading { level: 2, text: "Sub" }
        );
        assert_eq!(classify_line("### Deep"), Line::Text("### Deep"));
        assert_eq!(classify_line("#hashtag"), Line::Text("#hashtag"));
        assert_eq!(classify_line("> quoted"), Line::Quote("quoted"));
    }

    #[test]
    fn test_blank() {
        assert_eq!(classify_line(""), Line::Blank);
        assert_eq!(classify_line(" \t "), Line::Blank);
    }
}
