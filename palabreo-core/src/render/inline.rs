//! Inline span formatting for a single line of text
//!
//! Spans are recognised on the raw line and marked with placeholder
//! characters, the line is HTML-escaped, and the placeholders are then
//! expanded to tags from a fixed table. User text therefore never reaches the
//! output unescaped, and only the four span tags below can be produced.

use super::escape::escape_html;
use regex::{Captures, Regex};
use std::sync::OnceLock;

const STRONG: (char, char) = ('\u{E000}', '\u{E001}');
const EM: (char, char) = ('\u{E002}', '\u{E003}');
const DEL: (char, char) = ('\u{E004}', '\u{E005}');
const CODE: (char, char) = ('\u{E006}', '\u{E007}');

/// Placeholder to tag table applied after escaping
const INLINE_TOKENS: [(char, &str); 8] = [
    (STRONG.0, "<strong>"),
    (STRONG.1, "</strong>"),
    (EM.0, "<em>"),
    (EM.1, "</em>"),
    (DEL.0, "<del>"),
    (DEL.1, "</del>"),
    (CODE.0, "<code>"),
    (CODE.1, "</code>"),
];

/// Stand-in for placeholder characters found in user text
const REPLACEMENT: &str = "\u{FFFD}";

/// Format `**bold**`, `*italic*`, `~~strike~~` and `` `code` `` spans in one
/// line, escaping everything else. Unmatched delimiters are kept verbatim.
pub fn format_inline(line: &str) -> String {
    let line = line.replace(is_placeholder, REPLACEMENT);
    let marked = mark_spans(&line);
    expand_tokens(&escape_html(&marked))
}

fn is_placeholder(c: char) -> bool {
    ('\u{E000}'..='\u{E007}').contains(&c)
}

/// Replace span delimiters with placeholder pairs
fn mark_spans(line: &str) -> String {
    static RE_CODE: OnceLock<Regex> = OnceLock::new();
    let re_code = RE_CODE.get_or_init(|| Regex::new(r"`([^`]+)`").unwrap());

    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for caps in re_code.captures_iter(line) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&mark_emphasis(&line[last..whole.start()]));
        out.push(CODE.0);
        out.push_str(body.as_str());
        out.push(CODE.1);
        last = whole.end();
    }
    out.push_str(&mark_emphasis(&line[last..]));
    out
}

/// Bold, then strikethrough, then italic, on text outside code spans
fn mark_emphasis(text: &str) -> String {
    static RE_BOLD: OnceLock<Regex> = OnceLock::new();
    static RE_STRIKE: OnceLock<Regex> = OnceLock::new();
    static RE_ITALIC: OnceLock<Regex> = OnceLock::new();

    let re_bold = RE_BOLD.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
    let re_strike = RE_STRIKE.get_or_init(|| Regex::new(r"~~(.+?)~~").unwrap());
    let re_italic = RE_ITALIC.get_or_init(|| Regex::new(r"\*(.+?)\*").unwrap());

    let text = wrap_spans(text, re_bold, STRONG);
    let text = wrap_spans(&text, re_strike, DEL);
    wrap_spans(&text, re_italic, EM)
}

/// Wrap each match's first group in the given placeholder pair.
///
/// A match whose body is blank, or would cut through an already marked
/// span, is left as is, so tags never interleave.
fn wrap_spans(text: &str, re: &Regex, (open, close): (char, char)) -> String {
    re.replace_all(text, |caps: &Captures| {
        let body = &caps[1];
        if !body.trim().is_empty() && is_balanced(body) {
            format!("{open}{body}{close}")
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

/// Whether every placeholder opened in `text` is closed in order
fn is_balanced(text: &str) -> bool {
    let mut open: Vec<char> = Vec::new();
    for c in text.chars() {
        if let Some(&(start, _)) = [STRONG, EM, DEL, CODE].iter().find(|(_, end)| *end == c) {
            if open.pop() != Some(start) {
                return false;
            }
        } else if [STRONG.0, EM.0, DEL.0, CODE.0].contains(&c) {
            open.push(c);
        }
    }
    open.is_empty()
}

fn expand_tokens(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len() + 16);
    for c in escaped.chars() {
        match INLINE_TOKENS.iter().find(|(token, _)| *token == c) {
            Some((_, tag)) => out.push_str(tag),
            None => out.push(c),
        }
    }
    out
}
