//! Markdown to trusted HTML for a work's text
//!
//! The renderer is a line-oriented transform: each line is classified
//! ([`classify_line`]), fed to a small block state machine that opens and
//! closes lists and fenced code, and formatted inline ([`format_inline`]).
//! It is total: malformed markdown degrades to escaped literal text.

mod assemble;
mod classify;
mod escape;
mod inline;

pub use assemble::BLOCKQUOTE_CLASS;
pub use classify::{classify_line, Line};
pub use escape::escape_html;
pub use inline::format_inline;

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// HTML produced by the renderer from escaped input, safe to inject as is
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TrustedHtml {
    html: String,
}

impl TrustedHtml {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

impl AsRef<str> for TrustedHtml {
    fn as_ref(&self) -> &str {
        &self.html
    }
}

/// Render markdown text to HTML. Never fails; empty input gives empty output.
pub fn render_markdown_html(input: &str) -> TrustedHtml {
    let mut assembler = assemble::Assembler::new();
    for line in input.lines() {
        assembler.push_line(line);
    }
    TrustedHtml {
        html: assembler.finish(),
    }
}

/// SHA-256 of the input, hex encoded; used to key cached renders
pub fn content_fingerprint(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
