//! Block assembly: turns classified lines into HTML fragments

use super::classify::{classify_line, is_fence, Line};
use super::escape::escape_html;
use super::inline::format_inline;

/// Class attached to rendered blockquotes
pub const BLOCKQUOTE_CLASS: &str = "work-quote";

/// Multi-line construct currently open
#[derive(Debug, Default)]
enum BlockState {
    #[default]
    Flow,
    List,
    Code {
        lang: Option<String>,
        lines: Vec<String>,
    },
}

/// Accumulates fragments line by line
#[derive(Debug, Default)]
pub(crate) struct Assembler {
    state: BlockState,
    fragments: Vec<String>,
}

impl Assembler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one raw input line
    pub(crate) fn push_line(&mut self, raw: &str) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state, raw, &mut self.fragments);
    }

    /// Close whatever is still open and join the fragments
    pub(crate) fn finish(mut self) -> String {
        match std::mem::take(&mut self.state) {
            BlockState::Flow => {}
            BlockState::List => self.fragments.push("</ul>".to_string()),
            BlockState::Code { lang, lines } => {
                self.fragments.push(code_block(lang.as_deref(), &lines))
            }
        }
        self.fragments.join("\n")
    }
}

/// The single transition function of the block state machine
fn transition(state: BlockState, raw: &str, out: &mut Vec<String>) -> BlockState {
    match state {
        BlockState::Code { lang, mut lines } => {
            if is_fence(raw) {
                out.push(code_block(lang.as_deref(), &lines));
                BlockState::Flow
            } else {
                lines.push(code_line(raw));
                BlockState::Code { lang, lines }
            }
        }
        BlockState::List => match classify_line(raw) {
            Line::Bullet(item) => {
                out.push(list_item(item));
                BlockState::List
            }
            other => {
                out.push("</ul>".to_string());
                flow(other, out)
            }
        },
        BlockState::Flow => flow(classify_line(raw), out),
    }
}

/// Handle a line while no multi-line construct is open
fn flow(line: Line<'_>, out: &mut Vec<String>) -> BlockState {
    match line {
        Line::Fence { info } => {
            let lang = info
                .split_whitespace()
                .next()
                .map(str::to_string);
            return BlockState::Code {
                lang,
                lines: Vec::new(),
            };
        }
        Line::Bullet(item) => {
            out.push("<ul>".to_string());
            out.push(list_item(item));
            return BlockState::List;
        }
        Line::Rule => out.push("<hr>".to_string()),
        Line::Heading { level, text } => {
            out.push(format!("<h{level}>{}</h{level}>", format_inline(text)))
        }
        Line::Quote(text) => out.push(format!(
            "<blockquote class=\"{BLOCKQUOTE_CLASS}\">{}</blockquote>",
            format_inline(text)
        )),
        Line::Blank => out.push("<br>".to_string()),
        Line::Text(text) => out.push(format!("<p>{}</p>", format_inline(text))),
    }
    BlockState::Flow
}

fn list_item(item: &str) -> String {
    format!("<li>{}</li>", format_inline(item))
}

/// Code lines are escaped verbatim; blank ones keep a single space
fn code_line(raw: &str) -> String {
    if raw.trim().is_empty() {
        " ".to_string()
    } else {
        escape_html(raw)
    }
}

fn code_block(lang: Option<&str>, lines: &[String]) -> String {
    let class_attr = lang
        .map(|l| format!(" class=\"language-{}\"", escape_html(l)))
        .unwrap_or_default();
    format!("<pre><code{}>{}</code></pre>", class_attr, lines.join("\n"))
}
