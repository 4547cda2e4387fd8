//! Read command implementation

use anyhow::{Context, Result};
use palabreo_core::{Genre, ReadingSession, Work};
use serde::Serialize;
use std::fs;
use uuid::Uuid;

#[derive(Serialize)]
struct ChapterView<'a> {
    work: &'a str,
    index: usize,
    chapter_count: usize,
    title: &'a str,
    progress: f32,
    html: &'a str,
}

/// Print one chapter of a manuscript
pub fn read(input: &str, chapter: i64, json: bool) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let work = Work::from_markdown(Uuid::nil(), None, Genre::Other, &text);
    let mut session = ReadingSession::new(&work);
    session.go_to(chapter);
    if session.active_index() as i64 != chapter {
        tracing::debug!(
            "Chapter {} out of range, showing {}",
            chapter,
            session.active_index()
        );
    }

    let html = session.render_active();
    let active = session.active_chapter();

    if json {
        let view = ChapterView {
            work: session.title(),
            index: session.active_index(),
            chapter_count: session.chapter_count(),
            title: &active.title,
            progress: session.progress(),
            html: html.as_str(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", session.title());
    println!(
        "Chapter {}/{}: {} ({:.0}%)",
        session.active_index() + 1,
        session.chapter_count(),
        active.title,
        session.progress()
    );
    println!();
    println!("{}", html);

    Ok(())
}
