//! Render command implementation

use anyhow::{Context, Result};
use palabreo_core::render::escape_html;
use palabreo_core::{render_markdown_html, ReadingPreferences};
use std::fs;
use std::path::Path;

/// Render a markdown file, optionally as a full styled page
pub fn render(input: &str, output: Option<&str>, page: Option<&ReadingPreferences>) -> Result<()> {
    let input_path = Path::new(input);
    let text = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let fragment = render_markdown_html(&text);
    tracing::debug!("Rendered {} bytes of markdown", text.len());

    let html = match page {
        Some(preferences) => {
            let title = input_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Palabreo");
            reading_page(title, fragment.as_str(), preferences)
        }
        None => fragment.into_string(),
    };

    match output {
        Some(output) => {
            fs::write(output, &html)
                .with_context(|| format!("Failed to write output file: {}", output))?;
            tracing::info!("Rendered {} -> {}", input, output);
        }
        None => println!("{}", html),
    }

    Ok(())
}

/// Standalone HTML document for one rendered fragment
pub(crate) fn reading_page(title: &str, body: &str, preferences: &ReadingPreferences) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n\
         <body>\n<article class=\"palabreo-reader\" style=\"{}\">\n{}\n</article>\n</body>\n</html>\n",
        escape_html(title),
        escape_html(&preferences.css_declarations()),
        body,
    )
}
