//! Batch render command implementation

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use palabreo_core::render_markdown_html;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|m| ext.eq_ignore_ascii_case(m))
        })
        .unwrap_or(false)
}

/// Render every markdown file in a directory to HTML
pub fn batch(input_dir: &str, output_dir: &str, jobs: usize) -> Result<()> {
    let input_path = Path::new(input_dir);
    let output_path = Path::new(output_dir);

    fs::create_dir_all(output_path)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    let mut files: Vec<_> = fs::read_dir(input_path)
        .with_context(|| format!("Failed to read input directory: {}", input_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_markdown(p))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No markdown files found in {}", input_dir);
        return Ok(());
    }

    println!("Found {} files to render", files.len());

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to start worker pool")?;

    pool.install(|| {
        files.par_iter().for_each(|file_path| {
            match render_file(file_path, output_path) {
                Ok(()) => {
                    success_count.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Failed to render {:?}: {:#}", file_path, e);
                }
            }
            progress.inc(1);
        });
    });

    progress.finish();

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    println!("\nBatch render complete:");
    println!("  Success: {}", success);
    println!("  Errors:  {}", errors);

    if errors > 0 {
        bail!("Batch render completed with {} errors", errors);
    }

    Ok(())
}

fn render_file(input_path: &Path, output_dir: &Path) -> Result<()> {
    let text = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {:?}", input_path))?;

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Could not determine output filename from input")?;
    let output_file = output_dir.join(format!("{}.html", stem));

    fs::write(&output_file, render_markdown_html(&text).as_str())?;
    tracing::info!("Rendered {:?} -> {:?}", input_path, output_file);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("capitulo.md")));
        assert!(is_markdown(Path::new("NOTAS.Markdown")));
        assert!(!is_markdown(Path::new("portada.png")));
        assert!(!is_markdown(Path::new("README")));
    }
}
