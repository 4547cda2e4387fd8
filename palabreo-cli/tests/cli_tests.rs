//! Integration tests for the Palabreo CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Create a markdown file for testing
fn create_test_markdown(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn palabreo(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("palabreo-cli").unwrap();
    cmd.env("PALABREO_DATA_DIR", data_dir.path());
    cmd
}

const MANUSCRIPT: &str = "# Uno\nEra **de noche**.\n\n# Dos\n- pan\n- vino\n\n# Tres\n> fin\n";

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("palabreo-cli").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("read"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("prefs"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("palabreo-cli").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("palabreo"));
}

#[test]
fn test_batch_help() {
    let mut cmd = Command::cargo_bin("palabreo-cli").unwrap();
    cmd.args(["batch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch render"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--jobs"));
}

#[test]
fn test_render_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_markdown(&temp_dir, "poema.md", "**luz** <b>\n- a\n- b\n");

    palabreo(&temp_dir)
        .args(["render", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p><strong>luz</strong> &lt;b&gt;</p>"))
        .stdout(predicate::str::contains("<ul>\n<li>a</li>\n<li>b</li>\n</ul>"));
}

#[test]
fn test_render_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_markdown(&temp_dir, "nota.md", "## Nota\n`code`");
    let output = temp_dir.path().join("nota.html");

    palabreo(&temp_dir)
        .args([
            "render",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let html = fs::read_to_string(&output).unwrap();
    assert_eq!(html, "<h2>Nota</h2>\n<p><code>code</code></p>");
}

#[test]
fn test_render_page_uses_preferences() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_markdown(&temp_dir, "cuento.md", "Había una vez");

    palabreo(&temp_dir)
        .args(["prefs", "set", "font-size", "22"])
        .assert()
        .success();

    palabreo(&temp_dir)
        .args(["render", "--page", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>cuento</title>"))
        .stdout(predicate::str::contains("font-size: 22px"))
        .stdout(predicate::str::contains("<p>Había una vez</p>"));
}

#[test]
fn test_render_missing_input() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args(["render", "nonexistent.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_read_first_chapter() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_markdown(&temp_dir, "novela.md", MANUSCRIPT);

    palabreo(&temp_dir)
        .args(["read", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter 1/3: Uno (33%)"))
        .stdout(predicate::str::contains("<p>Era <strong>de noche</strong>.</p>"));
}

#[test]
fn test_read_clamps_chapter() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_markdown(&temp_dir, "novela.md", MANUSCRIPT);

    palabreo(&temp_dir)
        .args(["read", input.to_str().unwrap(), "--chapter", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter 3/3: Tres (100%)"))
        .stdout(predicate::str::contains(
            "<blockquote class=\"work-quote\">fin</blockquote>",
        ));

    palabreo(&temp_dir)
        .args(["read", input.to_str().unwrap(), "--chapter", "-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter 1/3: Uno"));
}

#[test]
fn test_read_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_markdown(&temp_dir, "novela.md", MANUSCRIPT);

    let output = palabreo(&temp_dir)
        .args(["read", input.to_str().unwrap(), "--chapter", "1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["work"], "Uno");
    assert_eq!(view["index"], 1);
    assert_eq!(view["chapter_count"], 3);
    assert_eq!(view["title"], "Dos");
    assert_eq!(view["html"], "<ul>\n<li>pan</li>\n<li>vino</li>\n</ul>");
}

#[test]
fn test_batch_renders_directory() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    create_test_markdown(&input_dir, "uno.md", "# Uno");
    create_test_markdown(&input_dir, "dos.markdown", "*dos*");
    create_test_markdown(&input_dir, "ignorar.txt", "no");

    palabreo(&input_dir)
        .args([
            "batch",
            input_dir.path().to_str().unwrap(),
            "--output-dir",
            output_dir.path().to_str().unwrap(),
            "--jobs",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("Success: 2"));

    assert_eq!(
        fs::read_to_string(output_dir.path().join("uno.html")).unwrap(),
        "<h1>Uno</h1>"
    );
    assert_eq!(
        fs::read_to_string(output_dir.path().join("dos.html")).unwrap(),
        "<p><em>dos</em></p>"
    );
    assert!(!output_dir.path().join("ignorar.html").exists());
}

#[test]
fn test_batch_rejects_zero_jobs() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args([
            "batch",
            temp_dir.path().to_str().unwrap(),
            "--output-dir",
            temp_dir.path().to_str().unwrap(),
            "--jobs",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("jobs must be at least 1"));
}

#[test]
fn test_prefs_defaults() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fontSize = 18"))
        .stdout(predicate::str::contains("theme = light"))
        .stdout(predicate::str::contains("lineHeight = 1.8"));
}

#[test]
fn test_prefs_set_persists() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args(["prefs", "set", "theme", "dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme = dark"));

    let output = palabreo(&temp_dir)
        .args(["prefs", "show", "--json"])
        .output()
        .unwrap();
    let prefs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(prefs["theme"], "dark");
    assert_eq!(prefs["fontSize"], 18);
}

#[test]
fn test_prefs_set_clamps_font_size() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args(["prefs", "set", "fontSize", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fontSize = 32"));
}

#[test]
fn test_prefs_set_rejects_unknown_field() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args(["prefs", "set", "wallpaper", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown preference"));
}

#[test]
fn test_prefs_set_rejects_bad_value() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args(["prefs", "set", "theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for theme"));
}

#[test]
fn test_prefs_reset() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args(["prefs", "set", "column-width", "wide"])
        .assert()
        .success();
    palabreo(&temp_dir)
        .args(["prefs", "reset"])
        .assert()
        .success();

    palabreo(&temp_dir)
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("columnWidth = medium"));
}

#[test]
fn test_prefs_css() {
    let temp_dir = TempDir::new().unwrap();

    palabreo(&temp_dir)
        .args(["prefs", "show", "--css"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max-width: 680px"));
}
