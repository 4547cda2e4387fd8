//! Rendering tests for palabreo-core
//!
//! These tests pin the HTML the reading view receives for a chapter body:
//! block structure (checked by parsing the output), inline formatting,
//! escaping, and robustness against arbitrary input.

use palabreo_core::render::{format_inline, render_markdown_html};
use proptest::prelude::*;
use scraper::{Html, Selector};

// =============================================================================
// Helpers
// =============================================================================

fn count(html: &str, selector: &str) -> usize {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse(selector).unwrap();
    fragment.select(&selector).count()
}

fn text_of(html: &str, selector: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse(selector).unwrap();
    fragment
        .select(&selector)
        .flat_map(|e| e.text())
        .collect()
}

// =============================================================================
// Block structure
// =============================================================================

#[test]
fn test_two_bullets_make_one_list() {
    let html = render_markdown_html("- a\n- b");
    assert_eq!(count(html.as_str(), "ul"), 1);
    assert_eq!(count(html.as_str(), "ul > li"), 2);
}

#[test]
fn test_list_closed_before_next_block() {
    let html = render_markdown_html("- item\nnot an item");
    assert!(html.as_str().contains("</ul>\n<p>not an item</p>"));
    assert_eq!(count(html.as_str(), "ul > p"), 0);
}

#[test]
fn test_separate_lists() {
    let html = render_markdown_html("- a\n\n- b");
    assert_eq!(count(html.as_str(), "ul"), 2);
}

#[test]
fn test_fenced_code_is_literal() {
    let html = render_markdown_html("```\n**x**\n```");
    assert_eq!(text_of(html.as_str(), "pre code"), "**x**");
    assert_eq!(count(html.as_str(), "strong"), 0);
}

#[test]
fn test_fenced_code_keeps_markdown_markers() {
    let html = render_markdown_html("```\n- not a list\n# not a heading\n```");
    assert_eq!(count(html.as_str(), "ul"), 0);
    assert_eq!(count(html.as_str(), "h1"), 0);
    assert_eq!(
        text_of(html.as_str(), "pre code"),
        "- not a list\n# not a heading"
    );
}

#[test]
fn test_headings() {
    let html = render_markdown_html("# Uno\n## Dos\n### Tres");
    assert_eq!(text_of(html.as_str(), "h1"), "Uno");
    assert_eq!(text_of(html.as_str(), "h2"), "Dos");
    assert_eq!(count(html.as_str(), "h3"), 0);
    assert_eq!(text_of(html.as_str(), "p"), "### Tres");
}

#[test]
fn test_blockquote_is_styled() {
    let html = render_markdown_html("> cita **fuerte**");
    assert_eq!(count(html.as_str(), "blockquote.work-quote"), 1);
    assert_eq!(text_of(html.as_str(), "blockquote strong"), "fuerte");
}

// =============================================================================
// Inline formatting and escaping
// =============================================================================

#[test]
fn test_bold_line() {
    let html = render_markdown_html("**bold**");
    assert!(html.as_str().contains("<strong>bold</strong>"));
}

#[test]
fn test_script_is_escaped() {
    let html = render_markdown_html("<script>alert('x')</script>");
    assert_eq!(count(html.as_str(), "script"), 0);
    assert_eq!(
        html.as_str(),
        "<p>&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;</p>"
    );
}

#[test]
fn test_visible_text_survives_round_trip() {
    let source = "a < b & c > d";
    let html = render_markdown_html(source);
    let visible = text_of(html.as_str(), "p");
    assert_eq!(visible, source);

    // Rendering the visible text again gives the same markup
    assert_eq!(render_markdown_html(&visible), html);
}

#[test]
fn test_inline_formatter_standalone() {
    assert_eq!(
        format_inline("~~old~~ `new`"),
        "<del>old</del> <code>new</code>"
    );
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_chapter_snapshot() {
    let chapter = "# Capítulo uno\n\
                   \n\
                   Era una **noche** oscura y *tormentosa*.\n\
                   - pan\n\
                   - vino\n\
                   > Nadie lo sabía.\n\
                   ---\n\
                   ```js\n\
                   if (a < b && c) { **x** }\n\
                   ```\n\
                   ## Fin";

    insta::assert_snapshot!(render_markdown_html(chapter).as_str(), @r#"
    <h1>Capítulo uno</h1>
    <br>
    <p>Era una <strong>noche</strong> oscura y <em>tormentosa</em>.</p>
    <ul>
    <li>pan</li>
    <li>vino</li>
    </ul>
    <blockquote class="work-quote">Nadie lo sabía.</blockquote>
    <hr>
    <pre><code class="language-js">if (a &lt; b &amp;&amp; c) { **x** }</code></pre>
    <h2>Fin</h2>
    "#);
}

#[test]
fn test_poem_snapshot() {
    let poem = "Tú me quieres alba,\n\nme quieres de espumas,\n";

    insta::assert_snapshot!(render_markdown_html(poem).as_str(), @r#"
    <p>Tú me quieres alba,</p>
    <br>
    <p>me quieres de espumas,</p>
    "#);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_never_panics(input in "\\PC*") {
        let _ = render_markdown_html(&input);
    }

    #[test]
    fn prop_never_panics_on_markdown_soup(input in "[-*_~`#> \\na-z<&]{0,200}") {
        let _ = render_markdown_html(&input);
    }

    #[test]
    fn prop_less_than_escaped_exactly_once(input in "[-*_~#> \\na-z0-9<&]{0,120}") {
        let html = render_markdown_html(&input);
        prop_assert_eq!(
            html.as_str().matches("&lt;").count(),
            input.matches('<').count()
        );
    }

    #[test]
    fn prop_blocks_are_balanced(input in "[-*`> \\na-z]{0,160}") {
        let html = render_markdown_html(&input);
        let html = html.as_str();
        prop_assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
        prop_assert_eq!(html.matches("<pre>").count(), html.matches("</pre>").count());
        prop_assert_eq!(html.matches("<strong>").count(), html.matches("</strong>").count());
        prop_assert_eq!(html.matches("<em>").count(), html.matches("</em>").count());
    }
}
