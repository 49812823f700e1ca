//! Markdown to HTML for post bodies and the home page "about" section.
//!
//! Conversion uses `pulldown-cmark` with a fixed configuration:
//!
//! - **Line breaks are significant**: a single newline inside a paragraph
//!   becomes `<br />`.
//! - **GitHub-flavoured syntax**: tables, strikethrough, task lists and GFM
//!   blockquote tags.
//! - **Heading ids**: every heading without an explicit `{#id}` gets one
//!   derived from its text (`## Getting Started` → `getting-started`).
//!   Repeated slugs get `-1`, `-2`, ... suffixes, skipping any id already
//!   in use.
//! - **No e-mail obfuscation**: addresses are emitted as written.
//!
//! [`tag_code_blocks`] is a separate pass over the produced HTML that marks
//! code blocks for styling.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use std::collections::{HashMap, HashSet};

/// Class added to every `<pre><code>` element.
pub const CODE_BLOCK_CLASS: &str = "code-block";

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Convert markdown to HTML. Code blocks are not tagged; see
/// [`render_tagged`].
pub fn render(markdown: &str) -> String {
    let mut events: Vec<Event> = Parser::new_ext(markdown, options())
        .map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        })
        .collect();
    assign_heading_ids(&mut events);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// [`render`] followed by [`tag_code_blocks`].
pub fn render_tagged(markdown: &str) -> String {
    tag_code_blocks(&render(markdown))
}

/// Add [`CODE_BLOCK_CLASS`] to each `<pre><code>` element.
pub fn tag_code_blocks(html: &str) -> String {
    const OPEN: &str = "<pre><code";
    let mut out = String::with_capacity(html.len() + 64);
    let mut rest = html;
    while let Some(pos) = rest.find(OPEN) {
        let (before, after) = rest.split_at(pos + OPEN.len());
        out.push_str(before);
        if let Some(stripped) = after.strip_prefix(" class=\"") {
            out.push_str(" class=\"");
            out.push_str(CODE_BLOCK_CLASS);
            out.push(' ');
            rest = stripped;
        } else {
            out.push_str(" class=\"");
            out.push_str(CODE_BLOCK_CLASS);
            out.push('"');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

fn assign_heading_ids(events: &mut [Event]) {
    let mut slugger = Slugger::default();
    let mut i = 0;
    while i < events.len() {
        let needs_id = matches!(&events[i], Event::Start(Tag::Heading { id: None, .. }));
        if needs_id {
            let mut text = String::new();
            let mut j = i + 1;
            while j < events.len() && !matches!(events[j], Event::End(TagEnd::Heading(_))) {
                if let Event::Text(t) | Event::Code(t) = &events[j] {
                    text.push_str(t);
                }
                j += 1;
            }
            let slug = slugger.slug(&text);
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(slug));
            }
            i = j;
        }
        i += 1;
    }
}

/// Heading slugs, unique within one document.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
    used: HashSet<String>,
}

impl Slugger {
    /// A suffixed slug never reuses one already handed out, including slugs
    /// that came straight from heading text (`Notes 1`).
    pub fn slug(&mut self, text: &str) -> String {
        let base = heading_slug(text);
        let count = self.counts.entry(base.clone()).or_insert(0);
        let mut candidate = base.clone();
        while self.used.contains(&candidate) {
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Lowercase, drop punctuation, collapse whitespace runs into `-`.
pub fn heading_slug(text: &str) -> String {
    let cleaned: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_basic_markdown() {
        let html = render("This is **bold** and *italic*.");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn single_newline_is_line_break() {
        let html = render("first line\nsecond line");
        assert!(html.contains("first line<br />"));
    }

    #[test]
    fn headings_get_ids() {
        let html = render("# Hello World\n\n## Getting Started!");
        assert!(html.contains(r#"<h1 id="hello-world">"#));
        assert!(html.contains(r#"<h2 id="getting-started">"#));
    }

    #[test]
    fn duplicate_headings_get_suffixes() {
        let html = render("## Notes\n\n## Notes\n\n## Notes");
        assert!(html.contains(r#"id="notes""#));
        assert!(html.contains(r#"id="notes-1""#));
        assert!(html.contains(r#"id="notes-2""#));
    }

    #[test]
    fn suffixed_slug_skips_ids_taken_by_heading_text() {
        let html = render("## Notes\n\n## Notes\n\n## Notes 1");
        assert_eq!(html.matches(r#"id="notes-1""#).count(), 1);
        assert!(html.contains(r#"id="notes-1-1""#));
    }

    #[test]
    fn slugger_never_repeats() {
        let mut slugger = Slugger::default();
        let slugs: Vec<String> = ["a 1", "a", "a", "a"].iter().map(|t| slugger.slug(t)).collect();
        assert_eq!(slugs, vec!["a-1", "a", "a-2", "a-3"]);
    }

    #[test]
    fn explicit_heading_id_is_kept() {
        let html = render("## Setup {#install}");
        assert!(html.contains(r#"id="install""#));
    }

    #[test]
    fn heading_id_includes_inline_code() {
        let html = render("## Using `cargo` today");
        assert!(html.contains(r#"id="using-cargo-today""#));
    }

    #[test]
    fn tables_and_strikethrough_enabled() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn task_lists_enabled() {
        let html = render("- [x] done\n- [ ] todo");
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn email_is_not_obfuscated() {
        let html = render("<me@example.com>");
        assert!(html.contains("mailto:me@example.com"));
    }

    #[test]
    fn tag_code_blocks_without_language() {
        let html = render_tagged("```\nlet x = 1;\n```");
        assert!(html.contains(r#"<pre><code class="code-block">"#));
    }

    #[test]
    fn tag_code_blocks_keeps_language_class() {
        let html = render_tagged("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"<pre><code class="code-block language-rust">"#));
    }

    #[test]
    fn tag_code_blocks_leaves_inline_code_alone() {
        let html = render_tagged("use `cargo`");
        assert!(html.contains("<code>cargo</code>"));
        assert!(!html.contains(CODE_BLOCK_CLASS));
    }

    #[test]
    fn tag_code_blocks_tags_every_block() {
        let html = render_tagged("```\na\n```\n\ntext\n\n```sh\nb\n```");
        assert_eq!(html.matches(CODE_BLOCK_CLASS).count(), 2);
    }

    #[test]
    fn heading_slug_strips_punctuation() {
        assert_eq!(heading_slug("  What's New?  "), "whats-new");
        assert_eq!(heading_slug("A  B\tC"), "a-b-c");
    }
}
