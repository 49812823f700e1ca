//! CLI output formatting.
//!
//! Each command has a pure `format_*` function returning lines, and a
//! `print_*` wrapper writing them to stdout. Tests exercise the formatters;
//! diagnostics go through `tracing` instead and never show up here.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Collections
//!     gallery: 3 items
//!     blog: 3 items
//!     quotes: FAILED failed to parse data/quotes.json: ...
//!
//! Pages
//!     001 index.html
//!     002 photography.html
//!     ...
//!
//! Post errors
//!     draft-notes: Failed to load post content.
//!
//! Generated 17 pages, copied 4 files
//! ```
//!
//! ## Check
//!
//! ```text
//! Collections
//!     gallery: 3 items
//!     ...
//!
//! Missing images
//!     images/alley.jpg
//!
//! 1 problem found
//! ```
//!
//! ## Catalog
//!
//! ```text
//! 001 alley.jpg
//! 002 new_shot.png (added)
//!
//! Dropped
//!     forest.jpg
//!
//! Catalogue: 2 photos (1 added, 1 kept, 1 dropped)
//! ```

use crate::catalog::Catalog;
use crate::site::{BuildReport, CheckReport, SectionReport};

/// Format a 1-based position as a zero-padded 3-digit string.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn section_line(section: &SectionReport) -> String {
    match &section.error {
        Some(err) => format!("{}{}: FAILED {}", indent(1), section.name, err),
        None => format!("{}{}: {}", indent(1), section.name, plural(section.items, "item")),
    }
}

fn format_sections(sections: &[SectionReport]) -> Vec<String> {
    let mut lines = vec!["Collections".to_string()];
    lines.extend(sections.iter().map(section_line));
    lines
}

/// A titled block of indented entries, or nothing when `entries` is empty.
fn format_list(title: &str, entries: &[String]) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), title.to_string()];
    lines.extend(entries.iter().map(|e| format!("{}{}", indent(1), e)));
    lines
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = format_sections(&report.sections);

    lines.push(String::new());
    lines.push("Pages".to_string());
    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), page));
    }

    let post_errors: Vec<String> = report
        .post_errors
        .iter()
        .map(|(id, message)| format!("{id}: {message}"))
        .collect();
    lines.extend(format_list("Post errors", &post_errors));

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, copied {}",
        plural(report.pages.len(), "page"),
        plural(report.files_copied, "file")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = format_sections(&report.sections);
    lines.extend(format_list("Duplicate post ids", &report.duplicate_ids));
    lines.extend(format_list("Missing post bodies", &report.missing_posts));
    lines.extend(format_list("Missing images", &report.missing_images));

    let problems = report.sections.iter().filter(|s| s.error.is_some()).count()
        + report.duplicate_ids.len()
        + report.missing_posts.len()
        + report.missing_images.len();
    lines.push(String::new());
    if problems == 0 {
        lines.push("No problems found".to_string());
    } else {
        lines.push(format!("{} found", plural(problems, "problem")));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

pub fn format_catalog_output(catalog: &Catalog, dry_run: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, photo) in catalog.photos.iter().enumerate() {
        let marker = if catalog.added.contains(&photo.file) {
            " (added)"
        } else {
            ""
        };
        lines.push(format!("{} {}{}", format_index(i + 1), photo.file, marker));
    }
    lines.extend(format_list("Dropped", &catalog.dropped));

    lines.push(String::new());
    lines.push(format!(
        "{}: {} ({} added, {} kept, {} dropped)",
        if dry_run { "Catalogue (dry run)" } else { "Catalogue" },
        plural(catalog.photos.len(), "photo"),
        catalog.added.len(),
        catalog.kept.len(),
        catalog.dropped.len()
    ));
    lines
}

/// Print catalog output to stdout.
pub fn print_catalog_output(catalog: &Catalog, dry_run: bool) {
    for line in format_catalog_output(catalog, dry_run) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
