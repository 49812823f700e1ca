//! Filename conventions.
//!
//! Two directions are covered here:
//!
//! - **Labels to paths**: filter keys and post ids come from user data and
//!   may contain spaces, slashes or case differences. [`slugify`] turns them
//!   into a safe single path segment for the generated pages
//!   (`Street Photography` → `street-photography`).
//! - **Paths to titles**: the catalogue derives a display title from an image
//!   file stem (`golden_gate-at-dusk.jpg` → "Golden Gate At Dusk").

/// Lowercase, keep ASCII alphanumerics, collapse everything else into `-`.
///
/// Returns `"untitled"` when nothing usable remains, so the result is always a
/// valid path segment.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Assign a distinct slug to every label, suffixing collisions with `-2`, `-3`.
///
/// Labels differing only in case or punctuation (`Rust`, `rust!`) would
/// otherwise map to the same page.
pub fn unique_slugs<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<(String, String)> {
    unique_slugs_reserving(&[], labels)
}

/// [`unique_slugs`], with `reserved` slugs already taken by fixed pages.
pub fn unique_slugs_reserving<'a>(
    reserved: &[&str],
    labels: impl IntoIterator<Item = &'a str>,
) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for label in labels {
        if out.iter().any(|(l, _)| l == label) {
            continue;
        }
        let base = slugify(label);
        let mut slug = base.clone();
        let mut n = 2;
        while reserved.contains(&slug.as_str()) || out.iter().any(|(_, s)| *s == slug) {
            slug = format!("{base}-{n}");
            n += 1;
        }
        out.push((label.to_string(), slug));
    }
    out
}

/// Display title from a file stem: dashes and underscores become spaces and
/// each word is capitalised.
///
/// - `"golden_gate-at-dusk"` → "Golden Gate At Dusk"
/// - `"IMG_0042"` → "IMG 0042"
pub fn title_from_stem(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
