//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's `config.toml` at the root of the site directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! author = "Your Name"          # Brand in the navbar, suffix of post titles
//! description = "Personal portfolio"
//!
//! [home]
//! greeting = "Hi, I'm"
//! roles = ["Developer", "Photographer"]
//!
//! [[home.interests]]
//! title = "Photography"
//! text = "Street and landscape."
//!
//! [paths]
//! photos = "data/photos.json"
//! posts = "blog/posts.json"
//! posts_dir = "blog/posts"
//! quotes = "data/quotes.json"
//! images = "images"
//! assets = "assets"
//! about = "about.md"
//!
//! [gallery]
//! filters = []                  # Empty = one button per category found
//!
//! [blog]
//! tags = []                     # Empty = one button per tag found
//!
//! [colors.light]
//! background = "#e1e2e7"
//! ...
//!
//! [colors.dark]
//! background = "#1a1b26"
//! ...
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [site]
//! author = "Ada Lovelace"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::filter::ALL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Identity shown across pages.
    pub site: SiteInfo,
    /// Home page hero and interests.
    pub home: HomeConfig,
    /// Where data files live, relative to the site directory.
    pub paths: PathsConfig,
    /// Gallery filter buttons.
    pub gallery: GalleryConfig,
    /// Blog filter buttons.
    pub blog: BlogConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("paths.photos", &self.paths.photos),
            ("paths.posts", &self.paths.posts),
            ("paths.posts_dir", &self.paths.posts_dir),
            ("paths.quotes", &self.paths.quotes),
            ("paths.images", &self.paths.images),
            ("paths.assets", &self.paths.assets),
            ("paths.about", &self.paths.about),
        ];
        for (name, value) in paths {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }
        validate_keys("gallery.filters", &self.gallery.filters)?;
        validate_keys("blog.tags", &self.blog.tags)?;
        Ok(())
    }
}

fn validate_keys(name: &str, keys: &[String]) -> Result<(), ConfigError> {
    for (i, key) in keys.iter().enumerate() {
        if key == ALL {
            return Err(ConfigError::Validation(format!(
                "{name}: \"{ALL}\" is reserved for the show-everything button"
            )));
        }
        if key.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{name}: keys must not be empty")));
        }
        if keys[..i].contains(key) {
            return Err(ConfigError::Validation(format!("{name}: duplicate key {key:?}")));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Shown in the navbar brand and appended to post titles.
    pub author: String,
    /// `<meta name="description">`.
    pub description: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            author: "Your Name".to_string(),
            description: "Personal portfolio".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// Line above the author name in the hero.
    pub greeting: String,
    /// Roles listed under the hero heading.
    pub roles: Vec<String>,
    /// Cards in the interests section.
    pub interests: Vec<Interest>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            greeting: "Hi, I'm".to_string(),
            roles: vec!["Developer".to_string(), "Photographer".to_string()],
            interests: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interest {
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// Data file locations, relative to the site directory, `/`-separated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub photos: String,
    pub posts: String,
    /// Directory holding the markdown bodies named by each post's `file`.
    pub posts_dir: String,
    pub quotes: String,
    /// Photo files; published under `/images/`.
    pub images: String,
    /// Copied verbatim to the output root.
    pub assets: String,
    /// Markdown for the home page about section. Optional on disk.
    pub about: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            photos: "data/photos.json".to_string(),
            posts: "blog/posts.json".to_string(),
            posts_dir: "blog/posts".to_string(),
            quotes: "data/quotes.json".to_string(),
            images: "images".to_string(),
            assets: "assets".to_string(),
            about: "about.md".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Category buttons, in order. Empty means one per category in the data.
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Tag buttons, in order. Empty means one per tag in the data.
    pub tags: Vec<String>,
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Cards, navbar and lightbox panel.
    pub surface: String,
    pub text: String,
    /// Dates, captions, inactive filter buttons.
    pub text_muted: String,
    pub border: String,
    /// Links, active filter button, tags.
    pub accent: String,
    pub accent_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#e1e2e7".to_string(),
            surface: "#d5d6db".to_string(),
            text: "#3760bf".to_string(),
            text_muted: "#848cb5".to_string(),
            border: "#c4c8da".to_string(),
            accent: "#2e7de9".to_string(),
            accent_hover: "#9854f1".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#1a1b26".to_string(),
            surface: "#24283b".to_string(),
            text: "#c0caf5".to_string(),
            text_muted: "#565f89".to_string(),
            border: "#292e42".to_string(),
            accent: "#7aa2f7".to_string(),
            accent_hover: "#bb9af7".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_dark()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the site directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Identity
# ---------------------------------------------------------------------------
[site]
# Navbar brand, and suffix of every post page title ("Post - Your Name").
author = "Your Name"
description = "Personal portfolio"

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[home]
greeting = "Hi, I'm"
# Listed under the hero heading.
roles = ["Developer", "Photographer"]

# One card per interest:
# [[home.interests]]
# title = "Photography"
# text = "Mostly street, some landscapes."

# ---------------------------------------------------------------------------
# Data locations, relative to the site directory
# ---------------------------------------------------------------------------
[paths]
photos = "data/photos.json"
posts = "blog/posts.json"
posts_dir = "blog/posts"
quotes = "data/quotes.json"
images = "images"
assets = "assets"
about = "about.md"

# ---------------------------------------------------------------------------
# Filter buttons. Empty lists derive one button per label in the data,
# in first-seen order. "all" is reserved.
# ---------------------------------------------------------------------------
[gallery]
filters = []

[blog]
tags = []

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#e1e2e7"
surface = "#d5d6db"
text = "#3760bf"
text_muted = "#848cb5"
border = "#c4c8da"
accent = "#2e7de9"
accent_hover = "#9854f1"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#1a1b26"
surface = "#24283b"
text = "#c0caf5"
text_muted = "#565f89"
border = "#292e42"
accent = "#7aa2f7"
accent_hover = "#bb9af7"
"##
}

/// Generate CSS custom properties from color config.
///
/// Dark is the default scheme; light applies under
/// `prefers-color-scheme: light`.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{dark}
}}

@media (prefers-color-scheme: light) {{
    :root {{
{light}
    }}
}}"#,
        dark = scheme_vars(&colors.dark, "    "),
        light = scheme_vars(&colors.light, "        "),
    )
}

fn scheme_vars(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-surface", &scheme.surface),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-accent", &scheme.accent),
        ("--color-accent-hover", &scheme.accent_hover),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_paths() {
        let config = SiteConfig::default();
        assert_eq!(config.paths.photos, "data/photos.json");
        assert_eq!(config.paths.posts, "blog/posts.json");
        assert_eq!(config.paths.posts_dir, "blog/posts");
        assert_eq!(config.paths.quotes, "data/quotes.json");
    }

    #[test]
    fn default_config_has_colors() {
        let config = SiteConfig::default();
        assert_eq!(config.colors.dark.background, "#1a1b26");
        assert_eq!(config.colors.light.background, "#e1e2e7");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[site]
author = "Ada Lovelace"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.author, "Ada Lovelace");
        // Defaults preserved
        assert_eq!(config.site.description, "Personal portfolio");
        assert_eq!(config.paths.photos, "data/photos.json");
    }

    #[test]
    fn parse_interests() {
        let toml = r#"
[[home.interests]]
title = "Vinyl"
text = "Jazz, mostly."

[[home.interests]]
title = "Self-hosting"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.home.interests.len(), 2);
        assert_eq!(config.home.interests[0].title, "Vinyl");
        assert_eq!(config.home.interests[1].text, "");
        assert_eq!(config.home.greeting, "Hi, I'm");
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#101010".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #101010"));
        assert!(css.contains("@media (prefers-color-scheme: light)"));
    }

    #[test]
    fn generate_css_includes_all_variables() {
        let css = generate_color_css(&ColorConfig::default());
        for var in [
            "--color-bg:",
            "--color-surface:",
            "--color-text:",
            "--color-text-muted:",
            "--color-border:",
            "--color-accent:",
            "--color-accent-hover:",
        ] {
            assert_eq!(css.matches(var).count(), 2, "{var}");
        }
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.author, "Your Name");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[gallery]
filters = ["street", "nature"]

[paths]
photos = "photos.json"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.gallery.filters, vec!["street", "nature"]);
        assert_eq!(config.paths.photos, "photos.json");
        assert_eq!(config.paths.quotes, "data/quotes.json");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[blog]
tags = ["rust", "all"]
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[paths]\nphotoz = \"x\"\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[galery]\nfilters = []\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[colors.dark]\nbg = \"#000\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_path() {
        let mut config = SiteConfig::default();
        config.paths.posts_dir = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("paths.posts_dir"));
    }

    #[test]
    fn validate_rejects_reserved_key() {
        let mut config = SiteConfig::default();
        config.gallery.filters = vec!["all".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_keys() {
        let mut config = SiteConfig::default();
        config.blog.tags = vec!["rust".to_string(), "aws".to_string(), "rust".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn validate_keys_are_case_sensitive() {
        let mut config = SiteConfig::default();
        config.gallery.filters = vec!["Street".to_string(), "street".to_string()];
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[paths]
photos = "a.json"
quotes = "b.json"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[paths]\nphotos = \"c.json\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let paths = merged.get("paths").unwrap();
        assert_eq!(paths.get("photos").unwrap().as_str(), Some("c.json"));
        assert_eq!(paths.get("quotes").unwrap().as_str(), Some("b.json"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("roles = [\"a\", \"b\"]").unwrap();
        let overlay: toml::Value = toml::from_str("roles = [\"c\"]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("roles").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let base = stock_defaults_value().unwrap();
        let config = resolve_config(base, None).unwrap();
        assert_eq!(config.paths.images, "images");
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[paths]\nphotos = \"\"\n").unwrap();
        let result = resolve_config(base, Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.author, defaults.site.author);
        assert_eq!(config.home.roles, defaults.home.roles);
        assert_eq!(config.paths.posts_dir, defaults.paths.posts_dir);
        assert_eq!(config.colors.light.accent, defaults.colors.light.accent);
        assert_eq!(config.colors.dark.accent_hover, defaults.colors.dark.accent_hover);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[site]",
            "[home]",
            "[paths]",
            "[gallery]",
            "[blog]",
            "[colors.light]",
            "[colors.dark]",
        ] {
            assert!(content.contains(section), "{section}");
        }
    }
}
