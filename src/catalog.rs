//! Photo catalogue maintenance.
//!
//! Keeps `photos.json` in step with the images directory:
//!
//! - Every image file in the directory (not recursive) gets an entry, in
//!   filename order.
//! - Files that already have an entry keep it unchanged. Hand-edited titles,
//!   categories and descriptions survive.
//! - New files get a fresh entry: the id is the file stem, the title is
//!   derived from the stem ([`naming::title_from_stem`]), the category is the
//!   one given on the command line.
//! - Entries whose file is gone are dropped.

use crate::config::SiteConfig;
use crate::naming;
use crate::site::site_path;
use crate::types::Photo;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read images directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("images directory not found: {0}")]
    ImagesNotFound(PathBuf),
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Extensions recognised as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Category given to new entries when none is specified.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Result of reconciling the catalogue with the images directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// The new catalogue, in filename order.
    pub photos: Vec<Photo>,
    /// Files whose existing entry was kept.
    pub kept: Vec<String>,
    /// Files that got a new entry.
    pub added: Vec<String>,
    /// Files whose entry was dropped because the file is gone.
    pub dropped: Vec<String>,
}

/// Reconcile the site's `photos.json` with its images directory, and write
/// the result back unless `dry_run`.
pub fn catalog(
    source_dir: &Path,
    config: &SiteConfig,
    category: &str,
    dry_run: bool,
) -> Result<Catalog, CatalogError> {
    let images_dir = site_path(source_dir, &config.paths.images);
    let photos_path = site_path(source_dir, &config.paths.photos);

    let files = scan_images(&images_dir)?;
    let existing = load_existing(&photos_path)?;
    let result = merge(existing, &files, category);

    if dry_run {
        debug!(path = %photos_path.display(), "dry run, not writing");
    } else {
        if let Some(parent) = photos_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&photos_path, to_json(&result.photos)?)?;
        info!(
            path = %photos_path.display(),
            photos = result.photos.len(),
            "catalogue written"
        );
    }
    Ok(result)
}

/// Image filenames directly inside `dir`, sorted.
pub fn scan_images(dir: &Path) -> Result<Vec<String>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::ImagesNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Existing catalogue entries. A missing file is an empty catalogue.
pub fn load_existing(path: &Path) -> Result<Vec<Photo>, CatalogError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// One entry per file in `files`, reusing existing entries by filename.
pub fn merge(existing: Vec<Photo>, files: &[String], category: &str) -> Catalog {
    let mut by_file: HashMap<String, Photo> = HashMap::new();
    let mut dropped = Vec::new();
    for photo in existing {
        if !files.contains(&photo.file) {
            dropped.push(photo.file);
        } else if !by_file.contains_key(&photo.file) {
            by_file.insert(photo.file.clone(), photo);
        }
    }

    let mut result = Catalog {
        photos: Vec::with_capacity(files.len()),
        kept: Vec::new(),
        added: Vec::new(),
        dropped,
    };
    for file in files {
        match by_file.remove(file) {
            Some(photo) => {
                result.kept.push(file.clone());
                result.photos.push(photo);
            }
            None => {
                result.added.push(file.clone());
                result.photos.push(new_entry(file, category));
            }
        }
    }
    result
}

/// Entry for a newly found image file.
pub fn new_entry(file: &str, category: &str) -> Photo {
    let stem = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    Photo {
        id: Some(stem.clone()),
        file: file.to_string(),
        title: naming::title_from_stem(&stem),
        category: category.to_string(),
        description: None,
    }
}

/// Pretty-printed catalogue, newline-terminated.
pub fn to_json(photos: &[Photo]) -> Result<String, CatalogError> {
    let mut json = serde_json::to_string_pretty(photos)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn photo(file: &str, title: &str) -> Photo {
        Photo {
            id: None,
            file: file.to_string(),
            title: title.to_string(),
            category: "street".to_string(),
            description: Some("hand written".to_string()),
        }
    }

    #[test]
    fn new_entry_derives_fields_from_stem() {
        let p = new_entry("golden_gate-at-dusk.jpg", "travel");
        assert_eq!(p.id.as_deref(), Some("golden_gate-at-dusk"));
        assert_eq!(p.title, "Golden Gate At Dusk");
        assert_eq!(p.category, "travel");
        assert_eq!(p.description, None);
    }

    #[test]
    fn merge_keeps_existing_entries_unchanged() {
        let existing = vec![photo("b.jpg", "My Title")];
        let files = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let result = merge(existing, &files, DEFAULT_CATEGORY);

        assert_eq!(result.photos.len(), 2);
        assert_eq!(result.photos[0].file, "a.jpg");
        assert_eq!(result.photos[0].category, "uncategorized");
        assert_eq!(result.photos[1], photo("b.jpg", "My Title"));
        assert_eq!(result.kept, vec!["b.jpg"]);
        assert_eq!(result.added, vec!["a.jpg"]);
    }

    #[test]
    fn merge_drops_entries_for_missing_files() {
        let existing = vec![photo("gone.jpg", "Gone"), photo("here.jpg", "Here")];
        let result = merge(existing, &["here.jpg".to_string()], DEFAULT_CATEGORY);
        assert_eq!(result.dropped, vec!["gone.jpg"]);
        assert_eq!(result.photos.len(), 1);
    }

    #[test]
    fn merge_keeps_first_duplicate_entry() {
        let existing = vec![photo("a.jpg", "First"), photo("a.jpg", "Second")];
        let result = merge(existing, &["a.jpg".to_string()], DEFAULT_CATEGORY);
        assert_eq!(result.photos.len(), 1);
        assert_eq!(result.photos[0].title, "First");
    }

    #[test]
    fn scan_images_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.JPG", "a.png", "notes.txt", "c.webp", "d.gif"] {
            fs::write(tmp.path().join(name), "x").unwrap();
        }
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/e.jpg"), "x").unwrap();

        let files = scan_images(tmp.path()).unwrap();
        assert_eq!(files, vec!["a.png", "b.JPG", "c.webp", "d.gif"]);
    }

    #[test]
    fn scan_images_missing_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan_images(&tmp.path().join("nope"));
        assert!(matches!(result, Err(CatalogError::ImagesNotFound(_))));
    }

    #[test]
    fn load_existing_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(load_existing(&tmp.path().join("photos.json")).unwrap().is_empty());
    }

    #[test]
    fn load_existing_invalid_json_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photos.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_existing(&path), Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn catalog_writes_merged_file() {
        let src = setup_fixtures();
        fs::write(src.path().join("images/new_shot.png"), "x").unwrap();
        fs::remove_file(src.path().join("images/forest.jpg")).unwrap();
        let config = SiteConfig::default();

        let result = catalog(src.path(), &config, "film", false).unwrap();
        assert_eq!(result.added, vec!["new_shot.png"]);
        assert_eq!(result.dropped, vec!["forest.jpg"]);

        let written = load_existing(&src.path().join("data/photos.json")).unwrap();
        let files: Vec<&str> = written.iter().map(|p| p.file.as_str()).collect();
        assert_eq!(files, vec!["alley.jpg", "bridge.jpg", "new_shot.png"]);
        assert_eq!(written[1].description.as_deref(), Some("Last light over the river."));
        assert_eq!(written[2].category, "film");
        assert_eq!(written[2].title, "New Shot");
    }

    #[test]
    fn catalog_dry_run_leaves_file_alone() {
        let src = setup_fixtures();
        let path = src.path().join("data/photos.json");
        let before = fs::read_to_string(&path).unwrap();
        fs::write(src.path().join("images/extra.jpg"), "x").unwrap();

        let result = catalog(src.path(), &SiteConfig::default(), DEFAULT_CATEGORY, true).unwrap();
        assert_eq!(result.added, vec!["extra.jpg"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn to_json_omits_missing_description() {
        let json = to_json(&[new_entry("a.jpg", "x")]).unwrap();
        assert!(!json.contains("description"));
        assert!(json.contains(r#""id": "a""#));
        assert!(json.ends_with("]\n"));
    }
}
