//! Content store: loads the photo, post and quote collections.
//!
//! Every page starts by loading one collection from a [`Source`]. The store
//! hands back a plain `Vec` that the page controller owns for the rest of the
//! page build; nothing mutates it afterwards.
//!
//! ## Ordering
//!
//! - Photos and quotes keep their file order.
//! - Posts are sorted newest first by parsed date ([`sort_posts`]). The sort
//!   is stable, so posts sharing a date keep their file order. Posts whose
//!   date does not parse go after every dated post.
//!
//! ## Failure
//!
//! A missing or unreadable file is a [`LoadError::Fetch`]; malformed JSON is a
//! [`LoadError::Parse`]. Page controllers turn these into a single on-page
//! message, they never propagate them further.

use crate::config::PathsConfig;
use crate::types::{Photo, Post, Quote};
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a single post could not be shown.
#[derive(Error, Debug)]
pub enum PostError {
    #[error("no post id given")]
    MissingParameter,
    #[error("no post with id {0:?}")]
    NotFound(String),
    #[error("post metadata unavailable: {0}")]
    Metadata(#[source] LoadError),
    #[error("body of post {:?} unavailable: {source}", .post.id)]
    Body {
        post: Box<Post>,
        #[source]
        source: LoadError,
    },
}

impl PostError {
    /// The text shown in place of the post content.
    pub fn message(&self) -> &'static str {
        match self {
            PostError::MissingParameter => "No post ID specified.",
            PostError::NotFound(_) | PostError::Metadata(_) => "Post not found.",
            PostError::Body { .. } => "Failed to load post content.",
        }
    }

    /// Metadata of the post, when the lookup itself succeeded.
    pub fn post(&self) -> Option<&Post> {
        match self {
            PostError::Body { post, .. } => Some(post),
            _ => None,
        }
    }
}

/// Where data files are read from.
///
/// Paths are relative and use `/` separators, the same way the published site
/// addresses them.
pub trait Source {
    fn fetch(&self, path: &str) -> std::io::Result<String>;
}

/// Reads data files from a site directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for DirSource {
    /// Paths stay under the site directory: `..` segments and absolute
    /// components are rejected as `InvalidInput`.
    fn fetch(&self, path: &str) -> std::io::Result<String> {
        let mut full = self.root.clone();
        for part in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            let mut components = Path::new(part).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(name)), None) => full.push(name),
                _ => {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("path escapes the site directory: {path}"),
                    ));
                }
            }
        }
        fs::read_to_string(full)
    }
}

/// Fetch a JSON array and deserialize it.
pub fn load<T: DeserializeOwned>(source: &dyn Source, path: &str) -> Result<Vec<T>, LoadError> {
    let text = source.fetch(path).map_err(|e| LoadError::Fetch {
        path: path.to_string(),
        source: e,
    })?;
    let items: Vec<T> = serde_json::from_str(&text).map_err(|e| LoadError::Parse {
        path: path.to_string(),
        source: e,
    })?;
    debug!(path, count = items.len(), "loaded collection");
    Ok(items)
}

pub fn load_photos(source: &dyn Source, paths: &PathsConfig) -> Result<Vec<Photo>, LoadError> {
    load(source, &paths.photos)
}

pub fn load_quotes(source: &dyn Source, paths: &PathsConfig) -> Result<Vec<Quote>, LoadError> {
    load(source, &paths.quotes)
}

/// Load post metadata, newest first.
pub fn load_posts(source: &dyn Source, paths: &PathsConfig) -> Result<Vec<Post>, LoadError> {
    let mut posts: Vec<Post> = load(source, &paths.posts)?;
    for post in posts.iter().filter(|p| p.published().is_none()) {
        warn!(id = %post.id, date = %post.date, "post date does not parse, sorting it last");
    }
    sort_posts(&mut posts);
    Ok(posts)
}

/// Stable sort, newest first. Undated posts go last.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (a.published(), b.published()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// A post ready to display: metadata plus its raw markdown body.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub markdown: String,
}

/// Look up a post by id and fetch its body.
///
/// `id` mirrors the optional `id` query parameter: `None` or an empty string
/// is a missing parameter, which is distinct from an id that matches nothing.
/// Ids are matched exactly, whitespace included.
pub fn load_post(
    source: &dyn Source,
    paths: &PathsConfig,
    id: Option<&str>,
) -> Result<PostView, PostError> {
    let id = id
        .filter(|s| !s.is_empty())
        .ok_or(PostError::MissingParameter)?;

    let posts = load(source, &paths.posts).map_err(PostError::Metadata)?;
    let post = find_post(&posts, id)
        .cloned()
        .ok_or_else(|| PostError::NotFound(id.to_string()))?;

    let body_path = format!("{}/{}", paths.posts_dir.trim_end_matches('/'), post.file);
    match source.fetch(&body_path) {
        Ok(markdown) => Ok(PostView { post, markdown }),
        Err(e) => Err(PostError::Body {
            post: Box::new(post),
            source: LoadError::Fetch {
                path: body_path,
                source: e,
            },
        }),
    }
}

/// First post with a matching id.
pub fn find_post<'a>(posts: &'a [Post], id: &str) -> Option<&'a Post> {
    posts.iter().find(|p| p.id == id)
}
