//! HTML site generation.
//!
//! Reads a site source directory and writes the static site. Every page is
//! produced by driving its controller from [`crate::page`] through the states a
//! visitor can reach, and writing one document per state:
//!
//! - **Home** (`/index.html`): hero, about section from `about.md`, interests
//! - **Gallery** (`/photography.html`, `/photography/<key>.html`): one page per
//!   filter button
//! - **Lightbox** (`/photography/<all|key>/<n>.html`): the gallery with the
//!   lightbox open on visible photo `n` (1-based)
//! - **Blog** (`/blog.html`, `/blog/<tag>.html`): one page per tag button
//! - **Posts** (`/post/<id>.html`): one page per post, plus `/post/index.html`
//!   for the missing-id case
//! - **Quotes** (`/quotes.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── photography.html
//! ├── photography/
//! │   ├── street.html
//! │   ├── all/1.html ...
//! │   └── street/1.html ...
//! ├── blog.html
//! ├── blog/rust.html
//! ├── post/hello-world.html
//! ├── post/index.html
//! ├── quotes.html
//! ├── images/                    # Copied from the images directory
//! └── robots.txt ...             # Copied from the assets directory
//! ```
//!
//! ## CSS and JavaScript
//!
//! Embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/lightbox.js`: Escape / arrow keys and backdrop clicks on
//!   lightbox pages. It follows the `data-close`, `data-prev` and `data-next`
//!   links computed here.
//!
//! ## Failures
//!
//! A collection that fails to load does not stop the build: its page gets a
//! single error element and no items, and the failure is recorded in the
//! [`BuildReport`]. Only I/O errors on the output side abort.

use crate::config::{self, SiteConfig};
use crate::content::{self, DirSource, LoadError, Source};
use crate::filter::{ALL, FilterKey};
use crate::markdown;
use crate::naming;
use crate::page::{self, Action, ListingPage, PostPage, Update};
use crate::types::{Photo, Post, Quote};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const LIGHTBOX_JS: &str = include_str!("../static/lightbox.js");

/// Slug of the missing-id post page, `post/index.html`.
const MISSING_POST_SLUG: &str = "index";

/// Outcome of loading one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub name: &'static str,
    /// Items loaded; zero when the load failed.
    pub items: usize,
    pub error: Option<String>,
}

impl SectionReport {
    fn loaded(name: &'static str, items: usize) -> Self {
        Self {
            name,
            items,
            error: None,
        }
    }

    fn failed(name: &'static str, err: &LoadError) -> Self {
        Self {
            name,
            items: 0,
            error: Some(err.to_string()),
        }
    }
}

/// What a build wrote.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Output-relative paths, in write order.
    pub pages: Vec<String>,
    pub sections: Vec<SectionReport>,
    /// Post pages that show an error message instead of a body, with that
    /// message.
    pub post_errors: Vec<(String, String)>,
    /// Files copied from the images and assets directories.
    pub files_copied: usize,
}

impl BuildReport {
    pub fn failures(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections.iter().filter(|s| s.error.is_some())
    }
}

/// Build the site from `source_dir` into `output_dir`.
pub fn build(
    source_dir: &Path,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<BuildReport, BuildError> {
    fs::create_dir_all(output_dir)?;

    let color_css = config::generate_color_css(&config.colors);
    let mut site = Generator {
        config,
        source: DirSource::new(source_dir),
        output_dir,
        css: format!("{}\n\n{}", color_css, CSS_STATIC),
        report: BuildReport::default(),
    };

    site.copy_files()?;
    site.build_home()?;
    site.build_gallery()?;
    site.build_blog()?;
    site.build_quotes()?;

    info!(
        pages = site.report.pages.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(site.report)
}

/// Resolve a `/`-separated site path under `root`.
pub fn site_path(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Filter page paths
// ============================================================================

/// Maps filter keys to path segments for one listing section.
#[derive(Debug, Clone)]
struct FilterPaths {
    section: &'static str,
    slugs: HashMap<String, String>,
}

impl FilterPaths {
    fn new(section: &'static str, keys: &[String]) -> Self {
        let labels = std::iter::once(ALL).chain(keys.iter().map(String::as_str));
        Self {
            section,
            slugs: naming::unique_slugs(labels).into_iter().collect(),
        }
    }

    fn slug(&self, key: &FilterKey) -> String {
        self.slugs
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| naming::slugify(key.as_str()))
    }

    /// `photography.html` for all, `photography/<key>.html` otherwise.
    fn listing_path(&self, key: &FilterKey) -> String {
        match key {
            FilterKey::All => format!("{}.html", self.section),
            FilterKey::Only(_) => format!("{}/{}.html", self.section, self.slug(key)),
        }
    }

    /// `photography/<all|key>/<n>.html`, `n` 1-based.
    fn item_path(&self, key: &FilterKey, position: usize) -> String {
        format!("{}/{}/{}.html", self.section, self.slug(key), position + 1)
    }

    fn listing_url(&self, key: &FilterKey) -> String {
        format!("/{}", self.listing_path(key))
    }

    fn item_url(&self, key: &FilterKey, position: usize) -> String {
        format!("/{}", self.item_path(key, position))
    }
}

/// Page state as seen by a visitor, built up from controller updates.
#[derive(Debug, Default)]
struct View {
    filter_bar: Option<Markup>,
    content: Option<Markup>,
    detail: Option<(usize, Markup)>,
    scroll_locked: bool,
}

impl View {
    fn apply(&mut self, updates: Vec<Update>) {
        for update in updates {
            match update {
                Update::Content(markup) => self.content = Some(markup),
                Update::FilterBar(markup) => self.filter_bar = Some(markup),
                Update::Detail { index, markup } => self.detail = Some((index, markup)),
                Update::Hidden => self.detail = None,
                Update::ScrollLock(locked) => self.scroll_locked = locked,
                Update::Navigate(url) => debug!(%url, "navigation served by link"),
            }
        }
    }
}

/// Targets of the lightbox controls on one lightbox page.
struct LightboxLinks {
    previous: Option<String>,
    next: Option<String>,
    close: String,
}

// ============================================================================
// Generator
// ============================================================================

struct Generator<'a> {
    config: &'a SiteConfig,
    source: DirSource,
    output_dir: &'a Path,
    css: String,
    report: BuildReport,
}

impl Generator<'_> {
    fn write(&mut self, relative: &str, markup: Markup) -> Result<(), BuildError> {
        let path = site_path(self.output_dir, relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, markup.into_string())
            .map_err(|source| BuildError::Write { path, source })?;
        debug!(page = relative, "wrote page");
        self.report.pages.push(relative.to_string());
        Ok(())
    }

    fn copy_files(&mut self) -> Result<(), BuildError> {
        let root = self.source.root();
        let images = site_path(root, &self.config.paths.images);
        let assets = site_path(root, &self.config.paths.assets);

        if images.is_dir() {
            let count = copy_dir_recursive(&images, &self.output_dir.join("images"))?;
            info!(count, "copied images");
            self.report.files_copied += count;
        } else {
            debug!(path = %images.display(), "no images directory");
        }
        if assets.is_dir() {
            let count = copy_dir_recursive(&assets, self.output_dir)?;
            info!(count, "copied assets");
            self.report.files_copied += count;
        } else {
            debug!(path = %assets.display(), "no assets directory");
        }
        Ok(())
    }

    fn title(&self, section: &str) -> String {
        page::page_title(section, &self.config.site.author)
    }

    fn document(
        &self,
        title: &str,
        current: NavSection,
        body_class: Option<&str>,
        main: Markup,
        overlay: Option<Markup>,
    ) -> Markup {
        let content = html! {
            (render_nav(&self.config.site.author, current))
            main { (main) }
            footer.site-footer {
                p { "\u{a9} " (self.config.site.author) }
            }
            @if let Some(overlay) = overlay {
                (overlay)
            }
        };
        base_document(
            title,
            &self.config.site.description,
            &self.css,
            body_class,
            content,
        )
    }

    // ------------------------------------------------------------------------
    // Home
    // ------------------------------------------------------------------------

    fn build_home(&mut self) -> Result<(), BuildError> {
        let about = match self.source.fetch(&self.config.paths.about) {
            Ok(text) => Some(PreEscaped(markdown::render(&text))),
            Err(e) => {
                debug!(path = %self.config.paths.about, error = %e, "no about text");
                None
            }
        };
        let home = &self.config.home;
        let main = html! {
            section.hero #home {
                p.hero-greeting { (home.greeting) }
                h1.hero-title { (self.config.site.author) }
                ul.hero-roles {
                    @for role in &home.roles {
                        li { (role) }
                    }
                }
            }
            section.section #about {
                h2.section-title { "About" }
                div.about-content {
                    @if let Some(about) = about {
                        (about)
                    }
                }
            }
            section.section #interests {
                h2.section-title { "Interests" }
                div.interests-grid {
                    @for interest in &home.interests {
                        div.interest-card {
                            h3 { (interest.title) }
                            p { (interest.text) }
                        }
                    }
                }
            }
        };
        let doc = self.document(&self.config.site.author, NavSection::Home, None, main, None);
        self.write("index.html", doc)
    }

    // ------------------------------------------------------------------------
    // Gallery
    // ------------------------------------------------------------------------

    fn build_gallery(&mut self) -> Result<(), BuildError> {
        let photos = match content::load_photos(&self.source, &self.config.paths) {
            Ok(photos) => photos,
            Err(err) => {
                let view = View {
                    content: Some(page::load_failure::<Photo>("gallery", &err)),
                    ..View::default()
                };
                self.report.sections.push(SectionReport::failed("gallery", &err));
                let doc = self.gallery_document(&view, None);
                return self.write("photography.html", doc);
            }
        };
        self.report
            .sections
            .push(SectionReport::loaded("gallery", photos.len()));

        let keys = page::resolve_keys(&self.config.gallery.filters, &photos);
        let paths = FilterPaths::new("photography", &keys);
        let mut gallery = page::gallery(photos, keys)
            .with_filter_links({
                let paths = paths.clone();
                move |key| paths.listing_url(key)
            })
            .with_item_links({
                let paths = paths.clone();
                move |key, position, _| Some(paths.item_url(key, position))
            });

        let mut view = View::default();
        for key in gallery.filters().keys().to_vec() {
            view.apply(gallery.dispatch(Action::SelectFilter(key.clone())));
            let doc = self.gallery_document(&view, None);
            self.write(&paths.listing_path(&key), doc)?;

            let len = gallery.visible_len();
            for position in 0..len {
                view.apply(gallery.dispatch(Action::ActivateItem(position)));
                let lightbox = gallery.lightbox().copied().unwrap_or_default();
                let links = LightboxLinks {
                    previous: lightbox
                        .peek_previous(len)
                        .map(|i| paths.item_url(&key, i)),
                    next: lightbox.peek_next(len).map(|i| paths.item_url(&key, i)),
                    close: paths.listing_url(&key),
                };
                let doc = self.gallery_document(&view, Some(&links));
                self.write(&paths.item_path(&key, position), doc)?;
                view.apply(gallery.dispatch(Action::Close));
            }
            debug!(filter = %key, photos = len, "gallery view generated");
        }
        info!(photos = gallery.items().len(), "gallery generated");
        Ok(())
    }

    fn gallery_document(&self, view: &View, lightbox: Option<&LightboxLinks>) -> Markup {
        let main = html! {
            section.gallery-page {
                (page_header("Photography", "Moments captured through my lens"))
                @if let Some(bar) = &view.filter_bar {
                    (bar)
                }
                div.gallery-grid {
                    @if let Some(content) = &view.content {
                        (content)
                    }
                }
            }
        };
        let overlay = match (lightbox, &view.detail) {
            (Some(links), Some((_, detail))) => Some(render_lightbox(links, detail)),
            _ => None,
        };
        self.document(
            &self.title("Photography"),
            NavSection::Photography,
            view.scroll_locked.then_some("lightbox-open"),
            main,
            overlay,
        )
    }

    // ------------------------------------------------------------------------
    // Blog and posts
    // ------------------------------------------------------------------------

    fn build_blog(&mut self) -> Result<(), BuildError> {
        let posts = match content::load_posts(&self.source, &self.config.paths) {
            Ok(posts) => posts,
            Err(err) => {
                let view = View {
                    content: Some(page::load_failure::<Post>("blog", &err)),
                    ..View::default()
                };
                self.report.sections.push(SectionReport::failed("blog", &err));
                let doc = self.blog_document(&view);
                self.write("blog.html", doc)?;
                return self.build_post_pages(&[]);
            }
        };
        self.report
            .sections
            .push(SectionReport::loaded("blog", posts.len()));

        let post_paths = post_paths(&posts);
        let keys = page::resolve_keys(&self.config.blog.tags, &posts);
        let paths = FilterPaths::new("blog", &keys);
        let mut blog = page::blog(posts, keys)
            .with_filter_links({
                let paths = paths.clone();
                move |key| paths.listing_url(key)
            })
            .with_item_links({
                let post_paths = post_paths.clone();
                move |_, _, post| post_paths.get(&post.id).map(|p| format!("/{p}"))
            });

        let mut view = View::default();
        for key in blog.filters().keys().to_vec() {
            view.apply(blog.dispatch(Action::SelectFilter(key.clone())));
            let doc = self.blog_document(&view);
            self.write(&paths.listing_path(&key), doc)?;
        }
        info!(posts = blog.items().len(), "blog generated");

        let ids: Vec<(String, String)> = unique_ids(blog.items())
            .into_iter()
            .filter_map(|id| post_paths.get(&id).map(|p| (id, p.clone())))
            .collect();
        self.build_post_pages(&ids)
    }

    fn blog_document(&self, view: &View) -> Markup {
        let main = html! {
            section.blog-page {
                (page_header("Blog", "Thoughts on technology, photography, and life"))
                @if let Some(bar) = &view.filter_bar {
                    (bar)
                }
                div.posts-grid {
                    @if let Some(content) = &view.content {
                        (content)
                    }
                }
            }
        };
        self.document(&self.title("Blog"), NavSection::Blog, None, main, None)
    }

    /// One page per `(id, path)`, plus the missing-id page.
    fn build_post_pages(&mut self, posts: &[(String, String)]) -> Result<(), BuildError> {
        for (id, path) in posts {
            let post = PostPage::load(
                &self.source,
                &self.config.paths,
                Some(id.as_str()),
                &self.config.site.author,
            );
            if let Some(message) = post.error {
                self.report
                    .post_errors
                    .push((id.clone(), message.to_string()));
            }
            let doc = self.post_document(&post);
            self.write(path, doc)?;
        }

        let missing = PostPage::load(
            &self.source,
            &self.config.paths,
            None,
            &self.config.site.author,
        );
        let doc = self.post_document(&missing);
        self.write(&format!("post/{MISSING_POST_SLUG}.html"), doc)?;
        info!(posts = posts.len(), "post pages generated");
        Ok(())
    }

    fn post_document(&self, post: &PostPage) -> Markup {
        let main = html! {
            article.post-page {
                a.back-link href="/blog.html" { "\u{2190} Back to Blog" }
                (post.fragment())
            }
        };
        self.document(&post.title, NavSection::Blog, None, main, None)
    }

    // ------------------------------------------------------------------------
    // Quotes
    // ------------------------------------------------------------------------

    fn build_quotes(&mut self) -> Result<(), BuildError> {
        let content = match content::load_quotes(&self.source, &self.config.paths) {
            Ok(quotes) => {
                self.report
                    .sections
                    .push(SectionReport::loaded("quotes", quotes.len()));
                let page: ListingPage<Quote> = ListingPage::new(quotes, Vec::new());
                page.render_content()
            }
            Err(err) => {
                self.report.sections.push(SectionReport::failed("quotes", &err));
                page::load_failure::<Quote>("quotes", &err)
            }
        };
        let main = html! {
            section.quotes-page {
                (page_header("Quotes", "Words worth keeping"))
                div.quotes-grid { (content) }
            }
        };
        let doc = self.document(&self.title("Quotes"), NavSection::Quotes, None, main, None);
        self.write("quotes.html", doc)
    }
}

/// Post ids in collection order, first occurrence only.
fn unique_ids(posts: &[Post]) -> Vec<String> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .filter(|p| seen.insert(p.id.as_str()))
        .map(|p| p.id.clone())
        .collect()
}

/// `post/<slug>.html` for every distinct post id. `index` belongs to the
/// missing-id page.
fn post_paths(posts: &[Post]) -> HashMap<String, String> {
    naming::unique_slugs_reserving(&[MISSING_POST_SLUG], posts.iter().map(|p| p.id.as_str()))
        .into_iter()
        .map(|(id, slug)| (id, format!("post/{slug}.html")))
        .collect()
}

// ============================================================================
// HTML Components
// ============================================================================

/// Top-level pages, for marking the active navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    Home,
    Photography,
    Blog,
    Quotes,
}

const NAV_LINKS: [(&str, &str, Option<NavSection>); 6] = [
    ("Home", "/index.html", Some(NavSection::Home)),
    ("About", "/index.html#about", None),
    ("Interests", "/index.html#interests", None),
    ("Photography", "/photography.html", Some(NavSection::Photography)),
    ("Blog", "/blog.html", Some(NavSection::Blog)),
    ("Quotes", "/quotes.html", Some(NavSection::Quotes)),
];

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    description: &str,
    css: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(description);
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the navigation bar. The menu collapses behind a hamburger toggle
/// on narrow screens.
pub fn render_nav(author: &str, current: NavSection) -> Markup {
    html! {
        nav.navbar {
            div.nav-container {
                a.nav-brand href="/index.html" { "[ " (author) " ]" }
                input.nav-toggle type="checkbox" id="nav-toggle";
                label.nav-hamburger for="nav-toggle" {
                    span.hamburger-line {}
                    span.hamburger-line {}
                    span.hamburger-line {}
                }
                ul.nav-menu {
                    @for (label, href, section) in NAV_LINKS {
                        li {
                            a.nav-link.active[section == Some(current)] href=(href) { (label) }
                        }
                    }
                }
            }
        }
    }
}

fn page_header(title: &str, subtitle: &str) -> Markup {
    html! {
        header.page-header {
            h1 { (title) }
            p { (subtitle) }
        }
    }
}

fn render_lightbox(links: &LightboxLinks, detail: &Markup) -> Markup {
    html! {
        div #lightbox.lightbox.active
            data-prev=[links.previous.as_deref()]
            data-next=[links.next.as_deref()]
            data-close=(links.close)
        {
            a.lightbox-close href=(links.close) aria-label="Close" { "\u{d7}" }
            @if let Some(previous) = &links.previous {
                a.lightbox-prev href=(previous) aria-label="Previous" { "\u{2039}" }
            }
            @if let Some(next) = &links.next {
                a.lightbox-next href=(next) aria-label="Next" { "\u{203a}" }
            }
            div.lightbox-content {
                (detail)
            }
        }
        script { (PreEscaped(LIGHTBOX_JS)) }
    }
}

// ============================================================================
// Check
// ============================================================================

/// Consistency report over the site's data files. Nothing is written.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub sections: Vec<SectionReport>,
    /// Post ids listed more than once. The first entry wins on lookup.
    pub duplicate_ids: Vec<String>,
    /// Markdown files named by posts that do not exist.
    pub missing_posts: Vec<String>,
    /// Image files named by photos that do not exist.
    pub missing_images: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.sections.iter().all(|s| s.error.is_none())
            && self.duplicate_ids.is_empty()
            && self.missing_posts.is_empty()
            && self.missing_images.is_empty()
    }
}

/// Load every collection and report problems that a build would hide.
pub fn check(source_dir: &Path, config: &SiteConfig) -> CheckReport {
    let source = DirSource::new(source_dir);
    let paths = &config.paths;
    let mut report = CheckReport::default();

    match content::load_photos(&source, paths) {
        Ok(photos) => {
            let images = site_path(source_dir, &paths.images);
            report.missing_images = photos
                .iter()
                .filter(|p| !site_path(&images, &p.file).is_file())
                .map(|p| format!("{}/{}", paths.images.trim_end_matches('/'), p.file))
                .collect();
            report
                .sections
                .push(SectionReport::loaded("gallery", photos.len()));
        }
        Err(err) => report.sections.push(SectionReport::failed("gallery", &err)),
    }

    match content::load_posts(&source, paths) {
        Ok(posts) => {
            let mut seen = HashSet::new();
            for post in &posts {
                if !seen.insert(post.id.as_str()) && !report.duplicate_ids.contains(&post.id) {
                    report.duplicate_ids.push(post.id.clone());
                }
            }
            let posts_dir = site_path(source_dir, &paths.posts_dir);
            report.missing_posts = posts
                .iter()
                .filter(|p| !site_path(&posts_dir, &p.file).is_file())
                .map(|p| format!("{}/{}", paths.posts_dir.trim_end_matches('/'), p.file))
                .collect();
            report
                .sections
                .push(SectionReport::loaded("blog", posts.len()));
        }
        Err(err) => report.sections.push(SectionReport::failed("blog", &err)),
    }

    match content::load_quotes(&source, paths) {
        Ok(quotes) => report
            .sections
            .push(SectionReport::loaded("quotes", quotes.len())),
        Err(err) => report.sections.push(SectionReport::failed("quotes", &err)),
    }

    report
}

// ============================================================================
// Tests
// ============================================================================
