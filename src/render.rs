//! Renderer: items to markup.
//!
//! Every function here is pure. It takes items (and the links the caller
//! wants them to point at) and returns [`Markup`]. Placing that markup in a
//! page is the caller's job. All interpolated text is escaped by maud.
//!
//! The per-page differences of gallery, blog and quotes live in the
//! [`Listing`] impls: the fragment each item renders to, and the messages
//! shown for an empty result or a failed load.

use crate::filter::{FilterBar, FilterKey};
use crate::markdown;
use crate::types::{Photo, Post, Quote};
use maud::{Markup, PreEscaped, html};

/// URL prefix the site serves photo files from.
pub const IMAGES_URL: &str = "/images";

/// An item type that can be rendered as a list of fragments.
pub trait Listing {
    /// Placeholder text when no item is visible.
    const EMPTY_MESSAGE: &'static str;
    /// Class of the placeholder paragraph.
    const EMPTY_CLASS: &'static str;
    /// Message shown when the collection could not be loaded.
    const LOAD_FAILED: &'static str;

    /// Markup for the item at `position` in the visible list.
    fn fragment(&self, position: usize, href: Option<&str>) -> Markup;
}

impl Listing for Photo {
    const EMPTY_MESSAGE: &'static str = "No photos found.";
    const EMPTY_CLASS: &'static str = "no-photos";
    const LOAD_FAILED: &'static str = "Failed to load photos. Please try again later.";

    fn fragment(&self, position: usize, href: Option<&str>) -> Markup {
        let inner = html! {
            img src=(image_url(&self.file)) alt=(self.title) loading="lazy";
            div.gallery-overlay {
                h3 { (self.title) }
                p { (self.category) }
            }
        };
        html! {
            @if let Some(href) = href {
                a.gallery-item href=(href) data-category=(self.category) data-index=(position) {
                    (inner)
                }
            } @else {
                div.gallery-item data-category=(self.category) data-index=(position) {
                    (inner)
                }
            }
        }
    }
}

impl Listing for Post {
    const EMPTY_MESSAGE: &'static str = "No posts found.";
    const EMPTY_CLASS: &'static str = "no-posts";
    const LOAD_FAILED: &'static str = "Failed to load blog posts. Please try again later.";

    fn fragment(&self, position: usize, href: Option<&str>) -> Markup {
        html! {
            article.post-card data-tags=(self.tags.join(" ")) data-index=(position) {
                div.post-card-content {
                    time.post-card-date datetime=(self.date) { (self.display_date()) }
                    h2.post-card-title {
                        a href=[href] { (self.title) }
                    }
                    p.post-card-excerpt { (self.excerpt) }
                    (render_tags(&self.tags, "post-card-tags"))
                    @if let Some(href) = href {
                        a.read-more href=(href) {
                            "Read more"
                            (PreEscaped(READ_MORE_ARROW))
                        }
                    }
                }
            }
        }
    }
}

impl Listing for Quote {
    const EMPTY_MESSAGE: &'static str = "No quotes found.";
    const EMPTY_CLASS: &'static str = "no-posts";
    const LOAD_FAILED: &'static str = "Failed to load quotes. Please try again later.";

    fn fragment(&self, position: usize, _href: Option<&str>) -> Markup {
        html! {
            article.quote-card data-index=(position) {
                div.quote-card-content {
                    blockquote.quote-text { "\u{201c}" (self.text) "\u{201d}" }
                    div.quote-attribution {
                        p.quote-author { "\u{2014} " (self.author) }
                        @if !self.source.is_empty() {
                            p.quote-source { (self.source) }
                        }
                    }
                }
            }
        }
    }
}

const READ_MORE_ARROW: &str = r#"<svg width="16" height="16" viewBox="0 0 16 16" fill="none"><path d="M6 12L10 8L6 4" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>"#;

/// `/images/<file>`.
pub fn image_url(file: &str) -> String {
    format!("{}/{}", IMAGES_URL, file.trim_start_matches('/'))
}

/// One fragment per visible item, or the empty placeholder.
///
/// `href` maps an item's visible position to the link it should carry.
pub fn render_listing<T: Listing>(
    items: &[&T],
    href: impl Fn(usize, &T) -> Option<String>,
) -> Markup {
    if items.is_empty() {
        return render_empty::<T>();
    }
    html! {
        @for (position, item) in items.iter().enumerate() {
            (item.fragment(position, href(position, item).as_deref()))
        }
    }
}

pub fn render_empty<T: Listing>() -> Markup {
    html! { p class=(T::EMPTY_CLASS) { (T::EMPTY_MESSAGE) } }
}

/// The single element that replaces a content area on failure.
pub fn render_error(message: &str) -> Markup {
    html! { p.error { (message) } }
}

/// Filter buttons. The active key carries the `active` class.
pub fn render_filter_bar(bar: &FilterBar, href: impl Fn(&FilterKey) -> String) -> Markup {
    html! {
        div.filter-buttons {
            @for key in bar.keys() {
                a.filter-btn.active[bar.is_active(key)] href=(href(key)) data-filter=(key.as_str()) {
                    (filter_label(key))
                }
            }
        }
    }
}

/// Button label: "All" for the sentinel, the key itself otherwise.
pub fn filter_label(key: &FilterKey) -> &str {
    match key {
        FilterKey::All => "All",
        FilterKey::Only(k) => k,
    }
}

pub fn render_tags(tags: &[String], class: &str) -> Markup {
    html! {
        div class=(class) {
            @for tag in tags {
                span.tag { (tag) }
            }
        }
    }
}

/// Photo detail shown inside the lightbox panel.
pub fn render_lightbox_detail(photo: &Photo) -> Markup {
    html! {
        img src=(image_url(&photo.file)) alt=(photo.title);
        div.lightbox-info {
            h3 { (photo.title) }
            p { (photo.caption()) }
        }
    }
}

/// Post heading block: title, date and tags.
pub fn render_post_header(post: &Post) -> Markup {
    html! {
        header.post-header {
            h1 #post-heading { (post.title) }
            time #post-date datetime=(post.date) { (post.display_date()) }
            div #post-tags {
                @for tag in &post.tags {
                    span.tag { (tag) }
                }
            }
        }
    }
}

/// Post body converted from markdown, with code blocks tagged.
pub fn render_post_body(markdown_text: &str) -> Markup {
    PreEscaped(markdown::render_tagged(markdown_text))
}
