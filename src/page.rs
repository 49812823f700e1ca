//! Page controllers.
//!
//! A [`ListingPage`] is the explicit state of one listing page: the loaded
//! collection, the filter bar, the visible subset and (for the gallery) the
//! lightbox. Input arrives as one [`Action`] per semantic user action, and
//! [`ListingPage::dispatch`] answers with the [`Update`]s the view has to
//! apply. The controller never touches a document itself.
//!
//! [`PostPage`] is the one-shot controller of the single post page.

use crate::config::PathsConfig;
use crate::content::{self, LoadError, Source};
use crate::filter::{self, FilterBar, FilterKey, Filterable};
use crate::lightbox::{Key, Lightbox, Transition};
use crate::render::{self, Listing};
use crate::types::{Photo, Post};
use maud::{Markup, html};
use tracing::{error, warn};

/// Semantic user actions a listing page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A filter button was activated.
    SelectFilter(FilterKey),
    /// The item at this visible position was activated.
    ActivateItem(usize),
    Next,
    Previous,
    Close,
    /// Click on the lightbox backdrop, outside the detail panel.
    Backdrop,
    Key(Key),
}

/// Changes the view has to apply after an action.
#[derive(Debug, Clone)]
pub enum Update {
    /// Replace the item container.
    Content(Markup),
    /// Replace the filter buttons.
    FilterBar(Markup),
    /// Show this detail in the lightbox panel.
    Detail { index: usize, markup: Markup },
    /// Hide the lightbox.
    Hidden,
    /// Lock (`true`) or restore (`false`) page scroll.
    ScrollLock(bool),
    /// Follow a link.
    Navigate(String),
}

type ItemLink<T> = Box<dyn Fn(&FilterKey, usize, &T) -> Option<String>>;
type FilterLink = Box<dyn Fn(&FilterKey) -> String>;
type DetailFn<T> = fn(&T) -> Markup;

/// State of one listing page (gallery, blog or quotes).
pub struct ListingPage<T> {
    items: Vec<T>,
    filters: FilterBar,
    visible: Vec<usize>,
    lightbox: Option<Lightbox>,
    detail: Option<DetailFn<T>>,
    item_link: ItemLink<T>,
    filter_link: FilterLink,
}

impl<T: Listing + Filterable> ListingPage<T> {
    /// A page showing `items`, with one filter button per key.
    pub fn new(items: Vec<T>, keys: Vec<String>) -> Self {
        let visible = (0..items.len()).collect();
        Self {
            items,
            filters: FilterBar::new(keys),
            visible,
            lightbox: None,
            detail: None,
            item_link: Box::new(|_, _, _| None),
            filter_link: Box::new(|key| format!("#{key}")),
        }
    }

    /// Enable the lightbox; `detail` renders the panel for one item.
    pub fn with_lightbox(mut self, detail: DetailFn<T>) -> Self {
        self.lightbox = Some(Lightbox::default());
        self.detail = Some(detail);
        self
    }

    /// Links carried by item fragments, given the active filter and the
    /// item's visible position.
    pub fn with_item_links(
        mut self,
        link: impl Fn(&FilterKey, usize, &T) -> Option<String> + 'static,
    ) -> Self {
        self.item_link = Box::new(link);
        self
    }

    pub fn with_filter_links(mut self, link: impl Fn(&FilterKey) -> String + 'static) -> Self {
        self.filter_link = Box::new(link);
        self
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Update> {
        match action {
            Action::SelectFilter(key) => self.on_select_filter(key),
            Action::ActivateItem(position) => self.on_activate(position),
            Action::Next => self.on_lightbox(|lb, len| lb.next(len)),
            Action::Previous => self.on_lightbox(|lb, len| lb.previous(len)),
            Action::Close | Action::Backdrop => self.on_lightbox(|lb, _| lb.close()),
            Action::Key(key) => self.on_lightbox(|lb, len| lb.key(key, len)),
        }
    }

    fn on_select_filter(&mut self, key: FilterKey) -> Vec<Update> {
        let mut updates = self.on_lightbox(|lb, _| lb.close());
        self.filters.select(key);
        self.visible = filter::visible_positions(&self.items, self.filters.active());
        updates.push(Update::FilterBar(self.render_filter_bar()));
        updates.push(Update::Content(self.render_content()));
        updates
    }

    fn on_activate(&mut self, position: usize) -> Vec<Update> {
        if self.lightbox.is_some() {
            return self.on_lightbox(|lb, len| lb.open(position, len));
        }
        let Some(&index) = self.visible.get(position) else {
            return vec![];
        };
        (self.item_link)(self.filters.active(), position, &self.items[index])
            .map(Update::Navigate)
            .into_iter()
            .collect()
    }

    fn on_lightbox(
        &mut self,
        step: impl FnOnce(&mut Lightbox, usize) -> Option<Transition>,
    ) -> Vec<Update> {
        let len = self.visible.len();
        let Some(lightbox) = self.lightbox.as_mut() else {
            return vec![];
        };
        match step(lightbox, len) {
            Some(Transition::Opened(i)) => {
                let mut updates = self.detail_update(i);
                updates.push(Update::ScrollLock(true));
                updates
            }
            Some(Transition::Moved(i)) => self.detail_update(i),
            Some(Transition::Closed) => vec![Update::Hidden, Update::ScrollLock(false)],
            None => vec![],
        }
    }

    fn detail_update(&self, position: usize) -> Vec<Update> {
        match (self.detail, self.visible.get(position)) {
            (Some(detail), Some(&index)) => vec![Update::Detail {
                index: position,
                markup: detail(&self.items[index]),
            }],
            _ => vec![],
        }
    }

    /// Markup of the item container for the current filter.
    pub fn render_content(&self) -> Markup {
        let active = self.filters.active();
        let visible = self.visible_items();
        render::render_listing(&visible, |position, item| {
            (self.item_link)(active, position, item)
        })
    }

    pub fn render_filter_bar(&self) -> Markup {
        render::render_filter_bar(&self.filters, |key| (self.filter_link)(key))
    }

    pub fn visible_items(&self) -> Vec<&T> {
        self.visible.iter().map(|&i| &self.items[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filters(&self) -> &FilterBar {
        &self.filters
    }

    pub fn active_filter(&self) -> &FilterKey {
        self.filters.active()
    }

    /// Lightbox state; `None` on pages without one.
    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }
}

/// Gallery controller: photos filtered by category, with a lightbox.
pub fn gallery(photos: Vec<Photo>, keys: Vec<String>) -> ListingPage<Photo> {
    ListingPage::new(photos, keys).with_lightbox(render::render_lightbox_detail)
}

/// Blog listing controller: posts filtered by tag, items link to their post.
pub fn blog(posts: Vec<Post>, keys: Vec<String>) -> ListingPage<Post> {
    ListingPage::new(posts, keys)
}

/// Keys for the filter bar: the configured list, or the labels found in the
/// data when none are configured.
pub fn resolve_keys<T: Filterable>(configured: &[String], items: &[T]) -> Vec<String> {
    if configured.is_empty() {
        filter::filter_keys(items)
    } else {
        configured.to_vec()
    }
}

/// Turn a failed collection load into the page's single error element.
pub fn load_failure<T: Listing>(what: &str, err: &LoadError) -> Markup {
    error!(page = what, error = %err, "failed to load collection");
    render::render_error(T::LOAD_FAILED)
}

/// What the single post page shows.
pub struct PostPage {
    /// `<title>` text.
    pub title: String,
    /// Heading block, present whenever the post metadata was found.
    pub header: Option<Markup>,
    /// Body markup or the error element.
    pub content: Markup,
    /// The message shown instead of a body, if any.
    pub error: Option<&'static str>,
}

impl PostPage {
    /// Resolve the post for `id` and render it. Never fails: every error
    /// becomes its message in the content area.
    pub fn load(source: &dyn Source, paths: &PathsConfig, id: Option<&str>, author: &str) -> Self {
        match content::load_post(source, paths, id) {
            Ok(view) => PostPage {
                title: page_title(&view.post.title, author),
                header: Some(render::render_post_header(&view.post)),
                content: render::render_post_body(&view.markdown),
                error: None,
            },
            Err(err) => {
                warn!(id = ?id, error = %err, "post page falls back to message");
                let header = err.post().map(render::render_post_header);
                let title = err
                    .post()
                    .map(|p| page_title(&p.title, author))
                    .unwrap_or_else(|| page_title("Blog", author));
                PostPage {
                    title,
                    header,
                    content: render::render_error(err.message()),
                    error: Some(err.message()),
                }
            }
        }
    }

    /// Content area as a standalone fragment.
    pub fn fragment(&self) -> Markup {
        html! {
            @if let Some(header) = &self.header {
                (header)
            }
            div #post-content.post-content {
                (self.content)
            }
        }
    }
}

/// `<title>` text: "`title` - `author`".
pub fn page_title(title: &str, author: &str) -> String {
    if author.is_empty() {
        title.to_string()
    } else {
        format!("{title} - {author}")
    }
}
