//! # Folio
//!
//! A static generator for a personal portfolio: a home page, a photography
//! gallery with a lightbox, a blog with individual post pages, and a quotes
//! page. Content lives in small JSON files and markdown next to the photos.
//!
//! # Architecture: Controllers Driven at Build Time
//!
//! Each listing page is an explicit state machine ([`page::ListingPage`]): the
//! loaded collection, the active filter, and for the gallery the lightbox.
//! Visitor input is modelled as semantic [`page::Action`]s, and every action
//! answers with the [`page::Update`]s a view would apply.
//!
//! The generator in [`site`] drives those controllers through every state a
//! visitor can reach and writes one static document per state:
//!
//! ```text
//! Content Store   data/*.json, blog/*  →  Vec<Photo | Post | Quote>
//! Page Controller SelectFilter / ActivateItem / Next / Previous / Close
//! Site            one HTML page per filter, per lightbox photo, per post
//! ```
//!
//! Filtering and rendering are pure functions over borrowed items, so unit
//! tests exercise the page logic without touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Content items: `Photo`, `Post`, `Quote` |
//! | [`content`] | Content store: loads collections from a `Source`, resolves single posts |
//! | [`filter`] | Filter engine shared by gallery and blog, radio-style filter bar |
//! | [`render`] | Pure item → markup functions, placeholders and error element |
//! | [`markdown`] | Markdown → HTML with heading ids and tagged code blocks |
//! | [`lightbox`] | `Closed / Open(index)` state machine with wraparound and key bindings |
//! | [`page`] | Page controllers: action dispatch over filter bar, listing and lightbox |
//! | [`site`] | Static site generation, navigation, `check` |
//! | [`catalog`] | Keeps `photos.json` in step with the images directory |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`naming`] | Slugs for generated paths, titles from filenames |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## One Page Per State
//!
//! The gallery filter buttons and the lightbox are plain links. Selecting a
//! filter loads `photography/<key>.html`; opening a photo loads
//! `photography/<key>/<n>.html`, which is the same gallery with the lightbox
//! open. The only script is the keyboard and backdrop handler for lightbox
//! pages, and it follows links the state machine already computed. The site
//! works with scripting disabled.
//!
//! ## Failures Stay on Their Page
//!
//! A collection that fails to load turns into one error message on its own
//! page. The rest of the site still builds, and the failure is reported at
//! the end of the build.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): templates are
//! checked at compile time and all interpolation is escaped.

pub mod catalog;
pub mod config;
pub mod content;
pub mod filter;
pub mod lightbox;
pub mod logging;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod page;
pub mod render;
pub mod site;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
