//! Lightbox state machine.
//!
//! ```text
//!            open(i)                 next / previous
//!   Closed ───────────▶ Open(i) ◀──────────────────┐
//!     ▲                   │  └────────────────────┘
//!     └──── close ────────┘
//! ```
//!
//! The machine does not own the collection; every transition takes its
//! length. Navigation wraps modulo that length. An empty collection can
//! never be opened, and every transition that is invalid in the current
//! state is a no-op returning `None`.

/// Keys the lightbox responds to. Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lightbox {
    #[default]
    Closed,
    Open {
        index: usize,
    },
}

/// What a successful transition asks the view to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Show item `index` and lock page scroll.
    Opened(usize),
    /// Show item `index`; scroll stays locked.
    Moved(usize),
    /// Hide the overlay and restore page scroll.
    Closed,
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        matches!(self, Lightbox::Open { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match *self {
            Lightbox::Open { index } => Some(index),
            Lightbox::Closed => None,
        }
    }

    /// Open at `index`, from any state. No-op unless `index < len`.
    pub fn open(&mut self, index: usize, len: usize) -> Option<Transition> {
        if index >= len {
            return None;
        }
        *self = Lightbox::Open { index };
        Some(Transition::Opened(index))
    }

    pub fn next(&mut self, len: usize) -> Option<Transition> {
        let index = self.peek_next(len)?;
        *self = Lightbox::Open { index };
        Some(Transition::Moved(index))
    }

    pub fn previous(&mut self, len: usize) -> Option<Transition> {
        let index = self.peek_previous(len)?;
        *self = Lightbox::Open { index };
        Some(Transition::Moved(index))
    }

    pub fn close(&mut self) -> Option<Transition> {
        if !self.is_open() {
            return None;
        }
        *self = Lightbox::Closed;
        Some(Transition::Closed)
    }

    /// Keyboard bindings; inert while closed.
    pub fn key(&mut self, key: Key, len: usize) -> Option<Transition> {
        if !self.is_open() {
            return None;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.previous(len),
            Key::ArrowRight => self.next(len),
            Key::Other => None,
        }
    }

    /// Index `next` would move to, without moving.
    pub fn peek_next(&self, len: usize) -> Option<usize> {
        match *self {
            Lightbox::Open { index } if len > 0 => Some((index + 1) % len),
            _ => None,
        }
    }

    /// Index `previous` would move to, without moving.
    pub fn peek_previous(&self, len: usize) -> Option<usize> {
        match *self {
            Lightbox::Open { index } if len > 0 => Some((index + len - 1) % len),
            _ => None,
        }
    }
}
