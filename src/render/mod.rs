//! HTML fragments for the recommendation widget
//!
//! Everything here is pure: a [`LoadState`] goes in, markup comes out. Card
//! controls carry `data-action` / `data-isbn` attributes instead of inline
//! handlers; the loader maps them back to the callbacks it was given.
use crate::models::LoadState;

pub mod cards;
pub mod colors;

pub use colors::{category_gradient, DEFAULT_GRADIENT};

/// Presentation knobs for a populated render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Animation delay added per card, in milliseconds
    pub stagger_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { stagger_ms: 50 }
    }
}

/// Escapes `& < > " '` for embedding in element content or quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the markup for `state`
pub fn render_state(state: &LoadState, options: &RenderOptions) -> String {
    match state {
        LoadState::Loading => cards::render_loading(),
        LoadState::Populated(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| cards::render_card(item, index, options))
            .collect(),
        LoadState::Empty => cards::render_notice("⭐", crate::models::load_state::EMPTY_MESSAGE),
        LoadState::Error(message) => cards::render_notice("⚠️", message),
    }
}
