//! Render targets for the recommendation widget
use std::sync::Arc;

pub mod memory;

pub use memory::{ContainerSet, MemoryContainer};

/// A container whose markup the loader owns
pub trait ViewContainer: Send + Sync {
    /// Replaces the container's entire content
    fn replace_html(&self, html: String);
}

/// Looks containers up by id; a missing id means "not on this page"
pub trait ContainerRegistry: Send + Sync {
    fn resolve(&self, id: &str) -> Option<Arc<dyn ViewContainer>>;
}
