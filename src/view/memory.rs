use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{ContainerRegistry, ViewContainer};

/// Container that keeps its markup in memory
#[derive(Default)]
pub struct MemoryContainer {
    html: Mutex<String>,
    renders: Mutex<usize>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> String {
        self.html.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of times the content was replaced
    pub fn render_count(&self) -> usize {
        *self.renders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ViewContainer for MemoryContainer {
    fn replace_html(&self, html: String) {
        *self.html.lock().unwrap_or_else(PoisonError::into_inner) = html;
        *self.renders.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }
}

/// Registry of in-memory containers keyed by id
#[derive(Default)]
pub struct ContainerSet {
    containers: Mutex<HashMap<String, Arc<MemoryContainer>>>,
}

impl ContainerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty container under `id`, replacing any existing one
    pub fn register(&self, id: impl Into<String>) -> Arc<MemoryContainer> {
        let container = Arc::new(MemoryContainer::new());
        self.lock().insert(id.into(), container.clone());
        container
    }

    pub fn remove(&self, id: &str) -> Option<Arc<MemoryContainer>> {
        self.lock().remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<MemoryContainer>> {
        self.lock().get(id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<MemoryContainer>>> {
        self.containers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContainerRegistry for ContainerSet {
    fn resolve(&self, id: &str) -> Option<Arc<dyn ViewContainer>> {
        self.get(id).map(|c| c as Arc<dyn ViewContainer>)
    }
}
