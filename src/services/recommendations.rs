use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::{
    error::{AppError, AppResult},
    models::{ActionOutcome, BookAction, LoadState, LoadStateKind},
    render::{render_state, RenderOptions},
    services::{
        providers::{BookActions, RecommendationProvider},
        recent_items::RecencyTracker,
    },
    view::{ContainerRegistry, ViewContainer},
};

/// Hook invoked after a card action ran, typically to reload the widget
pub type RefreshHook = Arc<dyn Fn() + Send + Sync>;

/// Callbacks behind the Issue/Reserve controls of rendered cards
#[derive(Clone)]
pub struct CardActions {
    actions: Arc<dyn BookActions>,
    refresh: Option<RefreshHook>,
}

impl CardActions {
    pub fn new(actions: Arc<dyn BookActions>) -> Self {
        Self {
            actions,
            refresh: None,
        }
    }

    pub fn with_refresh(mut self, refresh: RefreshHook) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Runs `action` for `isbn`, then the refresh hook whatever the outcome
    pub async fn trigger(&self, action: BookAction, isbn: &str) -> AppResult<ActionOutcome> {
        let result = match action {
            BookAction::Issue => self.actions.issue_book(isbn).await,
            BookAction::Reserve => self.actions.reserve_book(isbn).await,
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, action = %action, isbn = %isbn, "Book action failed");
        }

        if let Some(refresh) = &self.refresh {
            refresh();
        }

        result
    }
}

/// Per-call options for [`RecommendationLoader::load`]
#[derive(Clone, Default)]
pub struct LoadOptions {
    pub render: RenderOptions,
    /// Callbacks for the rendered card controls; cards stay inert without them
    pub actions: Option<CardActions>,
}

/// How a single load invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub generation: u64,
    pub state: LoadStateKind,
    /// False when a newer load (or the container's removal) superseded this one
    pub applied: bool,
}

/// Proof that a container entered `Loading` for a given generation
#[derive(Debug)]
pub struct LoadTicket {
    target_id: String,
    generation: u64,
}

impl LoadTicket {
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Default)]
struct ContainerView {
    generation: u64,
    wiring: Option<Wiring>,
}

/// Callbacks and card inventory of a container's current populated render
struct Wiring {
    actions: CardActions,
    cards: Vec<(String, bool)>,
}

/// Fetches personalized recommendations and renders them into containers
///
/// Each container moves through `Loading -> {Populated | Empty | Error}` per
/// load. Starting a load bumps the container's generation; a response is only
/// rendered if its generation is still the latest, so a slow response can
/// never overwrite the result of a newer load.
pub struct RecommendationLoader {
    provider: Arc<dyn RecommendationProvider>,
    tracker: RecencyTracker,
    containers: Arc<dyn ContainerRegistry>,
    views: Mutex<HashMap<String, ContainerView>>,
}

impl RecommendationLoader {
    pub fn new(
        provider: Arc<dyn RecommendationProvider>,
        tracker: RecencyTracker,
        containers: Arc<dyn ContainerRegistry>,
    ) -> Self {
        Self {
            provider,
            tracker,
            containers,
            views: Mutex::new(HashMap::new()),
        }
    }

    /// Loads and renders recommendations into `target_id`
    ///
    /// Returns `None` when the container does not exist. Failures are rendered
    /// as the error state, never returned.
    pub async fn load(&self, target_id: &str, options: &LoadOptions) -> Option<LoadOutcome> {
        let ticket = self.begin(target_id)?;
        Some(self.complete(ticket, options).await)
    }

    /// Fire-and-forget variant of [`load`](Self::load)
    ///
    /// The loading state is already rendered when this returns; the fetch and
    /// final render run on a spawned task.
    pub fn spawn_load(
        self: &Arc<Self>,
        target_id: &str,
        options: LoadOptions,
    ) -> Option<JoinHandle<LoadOutcome>> {
        let ticket = self.begin(target_id)?;
        let loader = Arc::clone(self);
        Some(tokio::spawn(async move {
            loader.complete(ticket, &options).await
        }))
    }

    /// Renders the loading state and claims a new generation for `target_id`
    pub fn begin(&self, target_id: &str) -> Option<LoadTicket> {
        let Some(container) = self.containers.resolve(target_id) else {
            tracing::debug!(target_id = %target_id, "Recommendation container not present, skipping load");
            return None;
        };

        let mut views = self.lock_views();
        let view = views.entry(target_id.to_string()).or_default();
        view.generation += 1;
        view.wiring = None;
        container.replace_html(render_state(&LoadState::Loading, &RenderOptions::default()));

        Some(LoadTicket {
            target_id: target_id.to_string(),
            generation: view.generation,
        })
    }

    /// Fetches recommendations for `ticket` and renders them if still current
    pub async fn complete(&self, ticket: LoadTicket, options: &LoadOptions) -> LoadOutcome {
        let recent = self.tracker.get_recent_items().await;

        let state = match self.provider.personalized(&recent).await {
            Ok(response) => LoadState::from_response(response),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    target_id = %ticket.target_id,
                    provider = self.provider.name(),
                    "Failed to load recommendations"
                );
                LoadState::failed()
            }
        };

        self.apply(&ticket, state, options)
    }

    /// Dispatches a card control of `target_id` to the callbacks it was rendered with
    pub async fn trigger(
        &self,
        target_id: &str,
        action: BookAction,
        isbn: &str,
    ) -> AppResult<ActionOutcome> {
        let actions = {
            let views = self.lock_views();
            let wiring = views
                .get(target_id)
                .and_then(|view| view.wiring.as_ref())
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "No actionable recommendations rendered in '{}'",
                        target_id
                    ))
                })?;

            let (_, in_stock) = wiring
                .cards
                .iter()
                .find(|(card_isbn, _)| card_isbn == isbn)
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "ISBN {} is not among the rendered recommendations",
                        isbn
                    ))
                })?;

            if action == BookAction::Issue && !in_stock {
                return Err(AppError::InvalidInput(format!("ISBN {} is out of stock", isbn)));
            }

            wiring.actions.clone()
        };

        actions.trigger(action, isbn).await
    }

    /// Latest generation started for `target_id` (0 if never loaded)
    pub fn generation(&self, target_id: &str) -> u64 {
        self.lock_views()
            .get(target_id)
            .map_or(0, |view| view.generation)
    }

    fn apply(&self, ticket: &LoadTicket, state: LoadState, options: &LoadOptions) -> LoadOutcome {
        let outcome = LoadOutcome {
            generation: ticket.generation,
            state: state.kind(),
            applied: false,
        };

        let mut views = self.lock_views();
        let Some(view) = views.get_mut(&ticket.target_id) else {
            return outcome;
        };

        if view.generation != ticket.generation {
            tracing::debug!(
                target_id = %ticket.target_id,
                generation = ticket.generation,
                current = view.generation,
                "Discarding stale recommendations response"
            );
            return outcome;
        }

        let Some(container) = self.containers.resolve(&ticket.target_id) else {
            tracing::debug!(
                target_id = %ticket.target_id,
                "Recommendation container removed before response arrived"
            );
            return outcome;
        };

        container.replace_html(render_state(&state, &options.render));

        view.wiring = match (&state, &options.actions) {
            (LoadState::Populated(items), Some(actions)) => Some(Wiring {
                actions: actions.clone(),
                cards: items
                    .iter()
                    .map(|item| (item.isbn.clone(), item.in_stock()))
                    .collect(),
            }),
            _ => None,
        };

        tracing::info!(
            target_id = %ticket.target_id,
            generation = ticket.generation,
            state = %outcome.state,
            "Recommendations rendered"
        );

        LoadOutcome {
            applied: true,
            ..outcome
        }
    }

    fn lock_views(&self) -> MutexGuard<'_, HashMap<String, ContainerView>> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
