use std::sync::Arc;

use shared::{
    domain::{FilterCatalog, FilterKind, RecommendationView, UserId},
    protocol::{ChatRequest, ClickRequest},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

pub mod config;
pub mod filters;
pub mod gateway;
pub mod persona;

pub use filters::FilterSelectionModel;
pub use gateway::{ChatOutcome, FailureKind, GatewayError, HttpGateway, RecommendationGateway};
pub use persona::{Generation, PersonaState};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    CatalogLoaded(FilterCatalog),
    PersonaChanged(String),
    QueryStarted { query: String },
    RecommendationUpdated(RecommendationView),
    TelemetryFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryLifecycle {
    #[default]
    Idle,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Blank query; nothing was sent.
    Skipped,
    Resolved,
    Failed(String),
    /// A newer query was submitted before this one resolved; its view was discarded.
    Superseded,
}

/// Result of a filter toggle. `telemetry` is set only when a category was added.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub selected: bool,
    pub telemetry: Option<JoinHandle<()>>,
}

/// Result of a tool-card click. `telemetry` is unset when the tool is not
/// part of the current recommendation; nothing changes in that case.
#[derive(Debug)]
pub struct ToolClickOutcome {
    pub expanded_tool: Option<String>,
    pub telemetry: Option<JoinHandle<()>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub catalog: FilterCatalog,
    pub selected_categories: Vec<String>,
    pub selected_pricing: Vec<String>,
    pub persona: Option<String>,
    pub persona_generation: Generation,
    pub query: QueryLifecycle,
    pub view: Option<RecommendationView>,
    pub expanded_tool: Option<String>,
}

#[derive(Default)]
struct SessionState {
    catalog: FilterCatalog,
    filters: FilterSelectionModel,
    persona: PersonaState,
    issued_generation: Generation,
    query: QueryLifecycle,
    latest_query_seq: u64,
    view: Option<RecommendationView>,
    expanded_tool: Option<String>,
}

impl SessionState {
    fn issue_generation(&mut self) -> Generation {
        self.issued_generation += 1;
        self.issued_generation
    }
}

/// Owns the session state and reconciles gateway responses into it.
///
/// The state lock is never held across a gateway call, so operations
/// interleave only at their network awaits. Persona updates are tagged with
/// the generation issued when their action started and pass through
/// [`PersonaState::apply_persona_update`]; query results are applied only if
/// they belong to the most recently submitted query.
pub struct InteractionOrchestrator {
    gateway: Arc<dyn RecommendationGateway>,
    user_id: UserId,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl InteractionOrchestrator {
    pub fn new(gateway: Arc<dyn RecommendationGateway>, user_id: UserId) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            gateway,
            user_id,
            inner: Mutex::new(SessionState::default()),
            events,
        })
    }

    pub fn from_settings(settings: &config::Settings) -> anyhow::Result<Arc<Self>> {
        let gateway = HttpGateway::from_settings(settings)?;
        Ok(Self::new(Arc::new(gateway), settings.user_id.clone()))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let guard = self.inner.lock().await;
        SessionSnapshot {
            catalog: guard.catalog.clone(),
            selected_categories: guard.filters.categories(),
            selected_pricing: guard.filters.pricing(),
            persona: guard.persona.label().map(str::to_string),
            persona_generation: guard.persona.generation(),
            query: guard.query,
            view: guard.view.clone(),
            expanded_tool: guard.expanded_tool.clone(),
        }
    }

    /// Loads the filter catalog and the initial persona concurrently.
    /// Either may fail without affecting the other.
    pub async fn bootstrap(&self) {
        let persona_generation = self.inner.lock().await.issue_generation();
        futures::join!(
            self.load_catalog(),
            self.load_initial_persona(persona_generation)
        );
    }

    async fn load_catalog(&self) {
        match self.gateway.fetch_filters().await {
            Ok(catalog) => {
                info!(
                    categories = catalog.categories.len(),
                    pricing = catalog.pricing.len(),
                    "session: filter catalog loaded"
                );
                self.inner.lock().await.catalog = catalog.clone();
                let _ = self.events.send(SessionEvent::CatalogLoaded(catalog));
            }
            Err(err) => warn!("session: failed to load filter catalog: {err}"),
        }
    }

    async fn load_initial_persona(&self, generation: Generation) {
        match self.gateway.fetch_persona(&self.user_id).await {
            Ok(persona) => {
                info!(persona = %persona, "session: initial persona fetched");
                let mut guard = self.inner.lock().await;
                self.apply_persona(&mut guard, persona, generation);
            }
            Err(err) => warn!("session: failed to fetch persona: {err}"),
        }
    }

    /// Flips a filter value. Adding a category also reports the click to the
    /// service in a background task; the returned handle may be awaited or dropped.
    pub async fn toggle_filter(self: &Arc<Self>, kind: FilterKind, value: &str) -> ToggleOutcome {
        let (selected, generation) = {
            let mut guard = self.inner.lock().await;
            let selected = guard.filters.toggle(kind, value);
            let generation =
                (selected && kind == FilterKind::Category).then(|| guard.issue_generation());
            (selected, generation)
        };
        debug!(?kind, value, selected, "session: filter toggled");

        let telemetry = generation.map(|generation| {
            self.spawn_click(
                ClickRequest::category(self.user_id.clone(), value),
                generation,
            )
        });

        ToggleOutcome {
            selected,
            telemetry,
        }
    }

    /// Expands the named tool card, or collapses it if it is already expanded.
    /// Both directions are reported to the service. Only tools listed in the
    /// current recommendation can be clicked.
    pub async fn click_tool(self: &Arc<Self>, tool_name: &str) -> ToolClickOutcome {
        let (expanded_tool, generation) = {
            let mut guard = self.inner.lock().await;
            let listed = guard
                .view
                .as_ref()
                .is_some_and(|view| view.tool(tool_name).is_some());
            if !listed {
                debug!(tool_name, "session: ignoring click on unlisted tool");
                return ToolClickOutcome {
                    expanded_tool: guard.expanded_tool.clone(),
                    telemetry: None,
                };
            }
            guard.expanded_tool = if guard.expanded_tool.as_deref() == Some(tool_name) {
                None
            } else {
                Some(tool_name.to_string())
            };
            (guard.expanded_tool.clone(), guard.issue_generation())
        };

        let telemetry = self.spawn_click(
            ClickRequest::tool(self.user_id.clone(), tool_name),
            generation,
        );

        ToolClickOutcome {
            expanded_tool,
            telemetry: Some(telemetry),
        }
    }

    fn spawn_click(self: &Arc<Self>, request: ClickRequest, generation: Generation) -> JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            client.report_click(request, generation).await;
        })
    }

    async fn report_click(&self, request: ClickRequest, generation: Generation) {
        match self.gateway.record_click(request).await {
            Ok(persona) => {
                let mut guard = self.inner.lock().await;
                self.apply_persona(&mut guard, persona, generation);
            }
            Err(err) => {
                warn!(generation, "session: click telemetry failed: {err}");
                let _ = self
                    .events
                    .send(SessionEvent::TelemetryFailed(err.to_string()));
            }
        }
    }

    /// Sends `query` with the current filter selection and applies the result.
    pub async fn submit_query(&self, query: &str) -> QueryOutcome {
        if query.trim().is_empty() {
            return QueryOutcome::Skipped;
        }

        let (request, query_seq, generation) = {
            let mut guard = self.inner.lock().await;
            guard.latest_query_seq += 1;
            guard.query = QueryLifecycle::Pending;
            guard.view = None;
            guard.expanded_tool = None;
            let request = ChatRequest {
                query: query.to_string(),
                categories: guard.filters.categories(),
                pricing: guard.filters.pricing(),
                user_id: self.user_id.clone(),
            };
            (request, guard.latest_query_seq, guard.issue_generation())
        };
        info!(query_seq, generation, "session: query submitted");
        let _ = self.events.send(SessionEvent::QueryStarted {
            query: query.to_string(),
        });

        let result = self.gateway.chat(request).await;

        let mut guard = self.inner.lock().await;
        let is_latest = query_seq == guard.latest_query_seq;

        let (view, outcome) = match result {
            Ok(ChatOutcome {
                view,
                updated_persona,
            }) => {
                if let Some(persona) = updated_persona {
                    self.apply_persona(&mut guard, persona, generation);
                }
                (view, QueryOutcome::Resolved)
            }
            Err(err) => {
                warn!(query_seq, "session: query failed: {err}");
                (
                    RecommendationView::query_failed(),
                    QueryOutcome::Failed(err.to_string()),
                )
            }
        };

        if !is_latest {
            debug!(
                query_seq,
                latest_query_seq = guard.latest_query_seq,
                "session: discarding superseded query result"
            );
            return QueryOutcome::Superseded;
        }

        guard.query = QueryLifecycle::Idle;
        guard.view = Some(view.clone());
        let _ = self.events.send(SessionEvent::RecommendationUpdated(view));
        outcome
    }

    fn apply_persona(&self, state: &mut SessionState, persona: String, generation: Generation) {
        if state.persona.apply_persona_update(persona.clone(), generation) {
            info!(persona = %persona, generation, "session: persona updated");
            let _ = self.events.send(SessionEvent::PersonaChanged(persona));
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
