use std::sync::Arc;

use anyhow::Result;
use curricuforge_client::{CurriculumClient, CurriculumRequest};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::form::CurriculumForm;
use crate::template::template_curriculum;
use crate::view::ViewState;

/// Where curriculum text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Ask the generation service.
    Remote,
    /// Use the built-in template without touching the network.
    Offline,
}

/// Drives the form submit flow and owns the current view.
#[derive(Debug)]
pub struct CurriculumService {
    client: Arc<CurriculumClient>,
    mode: GenerationMode,
    view: RwLock<ViewState>,
}

impl CurriculumService {
    pub fn new(client: CurriculumClient, mode: GenerationMode) -> Self {
        Self {
            client: Arc::new(client),
            mode,
            view: RwLock::new(ViewState::default()),
        }
    }

    pub fn client(&self) -> Arc<CurriculumClient> {
        self.client.clone()
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub async fn view(&self) -> ViewState {
        self.view.read().await.clone()
    }

    /// Validates the form, requests a curriculum and moves the view to its final state.
    ///
    /// Invalid forms never reach the network. Request failures end in an
    /// error view reading `Error: <reason>`.
    #[instrument(name = "curricuforge_core.submit", skip(self, form))]
    pub async fn submit(&self, form: &CurriculumForm) -> ViewState {
        let request = match form.validate() {
            Ok(request) => request,
            Err(error) => {
                debug!(target: "curricuforge_core", error = %error, "form rejected");
                return self.transition(|view| view.show_error(error.to_string())).await;
            }
        };

        self.transition(ViewState::show_loading).await;

        match self.generate(&request).await {
            Ok(curriculum) => {
                info!(
                    target: "curricuforge_core",
                    topic = %request.topic,
                    chars = curriculum.len(),
                    "curriculum ready"
                );
                self.transition(|view| view.display_curriculum(&curriculum))
                    .await
            }
            Err(failure) => {
                error!(target: "curricuforge_core", error = ?failure, "curriculum request failed");
                self.transition(|view| view.show_error(format!("Error: {failure}")))
                    .await
            }
        }
    }

    /// Fetches raw curriculum text for an already validated request.
    pub async fn generate(&self, request: &CurriculumRequest) -> Result<String> {
        match self.mode {
            GenerationMode::Remote => self.client.generate(request).await,
            GenerationMode::Offline => {
                debug!(
                    target: "curricuforge_core",
                    topic = %request.topic,
                    "using offline template"
                );
                Ok(template_curriculum(request))
            }
        }
    }

    pub async fn reset(&self) -> ViewState {
        self.transition(ViewState::reset).await
    }

    /// Calls `/health`; unreachable or unhealthy services report `false`.
    pub async fn check_connection(&self) -> bool {
        match self.client.health().await {
            Ok(status) => {
                info!(
                    target: "curricuforge_core",
                    status = %status.status,
                    service = ?status.service,
                    "API status"
                );
                status.is_healthy()
            }
            Err(failure) => {
                error!(target: "curricuforge_core", error = %failure, "API connection error");
                warn!(
                    target: "curricuforge_core",
                    base_url = self.client.base_url(),
                    "curriculum service not reachable; make sure the backend is running"
                );
                false
            }
        }
    }

    async fn transition(&self, apply: impl FnOnce(&mut ViewState)) -> ViewState {
        let mut guard = self.view.write().await;
        apply(&mut guard);
        guard.clone()
    }
}
