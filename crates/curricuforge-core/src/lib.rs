use std::sync::Arc;

use anyhow::{Context, Result};
use curricuforge_client::{ClientConfig, CurriculumClient};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

pub mod form;
pub mod markdown;
pub mod service;
pub mod settings;
pub mod template;
pub mod view;

pub use form::{CurriculumForm, FormError};
pub use markdown::format_curriculum;
pub use service::{CurriculumService, GenerationMode};
pub use settings::Settings;
pub use view::{ViewState, Visibility};

/// Inputs required to bootstrap the client runtime.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub settings: Settings,
    pub mode: GenerationMode,
    /// Captured at startup for diagnostics.
    pub boot_timestamp: OffsetDateTime,
}

impl CoreConfig {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            mode: GenerationMode::Remote,
            boot_timestamp: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoreRuntime {
    config: CoreConfig,
    service: Arc<CurriculumService>,
}

impl CoreRuntime {
    pub fn service(&self) -> Arc<CurriculumService> {
        self.service.clone()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }
}

pub fn bootstrap(config: CoreConfig) -> Result<CoreRuntime> {
    let client = CurriculumClient::with_config(ClientConfig::from(&config.settings.api))
        .context("failed to initialize curriculum client")?;

    info!(
        target: "curricuforge_core",
        base_url = %config.settings.api.base_url,
        mode = ?config.mode,
        boot_timestamp = %config.boot_timestamp,
        "CurricuForge client starting"
    );

    let service = Arc::new(CurriculumService::new(client, config.mode));
    Ok(CoreRuntime { config, service })
}

/// A finished rendering, ready to hand to a display surface.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedCurriculum {
    pub topic: Option<String>,
    /// Source text the HTML was rendered from.
    pub text: String,
    pub html: String,
    #[serde(with = "time::serde::rfc3339")]
    pub rendered_at: OffsetDateTime,
}

impl RenderedCurriculum {
    pub fn new(topic: Option<String>, text: String, html: String) -> Self {
        Self {
            topic,
            text,
            html,
            rendered_at: OffsetDateTime::now_utc(),
        }
    }

    /// Runs `text` through the formatter.
    pub fn from_text(topic: Option<String>, text: &str) -> Self {
        Self::new(topic, text.to_string(), format_curriculum(text))
    }
}
