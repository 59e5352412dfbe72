use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;

use crate::{
    api,
    clients::{YouTubeClient, YouTubeConfig},
    config::Config,
    fetch::CommentFetcher,
    inference::InferenceService,
    observability::Telemetry,
    pipeline::AnalysisOrchestrator,
};

#[derive(Clone)]
pub(crate) struct AppState {
    registry: Arc<ComponentRegistry>,
}

/// プロセス全体で一度だけ構築する部品の集合。
pub struct ComponentRegistry {
    telemetry: Telemetry,
    orchestrator: Arc<AnalysisOrchestrator>,
}

impl AppState {
    pub(crate) fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn orchestrator(&self) -> Arc<AnalysisOrchestrator> {
        Arc::clone(&self.registry.orchestrator)
    }
}

impl ComponentRegistry {
    /// 設定から HTTP クライアントと推論モデルを構築する。
    ///
    /// モデル読み込みと blocking クライアント構築を含むため、非同期タスク上では
    /// `spawn_blocking` 経由で呼ぶこと。
    ///
    /// # Errors
    /// HTTP クライアント構築またはモデル読み込みが失敗した場合はエラーを返す。
    pub fn build(config: &Config, telemetry: Telemetry) -> Result<Self> {
        let youtube = YouTubeClient::new(YouTubeConfig {
            base_url: config.youtube_api_base_url().to_string(),
            api_key: config.youtube_api_key().to_string(),
            connect_timeout: config.youtube_connect_timeout(),
            total_timeout: config.youtube_total_timeout(),
        })
        .context("failed to build YouTube client")?;
        let inference = InferenceService::load(config.toxicity_model().clone())
            .context("failed to load inference models")?;

        let orchestrator = AnalysisOrchestrator::new(
            CommentFetcher::new(Arc::new(youtube)),
            inference,
            config.export_dir().to_path_buf(),
            telemetry.metrics_arc(),
        );
        Ok(Self::from_parts(telemetry, orchestrator))
    }

    #[must_use]
    pub fn from_parts(telemetry: Telemetry, orchestrator: AnalysisOrchestrator) -> Self {
        Self {
            telemetry,
            orchestrator: Arc::new(orchestrator),
        }
    }

    #[must_use]
    pub fn orchestrator(&self) -> Arc<AnalysisOrchestrator> {
        Arc::clone(&self.orchestrator)
    }

    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }
}

pub fn build_router(registry: ComponentRegistry) -> Router {
    let state = AppState::new(registry);
    api::router(state)
}
