pub(crate) mod metrics;
pub(crate) mod tracing;

use std::sync::Arc;

use anyhow::Result;
use prometheus::{Encoder, Registry, TextEncoder};

pub use self::metrics::Metrics;

/// Telemetry（メトリクスとトレーシング）を管理する構造体。
#[derive(Debug, Clone)]
pub struct Telemetry {
    registry: Arc<Registry>,
    metrics: Arc<Metrics>,
}

impl Telemetry {
    /// トレーシングを初期化し、専用レジストリにメトリクスを登録する。
    ///
    /// # Errors
    /// サブスクライバの初期化またはメトリクス登録に失敗した場合。
    pub fn new() -> Result<Self> {
        tracing::init()?;
        Self::without_tracing()
    }

    /// メトリクスのみを構築する。テストや CLI の一回実行向け。
    ///
    /// # Errors
    /// メトリクス登録に失敗した場合。
    pub fn without_tracing() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let metrics = Arc::new(Metrics::new(Arc::clone(&registry))?);
        Ok(Self { registry, metrics })
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn metrics_arc(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    pub fn record_ready_probe(&self) {
        ::tracing::debug!("service ready probe recorded");
    }

    pub fn record_live_probe(&self) {
        ::tracing::debug!("service live probe");
    }

    /// Prometheusメトリクスをレンダリングする。
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        String::from_utf8(buffer).unwrap_or_default()
    }
}
