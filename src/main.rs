use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use comment_analyzer::{
    app::{ComponentRegistry, build_router},
    cli::{Cli, Command, render_outcome},
    config::Config,
    observability::Telemetry,
    pipeline::AnalysisRequest,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");

        if let Some(location) = panic_info.location() {
            error!(
                thread = thread_name,
                file = location.file(),
                line = location.line(),
                column = location.column(),
                message,
                "panic occurred"
            );
        } else {
            error!(
                thread = thread_name,
                message, "panic occurred without location information"
            );
        }
    }));

    let cli = Cli::parse();
    let telemetry = Telemetry::new().context("failed to initialize telemetry")?;
    let config = Config::from_env().context("failed to load configuration")?;
    let bind_addr = config.http_bind();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            // モデル読み込みと blocking クライアント構築はランタイム外のスレッドで行う
            let registry =
                tokio::task::spawn_blocking(move || ComponentRegistry::build(&config, telemetry))
                    .await
                    .context("component registry task panicked")?
                    .context("failed to build component registry")?;
            let router = build_router(registry);

            let listener = TcpListener::bind(bind_addr)
                .await
                .with_context(|| format!("failed to bind listener on {bind_addr}"))?;
            info!(%bind_addr, "listening");

            if let Err(error) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                warn!(error = %error, "server exited with error");
            }
        }
        Command::Analyze(args) => {
            let request = AnalysisRequest::from(args);
            let outcome = tokio::task::spawn_blocking(move || {
                let registry = ComponentRegistry::build(&config, telemetry)
                    .context("failed to build component registry")?;
                registry.orchestrator().run(&request)
            })
            .await
            .context("analysis task panicked")??;
            print!("{}", render_outcome(&outcome));
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
