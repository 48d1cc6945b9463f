//! Sonda de salud de la imagen
//!
//! `HEALTHCHECK` la ejecuta sin argumentos: sale con 0 si `/health` responde
//! 2xx y con 1 en cualquier otro caso. Con `--watch` aplica la política
//! completa en bucle y registra cada cambio de estado.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use dawarich_route_editor::healthcheck::{
    probe, probe_url, HealthPolicy, HealthStatus, HealthTracker, ProbeOutcome,
};
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "healthcheck", about = "Probe the route editor /health endpoint")]
struct Args {
    /// Probar continuamente con intervalo, periodo de arranque y reintentos
    #[arg(long)]
    watch: bool,

    /// URL a probar; por defecto http://localhost:${PORT:-5000}/health
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let url = match args.url {
        Some(url) => url,
        None => match probe_url(std::env::var("PORT").ok().as_deref()) {
            Ok(url) => url,
            Err(e) => {
                error!("❌ {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let policy = HealthPolicy::default();
    let client = reqwest::Client::new();

    if !args.watch {
        return match probe(&client, &url, policy.timeout).await {
            ProbeOutcome::Success => ExitCode::SUCCESS,
            ProbeOutcome::Failure(reason) => {
                warn!("💔 {} -> {}", url, reason);
                ExitCode::FAILURE
            }
        };
    }

    info!("🩺 Vigilando {} cada {}s", url, policy.interval.as_secs());
    let started = Instant::now();
    let mut tracker = HealthTracker::new(policy);
    let mut ticker = policy.watch_ticker();

    loop {
        ticker.tick().await;
        let outcome = probe(&client, &url, policy.timeout).await;
        let previous = tracker.status();
        let current = tracker.record(&outcome, started.elapsed());

        if let ProbeOutcome::Failure(reason) = &outcome {
            warn!(
                "⚠️ Sonda fallida ({} consecutivas): {}",
                tracker.consecutive_failures(),
                reason
            );
        }
        if current != previous {
            match current {
                HealthStatus::Healthy => info!("✅ Estado: healthy"),
                HealthStatus::Unhealthy => error!("❌ Estado: unhealthy"),
                HealthStatus::Starting => info!("⏳ Estado: starting"),
            }
        }
    }
}
