//! Healthcheck del contenedor
//!
//! Sonda HTTP contra `/health` y la máquina de estados que usa el runtime
//! de contenedores para decidir si el proceso está sano.

use std::time::Duration;

use anyhow::Result;

use crate::config::environment::{non_empty, parse_port, DEFAULT_PORT};

/// Política de healthcheck de la imagen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    pub interval: Duration,
    pub timeout: Duration,
    pub start_period: Duration,
    pub retries: u32,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(10),
            start_period: Duration::from_secs(5),
            retries: 3,
        }
    }
}

impl HealthPolicy {
    /// Temporizador del modo `--watch`: la primera sonda espera un intervalo
    /// completo, igual que `HEALTHCHECK`.
    pub fn watch_ticker(&self) -> tokio::time::Interval {
        tokio::time::interval_at(tokio::time::Instant::now() + self.interval, self.interval)
    }
}

/// Resultado de una sonda
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    Failure(String),
}

/// Estado de salud observado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Starting,
    Healthy,
    Unhealthy,
}

/// URL de la sonda a partir del valor de `PORT`
pub fn probe_url(port: Option<&str>) -> Result<String> {
    let port = match non_empty(port.map(str::to_string)) {
        Some(raw) => parse_port(&raw)?,
        None => DEFAULT_PORT,
    };
    Ok(format!("http://localhost:{}/health", port))
}

/// Lanzar una sonda GET; solo un 2xx dentro del timeout cuenta como éxito
pub async fn probe(client: &reqwest::Client, url: &str, timeout: Duration) -> ProbeOutcome {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) if response.status().is_success() => ProbeOutcome::Success,
        Ok(response) => ProbeOutcome::Failure(format!("HTTP {}", response.status())),
        Err(e) if e.is_timeout() => {
            ProbeOutcome::Failure(format!("no response within {}s", timeout.as_secs()))
        }
        Err(e) => ProbeOutcome::Failure(e.to_string()),
    }
}

/// Acumula resultados de sondas consecutivas
#[derive(Debug, Clone)]
pub struct HealthTracker {
    policy: HealthPolicy,
    status: HealthStatus,
    consecutive_failures: u32,
}

impl HealthTracker {
    pub fn new(policy: HealthPolicy) -> Self {
        Self {
            policy,
            status: HealthStatus::Starting,
            consecutive_failures: 0,
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Registrar una sonda hecha `since_start` después de arrancar
    ///
    /// Los fallos dentro del periodo de arranque no cuentan mientras el
    /// contenedor siga en `Starting`.
    pub fn record(&mut self, outcome: &ProbeOutcome, since_start: Duration) -> HealthStatus {
        match outcome {
            ProbeOutcome::Success => {
                self.consecutive_failures = 0;
                self.status = HealthStatus::Healthy;
            }
            ProbeOutcome::Failure(_) => {
                let in_grace = self.status == HealthStatus::Starting
                    && since_start < self.policy.start_period;
                if !in_grace {
                    self.consecutive_failures += 1;
                    if self.consecutive_failures >= self.policy.retries {
                        self.status = HealthStatus::Unhealthy;
                    }
                }
            }
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail() -> ProbeOutcome {
        ProbeOutcome::Failure("timeout".into())
    }

    #[test]
    fn test_default_policy_matches_image() {
        let policy = HealthPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(30));
        assert_eq!(policy.timeout, Duration::from_secs(10));
        assert_eq!(policy.start_period, Duration::from_secs(5));
        assert_eq!(policy.retries, 3);
    }

    #[test]
    fn test_probe_url_defaults_to_5000() {
        assert_eq!(probe_url(None).unwrap(), "http://localhost:5000/health");
        assert_eq!(probe_url(Some("")).unwrap(), "http://localhost:5000/health");
    }

    #[test]
    fn test_probe_url_honours_port() {
        assert_eq!(probe_url(Some("8080")).unwrap(), "http://localhost:8080/health");
        assert!(probe_url(Some("eighty")).is_err());
    }

    #[test]
    fn test_three_consecutive_failures_turn_unhealthy() {
        let mut tracker = HealthTracker::new(HealthPolicy::default());
        let t = Duration::from_secs(35);

        assert_eq!(tracker.record(&ProbeOutcome::Success, t), HealthStatus::Healthy);
        assert_eq!(tracker.record(&fail(), t), HealthStatus::Healthy);
        assert_eq!(tracker.record(&fail(), t), HealthStatus::Healthy);
        assert_eq!(tracker.record(&fail(), t), HealthStatus::Unhealthy);
        assert_eq!(tracker.consecutive_failures(), 3);
    }

    #[test]
    fn test_success_resets_failure_streak() {
        let mut tracker = HealthTracker::new(HealthPolicy::default());
        let t = Duration::from_secs(60);

        tracker.record(&fail(), t);
        tracker.record(&fail(), t);
        tracker.record(&ProbeOutcome::Success, t);
        assert_eq!(tracker.consecutive_failures(), 0);
        tracker.record(&fail(), t);
        tracker.record(&fail(), t);
        assert_eq!(tracker.status(), HealthStatus::Healthy);
    }

    #[test]
    fn test_failures_in_start_period_are_ignored() {
        let mut tracker = HealthTracker::new(HealthPolicy::default());

        for _ in 0..5 {
            tracker.record(&fail(), Duration::from_secs(2));
        }
        assert_eq!(tracker.status(), HealthStatus::Starting);
        assert_eq!(tracker.consecutive_failures(), 0);

        tracker.record(&fail(), Duration::from_secs(6));
        assert_eq!(tracker.consecutive_failures(), 1);
    }

    #[test]
    fn test_unhealthy_recovers_on_success() {
        let mut tracker = HealthTracker::new(HealthPolicy::default());
        let t = Duration::from_secs(100);
        for _ in 0..3 {
            tracker.record(&fail(), t);
        }
        assert_eq!(tracker.status(), HealthStatus::Unhealthy);
        assert_eq!(tracker.record(&ProbeOutcome::Success, t), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_probe_connection_refused_is_failure() {
        // Puerto 9 (discard) no debería tener un servidor HTTP en local
        let client = reqwest::Client::new();
        let outcome = probe(&client, "http://127.0.0.1:9/health", Duration::from_secs(2)).await;
        assert!(matches!(outcome, ProbeOutcome::Failure(_)));
    }

    #[tokio::test]
    async fn test_watch_ticker_waits_a_full_interval_first() {
        let policy = HealthPolicy {
            interval: Duration::from_millis(200),
            ..HealthPolicy::default()
        };
        let started = tokio::time::Instant::now();
        let mut ticker = policy.watch_ticker();

        ticker.tick().await;
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
