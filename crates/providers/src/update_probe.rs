//! Periodic "is there a newer build?" checks.
//!
//! Every interval, while the current registration is active and the machine
//! is online, the probe URL is fetched bypassing caches. A 200 response
//! triggers `UpdateRegistration::update`, and a waiting update raises
//! [`UpdateEvent::NeedRefresh`]. Failures are logged and retried on the next
//! tick; nothing here is user-visible until an update is actually waiting.

use async_trait::async_trait;
use ollaix_core::update::{WorkerState, should_schedule_checks};
use ollaix_core::{Error, Result};
use reqwest::Client as HttpClient;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Raised when a newer build is ready to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateEvent {
    NeedRefresh,
}

/// Reachability check for the update source
#[async_trait]
pub trait UpdateProbe: Send + Sync {
    /// `Ok(true)` iff the source answered with status 200
    async fn probe(&self) -> Result<bool>;
}

/// Online/offline signal
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// The installed build and its update mechanism
#[async_trait]
pub trait UpdateRegistration: Send + Sync {
    fn state(&self) -> WorkerState;

    /// Look for a newer build; `Ok(true)` when one is waiting to be loaded
    async fn update(&self) -> Result<bool>;
}

/// GETs a URL with caching disabled
pub struct HttpUpdateProbe {
    client: HttpClient,
    url: String,
}

impl HttpUpdateProbe {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| Error::Probe(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl UpdateProbe for HttpUpdateProbe {
    async fn probe(&self) -> Result<bool> {
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| Error::Probe(format!("Probe request failed: {}", e)))?;

        Ok(response.status() == reqwest::StatusCode::OK)
    }
}

/// Registration for a released binary
///
/// The update source serves the latest version string as plain text; an
/// update is waiting when it differs from the running version.
pub struct ReleaseRegistration {
    client: HttpClient,
    url: String,
    current_version: String,
}

impl ReleaseRegistration {
    pub fn new(url: impl Into<String>, current_version: impl Into<String>) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| Error::Probe(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, url: url.into(), current_version: current_version.into() })
    }

    /// Whether `latest` names a different build than the running one
    pub fn is_newer(&self, latest: &str) -> bool {
        let latest = latest.trim().trim_start_matches('v');
        !latest.is_empty() && latest != self.current_version.trim_start_matches('v')
    }
}

#[async_trait]
impl UpdateRegistration for ReleaseRegistration {
    fn state(&self) -> WorkerState {
        WorkerState::Activated
    }

    async fn update(&self) -> Result<bool> {
        let body = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Probe(format!("Update check failed: {}", e)))?
            .text()
            .await
            .map_err(|e| Error::Probe(format!("Update check failed: {}", e)))?;

        Ok(self.is_newer(&body))
    }
}

/// Connectivity that can be flipped at runtime
#[derive(Debug, Clone)]
pub struct SharedConnectivity {
    online: Arc<AtomicBool>,
}

impl SharedConnectivity {
    pub fn new(online: bool) -> Self {
        Self { online: Arc::new(AtomicBool::new(online)) }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for SharedConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for SharedConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// What a single check did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Registration busy installing; nothing probed
    Installing,
    /// Offline; nothing probed
    Offline,
    /// Probe failed or returned non-200
    Unreachable,
    /// Source reachable, no newer build
    UpToDate,
    /// A newer build is waiting; `NeedRefresh` was sent
    NeedRefresh,
}

/// Drives periodic update checks
pub struct UpdateChecker {
    probe: Arc<dyn UpdateProbe>,
    registration: Arc<dyn UpdateRegistration>,
    connectivity: Arc<dyn Connectivity>,
    events: mpsc::Sender<UpdateEvent>,
}

impl UpdateChecker {
    pub fn new(
        probe: Arc<dyn UpdateProbe>, registration: Arc<dyn UpdateRegistration>, connectivity: Arc<dyn Connectivity>,
        events: mpsc::Sender<UpdateEvent>,
    ) -> Self {
        Self { probe, registration, connectivity, events }
    }

    /// Run one check
    pub async fn tick(&self) -> TickOutcome {
        if self.registration.state() == WorkerState::Installing {
            return TickOutcome::Installing;
        }
        if !self.connectivity.is_online() {
            return TickOutcome::Offline;
        }

        match self.probe.probe().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("update probe returned non-200");
                return TickOutcome::Unreachable;
            }
            Err(e) => {
                tracing::debug!(error = %e, "update probe failed");
                return TickOutcome::Unreachable;
            }
        }

        match self.registration.update().await {
            Ok(true) => {
                tracing::info!("update available");
                if self.events.send(UpdateEvent::NeedRefresh).await.is_err() {
                    tracing::debug!("update listener gone");
                }
                TickOutcome::NeedRefresh
            }
            Ok(false) => TickOutcome::UpToDate,
            Err(e) => {
                tracing::warn!(error = %e, "update check failed");
                TickOutcome::Unreachable
            }
        }
    }

    /// Check every `period` until the listener goes away
    ///
    /// Returns immediately unless the registration is active and the period
    /// is non-zero. The first check happens one full period after start.
    pub async fn run(self, period: Duration) {
        if !should_schedule_checks(self.registration.state(), period) {
            tracing::debug!(state = self.registration.state().as_str(), "update checks not scheduled");
            return;
        }

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            interval.tick().await;
            if self.events.is_closed() {
                return;
            }
            let outcome = self.tick().await;
            tracing::trace!(?outcome, "update tick");
        }
    }
}
