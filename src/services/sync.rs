use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::{sync::Mutex, time::Instant};
use tracing::{info, warn};

use crate::{
    config::OrchestratorConfig,
    consts::sync_const::{API_KEY_HEADER, SYNC_COOLDOWN},
    errors::{Error, Result},
    models::sync::TriggerRequest,
};

/// The external service that runs the Vejman synchronization.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn trigger(&self, requested_by: &str) -> Result<()>;
}

pub struct HttpOrchestrator {
    client: reqwest::Client,
    config: OrchestratorConfig,
}

impl HttpOrchestrator {
    pub fn new(config: OrchestratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Orchestrator for HttpOrchestrator {
    async fn trigger(&self, requested_by: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.config.trigger_url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&TriggerRequest { requested_by })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Orchestrator(status));
        }
        Ok(())
    }
}

/// Used when no orchestrator URL is configured.
pub struct DisabledOrchestrator;

#[async_trait]
impl Orchestrator for DisabledOrchestrator {
    async fn trigger(&self, _requested_by: &str) -> Result<()> {
        Err(Error::SyncUnavailable)
    }
}

#[derive(Debug, Clone, Copy)]
struct LastTrigger {
    at: Instant,
    wall: DateTime<Utc>,
}

impl LastTrigger {
    fn remaining(&self) -> Duration {
        SYNC_COOLDOWN.saturating_sub(self.at.elapsed())
    }
}

/// Forwards sync requests, at most one per cooldown window in this process.
pub struct SyncRelay {
    orchestrator: Arc<dyn Orchestrator>,
    last: Mutex<Option<LastTrigger>>,
}

impl SyncRelay {
    pub fn new(orchestrator: Arc<dyn Orchestrator>) -> Self {
        Self {
            orchestrator,
            last: Mutex::new(None),
        }
    }

    /// Held across the forward so concurrent presses cannot both pass.
    pub async fn trigger(&self, requested_by: &str) -> Result<()> {
        let mut last = self.last.lock().await;
        if let Some(previous) = last.as_ref() {
            let remaining = previous.remaining();
            if !remaining.is_zero() {
                warn!("Sync trigger by {} refused, {:?} left", requested_by, remaining);
                return Err(Error::SyncCooldown(remaining));
            }
        }

        self.orchestrator.trigger(requested_by).await?;
        *last = Some(LastTrigger {
            at: Instant::now(),
            wall: Utc::now(),
        });
        info!("Sync triggered by {}", requested_by);
        Ok(())
    }

    /// Wall-clock time of the last forward and the cooldown left.
    pub async fn status(&self) -> (Option<DateTime<Utc>>, Duration) {
        match *self.last.lock().await {
            Some(previous) => (Some(previous.wall), previous.remaining()),
            None => (None, Duration::ZERO),
        }
    }
}
