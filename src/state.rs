use std::{collections::HashMap, sync::Arc};

use surrealdb::{
    Surreal,
    engine::any::{self, Any},
    opt::auth::Root,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    config::AppConfig,
    errors::Result,
    models::session::Session,
    services::sync::{DisabledOrchestrator, HttpOrchestrator, Orchestrator, SyncRelay},
};

pub type Db = Surreal<Any>;

#[derive(Clone)]
pub struct AppState {
    pub sdb: Db,
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
    pub sync: Arc<SyncRelay>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> Result<Self> {
        let sdb = any::connect(config.db.url.as_str()).await?;
        if let (Some(username), Some(password)) = (&config.db.username, &config.db.password) {
            sdb.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await?;
        }
        sdb.use_ns(config.db.namespace.as_str())
            .use_db(config.db.database.as_str())
            .await?;
        info!("Connected to {}", config.db.url);

        let orchestrator: Arc<dyn Orchestrator> = match &config.orchestrator {
            Some(orchestrator) => Arc::new(HttpOrchestrator::new(orchestrator.clone())?),
            None => Arc::new(DisabledOrchestrator),
        };

        Ok(Self::new(sdb, config, orchestrator))
    }

    pub fn new(sdb: Db, config: AppConfig, orchestrator: Arc<dyn Orchestrator>) -> Self {
        Self {
            sdb,
            config: Arc::new(config),
            sessions: SessionStore::default(),
            sync: Arc::new(SyncRelay::new(orchestrator)),
        }
    }
}

/// In-process sessions keyed by the HMAC of the cookie token.
#[derive(Clone, Default)]
pub struct SessionStore(Arc<RwLock<HashMap<String, Session>>>);

impl SessionStore {
    pub async fn insert(&self, key: String, session: Session) {
        let mut sessions = self.0.write().await;
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(key, session);
    }

    pub async fn get(&self, key: &str) -> Option<Session> {
        let session = self.0.read().await.get(key).cloned()?;
        if session.is_expired() {
            self.0.write().await.remove(key);
            return None;
        }
        Some(session)
    }

    pub async fn remove(&self, key: &str) {
        self.0.write().await.remove(key);
    }
}
