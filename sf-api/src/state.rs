//! Application state
//!
//! Shared state for the ServiceFlow API: configuration, the database
//! and its services, the signed-in session table, and the
//! parameter-keyed list cache.

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use sf_db::{Database, DiscoveryService, OpportunityService, TemplateService, UserRecord};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::invalidation::{Collection, MutationKind};

/// Application configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Service name
    pub service_name: String,
    /// Service version
    pub version: String,
    /// Listen address
    pub listen_addr: String,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            service_name: "serviceflow-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            listen_addr: "0.0.0.0:4000".to_string(),
            enable_cors: true,
        }
    }
}

/// A signed-in user's server-side session
///
/// Created at login, dropped at sign-out; the opaque token is the
/// bearer credential.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Parameter-keyed cache of list responses.
///
/// Entries are keyed by (collection, canonical query parameters), so a
/// response computed for one filter combination can never be served
/// for - or overwritten by - another. Mutations flush whole collections
/// through the table in [`crate::invalidation`].
#[derive(Default)]
pub struct ListCache {
    entries: RwLock<HashMap<(Collection, String), serde_json::Value>>,
}

impl ListCache {
    pub async fn get(&self, collection: Collection, params: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        entries.get(&(collection, params.to_string())).cloned()
    }

    pub async fn put(&self, collection: Collection, params: &str, value: serde_json::Value) {
        let mut entries = self.entries.write().await;
        entries.insert((collection, params.to_string()), value);
    }

    pub async fn invalidate(&self, collections: &[Collection]) {
        let mut entries = self.entries.write().await;
        entries.retain(|(collection, _), _| !collections.contains(collection));
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Configuration
    pub config: ApiConfig,
    /// Database and repositories
    pub db: Database,
    /// Pipeline flows
    pub opportunities: OpportunityService,
    /// Template flows (guarded delete)
    pub templates: TemplateService,
    /// Discovery session flows
    pub discovery: DiscoveryService,
    /// Service start time
    pub started_at: DateTime<Utc>,
    /// List cache, keyed by (collection, params)
    pub cache: ListCache,
    /// Prometheus render handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    /// Signed-in sessions by token
    auth_sessions: RwLock<HashMap<String, AuthSession>>,
}

impl AppState {
    /// Create application state over an opened database
    pub fn new(config: ApiConfig, db: Database) -> Self {
        Self {
            opportunities: OpportunityService::new(db.opportunities.clone(), db.sessions.clone()),
            templates: TemplateService::new(db.templates.clone()),
            discovery: DiscoveryService::new(
                db.sessions.clone(),
                db.templates.clone(),
                db.links.clone(),
                db.solutions.clone(),
            ),
            db,
            config,
            started_at: Utc::now(),
            cache: ListCache::default(),
            metrics: None,
            auth_sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Enable the Prometheus endpoint
    pub fn with_metrics(mut self) -> Self {
        self.metrics = crate::metrics::init_metrics();
        self
    }

    /// Get service uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        let now = Utc::now();
        (now - self.started_at).num_seconds().max(0) as u64
    }

    // ============================================
    // Auth session management
    // ============================================

    /// Create a session for a signed-in user and return it
    pub async fn create_auth_session(&self, user: &UserRecord) -> AuthSession {
        let session = AuthSession {
            token: Uuid::new_v4().simple().to_string(),
            user_id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            created_at: Utc::now(),
        };
        let mut sessions = self.auth_sessions.write().await;
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Look up a session by bearer token
    pub async fn auth_session(&self, token: &str) -> Option<AuthSession> {
        let sessions = self.auth_sessions.read().await;
        sessions.get(token).cloned()
    }

    /// Tear down a session at sign-out; true if it existed
    pub async fn revoke_auth_session(&self, token: &str) -> bool {
        let mut sessions = self.auth_sessions.write().await;
        sessions.remove(token).is_some()
    }

    // ============================================
    // List cache
    // ============================================

    /// Flush every collection the mutation kind touches
    pub async fn invalidate(&self, kind: MutationKind) {
        let collections = kind.collections_to_refresh();
        self.cache.invalidate(collections).await;
        tracing::debug!(?kind, ?collections, "cache invalidated");
    }
}
