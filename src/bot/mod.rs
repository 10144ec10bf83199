//! Bot layer - Discord-specific interface and command handlers
//!
//! Each screen of the app is a slash command; dialogs are command options
//! and file pickers are attachments. Commands call into [`crate::core`]
//! and render results through [`render`].

/// Discord command implementations
pub mod commands;
/// Discord interaction handlers (autocomplete, session checks)
pub mod handlers;
/// Turning list views and errors into replies
pub mod render;

use crate::{
    config::AppConfig,
    core::{badge, certificate, user},
    entities::{BadgeModel, CertificateModel, UserModel},
    gateway::DbGateway,
    query::{QueryCache, QuerySnapshot},
    session::{AuthEvents, SessionStore},
};
use std::sync::Arc;

const BADGES: &str = "badges";
const CERTIFICATES: &str = "certificates";
const USERS: &str = "users";

/// Shared data available to all bot commands.
pub struct BotData {
    /// Backend access for every command
    pub gateway: DbGateway,
    pub config: Arc<AppConfig>,
    /// Where sign-in and sign-out are announced
    pub auth: AuthEvents,
    /// Who is signed in
    pub sessions: Arc<SessionStore>,
    badges: QueryCache<BadgeModel>,
    certificates: QueryCache<CertificateModel>,
    users: QueryCache<UserModel>,
}

impl BotData {
    /// Builds the shared context and subscribes the session store.
    #[must_use]
    pub fn new(gateway: DbGateway, config: Arc<AppConfig>) -> Self {
        let stale_after = config.query.stale_after();
        let auth = AuthEvents::new();
        let sessions = Arc::new(SessionStore::init(&auth));
        Self {
            gateway,
            config,
            auth,
            sessions,
            badges: QueryCache::new(stale_after),
            certificates: QueryCache::new(stale_after),
            users: QueryCache::new(stale_after),
        }
    }

    /// Cached badge list.
    pub async fn badges(&self) -> QuerySnapshot<BadgeModel> {
        self.badges
            .get(BADGES, || badge::list_badges(&self.gateway))
            .await
    }

    /// Refetches badges after a write.
    pub async fn refresh_badges(&self) -> QuerySnapshot<BadgeModel> {
        self.badges
            .refetch(BADGES, || badge::list_badges(&self.gateway))
            .await
    }

    /// Cached certificate list.
    pub async fn certificates(&self) -> QuerySnapshot<CertificateModel> {
        self.certificates
            .get(CERTIFICATES, || certificate::list_certificates(&self.gateway))
            .await
    }

    /// Refetches certificates after a write.
    pub async fn refresh_certificates(&self) -> QuerySnapshot<CertificateModel> {
        self.certificates
            .refetch(CERTIFICATES, || certificate::list_certificates(&self.gateway))
            .await
    }

    /// Cached member list, ordered by name.
    pub async fn users(&self) -> QuerySnapshot<UserModel> {
        self.users
            .get(USERS, || user::list_users(&self.gateway))
            .await
    }

    /// Marks the member list stale after registrations, profile edits and
    /// points grants.
    pub async fn invalidate_users(&self) {
        self.users.invalidate(USERS).await;
    }
}

pub use commands::*;
