//! Process-wide session state.
//!
//! The auth side publishes [`AuthEvent`]s on an [`AuthEvents`] channel. A
//! [`SessionStore`] subscribes on [`SessionStore::init`] and stops on
//! [`SessionStore::teardown`]; pending events are applied before every read,
//! so a lookup right after a sign-in already sees it.

use crate::entities::UserModel;
use std::collections::HashMap;
use tokio::sync::{
    Mutex,
    broadcast::{self, error::TryRecvError},
};
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// A change in some identity's sign-in state.
#[derive(Clone, Debug)]
pub enum AuthEvent {
    SignedIn { auth_id: String, user: UserModel },
    SignedOut { auth_id: String },
}

/// Publisher side of the auth event channel.
#[derive(Clone, Debug)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Announces that `user` signed in under their auth id.
    pub fn sign_in(&self, user: UserModel) {
        self.publish(AuthEvent::SignedIn {
            auth_id: user.auth_id.clone(),
            user,
        });
    }

    /// Announces that `auth_id` signed out.
    pub fn sign_out(&self, auth_id: &str) {
        self.publish(AuthEvent::SignedOut {
            auth_id: auth_id.to_string(),
        });
    }

    fn publish(&self, event: AuthEvent) {
        if self.sender.send(event).is_err() {
            debug!("Auth event dropped, no active session store");
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }
}

struct SessionState {
    receiver: Option<broadcast::Receiver<AuthEvent>>,
    users: HashMap<String, UserModel>,
}

impl SessionState {
    fn drain(&mut self) {
        let Some(receiver) = self.receiver.as_mut() else {
            return;
        };
        loop {
            match receiver.try_recv() {
                Ok(AuthEvent::SignedIn { auth_id, user }) => {
                    debug!("Session opened for {}", auth_id);
                    self.users.insert(auth_id, user);
                }
                Ok(AuthEvent::SignedOut { auth_id }) => {
                    debug!("Session closed for {}", auth_id);
                    self.users.remove(&auth_id);
                }
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("Session store missed {} auth events", missed);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

/// Signed-in users keyed by auth id.
pub struct SessionStore {
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// Subscribes to `events`. Only events published after this call count.
    #[must_use]
    pub fn init(events: &AuthEvents) -> Self {
        info!("Session store subscribed to auth events");
        Self {
            state: Mutex::new(SessionState {
                receiver: Some(events.subscribe()),
                users: HashMap::new(),
            }),
        }
    }

    /// Unsubscribes and forgets every session.
    pub async fn teardown(&self) {
        let mut state = self.state.lock().await;
        state.receiver = None;
        state.users.clear();
        info!("Session store torn down");
    }

    /// The user signed in under `auth_id`, as of sign-in.
    pub async fn current_user(&self, auth_id: &str) -> Option<UserModel> {
        let mut state = self.state.lock().await;
        state.drain();
        state.users.get(auth_id).cloned()
    }

    /// Number of open sessions
    pub async fn active_sessions(&self) -> usize {
        let mut state = self.state.lock().await;
        state.drain();
        state.users.len()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Role;

    fn user(auth_id: &str) -> UserModel {
        UserModel {
            id: 1,
            auth_id: auth_id.to_string(),
            national_id: "1000000001".to_string(),
            full_name: "Ali".to_string(),
            email: None,
            phone_number: None,
            address: None,
            date_of_birth: None,
            bio: None,
            role: Role::Scout,
            points: 0,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let events = AuthEvents::new();
        let store = SessionStore::init(&events);
        assert!(store.current_user("42").await.is_none());

        events.sign_in(user("42"));
        assert_eq!(store.current_user("42").await.unwrap().full_name, "Ali");
        assert_eq!(store.active_sessions().await, 1);

        events.sign_out("42");
        assert!(store.current_user("42").await.is_none());
    }

    #[tokio::test]
    async fn test_teardown_stops_listening() {
        let events = AuthEvents::new();
        let store = SessionStore::init(&events);
        events.sign_in(user("1"));
        store.teardown().await;

        assert_eq!(store.active_sessions().await, 0);
        events.sign_in(user("2"));
        assert!(store.current_user("2").await.is_none());
    }

    #[tokio::test]
    async fn test_events_before_init_are_ignored() {
        let events = AuthEvents::new();
        events.sign_in(user("1"));
        let store = SessionStore::init(&events);
        assert!(store.current_user("1").await.is_none());
    }
}
