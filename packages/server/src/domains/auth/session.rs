use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session token (random UUID)
pub type SessionToken = String;

/// Account role, fixed at signup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Organizer,
    Participant,
}

/// Registered account
#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    password_hash: String,
}

/// Session data stored after a successful signin
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// In-memory account registry and session store.
///
/// Sessions expire after the configured TTL; expired entries read as absent
/// and are swept by the periodic cleanup task.
pub struct AuthStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    session_ttl_hours: i64,
}

impl AuthStore {
    pub fn new(session_ttl_hours: i64) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl_hours,
        }
    }

    /// Register a new account. Returns None if the email is already taken.
    ///
    /// Emails are compared case-insensitively.
    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        role: Role,
        password: &str,
    ) -> Option<User> {
        let email = email.trim().to_lowercase();
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == email) {
            return None;
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            name: name.trim().to_string(),
            role,
            created_at: Utc::now(),
            password_hash: hash_password(password),
        };
        users.insert(user.id, user.clone());
        Some(user)
    }

    /// Check email/password and return the matching user
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().await;
        let user = users.values().find(|user| user.email == email)?;
        if user.password_hash != hash_password(password) {
            return None;
        }
        Some(user.clone())
    }

    pub async fn user_by_id(&self, id: Uuid) -> Option<User> {
        let users = self.users.read().await;
        users.get(&id).cloned()
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().await;
        users.values().find(|user| user.email == email).cloned()
    }

    /// Create a new session and return the token
    pub async fn create_session(&self, user: &User) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id: user.id,
            role: user.role,
            created_at: Utc::now(),
        };
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);
        token
    }

    /// Get session by token
    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;

        let elapsed = Utc::now().signed_duration_since(session.created_at);
        if elapsed.num_hours() >= self.session_ttl_hours {
            // Session expired
            return None;
        }

        Some(session.clone())
    }

    /// Delete session (logout)
    pub async fn delete_session(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }

    /// Clean up expired sessions (run periodically)
    pub async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();

        sessions.retain(|_, session| {
            let elapsed = now.signed_duration_since(session.created_at);
            elapsed.num_hours() < self.session_ttl_hours
        });
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[cfg(test)]
    pub async fn insert_session_raw(&self, token: SessionToken, session: Session) {
        self.sessions.write().await.insert(token, session);
    }
}

/// Hash a password for in-memory storage
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_and_signin() {
        let store = AuthStore::new(24);
        let user = store
            .create_user("Ada@Example.com", "Ada", Role::Organizer, "hunter22")
            .await
            .expect("first signup should succeed");
        assert_eq!(user.email, "ada@example.com");

        let found = store.verify_credentials("ada@example.com", "hunter22").await;
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, user.id);

        let wrong = store.verify_credentials("ada@example.com", "nope").await;
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = AuthStore::new(24);
        store
            .create_user("ada@example.com", "Ada", Role::Organizer, "hunter22")
            .await
            .unwrap();

        let dup = store
            .create_user("ADA@example.com", "Other", Role::Participant, "pw")
            .await;
        assert!(dup.is_none(), "case-insensitive duplicate should be rejected");
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = AuthStore::new(24);
        let user = store
            .create_user("ada@example.com", "Ada", Role::Participant, "pw")
            .await
            .unwrap();

        let token = store.create_session(&user).await;
        assert!(!token.is_empty());

        let session = store.get_session(&token).await;
        assert!(session.is_some());
        assert_eq!(session.unwrap().user_id, user.id);

        store.delete_session(&token).await;
        assert!(store.get_session(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_session_expiration() {
        let store = AuthStore::new(24);
        let session = Session {
            user_id: Uuid::new_v4(),
            role: Role::Participant,
            created_at: Utc::now() - chrono::Duration::hours(25),
        };

        let token = Uuid::new_v4().to_string();
        store.insert_session_raw(token.clone(), session).await;
        assert!(
            store.get_session(&token).await.is_none(),
            "Expired session should return None"
        );

        store.cleanup_expired().await;
        assert_eq!(store.session_count().await, 0);
    }

    #[test]
    fn test_password_hash() {
        let hash1 = hash_password("hunter22");
        let hash2 = hash_password("hunter22");
        assert_eq!(hash1, hash2, "Same password should produce same hash");

        let hash3 = hash_password("other");
        assert_ne!(hash1, hash3, "Different passwords should have different hashes");
    }
}
