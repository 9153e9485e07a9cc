use crate::db::models::user_models::{NewUser, User, UserRole};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

struct UsersInner {
    users: HashMap<i64, User>,
    next_id: i64,
}

/// Users repository for handling user operations.
/// Append-only for the flows covered; no update or delete.
#[derive(Clone)]
pub struct UsersRepository {
    inner: Arc<Mutex<UsersInner>>,
}

impl UsersRepository {
    /// Create an empty users repository
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(UsersInner {
                users: HashMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a new user, assigning the next sequential id
    pub async fn create(&self, new_user: NewUser) -> User {
        let mut inner = self.inner.lock().await;

        let id = inner.next_id;
        inner.next_id += 1;

        let user = User {
            id,
            user_id: new_user.user_id,
            mobile: new_user.mobile,
            password: new_user.password,
            role: new_user.role,
            name: new_user.name,
            created_at: Utc::now(),
        };

        info!("Creating new user: {}", user.user_id);
        inner.users.insert(id, user.clone());
        user
    }

    /// Get user by numeric id
    pub async fn get_by_id(&self, id: i64) -> Option<User> {
        let inner = self.inner.lock().await;
        inner.users.get(&id).cloned()
    }

    /// Get user requiring an exact match on both external id and role.
    /// A login attempt with the wrong role for a real account reads as
    /// "not found", not "wrong password".
    pub async fn get_by_user_id_and_role(&self, user_id: &str, role: UserRole) -> Option<User> {
        let inner = self.inner.lock().await;
        inner
            .users
            .values()
            .find(|u| u.user_id == user_id && u.role == role)
            .cloned()
    }
}

impl Default for UsersRepository {
    fn default() -> Self {
        Self::new()
    }
}
