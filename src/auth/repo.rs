use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{StoreError, User};

/// Persistence operations the auth service relies on.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `DuplicateEmail` when the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// `UserStore` over the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return StoreError::DuplicateEmail;
                }
            }
            StoreError::Database(e)
        })?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::UserStore;
    use crate::auth::repo_types::{StoreError, User};

    /// In-process store with the same uniqueness contract as the table.
    #[derive(Default)]
    pub struct MemoryUserStore {
        users: Mutex<HashMap<String, User>>,
    }

    impl MemoryUserStore {
        pub fn get(&self, email: &str) -> Option<User> {
            self.users.lock().unwrap().get(email).cloned()
        }

        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(email) {
                return Err(StoreError::DuplicateEmail);
            }
            let user = User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: OffsetDateTime::now_utc(),
            };
            users.insert(email.to_string(), user.clone());
            Ok(user)
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            Ok(self.users.lock().unwrap().get(email).cloned())
        }
    }

    #[tokio::test]
    async fn rejects_second_insert_for_same_email() {
        let store = MemoryUserStore::default();
        let first = store.create_user("a@example.com", "h1").await.unwrap();
        let err = store.create_user("a@example.com", "h2").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        let kept = store.get("a@example.com").unwrap();
        assert_eq!(kept.id, first.id);
        assert_eq!(kept.password_hash, "h1");
        assert_eq!(store.len(), 1);
    }
}
