//! User accounts, sessions, favorites, reviews and posts
//!
//! Sessions are opaque bearer tokens stored in a single table. Passwords are
//! salted blake3 hashes; the plaintext never touches the database.

use crate::error::{Result, WheelhouseError};
use crate::storage::database::Database;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A registered user, as exposed to API clients (no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// A vehicle review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub vehicle_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub body: String,
    pub created_at: i64,
}

/// A free-form text post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: i64,
}

/// Account access over the shared database
#[derive(Clone)]
pub struct AccountStore {
    db: Arc<Database>,
}

impl AccountStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a new user and open a session for them
    pub fn register(&self, email: &str, password: &str, name: &str) -> Result<(String, User)> {
        let conn = self.db.get_conn()?;

        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(WheelhouseError::UserExists {
                email: email.to_string(),
            });
        }

        let salt = Uuid::new_v4().to_string();
        let hash = hash_password(&salt, password);
        conn.execute(
            "INSERT INTO users (email, password_hash, salt, name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![email, hash, salt, name, Utc::now().timestamp()],
        )?;
        let user_id = conn.last_insert_rowid();

        let user = User {
            id: user_id,
            email: email.to_string(),
            name: name.to_string(),
        };
        let token = self.open_session(user_id)?;
        Ok((token, user))
    }

    /// Verify credentials and open a session
    pub fn login(&self, email: &str, password: &str) -> Result<(String, User)> {
        let conn = self.db.get_conn()?;

        let row: Option<(i64, String, String, String)> = conn
            .query_row(
                "SELECT id, password_hash, salt, name FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                },
            )
            .optional()?;

        let (user_id, stored_hash, salt, name) = row.ok_or(WheelhouseError::InvalidCredentials)?;
        if hash_password(&salt, password) != stored_hash {
            return Err(WheelhouseError::InvalidCredentials);
        }

        let user = User {
            id: user_id,
            email: email.to_string(),
            name,
        };
        let token = self.open_session(user_id)?;
        Ok((token, user))
    }

    /// Resolve a bearer token to its user
    pub fn authenticate(&self, token: &str) -> Result<User> {
        let conn = self.db.get_conn()?;
        conn.query_row(
            "SELECT u.id, u.email, u.name FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = ?1",
            params![token],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    name: row.get(2)?,
                })
            },
        )
        .optional()?
        .ok_or(WheelhouseError::Unauthorized)
    }

    /// Drop a session; unknown tokens are a no-op
    pub fn logout(&self, token: &str) -> Result<()> {
        let conn = self.db.get_conn()?;
        conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }

    fn open_session(&self, user_id: i64) -> Result<String> {
        let conn = self.db.get_conn()?;
        let token = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, Utc::now().timestamp()],
        )?;
        Ok(token)
    }

    /// Favorite vehicle ids for a user, ascending
    pub fn favorites(&self, user_id: i64) -> Result<Vec<i64>> {
        let conn = self.db.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT vehicle_id FROM favorites WHERE user_id = ?1 ORDER BY vehicle_id ASC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Toggle a favorite; returns true when the vehicle is now a favorite
    pub fn toggle_favorite(&self, user_id: i64, vehicle_id: i64) -> Result<bool> {
        let conn = self.db.get_conn()?;
        let removed = conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND vehicle_id = ?2",
            params![user_id, vehicle_id],
        )?;
        if removed > 0 {
            return Ok(false);
        }
        conn.execute(
            "INSERT INTO favorites (user_id, vehicle_id, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, vehicle_id, Utc::now().timestamp()],
        )?;
        Ok(true)
    }

    /// Add a review for a vehicle
    pub fn add_review(
        &self,
        vehicle_id: i64,
        user_id: i64,
        rating: i64,
        body: &str,
    ) -> Result<Review> {
        if !(1..=5).contains(&rating) {
            return Err(WheelhouseError::InvalidRating { rating });
        }
        let conn = self.db.get_conn()?;
        let created_at = Utc::now().timestamp();
        conn.execute(
            "INSERT INTO reviews (vehicle_id, user_id, rating, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![vehicle_id, user_id, rating, body, created_at],
        )?;
        Ok(Review {
            id: conn.last_insert_rowid(),
            vehicle_id,
            user_id,
            rating,
            body: body.to_string(),
            created_at,
        })
    }

    /// All reviews for a vehicle, newest first
    pub fn list_reviews(&self, vehicle_id: i64) -> Result<Vec<Review>> {
        let conn = self.db.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, vehicle_id, user_id, rating, body, created_at
             FROM reviews WHERE vehicle_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![vehicle_id], |row| {
            Ok(Review {
                id: row.get(0)?,
                vehicle_id: row.get(1)?,
                user_id: row.get(2)?,
                rating: row.get(3)?,
                body: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Create a text post
    pub fn create_post(&self, user_id: i64, title: &str, body: &str) -> Result<Post> {
        let conn = self.db.get_conn()?;
        let created_at = Utc::now().timestamp();
        conn.execute(
            "INSERT INTO posts (user_id, title, body, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, title, body, created_at],
        )?;
        Ok(Post {
            id: conn.last_insert_rowid(),
            user_id,
            title: title.to_string(),
            body: body.to_string(),
            created_at,
        })
    }

    /// All posts, newest first
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        let conn = self.db.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, body, created_at
             FROM posts ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Post {
                id: row.get(0)?,
                user_id: row.get(1)?,
                title: row.get(2)?,
                body: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, AccountStore) {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(Database::new(&temp_dir.path().join("test.db")).unwrap());
        (temp_dir, AccountStore::new(db))
    }

    #[test]
    fn test_register_login_roundtrip() {
        let (_dir, store) = store();
        let (token, user) = store.register("a@b.ru", "secret", "Anya").unwrap();
        assert_eq!(user.email, "a@b.ru");
        assert_eq!(store.authenticate(&token).unwrap().id, user.id);

        let (token2, user2) = store.login("a@b.ru", "secret").unwrap();
        assert_eq!(user2.id, user.id);
        assert_ne!(token, token2);
    }

    #[test]
    fn test_duplicate_registration_conflicts() {
        let (_dir, store) = store();
        store.register("a@b.ru", "secret", "Anya").unwrap();
        assert!(matches!(
            store.register("a@b.ru", "other", "Anya"),
            Err(WheelhouseError::UserExists { .. })
        ));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let (_dir, store) = store();
        store.register("a@b.ru", "secret", "Anya").unwrap();
        assert!(matches!(
            store.login("a@b.ru", "wrong"),
            Err(WheelhouseError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("missing@b.ru", "secret"),
            Err(WheelhouseError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_logout_invalidates_token() {
        let (_dir, store) = store();
        let (token, _) = store.register("a@b.ru", "secret", "Anya").unwrap();
        store.logout(&token).unwrap();
        assert!(matches!(
            store.authenticate(&token),
            Err(WheelhouseError::Unauthorized)
        ));
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let (_dir, store) = store();
        store.register("a@b.ru", "secret", "Anya").unwrap();
        let conn = store.db.get_conn().unwrap();
        let stored: String = conn
            .query_row("SELECT password_hash FROM users", [], |row| row.get(0))
            .unwrap();
        assert_ne!(stored, "secret");
        assert_eq!(stored.len(), 64);
    }

    #[test]
    fn test_review_rating_validated() {
        let (_dir, store) = store();
        let (_, user) = store.register("a@b.ru", "secret", "Anya").unwrap();
        assert!(matches!(
            store.add_review(1, user.id, 0, "плохо"),
            Err(WheelhouseError::InvalidRating { rating: 0 })
        ));
    }
}
