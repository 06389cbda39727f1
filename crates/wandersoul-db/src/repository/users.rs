//! User operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, UpdateUser, User};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Check if the email is already registered
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(DbError::Duplicate(format!("Email '{}' already exists", user.email)));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (fname, sname, email, password_hash, role_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.fname)
        .bind(&user.sname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.id())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, format!("Email '{}' already exists", user.email)))?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            fname: user.fname,
            sname: user.sname,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, fname, sname, email, password_hash, role_id, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, fname, sname, email, password_hash, role_id, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, fname, sname, email, password_hash, role_id, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to a user
    ///
    /// Returns `None` when the user does not exist.
    pub async fn update_user(&self, id: i64, update: UpdateUser) -> Result<Option<User>, DbError> {
        let Some(mut user) = self.get_user_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(email) = update.email
            && email != user.email
        {
            if self.get_user_by_email(&email).await?.is_some() {
                return Err(DbError::Duplicate(format!("Email '{}' already exists", email)));
            }
            user.email = email;
        }
        if let Some(fname) = update.fname {
            user.fname = fname;
        }
        if let Some(sname) = update.sname {
            user.sname = sname;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE users
            SET fname = ?, sname = ?, email = ?, password_hash = ?, role_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.fname)
        .bind(&user.sname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.id())
        .bind(user.updated_at.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, format!("Email '{}' already exists", user.email)))?;

        Ok(Some(user))
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::UserRole;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            fname: "Alice".to_string(),
            sname: "Walker".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_user() {
        let db = Database::in_memory().await.unwrap();

        let user = db.insert_user(new_user("alice@example.com")).await.unwrap();
        assert!(user.id > 0);
        assert!(db.has_users().await.unwrap());

        let by_email = db.get_user_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.role, UserRole::User);

        let by_id = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        assert!(db.get_user_by_id(user.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::in_memory().await.unwrap();
        db.insert_user(new_user("dup@example.com")).await.unwrap();

        let err = db.insert_user(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
        assert_eq!(db.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let db = Database::in_memory().await.unwrap();
        let user = db.insert_user(new_user("bob@example.com")).await.unwrap();

        let updated = db
            .update_user(
                user.id,
                UpdateUser {
                    fname: Some("Robert".to_string()),
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.fname, "Robert");
        assert_eq!(updated.sname, "Walker");
        assert_eq!(updated.role, UserRole::Admin);

        let stored = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.fname, "Robert");
        assert_eq!(stored.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_update_user_email_conflict() {
        let db = Database::in_memory().await.unwrap();
        db.insert_user(new_user("first@example.com")).await.unwrap();
        let second = db.insert_user(new_user("second@example.com")).await.unwrap();

        let err = db
            .update_user(
                second.id,
                UpdateUser {
                    email: Some("first@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let db = Database::in_memory().await.unwrap();
        let result = db.update_user(42, UpdateUser::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = Database::in_memory().await.unwrap();
        let user = db.insert_user(new_user("gone@example.com")).await.unwrap();

        assert!(db.delete_user(user.id).await.unwrap());
        assert!(!db.delete_user(user.id).await.unwrap());
        assert!(db.get_user_by_id(user.id).await.unwrap().is_none());
    }
}
