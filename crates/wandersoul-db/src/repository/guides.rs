//! Guide operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Guide, NewGuide, UpdateGuide};
use crate::repository::Database;

impl Database {
    // ==================== Guide Operations ====================

    /// Insert a batch of guides atomically
    pub async fn insert_guides(&self, guides: Vec<NewGuide>) -> Result<Vec<Guide>, DbError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(guides.len());

        for guide in guides {
            let row = sqlx::query(
                r#"
                INSERT INTO guides
                    (name, bio, image, languages, location, contact_info, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(&guide.name)
            .bind(&guide.bio)
            .bind(&guide.image)
            .bind(&guide.languages)
            .bind(&guide.location)
            .bind(&guide.contact_info)
            .bind(now.to_rfc3339())
            .bind(now.to_rfc3339())
            .fetch_one(&mut *tx)
            .await?;

            created.push(Guide {
                id: row.get("id"),
                name: guide.name,
                bio: guide.bio,
                image: guide.image,
                languages: guide.languages,
                location: guide.location,
                contact_info: guide.contact_info,
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Get a guide by ID
    pub async fn get_guide(&self, id: i64) -> Result<Option<Guide>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, bio, image, languages, location, contact_info, created_at, updated_at
            FROM guides
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Guide::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all guides
    pub async fn list_guides(&self) -> Result<Vec<Guide>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, bio, image, languages, location, contact_info, created_at, updated_at
            FROM guides
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Guide::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to a guide
    pub async fn update_guide(&self, id: i64, update: UpdateGuide) -> Result<Option<Guide>, DbError> {
        let Some(mut guide) = self.get_guide(id).await? else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            guide.name = name;
        }
        if let Some(bio) = update.bio {
            guide.bio = bio;
        }
        if let Some(image) = update.image {
            guide.image = Some(image);
        }
        if let Some(languages) = update.languages {
            guide.languages = languages;
        }
        if let Some(location) = update.location {
            guide.location = Some(location);
        }
        if let Some(contact_info) = update.contact_info {
            guide.contact_info = contact_info;
        }
        guide.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE guides
            SET name = ?, bio = ?, image = ?, languages = ?, location = ?,
                contact_info = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&guide.name)
        .bind(&guide.bio)
        .bind(&guide.image)
        .bind(&guide.languages)
        .bind(&guide.location)
        .bind(&guide.contact_info)
        .bind(guide.updated_at.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(guide))
    }

    /// Delete a guide
    pub async fn delete_guide(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM guides WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
