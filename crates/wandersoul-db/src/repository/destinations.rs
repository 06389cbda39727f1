//! Destination operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Destination, NewDestination, UpdateDestination};
use crate::repository::Database;

impl Database {
    // ==================== Destination Operations ====================

    /// Insert a batch of destinations atomically
    ///
    /// Either every destination is stored or none is.
    pub async fn insert_destinations(
        &self,
        destinations: Vec<NewDestination>,
    ) -> Result<Vec<Destination>, DbError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(destinations.len());

        for dest in destinations {
            let row = sqlx::query(
                r#"
                INSERT INTO destinations
                    (name, description, category, safety_rating, activities, image, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(&dest.name)
            .bind(&dest.description)
            .bind(&dest.category)
            .bind(dest.safety_rating)
            .bind(&dest.activities)
            .bind(&dest.image)
            .bind(now.to_rfc3339())
            .bind(now.to_rfc3339())
            .fetch_one(&mut *tx)
            .await?;

            created.push(Destination {
                id: row.get("id"),
                name: dest.name,
                description: dest.description,
                category: dest.category,
                safety_rating: dest.safety_rating,
                activities: dest.activities,
                image: dest.image,
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Get a destination by ID
    pub async fn get_destination(&self, id: i64) -> Result<Option<Destination>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, description, category, safety_rating, activities, image, created_at, updated_at
            FROM destinations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Destination::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List all destinations
    pub async fn list_destinations(&self) -> Result<Vec<Destination>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, category, safety_rating, activities, image, created_at, updated_at
            FROM destinations
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Destination::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to a destination
    pub async fn update_destination(
        &self,
        id: i64,
        update: UpdateDestination,
    ) -> Result<Option<Destination>, DbError> {
        let Some(mut dest) = self.get_destination(id).await? else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            dest.name = name;
        }
        if let Some(description) = update.description {
            dest.description = description;
        }
        if let Some(category) = update.category {
            dest.category = category;
        }
        if let Some(safety_rating) = update.safety_rating {
            dest.safety_rating = safety_rating;
        }
        if let Some(activities) = update.activities {
            dest.activities = activities;
        }
        if let Some(image) = update.image {
            dest.image = image;
        }
        dest.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE destinations
            SET name = ?, description = ?, category = ?, safety_rating = ?,
                activities = ?, image = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&dest.name)
        .bind(&dest.description)
        .bind(&dest.category)
        .bind(dest.safety_rating)
        .bind(&dest.activities)
        .bind(&dest.image)
        .bind(dest.updated_at.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(dest))
    }

    /// Delete a destination
    pub async fn delete_destination(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM destinations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
