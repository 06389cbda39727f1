//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;

/// Error type for parsing models from raw column values
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidUserRole(i64),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidUserRole(id) => write!(f, "Invalid user role: {}", id),
        }
    }
}

impl std::error::Error for ParseError {}

/// User role, stored and transmitted as its numeric id
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "i64", into = "i64")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn id(&self) -> i64 {
        match self {
            UserRole::Admin => 1,
            UserRole::User => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl TryFrom<i64> for UserRole {
    type Error = ParseError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(UserRole::Admin),
            2 => Ok(UserRole::User),
            other => Err(ParseError::InvalidUserRole(other)),
        }
    }
}

impl From<UserRole> for i64 {
    fn from(role: UserRole) -> Self {
        role.id()
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub fname: String,
    pub sname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fname: String,
    pub sname: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Update user (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub fname: Option<String>,
    pub sname: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
}

/// Travel destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub safety_rating: f64,
    pub activities: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New destination (for insertion)
#[derive(Debug, Clone)]
pub struct NewDestination {
    pub name: String,
    pub description: String,
    pub category: String,
    pub safety_rating: f64,
    pub activities: String,
    pub image: String,
}

/// Update destination (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateDestination {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub safety_rating: Option<f64>,
    pub activities: Option<String>,
    pub image: Option<String>,
}

/// Local guide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    pub id: i64,
    pub name: String,
    pub bio: String,
    pub image: Option<String>,
    pub languages: String,
    pub location: Option<String>,
    pub contact_info: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New guide (for insertion)
#[derive(Debug, Clone)]
pub struct NewGuide {
    pub name: String,
    pub bio: String,
    pub image: Option<String>,
    pub languages: String,
    pub location: Option<String>,
    pub contact_info: String,
}

/// Update guide (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateGuide {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub languages: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
}

// ==================== TryFrom Implementations ====================

/// Read an RFC 3339 timestamp column, falling back to the current time
fn parse_datetime_or_now(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let role_id: i64 = row.try_get("role_id")?;
        Ok(User {
            id: row.try_get("id")?,
            fname: row.try_get("fname")?,
            sname: row.try_get("sname")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: UserRole::try_from(role_id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "role_id".to_string(),
                source: Box::new(e),
            })?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Destination {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Destination {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            safety_rating: row.try_get("safety_rating")?,
            activities: row.try_get("activities")?,
            image: row.try_get("image")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Guide {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Guide {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            bio: row.try_get("bio")?,
            image: row.try_get("image")?,
            languages: row.try_get("languages")?,
            location: row.try_get("location")?,
            contact_info: row.try_get("contact_info")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
