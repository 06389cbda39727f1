//! Request/Response DTOs

use serde::{Deserialize, Serialize};
use wandersoul_db::{
    Destination, Guide, NewDestination, NewGuide, UpdateDestination, UpdateGuide, User,
};

use crate::error::ApiError;
use crate::validation::non_empty;

// ==================== Account Types ====================

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub fname: Option<String>,
    pub sname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<i64>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Identity echo returned by `/protected` and `/admin`
#[derive(Serialize)]
pub struct WhoAmIResponse {
    pub message: String,
    pub user: UserResponse,
    pub role: String,
}

/// Update user request
///
/// Used both for self-updates and admin updates; only admins may set `role_id`.
#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    pub fname: Option<String>,
    pub sname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<i64>,
}

/// User response (without password)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub fname: String,
    pub sname: String,
    pub email: String,
    pub role_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            fname: u.fname,
            sname: u.sname,
            email: u.email,
            role_id: u.role.id(),
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

/// User list response
#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

/// Plain confirmation message
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ==================== Destination Types ====================

/// One destination in a batch create request
#[derive(Deserialize)]
pub struct DestinationInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub safety_rating: Option<f64>,
    pub activities: Option<String>,
    pub image: Option<String>,
}

impl DestinationInput {
    /// Require every field; a zero safety rating counts as missing
    pub fn into_new(self) -> Result<NewDestination, ApiError> {
        let label = self.name.clone().unwrap_or_else(|| "unnamed destination".to_string());
        let missing = || {
            ApiError::BadRequest(format!(
                "Invalid request, missing required data for {}",
                label
            ))
        };

        Ok(NewDestination {
            name: non_empty(self.name).ok_or_else(missing)?,
            description: non_empty(self.description).ok_or_else(missing)?,
            category: non_empty(self.category).ok_or_else(missing)?,
            safety_rating: self.safety_rating.filter(|r| *r != 0.0).ok_or_else(missing)?,
            activities: non_empty(self.activities).ok_or_else(missing)?,
            image: non_empty(self.image).ok_or_else(missing)?,
        })
    }

    /// Keep only the provided fields
    pub fn into_update(self) -> UpdateDestination {
        UpdateDestination {
            name: non_empty(self.name),
            description: non_empty(self.description),
            category: non_empty(self.category),
            safety_rating: self.safety_rating.filter(|r| *r != 0.0),
            activities: non_empty(self.activities),
            image: non_empty(self.image),
        }
    }
}

/// Destination list response
#[derive(Serialize)]
pub struct DestinationListResponse {
    pub destinations: Vec<Destination>,
}

/// Batch create response for destinations
#[derive(Serialize)]
pub struct CreatedDestinationsResponse {
    pub message: String,
    pub destinations: Vec<Destination>,
}

// ==================== Guide Types ====================

/// One guide in a batch create request
#[derive(Deserialize)]
pub struct GuideInput {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub languages: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
}

impl GuideInput {
    /// Require name, bio, languages and contact info
    pub fn into_new(self) -> Result<NewGuide, ApiError> {
        let label = self.name.clone().unwrap_or_else(|| "unnamed guide".to_string());
        let missing = || {
            ApiError::BadRequest(format!(
                "Invalid request, missing required data for {}",
                label
            ))
        };

        Ok(NewGuide {
            name: non_empty(self.name).ok_or_else(missing)?,
            bio: non_empty(self.bio).ok_or_else(missing)?,
            image: non_empty(self.image),
            languages: non_empty(self.languages).ok_or_else(missing)?,
            location: non_empty(self.location),
            contact_info: non_empty(self.contact_info).ok_or_else(missing)?,
        })
    }

    /// Keep only the provided fields
    pub fn into_update(self) -> UpdateGuide {
        UpdateGuide {
            name: non_empty(self.name),
            bio: non_empty(self.bio),
            image: non_empty(self.image),
            languages: non_empty(self.languages),
            location: non_empty(self.location),
            contact_info: non_empty(self.contact_info),
        }
    }
}

/// Guide list response
#[derive(Serialize)]
pub struct GuideListResponse {
    pub guides: Vec<Guide>,
}

/// Batch create response for guides
#[derive(Serialize)]
pub struct CreatedGuidesResponse {
    pub message: String,
    pub guides: Vec<Guide>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_destination() -> DestinationInput {
        DestinationInput {
            name: Some("Hvar".to_string()),
            description: Some("Island".to_string()),
            category: Some("island".to_string()),
            safety_rating: Some(4.0),
            activities: Some("sailing".to_string()),
            image: Some("hvar.jpg".to_string()),
        }
    }

    #[test]
    fn test_destination_requires_all_fields() {
        assert!(full_destination().into_new().is_ok());

        let mut input = full_destination();
        input.image = Some(String::new());
        let err = input.into_new().unwrap_err();
        assert!(err.to_string().contains("missing required data for Hvar"));

        let mut input = full_destination();
        input.safety_rating = Some(0.0);
        assert!(input.into_new().is_err());
    }

    #[test]
    fn test_guide_optional_fields() {
        let guide = GuideInput {
            name: Some("Ivo".to_string()),
            bio: Some("Local historian".to_string()),
            image: None,
            languages: Some("hr, en".to_string()),
            location: Some(String::new()),
            contact_info: Some("ivo@example.com".to_string()),
        }
        .into_new()
        .unwrap();

        assert!(guide.image.is_none());
        assert!(guide.location.is_none());
    }
}
