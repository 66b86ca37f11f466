//! Wire types for the Fairway REST API.
//!
//! Request and response bodies are mirrored as serde records so the
//! session client never pokes at raw JSON except for the shallow-merge
//! on profile update, where the server returns a partial user record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unit used for distances in course and score views.
///
/// Unknown input normalises to `Yards`, matching the profile-update
/// fallback on the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Meters,
    #[default]
    Yards,
}

impl DistanceUnit {
    /// Parse a user-supplied unit string, falling back to `Yards`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim() {
            "meters" => Self::Meters,
            _ => Self::Yards,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Yards => "yards",
        }
    }
}

/// Account record as returned by `/auth/me`, `/auth/login`, and
/// `/auth/register`. Replaced wholesale on fetch; merged field-wise on
/// profile update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Shallow-merge a partial user record (a JSON object of updated
    /// fields) over this one. Unknown or undecodable patches leave the
    /// record unchanged.
    pub fn merged(&self, patch: &Value) -> Self {
        let Ok(Value::Object(mut base)) = serde_json::to_value(self) else {
            return self.clone();
        };
        if let Value::Object(fields) = patch {
            for (key, value) in fields {
                base.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(Value::Object(base)).unwrap_or_else(|_| self.clone())
    }
}

/// `POST /auth/login` request body.
#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` request body.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_unit: Option<DistanceUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Successful login/register response.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// Server-directed follow-up action carried in a `/auth/me` response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionRequired {
    /// Account deactivated; the client must end the session.
    Logout,
    /// Permissions changed; the client must exchange its token.
    TokenRefresh,
}

/// `GET /auth/me` response: either a user record or an action directive.
#[derive(Debug, Default, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub action_required: Option<ActionRequired>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /auth/refresh` response.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Raw profile form input, before validation and normalisation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub sex: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub postal_code: String,
    pub timezone: String,
    pub distance_unit: String,
}

/// `PUT /users/profile` request body. Empty optional fields are stripped
/// rather than sent as nulls.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfilePayload {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub distance_unit: DistanceUnit,
}

/// `PUT /users/profile` success response; `data` holds the updated
/// fields to merge into the cached user.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
}
