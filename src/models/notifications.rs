use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::common::resolve_id;
use super::listings::Listing;
use super::requests::AdoptionRequest;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: String,
    pub user_contact: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// 0 = unread, 1 = read
    pub read: i32,
}

impl Notification {
    /// Notice for the listing owner that someone asked to adopt their animal
    pub fn adoption_request(listing: &Listing, request: &AdoptionRequest) -> Self {
        Self {
            id: resolve_id(None),
            user_contact: listing.contact.clone(),
            message: format!(
                "New adoption request for {} from {}",
                listing.label(),
                request.contact
            ),
            created_at: request.created_at,
            read: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub contact: Option<String>,
}

impl NotificationQuery {
    pub fn contact(&self) -> Option<&str> {
        self.contact
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub updated: usize,
}

// Anything other than an array is treated as no ids at all
fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let ids = match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(ids)
}
