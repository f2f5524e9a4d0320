use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CategoryId;

/// A published content item.
///
/// `feature_until` is the only piece of Hot Sheet state attached to a post.
/// When it is `None` the post never shows up in the widget, no matter how
/// the rest of the post looks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// Permalink the widget links to.
    pub url: String,
    pub categories: Vec<CategoryId>,
    pub feature_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

/// Input for updating an existing post. All fields are optional for partial updates.
///
/// The feature date is deliberately absent: it is edited through
/// [`FeatureDateInput`] so the free-text parsing rules always apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub url: Option<String>,
    /// Replaces the full membership set when present.
    pub categories: Option<Vec<CategoryId>>,
}

/// The editor's free-text "feature this post until" field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureDateInput {
    #[serde(default)]
    pub date: String,
}
