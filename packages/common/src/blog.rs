use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published blog post as served to the site.
///
/// Field names follow the document store's camelCase layout so that the JSON
/// the site consumes is identical to the stored shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Hex-encoded document ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: Option<String>,
    #[schema(example = "Understanding Monorepos")]
    pub title: String,
    /// URL-friendly identifier. Expected to be unique, not enforced.
    #[schema(example = "understanding-monorepo")]
    pub slug: String,
    /// Full body as a single string.
    pub content: String,
    /// Publication date exactly as stored; not validated.
    #[schema(example = "2024-01-01")]
    pub date: String,
    pub tags: Vec<String>,
    /// Thumbnail image URL.
    pub thumbnail: String,
    /// Main image URL.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
