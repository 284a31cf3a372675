use chrono::{DateTime, Utc};
use common::BlogPost;
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Collection name: the lowercased plural of the `Blog` model.
pub const COLLECTION: &str = "blogs";

/// A blog post as laid out in the document store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub title: String,
    pub slug: String,
    pub content: String,
    pub date: String, // free-form, as entered
    pub tags: Vec<String>,
    pub thumbnail: String,
    pub image: String,

    // Written by the ODM that inserts posts; raw inserts may lack them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

fn to_chrono(ts: bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts.timestamp_millis())
}

impl From<Document> for BlogPost {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()),
            title: doc.title,
            slug: doc.slug,
            content: doc.content,
            date: doc.date,
            tags: doc.tags,
            thumbnail: doc.thumbnail,
            image: doc.image,
            created_at: doc.created_at.and_then(to_chrono),
            updated_at: doc.updated_at.and_then(to_chrono),
        }
    }
}
