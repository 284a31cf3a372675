use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::BlogPost;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, instrument};

use super::connection::Connector;
use crate::config::DatabaseConfig;
use crate::entity::blog;
use crate::error::{ConnectionError, QueryError};
use crate::store::BlogStore;

const APP_NAME: &str = "folio-server";

/// Connects to MongoDB with the official async driver.
///
/// Building the client does not contact the server: the driver discovers the
/// deployment in the background and queries wait for it, so a fresh client
/// can be handed out straight away. Set `ping_on_connect` to verify the
/// deployment before the connection is considered established.
#[derive(Clone, Copy, Debug, Default)]
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(
        &self,
        uri: &str,
        config: &DatabaseConfig,
    ) -> Result<Arc<dyn BlogStore>, ConnectionError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| ConnectionError::InvalidUri(e.to_string()))?;

        options.app_name.get_or_insert_with(|| APP_NAME.to_string());
        if let Some(secs) = config.connect_timeout_secs {
            options.connect_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = config.server_selection_timeout_secs {
            options.server_selection_timeout = Some(Duration::from_secs(secs));
        }

        let client = Client::with_options(options)
            .map_err(|e| ConnectionError::Handshake(e.to_string()))?;

        if config.ping_on_connect {
            client
                .database(&config.name)
                .run_command(doc! { "ping": 1 })
                .await
                .map_err(|e| ConnectionError::Handshake(e.to_string()))?;
            debug!(database = %config.name, "Ping succeeded");
        }

        Ok(Arc::new(MongoBlogStore::new(client, &config.name)))
    }
}

/// Matches stored slugs equal to `slug` ignoring case and surrounding
/// whitespace on either side. `None` if no stored slug can match, since the
/// server rejects patterns containing NUL.
fn slug_filter(slug: &str) -> Option<Document> {
    if slug.contains('\0') {
        return None;
    }
    let pattern = format!(r"^\s*{}\s*$", escape_regex(slug.trim()));
    Some(doc! { "slug": { "$regex": pattern, "$options": "i" } })
}

fn escape_regex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '-'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// [`BlogStore`] over the `blogs` collection of one database.
pub struct MongoBlogStore {
    client: Client,
    blogs: Collection<blog::Document>,
}

impl MongoBlogStore {
    pub fn new(client: Client, database: &str) -> Self {
        let blogs = client.database(database).collection(blog::COLLECTION);
        Self { client, blogs }
    }
}

#[async_trait]
impl BlogStore for MongoBlogStore {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<BlogPost>, QueryError> {
        let cursor = self.blogs.find(doc! {}).await?;
        let documents: Vec<blog::Document> = cursor.try_collect().await?;
        debug!(count = documents.len(), "Fetched blog posts");
        Ok(documents.into_iter().map(BlogPost::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, QueryError> {
        let Some(filter) = slug_filter(slug) else {
            return Ok(None);
        };
        let found = self.blogs.find_one(filter).await?;
        Ok(found.map(BlogPost::from))
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
