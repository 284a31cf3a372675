use async_trait::async_trait;
use common::BlogPost;

use crate::error::QueryError;

/// Read access to the blog collection over an established connection.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Every stored post, in the store's natural order.
    async fn find_all(&self) -> Result<Vec<BlogPost>, QueryError>;

    /// The first post whose slug matches `slug`, ignoring case and
    /// surrounding whitespace.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, QueryError>;

    /// Release the underlying client. Called once, at shutdown.
    async fn close(&self) {}
}
