//! crates/mimea_core/src/resources/blogs.rs
//!
//! Resource client for blogs and their associated like and comment
//! collections.
//!
//! The like toggle deliberately avoids the query-then-act pattern: like rows
//! carry a deterministic id derived from the (blog, user) pair, so creating
//! an existing like fails with a conflict at the store instead of silently
//! producing a duplicate row, and the denormalized counters are adjusted with
//! the store's atomic server-side increment. Two concurrent toggles for the
//! same pair therefore net out, and the counter cannot drift from the true
//! row count.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{BlogDocument, CommentDocument, LikeDocument};
use crate::ports::{DocumentStore, Grant, ListQuery, PortError, PortResult, Scope};

pub const BLOG_COLLECTION: &str = "blogs";
pub const LIKE_COLLECTION: &str = "blog_likes";
pub const COMMENT_COLLECTION: &str = "blog_comments";

pub const BLOG_PAGE_SIZE: u32 = 50;

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

#[derive(Clone)]
pub struct BlogClient {
    store: Arc<dyn DocumentStore>,
}

impl BlogClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        title: &str,
        content: &str,
        category: &str,
        author: &str,
        author_id: &str,
    ) -> PortResult<BlogDocument> {
        let read_time = format!(
            "{} min read",
            (content.split_whitespace().count() as f64 / 200.0).ceil().max(1.0) as u64
        );
        let now = Utc::now();
        let data = json!({
            "title": title,
            "content": content,
            "author": author,
            "authorId": author_id,
            "category": category,
            "readTime": read_time,
            "likesCount": 0,
            "commentsCount": 0,
            "createdAt": now,
            "updatedAt": now,
        });
        // Everyone may update so the counter fields stay reachable; only the
        // author may edit content or delete.
        let grants = [
            Grant::Read(Scope::Any),
            Grant::Update(Scope::Any),
            Grant::Update(Scope::User(author_id.into())),
            Grant::Delete(Scope::User(author_id.into())),
        ];
        let raw = self.store.create(BLOG_COLLECTION, None, data, &grants).await?;
        super::decode(raw)
    }

    pub async fn list(&self) -> PortResult<Vec<BlogDocument>> {
        let raws = self
            .store
            .list(
                BLOG_COLLECTION,
                ListQuery::new().order_desc("createdAt").limit(BLOG_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }

    /// Full-text search on titles; an empty query is equivalent to `list`.
    pub async fn search(&self, query: &str) -> PortResult<Vec<BlogDocument>> {
        if query.trim().is_empty() {
            return self.list().await;
        }
        let raws = self
            .store
            .list(
                BLOG_COLLECTION,
                ListQuery::new()
                    .search(&["title"], query)
                    .order_desc("createdAt")
                    .limit(BLOG_PAGE_SIZE),
            )
            .await?;
        super::decode_all(raws)
    }

    /// Partial update of a blog's own fields. Last-write-wins on overlap.
    pub async fn update(&self, blog_id: &str, patch: Value) -> PortResult<BlogDocument> {
        let raw = self.store.update(BLOG_COLLECTION, blog_id, patch).await?;
        super::decode(raw)
    }

    /// Toggles the (blog, user) like row and adjusts `likesCount` to match.
    ///
    /// A create that loses to an existing row conflicts; the caller then
    /// deletes. A delete that finds the row already gone lost a concurrent
    /// race and skips the counter adjustment, since the winner already
    /// accounted for the row.
    pub async fn toggle_like(&self, blog_id: &str, user_id: &str) -> PortResult<LikeToggle> {
        let like_id = like_document_id(blog_id, user_id);
        let data = json!({
            "blogId": blog_id,
            "userId": user_id,
            "createdAt": Utc::now(),
        });
        let grants = [
            Grant::Read(Scope::Any),
            Grant::Update(Scope::User(user_id.into())),
            Grant::Delete(Scope::User(user_id.into())),
        ];
        match self
            .store
            .create(LIKE_COLLECTION, Some(&like_id), data, &grants)
            .await
        {
            Ok(_) => {
                self.store
                    .increment(BLOG_COLLECTION, blog_id, "likesCount", 1)
                    .await?;
                debug!(blog = %blog_id, user = %user_id, "blog liked");
                Ok(LikeToggle::Liked)
            }
            Err(PortError::Conflict(_)) => {
                match self.store.delete(LIKE_COLLECTION, &like_id).await {
                    Ok(()) => {
                        self.store
                            .increment(BLOG_COLLECTION, blog_id, "likesCount", -1)
                            .await?;
                        debug!(blog = %blog_id, user = %user_id, "blog unliked");
                        Ok(LikeToggle::Unliked)
                    }
                    Err(PortError::NotFound(_)) => Ok(LikeToggle::Unliked),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn has_liked(&self, blog_id: &str, user_id: &str) -> PortResult<bool> {
        let like_id = like_document_id(blog_id, user_id);
        match self.store.get(LIKE_COLLECTION, &like_id).await {
            Ok(_) => Ok(true),
            Err(PortError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn likes(&self, blog_id: &str) -> PortResult<Vec<LikeDocument>> {
        let raws = self
            .store
            .list(LIKE_COLLECTION, ListQuery::new().equal("blogId", blog_id))
            .await?;
        super::decode_all(raws)
    }

    /// Appends a comment and bumps the parent's `commentsCount`.
    pub async fn add_comment(
        &self,
        blog_id: &str,
        user_id: &str,
        author: &str,
        content: &str,
    ) -> PortResult<CommentDocument> {
        let data = json!({
            "blogId": blog_id,
            "userId": user_id,
            "author": author,
            "content": content,
            "createdAt": Utc::now(),
        });
        let grants = [
            Grant::Read(Scope::Any),
            Grant::Update(Scope::User(user_id.into())),
            Grant::Delete(Scope::User(user_id.into())),
        ];
        let raw = self
            .store
            .create(COMMENT_COLLECTION, None, data, &grants)
            .await?;
        self.store
            .increment(BLOG_COLLECTION, blog_id, "commentsCount", 1)
            .await?;
        super::decode(raw)
    }

    pub async fn comments(&self, blog_id: &str) -> PortResult<Vec<CommentDocument>> {
        let raws = self
            .store
            .list(
                COMMENT_COLLECTION,
                ListQuery::new()
                    .equal("blogId", blog_id)
                    .order_desc("createdAt"),
            )
            .await?;
        super::decode_all(raws)
    }
}

/// Deterministic like-row id for a (blog, user) pair. UUIDv5 keeps the id
/// within the collaborator's id constraints while making the pair unique by
/// construction.
pub fn like_document_id(blog_id: &str, user_id: &str) -> String {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("{blog_id}:{user_id}").as_bytes(),
    )
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_id_is_deterministic_per_pair() {
        let a = like_document_id("blog1", "user1");
        let b = like_document_id("blog1", "user1");
        assert_eq!(a, b);
        assert_ne!(a, like_document_id("blog1", "user2"));
        assert_ne!(a, like_document_id("blog2", "user1"));
    }

    #[test]
    fn like_id_does_not_collide_on_delimiter_shift() {
        // ("ab", "c") and ("a", "bc") must hash differently.
        assert_ne!(like_document_id("ab", "c"), like_document_id("a", "bc"));
    }
}
