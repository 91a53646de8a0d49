//! crates/mimea_core/src/containers/blogs.rs
//!
//! Blog container: posts plus their like/comment interactions. Every
//! mutation reconciles by refetching the list, so the denormalized counters
//! shown to screens always come from the collaborator, never from local
//! arithmetic.

use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::containers::{ContainerState, SessionContainer, StateCell};
use crate::domain::{BlogDocument, CommentDocument};
use crate::resources::BlogClient;

pub struct BlogContainer {
    client: BlogClient,
    session: Arc<SessionContainer>,
    state: StateCell<BlogDocument>,
    search_query: RwLock<String>,
}

impl BlogContainer {
    pub fn new(client: BlogClient, session: Arc<SessionContainer>) -> Self {
        Self {
            client,
            session,
            state: StateCell::new(),
            search_query: RwLock::new(String::new()),
        }
    }

    pub fn snapshot(&self) -> ContainerState<BlogDocument> {
        self.state.snapshot()
    }

    pub fn search_query(&self) -> String {
        self.search_query
            .read()
            .expect("search query lock poisoned")
            .clone()
    }

    pub fn set_search_query(&self, query: &str) {
        *self
            .search_query
            .write()
            .expect("search query lock poisoned") = query.to_string();
    }

    pub async fn fetch(&self) {
        self.state.begin();
        match self.client.list().await {
            Ok(blogs) => self.state.finish(blogs),
            Err(e) => self.fail(format!("Failed to fetch blogs: {e}")),
        }
    }

    pub async fn search(&self, query: &str) {
        self.set_search_query(query);
        self.state.begin();
        match self.client.search(query).await {
            Ok(blogs) => self.state.finish(blogs),
            Err(e) => self.fail(format!("Failed to search blogs: {e}")),
        }
    }

    pub async fn create(&self, title: &str, content: &str, category: &str) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        self.state.begin();
        match self
            .client
            .create(title, content, category, &identity.name, &identity.id)
            .await
        {
            Ok(_) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to create blog: {e}")),
        }
    }

    /// Toggles the current user's like and refetches for the updated counts.
    pub async fn toggle_like(&self, blog_id: &str) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        match self.client.toggle_like(blog_id, &identity.id).await {
            Ok(_) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to toggle like: {e}")),
        }
    }

    /// Whether the current user has liked the given blog. Failures are
    /// reported as "not liked" rather than surfaced, matching the
    /// best-effort nature of the indicator.
    pub async fn has_liked(&self, blog_id: &str) -> bool {
        let Some(identity) = self.session.current_identity() else {
            return false;
        };
        self.client
            .has_liked(blog_id, &identity.id)
            .await
            .unwrap_or(false)
    }

    pub async fn add_comment(&self, blog_id: &str, content: &str) {
        let Some(identity) = self.session.current_identity() else {
            self.fail("User not authenticated".into());
            return;
        };
        match self
            .client
            .add_comment(blog_id, &identity.id, &identity.name, content)
            .await
        {
            Ok(_) => self.fetch().await,
            Err(e) => self.fail(format!("Failed to add comment: {e}")),
        }
    }

    /// Returns the comments for one blog directly; the list is not cached in
    /// this container's `items`.
    pub async fn comments(&self, blog_id: &str) -> Vec<CommentDocument> {
        match self.client.comments(blog_id).await {
            Ok(comments) => comments,
            Err(e) => {
                self.fail(format!("Failed to fetch comments: {e}"));
                Vec::new()
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    fn fail(&self, message: String) {
        warn!(%message, "blog action failed");
        self.state.fail(message);
    }
}
