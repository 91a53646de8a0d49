//! crates/mimea_core/tests/guidebooks.rs
//!
//! Guidebook upload/download lifecycle across both collaborators: the blob
//! in the file store, the metadata document in the document store.

mod common;

use std::sync::Arc;

use common::{
    signed_in_session, InMemoryDocumentStore, InMemoryFileStore, InMemoryIdentityService,
};
use mimea_core::containers::GuidebookContainer;
use mimea_core::domain::GuidebookDraft;
use mimea_core::ports::{DocumentStore, FileStore};
use mimea_core::resources::GuidebookClient;

struct GuidebookEnv {
    store: Arc<InMemoryDocumentStore>,
    files: Arc<InMemoryFileStore>,
    container: GuidebookContainer,
}

async fn guidebook_env() -> GuidebookEnv {
    let store = InMemoryDocumentStore::new();
    let files = InMemoryFileStore::new();
    let identity = InMemoryIdentityService::new();
    let session = signed_in_session(&identity, "mutua@example.com", "Mutua").await;
    let container = GuidebookContainer::new(
        GuidebookClient::new(
            store.clone() as Arc<dyn DocumentStore>,
            files.clone() as Arc<dyn FileStore>,
        ),
        session,
    );
    GuidebookEnv {
        store,
        files,
        container,
    }
}

fn pdf_draft() -> GuidebookDraft {
    GuidebookDraft {
        title: "Medicinal trees of western Kenya".into(),
        description: "Field identification and preparation notes".into(),
        category: "field-guide".into(),
        tags: vec!["trees".into(), "field".into()],
    }
}

#[tokio::test]
async fn upload_stores_the_blob_and_the_metadata() {
    let env = guidebook_env().await;

    env.container
        .upload(&pdf_draft(), "trees.pdf", vec![0u8; 2048], "application/pdf")
        .await;

    let snapshot = env.container.snapshot();
    assert_eq!(snapshot.error, None);
    assert!(!env.container.is_uploading());
    assert_eq!(snapshot.items.len(), 1);
    let book = &snapshot.items[0];
    assert_eq!(book.file_name, "trees.pdf");
    assert_eq!(book.file_size, 2048);
    assert_eq!(book.file_type, "application/pdf");
    assert_eq!(book.uploader_name, "Mutua");
    assert_eq!(book.download_count, 0);
    assert_eq!(env.files.count(), 1);
}

#[tokio::test]
async fn empty_file_is_rejected_before_anything_is_stored() {
    let env = guidebook_env().await;

    env.container
        .upload(&pdf_draft(), "trees.pdf", Vec::new(), "application/pdf")
        .await;

    assert_eq!(
        env.container.snapshot().error.as_deref(),
        Some("Selected file is empty")
    );
    assert_eq!(env.files.count(), 0);
    assert_eq!(env.store.count("guidebooks"), 0);
}

#[tokio::test]
async fn download_bumps_the_counter_and_returns_a_permanent_link() {
    let env = guidebook_env().await;
    env.container
        .upload(&pdf_draft(), "trees.pdf", vec![0u8; 64], "application/pdf")
        .await;
    let book = env.container.snapshot().items[0].clone();

    let url = env.container.download(&book.id, &book.file_id).await;

    assert_eq!(
        url.as_deref(),
        Some(format!("memory://files/{}/download", book.file_id).as_str())
    );
    assert_eq!(env.container.snapshot().items[0].download_count, 1);
}

#[tokio::test]
async fn delete_removes_the_blob_and_the_document() {
    let env = guidebook_env().await;
    env.container
        .upload(&pdf_draft(), "trees.pdf", vec![0u8; 64], "application/pdf")
        .await;
    let book = env.container.snapshot().items[0].clone();

    env.container.delete(&book.id, &book.file_id).await;

    assert_eq!(env.container.snapshot().error, None);
    assert!(env.container.snapshot().items.is_empty());
    assert_eq!(env.files.count(), 0);
    assert_eq!(env.store.count("guidebooks"), 0);
}

#[tokio::test]
async fn search_spans_title_description_and_category() {
    let env = guidebook_env().await;
    env.container
        .upload(&pdf_draft(), "trees.pdf", vec![0u8; 64], "application/pdf")
        .await;
    let mut other = pdf_draft();
    other.title = "Drying and storage".into();
    other.description = "Preserving harvested bark".into();
    other.category = "preparation".into();
    env.container
        .upload(&other, "drying.pdf", vec![0u8; 64], "application/pdf")
        .await;

    env.container.search("preparation").await;
    let snapshot = env.container.snapshot();
    assert_eq!(snapshot.error, None);
    // Matches both: one on description text, one on category.
    assert_eq!(snapshot.items.len(), 2);

    env.container.search("bark").await;
    assert_eq!(env.container.snapshot().items.len(), 1);
}
