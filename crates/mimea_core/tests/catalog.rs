//! crates/mimea_core/tests/catalog.rs
//!
//! Plant reference data and prediction feedback.

mod common;

use std::sync::Arc;

use common::{
    signed_in_session, InMemoryDocumentStore, InMemoryIdentityService, InMemoryPreferenceStore,
};
use mimea_core::containers::{FeedbackContainer, LanguageContainer, PlantInfoContainer};
use mimea_core::domain::{FeedbackDraft, FeedbackKind, FeedbackStatus, PlantInfoDraft};
use mimea_core::ports::DocumentStore;
use mimea_core::resources::{FeedbackClient, PlantInfoClient};

fn plant_client(store: &Arc<InMemoryDocumentStore>) -> PlantInfoClient {
    PlantInfoClient::new(store.clone() as Arc<dyn DocumentStore>)
}

fn aloe_entry() -> PlantInfoDraft {
    PlantInfoDraft {
        class_name: "Aloe Vera".into(),
        common_name: "Aloe".into(),
        scientific_name: "Aloe barbadensis".into(),
        luhya_name: Some("Ekhafusi".into()),
        ailment_treated: "burns and skin irritation".into(),
        preparation_method: "Apply fresh gel".into(),
        dosage: "Twice daily".into(),
    }
}

#[tokio::test]
async fn lookup_finds_the_entry_for_a_classifier_class_name() {
    let store = InMemoryDocumentStore::new();
    let client = plant_client(&store);
    client.add(&aloe_entry()).await.unwrap();

    let plants = PlantInfoContainer::new(client);
    let info = plants.lookup("Aloe Vera").await.unwrap();
    assert_eq!(info.common_name, "Aloe");
    assert_eq!(info.luhya_name.as_deref(), Some("Ekhafusi"));

    assert!(plants.lookup("Unknown Plant").await.is_none());
    // A miss is an absence, not an error.
    assert_eq!(plants.snapshot().error, None);
}

#[tokio::test]
async fn fetch_orders_plants_by_common_name() {
    let store = InMemoryDocumentStore::new();
    let client = plant_client(&store);
    let mut neem = aloe_entry();
    neem.class_name = "Neem".into();
    neem.common_name = "Neem".into();
    client.add(&neem).await.unwrap();
    client.add(&aloe_entry()).await.unwrap();

    let plants = PlantInfoContainer::new(client);
    plants.fetch().await;

    let names: Vec<String> = plants
        .snapshot()
        .items
        .iter()
        .map(|p| p.common_name.clone())
        .collect();
    assert_eq!(names, vec!["Aloe".to_string(), "Neem".to_string()]);
}

#[test]
fn language_selection_persists_across_container_instances() {
    let prefs = InMemoryPreferenceStore::new();

    let language = LanguageContainer::new(prefs.clone());
    assert_eq!(language.current(), "en");
    language.set("sw");

    let reloaded = LanguageContainer::new(prefs);
    assert_eq!(reloaded.current(), "sw");
}

#[tokio::test]
async fn submitted_feedback_appears_in_the_users_history_as_pending() {
    let store = InMemoryDocumentStore::new();
    let identity = InMemoryIdentityService::new();
    let session = signed_in_session(&identity, "naliaka@example.com", "Naliaka").await;
    let feedback = FeedbackContainer::new(
        FeedbackClient::new(store.clone() as Arc<dyn DocumentStore>),
        session,
    );

    feedback
        .submit(&FeedbackDraft {
            predicted_class: "Aloe Vera".into(),
            confidence_score: 54.0,
            image_uri: "file:///photos/leaf.jpg".into(),
            feedback_type: FeedbackKind::Incorrect,
            suggested_correct_name: Some("Agave".into()),
            additional_comments: None,
        })
        .await;

    let snapshot = feedback.snapshot();
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].status, FeedbackStatus::Pending);
    assert_eq!(snapshot.items[0].user_name, "Naliaka");
    assert_eq!(
        snapshot.items[0].suggested_correct_name.as_deref(),
        Some("Agave")
    );
}

#[tokio::test]
async fn reviewing_feedback_removes_it_from_the_pending_queue() {
    let store = InMemoryDocumentStore::new();
    let identity = InMemoryIdentityService::new();
    let session = signed_in_session(&identity, "naliaka@example.com", "Naliaka").await;
    let feedback = FeedbackContainer::new(
        FeedbackClient::new(store.clone() as Arc<dyn DocumentStore>),
        session,
    );
    feedback
        .submit(&FeedbackDraft {
            predicted_class: "Neem".into(),
            confidence_score: 61.0,
            image_uri: "file:///photos/neem.jpg".into(),
            feedback_type: FeedbackKind::MissingInfo,
            suggested_correct_name: None,
            additional_comments: Some("No dosage shown".into()),
        })
        .await;
    let feedback_id = feedback.snapshot().items[0].id.clone();

    feedback.fetch_pending().await;
    assert_eq!(feedback.snapshot().items.len(), 1);

    feedback
        .set_status(&feedback_id, FeedbackStatus::Reviewed)
        .await;

    // set_status refetches the pending queue, which no longer holds it.
    let snapshot = feedback.snapshot();
    assert_eq!(snapshot.error, None);
    assert!(snapshot.items.is_empty());
}
