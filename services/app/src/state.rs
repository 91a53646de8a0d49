//! services/app/src/state.rs
//!
//! Wires adapters into resource clients and resource clients into the
//! shared state containers. Built once at startup and cloned freely;
//! every field is an `Arc`.

use std::sync::Arc;

use mimea_core::containers::{
    BlogContainer, FeedbackContainer, GuidebookContainer, HistoryContainer, IdentifyContainer,
    LanguageContainer, PlantInfoContainer, ProfileContainer, RemedyContainer, SessionContainer,
};
use mimea_core::ports::{DocumentStore, FileStore};
use mimea_core::resources::{
    BlogClient, FeedbackClient, GuidebookClient, HistoryClient, PlantInfoClient, ProfileClient,
    RemedyClient,
};

use crate::adapters::{
    FilePreferenceStore, HttpContext, HttpDocumentStore, HttpFileStore, HttpIdentityService,
    HttpPlantClassifier,
};
use crate::config::Config;
use crate::error::AppError;

/// The shared application state, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SessionContainer>,
    pub profiles: Arc<ProfileContainer>,
    pub remedies: Arc<RemedyContainer>,
    pub blogs: Arc<BlogContainer>,
    pub history: Arc<HistoryContainer>,
    pub guidebooks: Arc<GuidebookContainer>,
    pub feedback: Arc<FeedbackContainer>,
    pub plant_info: Arc<PlantInfoContainer>,
    pub identify: Arc<IdentifyContainer>,
    pub language: Arc<LanguageContainer>,
}

impl AppState {
    pub fn from_config(config: Arc<Config>) -> Result<Self, AppError> {
        let http = reqwest::Client::new();
        let ctx = Arc::new(HttpContext::new(
            http.clone(),
            config.endpoint.clone(),
            config.project_id.clone(),
            config.api_key.clone(),
        ));

        let documents: Arc<dyn DocumentStore> = Arc::new(HttpDocumentStore::new(
            ctx.clone(),
            config.database_id.clone(),
        ));
        let files: Arc<dyn FileStore> =
            Arc::new(HttpFileStore::new(ctx.clone(), config.bucket_id.clone()));
        let account = Arc::new(HttpIdentityService::new(ctx.clone()));
        let classifier = Arc::new(HttpPlantClassifier::new(http, config.predict_url.clone()));
        let prefs = Arc::new(FilePreferenceStore::new(config.prefs_path.clone()));

        let session = Arc::new(SessionContainer::new(account));
        let profiles = Arc::new(ProfileContainer::new(ProfileClient::new(documents.clone())));
        let remedies = Arc::new(RemedyContainer::new(
            RemedyClient::new(documents.clone()),
            session.clone(),
            profiles.clone(),
        ));
        let blogs = Arc::new(BlogContainer::new(
            BlogClient::new(documents.clone()),
            session.clone(),
        ));
        let history = Arc::new(HistoryContainer::new(
            HistoryClient::new(documents.clone()),
            session.clone(),
        ));
        let guidebooks = Arc::new(GuidebookContainer::new(
            GuidebookClient::new(documents.clone(), files),
            session.clone(),
        ));
        let feedback = Arc::new(FeedbackContainer::new(
            FeedbackClient::new(documents.clone()),
            session.clone(),
        ));
        let plant_info = Arc::new(PlantInfoContainer::new(PlantInfoClient::new(documents)));
        let identify = Arc::new(IdentifyContainer::new(classifier, history.clone()));
        let language = Arc::new(LanguageContainer::new(prefs));

        Ok(Self {
            config,
            session,
            profiles,
            remedies,
            blogs,
            history,
            guidebooks,
            feedback,
            plant_info,
            identify,
            language,
        })
    }
}
