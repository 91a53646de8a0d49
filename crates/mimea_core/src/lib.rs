pub mod containers;
pub mod domain;
pub mod ports;
pub mod resources;

pub use domain::{
    BlogDocument, CommentDocument, FeedbackDocument, FeedbackDraft, FeedbackKind, FeedbackStatus,
    GuidebookDocument, GuidebookDraft, HistoryDocument, Identity, LikeDocument, PlantInfoDocument,
    PlantInfoDraft, Prediction, RemedyDocument, RemedyDraft, StoredFile, UserProfileDocument,
    UserProfileDraft, UserRole, Verification, VerificationRecord,
};
pub use ports::{
    DocumentStore, FileStore, Grant, IdentityService, ListQuery, PlantClassifier, PortError,
    PortResult, PreferenceStore, RawDocument, Scope,
};
