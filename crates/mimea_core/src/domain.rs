//! crates/mimea_core/src/domain.rs
//!
//! Defines the core data structures for the application: the remote documents
//! the client reads and writes, and the drafts it submits.
//!
//! Wire field names are preserved as the backing collections store them: the
//! blog, like, comment and guidebook collections use camelCase attributes,
//! everything else uses snake_case. Serde renames encode this, so a decoded
//! struct round-trips to exactly the document the collaborator holds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

//=========================================================================================
// Identity & UserProfile
//=========================================================================================

/// The authenticated principal, as returned by the identity collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    /// Arbitrary preference bag. Used to persist the terms-acceptance flag
    /// plus its timestamp.
    #[serde(default)]
    pub prefs: Value,
}

impl Identity {
    /// Whether this identity has recorded acceptance of the terms.
    pub fn terms_accepted(&self) -> bool {
        self.prefs
            .get("terms_accepted")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Role tag on a user profile. Immutable after profile creation; there is no
/// role-change operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Normal,
    Herbalist,
}

/// One-to-one extension of an [`Identity`], created once at signup time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileDocument {
    pub id: String,
    pub user_id: String,
    pub user_type: UserRole,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the user when creating or editing a profile.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileDraft {
    pub user_id: String,
    pub user_type: UserRole,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub experience_years: Option<u32>,
    pub specializations: Vec<String>,
    pub certifications: Vec<String>,
}

//=========================================================================================
// Remedy & verification
//=========================================================================================

/// The four-field verification group on a remedy document.
///
/// The fields are either all null (unverified) or all populated (verified);
/// a partially-set record indicates a corrupt document and is rejected at
/// decode time by the remedy resource client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub verified: bool,
    #[serde(default)]
    pub verified_by_id: Option<String>,
    #[serde(default)]
    pub verified_by_name: Option<String>,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
}

/// A consistent view of a [`VerificationRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Unverified,
    Verified {
        by_id: String,
        by_name: String,
        at: DateTime<Utc>,
    },
}

impl VerificationRecord {
    pub fn unverified() -> Self {
        Self {
            verified: false,
            verified_by_id: None,
            verified_by_name: None,
            verified_at: None,
        }
    }

    pub fn verified(by_id: String, by_name: String, at: DateTime<Utc>) -> Self {
        Self {
            verified: true,
            verified_by_id: Some(by_id),
            verified_by_name: Some(by_name),
            verified_at: Some(at),
        }
    }

    /// Returns the consistent state, or `None` when the record is partially
    /// populated.
    pub fn state(&self) -> Option<Verification> {
        match (
            self.verified,
            &self.verified_by_id,
            &self.verified_by_name,
            &self.verified_at,
        ) {
            (false, None, None, None) => Some(Verification::Unverified),
            (true, Some(by_id), Some(by_name), Some(at)) => Some(Verification::Verified {
                by_id: by_id.clone(),
                by_name: by_name.clone(),
                at: *at,
            }),
            _ => None,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.state().is_some()
    }
}

/// A community-submitted plant-use record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemedyDocument {
    pub id: String,
    pub title: String,
    pub common_name: String,
    pub plant_name: String,
    pub scientific_name: String,
    pub local_name: String,
    pub preparation_method: String,
    pub usage_instructions: String,
    #[serde(default)]
    pub ailments_treated: String,
    #[serde(default)]
    pub cautions: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub verification: VerificationRecord,
}

/// User-supplied remedy fields. Optional fields default to empty strings so
/// a minimal submission stores empties rather than failing validation.
#[derive(Debug, Clone, Default)]
pub struct RemedyDraft {
    pub title: String,
    pub common_name: String,
    pub plant_name: String,
    pub scientific_name: String,
    pub local_name: String,
    pub preparation_method: String,
    pub usage_instructions: String,
    pub ailments_treated: Option<String>,
    pub cautions: Option<String>,
    pub image_url: Option<String>,
}

//=========================================================================================
// Blog, Like, Comment
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: String,
    pub category: String,
    pub read_time: String,
    /// Denormalized counters, kept in step with the like/comment collections
    /// via atomic server-side increments.
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A (blog, user) like row, unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeDocument {
    pub id: String,
    pub blog_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDocument {
    pub id: String,
    pub blog_id: String,
    pub user_id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Guidebook
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidebookDocument {
    pub id: String,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub file_id: String,
    pub file_url: String,
    pub file_size: u64,
    pub file_type: String,
    pub uploaded_by: String,
    pub uploader_name: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub download_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-supplied guidebook metadata; the file itself travels separately.
#[derive(Debug, Clone)]
pub struct GuidebookDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// A file held by the blob-store collaborator.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

//=========================================================================================
// History & prediction
//=========================================================================================

/// One past identification, owned exclusively by the user who created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDocument {
    pub id: String,
    pub user_id: String,
    pub plant_name: String,
    /// Classifier confidence, 0–100.
    pub confidence: f64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Result of one image classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_name: String,
    /// 0–100.
    pub confidence: f64,
}

//=========================================================================================
// Prediction feedback
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Incorrect,
    PartiallyCorrect,
    MissingInfo,
}

/// Administrative review state. Transitions are triggered outside this
/// client; the update call exists for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    Pending,
    Reviewed,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackDocument {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub predicted_class: String,
    pub confidence_score: f64,
    pub image_uri: String,
    pub feedback_type: FeedbackKind,
    #[serde(default)]
    pub suggested_correct_name: Option<String>,
    #[serde(default)]
    pub additional_comments: Option<String>,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FeedbackDraft {
    pub predicted_class: String,
    pub confidence_score: f64,
    pub image_uri: String,
    pub feedback_type: FeedbackKind,
    pub suggested_correct_name: Option<String>,
    pub additional_comments: Option<String>,
}

//=========================================================================================
// Plant reference data
//=========================================================================================

/// Reference data keyed by the classifier's class-name string. Read-only
/// from this client's perspective apart from administrative upkeep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantInfoDocument {
    pub id: String,
    /// Wire name kept as the collection defines it.
    #[serde(rename = "class_names")]
    pub class_name: String,
    pub common_name: String,
    pub scientific_name: String,
    #[serde(default)]
    pub luhya_name: Option<String>,
    pub ailment_treated: String,
    pub preparation_method: String,
    pub dosage: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrative draft for seeding or correcting plant reference data.
#[derive(Debug, Clone)]
pub struct PlantInfoDraft {
    pub class_name: String,
    pub common_name: String,
    pub scientific_name: String,
    pub luhya_name: Option<String>,
    pub ailment_treated: String,
    pub preparation_method: String,
    pub dosage: String,
}
