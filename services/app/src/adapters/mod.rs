pub mod account;
pub mod classifier;
pub mod documents;
pub mod http;
pub mod prefs;
pub mod storage;

pub use account::HttpIdentityService;
pub use classifier::HttpPlantClassifier;
pub use documents::HttpDocumentStore;
pub use http::HttpContext;
pub use prefs::FilePreferenceStore;
pub use storage::HttpFileStore;
