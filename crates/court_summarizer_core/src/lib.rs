pub mod domain;
pub mod ports;
pub mod services;

pub use domain::{
    NewSummaryRecord, NewUserCredential, SummaryPayload, SummaryRecord, UserCredential, UserProfile,
};
pub use ports::{BlobStore, CoreError, CoreResult, CredentialHasher, SummaryStore, UserStore};
pub use services::{AuthService, FileUpload, SummaryService, SummarySubmission};
