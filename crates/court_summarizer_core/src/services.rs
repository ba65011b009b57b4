//! crates/court_summarizer_core/src/services.rs
//!
//! The application services orchestrating the stores: summary ingestion,
//! owner-scoped retrieval and deletion, and credential-based auth.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{NewSummaryRecord, NewUserCredential, SummaryPayload, SummaryRecord, UserProfile};
use crate::ports::{BlobStore, CoreError, CoreResult, CredentialHasher, SummaryStore, UserStore};

//=========================================================================================
// Summary Service
//=========================================================================================

/// A source file attached to a submission.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Caller-supplied name; sanitized before it reaches the blob store.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A summary submission, before validation.
#[derive(Debug, Clone)]
pub struct SummarySubmission {
    pub owner_email: String,
    pub case_name: String,
    /// Defaults to `case_name` when absent.
    pub original_file_name: Option<String>,
    pub summary_file_name: String,
    pub summary_data: SummaryPayload,
    /// A pre-existing stored path, passed through when no file is attached.
    pub blob_path: Option<String>,
    pub file: Option<FileUpload>,
}

/// Orchestrates the summary record lifecycle: accept a submission, store the
/// attached file (if any) and the record, list per owner, fetch and delete.
pub struct SummaryService {
    store: Arc<dyn SummaryStore>,
    blobs: Arc<dyn BlobStore>,
}

impl SummaryService {
    pub fn new(store: Arc<dyn SummaryStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Validates and persists a submission.
    ///
    /// An attached file is written to the blob store before the record that
    /// references it is created. If the record write then fails the blob is
    /// orphaned; that partial state is accepted and not rolled back.
    pub async fn submit(&self, submission: SummarySubmission) -> CoreResult<SummaryRecord> {
        if submission.owner_email.trim().is_empty()
            || submission.case_name.trim().is_empty()
            || submission.summary_file_name.trim().is_empty()
        {
            return Err(CoreError::Validation("Required fields missing.".to_string()));
        }

        let blob_path = match submission.file {
            Some(file) => {
                let name = storage_name(&file.file_name);
                Some(self.blobs.write(&name, &file.bytes).await?)
            }
            None => submission.blob_path.filter(|p| !p.is_empty()),
        };

        let original_file_name = submission
            .original_file_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| submission.case_name.clone());

        self.store
            .create(NewSummaryRecord {
                owner_email: submission.owner_email,
                case_name: submission.case_name,
                original_file_name,
                summary_file_name: submission.summary_file_name,
                summary_data: submission.summary_data.into_normalized(),
                blob_path,
            })
            .await
    }

    /// All summaries for one owner, most recently created first.
    pub async fn list_by_owner(&self, owner_email: &str) -> CoreResult<Vec<SummaryRecord>> {
        self.store.find_by_owner(owner_email).await
    }

    /// Fetches one summary by id.
    ///
    /// Deliberately performs no ownership check: any caller holding a valid
    /// id may fetch the record (shareable-by-id).
    pub async fn get_by_id(&self, id: Uuid) -> CoreResult<SummaryRecord> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Summary not found.".to_string()))
    }

    /// Deletes a summary and, best-effort, its stored source file.
    ///
    /// The record delete is the authoritative, user-visible outcome; a blob
    /// that cannot be removed (typically already gone) is logged and ignored.
    pub async fn delete_by_id(&self, id: Uuid) -> CoreResult<()> {
        let record = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Summary not found.".to_string()))?;

        if let Some(path) = record.blob_path {
            if let Err(err) = self.blobs.delete(&path).await {
                warn!(summary_id = %id, blob_path = %path, error = %err,
                    "could not remove stored file for deleted summary");
            }
        }

        Ok(())
    }
}

/// Replaces everything outside `[A-Za-z0-9._-]` with an underscore.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Collision-resistant storage name: current time plus a random component,
/// with the sanitized caller-supplied name appended. Uniqueness is
/// overwhelmingly probable, not actively enforced.
fn storage_name(original: &str) -> String {
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        sanitize_file_name(original)
    )
}

//=========================================================================================
// Auth Service
//=========================================================================================

/// Signup and login against the user store. Credential verification only;
/// whether a caller stays "logged in" is the client's concern.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    /// Registers a new user. The email must not already be taken.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        occupation: &str,
    ) -> CoreResult<UserProfile> {
        if name.trim().is_empty()
            || email.trim().is_empty()
            || password.is_empty()
            || occupation.trim().is_empty()
        {
            return Err(CoreError::Validation("All fields are required.".to_string()));
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(CoreError::Conflict("Email already registered.".to_string()));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .create(NewUserCredential {
                name: name.to_string(),
                email: email.to_string(),
                occupation: occupation.to_string(),
                password_hash,
            })
            .await?;

        Ok(user.profile())
    }

    /// Verifies credentials and returns the profile.
    ///
    /// An unknown email and a wrong password produce the same error, so the
    /// response cannot be used to enumerate registered addresses.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<UserProfile> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CoreError::Validation(
                "Email and password are required.".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(CoreError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(CoreError::InvalidCredentials);
        }

        Ok(user.profile())
    }

    /// Backfills profile fields for a client-held identity.
    pub async fn lookup_profile(&self, email: &str) -> CoreResult<UserProfile> {
        self.users
            .find_by_email(email)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| CoreError::NotFound("User not found.".to_string()))
    }
}

//=========================================================================================
// Tests
//=========================================================================================
