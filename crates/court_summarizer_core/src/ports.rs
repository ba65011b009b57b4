//! crates/court_summarizer_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or disks.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewSummaryRecord, NewUserCredential, SummaryRecord, UserCredential};

//=========================================================================================
// Error Taxonomy
//=========================================================================================

/// The error taxonomy shared by all core operations.
///
/// Every failure a caller can see belongs to exactly one of these classes;
/// the request boundary translates them to status codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Missing or malformed required input. Always client-fixable.
    #[error("{0}")]
    Validation(String),
    /// A unique key (user email) is already taken.
    #[error("{0}")]
    Conflict(String),
    /// Bad credentials. Intentionally does not say whether the email or the
    /// password was wrong.
    #[error("Invalid email or password.")]
    InvalidCredentials,
    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The underlying store or filesystem failed. Not client-fixable.
    #[error("storage error: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

//=========================================================================================
// Store Ports (Traits)
//=========================================================================================

/// Durable collection of summary records keyed by generated id.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Persists a new record, assigning its id and timestamps.
    async fn create(&self, record: NewSummaryRecord) -> CoreResult<SummaryRecord>;

    /// All records for one owner, most recently created first
    /// (ties broken by id, ascending).
    async fn find_by_owner(&self, owner_email: &str) -> CoreResult<Vec<SummaryRecord>>;

    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<SummaryRecord>>;

    /// Removes a record, returning it so the caller can clean up the
    /// associated blob. `None` when no record had that id.
    async fn delete_by_id(&self, id: Uuid) -> CoreResult<Option<SummaryRecord>>;
}

/// Durable collection of user identities keyed by unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. A duplicate email surfaces as `Conflict`.
    async fn create(&self, user: NewUserCredential) -> CoreResult<UserCredential>;

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<UserCredential>>;
}

/// Durable byte storage keyed by generated file name.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `data` under `name` and returns the relative public path the
    /// stored bytes can later be fetched from.
    async fn write(&self, name: &str, data: &[u8]) -> CoreResult<String>;

    /// Removes the blob a previous `write` returned `path` for.
    /// A missing target surfaces as `NotFound`.
    async fn delete(&self, path: &str) -> CoreResult<()>;
}

/// One-way, salted credential hashing.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh random salt.
    fn hash(&self, password: &str) -> CoreResult<String>;

    /// Checks a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> CoreResult<bool>;
}
