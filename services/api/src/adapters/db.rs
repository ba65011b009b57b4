//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `SummaryStore` and `UserStore` ports from the `core` crate. It handles
//! all interactions with the SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use court_summarizer_core::domain::{
    NewSummaryRecord, NewUserCredential, SummaryRecord, UserCredential,
};
use court_summarizer_core::ports::{CoreError, CoreResult, SummaryStore, UserStore};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SummaryStore` and `UserStore` ports.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new `SqliteStore`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn storage_error(e: sqlx::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}

//=========================================================================================
// "Impure" Database Row Structs
//=========================================================================================

const SUMMARY_COLUMNS: &str = "id, owner_email, case_name, original_file_name, \
     summary_file_name, summary_data, blob_path, created_at, updated_at";

#[derive(FromRow)]
struct SummaryRow {
    id: String,
    owner_email: String,
    case_name: String,
    original_file_name: String,
    summary_file_name: String,
    summary_data: String,
    blob_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SummaryRow {
    fn to_domain(self) -> CoreResult<SummaryRecord> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| CoreError::Storage(format!("corrupt summary id '{}': {e}", self.id)))?;
        let summary_data = serde_json::from_str(&self.summary_data)
            .map_err(|e| CoreError::Storage(format!("corrupt summary_data for {id}: {e}")))?;
        Ok(SummaryRecord {
            id,
            owner_email: self.owner_email,
            case_name: self.case_name,
            original_file_name: self.original_file_name,
            summary_file_name: self.summary_file_name,
            summary_data,
            // Empty string is the legacy "no file" sentinel.
            blob_path: self.blob_path.filter(|p| !p.is_empty()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    occupation: String,
    password_hash: String,
}

impl UserRow {
    fn to_domain(self) -> CoreResult<UserCredential> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| CoreError::Storage(format!("corrupt user id '{}': {e}", self.id)))?;
        Ok(UserCredential {
            id,
            name: self.name,
            email: self.email,
            occupation: self.occupation,
            password_hash: self.password_hash,
        })
    }
}

//=========================================================================================
// `SummaryStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryStore for SqliteStore {
    async fn create(&self, record: NewSummaryRecord) -> CoreResult<SummaryRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let summary_data = serde_json::to_string(&record.summary_data)
            .map_err(|e| CoreError::Storage(format!("summary_data not serializable: {e}")))?;

        sqlx::query(
            "INSERT INTO summaries (id, owner_email, case_name, original_file_name, \
             summary_file_name, summary_data, blob_path, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(id.to_string())
        .bind(&record.owner_email)
        .bind(&record.case_name)
        .bind(&record.original_file_name)
        .bind(&record.summary_file_name)
        .bind(&summary_data)
        .bind(&record.blob_path)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(SummaryRecord {
            id,
            owner_email: record.owner_email,
            case_name: record.case_name,
            original_file_name: record.original_file_name,
            summary_file_name: record.summary_file_name,
            summary_data: record.summary_data,
            blob_path: record.blob_path,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_owner(&self, owner_email: &str) -> CoreResult<Vec<SummaryRecord>> {
        let rows = sqlx::query_as::<_, SummaryRow>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM summaries WHERE owner_email = ?1 \
             ORDER BY created_at DESC, id ASC"
        ))
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.into_iter().map(SummaryRow::to_domain).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<SummaryRecord>> {
        let row = sqlx::query_as::<_, SummaryRow>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM summaries WHERE id = ?1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(SummaryRow::to_domain).transpose()
    }

    async fn delete_by_id(&self, id: Uuid) -> CoreResult<Option<SummaryRecord>> {
        // Single-statement delete keeps lookup and removal atomic.
        let row = sqlx::query_as::<_, SummaryRow>(&format!(
            "DELETE FROM summaries WHERE id = ?1 RETURNING {SUMMARY_COLUMNS}"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(SummaryRow::to_domain).transpose()
    }
}

//=========================================================================================
// `UserStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserStore for SqliteStore {
    async fn create(&self, user: NewUserCredential) -> CoreResult<UserCredential> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, name, email, occupation, password_hash, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.occupation)
        .bind(&user.password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // Two signups racing past the existence check land here.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CoreError::Conflict("Email already registered.".to_string())
            }
            _ => storage_error(e),
        })?;

        Ok(UserCredential {
            id,
            name: user.name,
            email: user.email,
            occupation: user.occupation,
            password_hash: user.password_hash,
        })
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<UserCredential>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, occupation, password_hash FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(UserRow::to_domain).transpose()
    }
}
