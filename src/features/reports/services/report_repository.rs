use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use thiserror::Error;

use crate::features::reports::models::{NewReport, StoredReport};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Write(String),
}

/// Persistence for submitted reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Verify the store is reachable before any file is written
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Insert one report and return its server-assigned id and timestamp
    async fn insert(&self, report: &NewReport) -> Result<StoredReport, RepositoryError>;
}

/// Postgres-backed report repository
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.pool.acquire().await.map(|_| ()).map_err(|e| {
            tracing::error!("Failed to acquire database connection: {:?}", e);
            RepositoryError::Connection(e.to_string())
        })
    }

    async fn insert(&self, report: &NewReport) -> Result<StoredReport, RepositoryError> {
        let stored = sqlx::query_as::<_, StoredReport>(
            r#"
            INSERT INTO reports (
                full_name, email, phone, category, title, description,
                priority, address, landmarks, photos, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            RETURNING id, created_at
            "#,
        )
        .bind(&report.full_name)
        .bind(&report.email)
        .bind(report.phone.as_deref())
        .bind(report.category.as_str())
        .bind(&report.title)
        .bind(&report.description)
        .bind(report.priority.as_str())
        .bind(&report.address)
        .bind(report.landmarks.as_deref())
        .bind(Json(&report.photos))
        .bind(report.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            RepositoryError::Write(e.to_string())
        })?;

        tracing::info!(
            "Created report: {} ({}, {})",
            stored.id,
            report.category,
            report.priority
        );

        Ok(stored)
    }
}
