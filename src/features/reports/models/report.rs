use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

/// Problem category chosen by the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReportCategory {
    Infrastructure,
    PublicSafety,
    Environment,
    Transportation,
    PublicServices,
    Community,
    Other,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 7] = [
        ReportCategory::Infrastructure,
        ReportCategory::PublicSafety,
        ReportCategory::Environment,
        ReportCategory::Transportation,
        ReportCategory::PublicServices,
        ReportCategory::Community,
        ReportCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCategory::Infrastructure => "infrastructure",
            ReportCategory::PublicSafety => "public-safety",
            ReportCategory::Environment => "environment",
            ReportCategory::Transportation => "transportation",
            ReportCategory::PublicServices => "public-services",
            ReportCategory::Community => "community",
            ReportCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

/// Reporter-assessed urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl ReportPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPriority::Low => "low",
            ReportPriority::Medium => "medium",
            ReportPriority::High => "high",
        }
    }

    /// Unknown or absent values fall back to `Medium`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("low") => ReportPriority::Low,
            Some("high") => ReportPriority::High,
            _ => ReportPriority::Medium,
        }
    }
}

impl std::fmt::Display for ReportPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status; intake only ever creates `Pending`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data for inserting a new report row
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub category: ReportCategory,
    pub title: String,
    pub description: String,
    pub priority: ReportPriority,
    pub address: String,
    pub landmarks: Option<String>,
    pub photos: Vec<String>,
    pub status: ReportStatus,
}

/// Server-assigned values returned by the insert
#[derive(Debug, Clone, FromRow)]
pub struct StoredReport {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}
