mod report;

pub use report::{NewReport, ReportCategory, ReportPriority, ReportStatus, StoredReport};
