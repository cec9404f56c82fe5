mod photo_acceptor;
mod report_intake_service;
mod report_repository;
mod report_validator;

pub use photo_acceptor::{PhotoAcceptor, PhotoRejection, RejectionReason};
pub use report_intake_service::ReportIntakeService;
pub use report_repository::{PgReportRepository, RepositoryError, ReportRepository};
pub use report_validator::ReportValidator;
