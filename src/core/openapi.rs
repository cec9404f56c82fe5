use utoipa::{Modify, OpenApi};

use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers, models};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        reports_handlers::submit_report,
        reports_handlers::preflight,
    ),
    components(
        schemas(
            ErrorResponse,
            models::ReportCategory,
            models::ReportPriority,
            models::ReportStatus,
            reports_dtos::SubmitReportFormDto,
            reports_dtos::SubmitReportResponseDto,
            reports_dtos::RejectedPhotoDto,
        )
    ),
    tags(
        (name = "reports", description = "Citizen problem report intake"),
    ),
    info(
        title = "Civic Report Intake API",
        version = "0.1.0",
        description = "Citizen problem report submission",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
