mod report_dto;

pub use report_dto::{
    PhotoUpload, RejectedPhotoDto, ReportSubmission, SubmitReportFormDto,
    SubmitReportResponseDto, UploadPayload,
};
