/// Directory accepted photos are written to, relative to the working directory
pub const DEFAULT_UPLOAD_DIR: &str = "uploads/reports";

/// Number of photo slots considered per report; later slots are ignored
pub const MAX_PHOTOS_PER_REPORT: usize = 5;

/// Maximum photo size in bytes (5MB)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Declared MIME types accepted for report photos
pub const ALLOWED_PHOTO_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Multipart field names carrying photos
pub const PHOTO_FIELD_NAMES: &[&str] = &["photos", "photos[]"];

/// Prefix of generated photo file names
pub const PHOTO_NAME_PREFIX: &str = "report_";

pub const REPORT_SUBMITTED_MESSAGE: &str = "Report submitted successfully";
