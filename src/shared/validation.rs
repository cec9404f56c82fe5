use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for file extensions kept on stored photos
    /// Must be 1-10 ASCII alphanumerics, nothing else
    /// - Valid: "jpg", "JPEG", "webp", "png"
    /// - Invalid: "", "tar.gz", "../x", "jp g"
    pub static ref EXTENSION_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap();
}
