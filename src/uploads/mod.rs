use axum::body::Bytes;

pub mod image_validation;

/// One file part of a listing form submission.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
