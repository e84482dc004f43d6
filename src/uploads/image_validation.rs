use mime::Mime;
use thiserror::Error;
use crate::uploads::UploadedImage;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ImageRejection {
    #[error("Only JPEG, JPG, and PNG images are allowed")]
    UnsupportedType,
    #[error("Images must be less than 5MB each")]
    TooLarge,
}

pub fn is_allowed_type(content_type: Option<&str>) -> bool {
    let Some(mime) = content_type.and_then(|raw| raw.parse::<Mime>().ok()) else {
        return false;
    };
    mime.type_() == mime::IMAGE
        && (mime.subtype() == mime::JPEG || mime.subtype() == mime::PNG || mime.subtype() == "jpg")
}

/// A batch is accepted or rejected as a whole; the type check runs before the size check.
pub fn validate_batch(images: &[UploadedImage]) -> Result<(), ImageRejection> {
    if !images
        .iter()
        .all(|image| is_allowed_type(image.content_type.as_deref()))
    {
        return Err(ImageRejection::UnsupportedType);
    }
    if images.iter().any(|image| image.size() > MAX_IMAGE_BYTES) {
        return Err(ImageRejection::TooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use rstest::rstest;
    use super::*;

    fn image(content_type: &str, size: usize) -> UploadedImage {
        UploadedImage {
            file_name: "upload".to_string(),
            content_type: Some(content_type.to_string()),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    #[rstest]
    #[case(Some("image/jpeg"), true)]
    #[case(Some("image/jpg"), true)]
    #[case(Some("IMAGE/PNG"), true)]
    #[case(Some("image/gif"), false)]
    #[case(Some("application/pdf"), false)]
    #[case(Some("not a mime"), false)]
    #[case(None, false)]
    fn only_jpeg_and_png_are_allowed(#[case] content_type: Option<&str>, #[case] allowed: bool) {
        assert_eq!(is_allowed_type(content_type), allowed);
    }

    #[test]
    fn six_megabyte_image_rejects_the_batch() {
        let batch = vec![image("image/jpeg", 1024), image("image/png", 6 * 1024 * 1024)];
        assert_eq!(validate_batch(&batch), Err(ImageRejection::TooLarge));
    }

    #[test]
    fn gif_rejects_the_batch_before_size_is_checked() {
        let batch = vec![image("image/jpeg", 6 * 1024 * 1024), image("image/gif", 10)];
        assert_eq!(validate_batch(&batch), Err(ImageRejection::UnsupportedType));
        assert_eq!(
            ImageRejection::UnsupportedType.to_string(),
            "Only JPEG, JPG, and PNG images are allowed"
        );
    }

    #[test]
    fn exactly_five_megabytes_is_accepted() {
        assert_eq!(validate_batch(&[image("image/jpeg", MAX_IMAGE_BYTES)]), Ok(()));
    }
}
