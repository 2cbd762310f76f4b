//! Request construction and the preconditions checked before any network call.

use crate::error::{BwsError, Result};
use crate::proto::{
    ClassCountRequest, DeleteTemplateRequest, FaceEnrollmentRequest, FaceSearchRequest,
    FaceTemplateStatusRequest, FaceVerificationRequest, ImageData, LivenessDetectionRequest,
    PhotoVerifyRequest, SetTemplateTagsRequest, VideoLivenessDetectionRequest,
};

/// Upper bound of live images a liveness check accepts.
pub const MAX_LIVE_IMAGES: usize = 2;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(message: impl Into<String>) -> BwsError {
    BwsError::InvalidRequest(message.into())
}

fn check_live_images(images: &[ImageData]) -> Result<()> {
    if images.is_empty() {
        return Err(invalid("at least one live image is required"));
    }
    if images.len() > MAX_LIVE_IMAGES {
        return Err(invalid(format!(
            "at most {MAX_LIVE_IMAGES} live images are accepted, got {}",
            images.len()
        )));
    }
    check_images_not_empty(images)
}

fn check_images_not_empty(images: &[ImageData]) -> Result<()> {
    match images.iter().position(|image| image.image.is_empty()) {
        Some(index) => Err(invalid(format!("image #{} is empty", index + 1))),
        None => Ok(()),
    }
}

fn check_class_id(class_id: i64) -> Result<()> {
    if class_id <= 0 {
        return Err(invalid(format!("class id must be positive, got {class_id}")));
    }
    Ok(())
}

/// Attaches `challenge` to the second of two images. Tags are opaque.
pub fn tag_second_image(images: &mut [ImageData], challenge: Option<&str>) {
    let Some(tag) = challenge.filter(|tag| !tag.is_empty()) else {
        return;
    };
    match images {
        [_, second] => second.tags.push(tag.to_string()),
        _ => tracing::warn!(
            images = images.len(),
            challenge = tag,
            "challenge tag ignored, it needs exactly two images"
        ),
    }
}

fn live_images(images: Vec<Vec<u8>>, challenge: Option<&str>) -> Vec<ImageData> {
    let mut images: Vec<ImageData> = images.into_iter().map(ImageData::new).collect();
    tag_second_image(&mut images, challenge);
    images
}

pub fn liveness_detection(
    images: Vec<Vec<u8>>,
    challenge: Option<&str>,
) -> Result<LivenessDetectionRequest> {
    let request = LivenessDetectionRequest {
        live_images: live_images(images, challenge),
    };
    request.validate()?;
    Ok(request)
}

pub fn video_liveness_detection(video: Vec<u8>) -> Result<VideoLivenessDetectionRequest> {
    let request = VideoLivenessDetectionRequest { video };
    request.validate()?;
    Ok(request)
}

pub fn photo_verify(
    images: Vec<Vec<u8>>,
    photo: Option<Vec<u8>>,
    challenge: Option<&str>,
    disable_liveness_detection: bool,
) -> Result<PhotoVerifyRequest> {
    let photo = photo.ok_or_else(|| invalid("exactly one reference photo is required"))?;
    let request = PhotoVerifyRequest {
        live_images: live_images(images, challenge),
        photo,
        disable_liveness_detection,
    };
    request.validate()?;
    Ok(request)
}

pub fn enroll(class_id: i64, images: Vec<Vec<u8>>) -> Result<FaceEnrollmentRequest> {
    let request = FaceEnrollmentRequest {
        class_id,
        images: images.into_iter().map(ImageData::new).collect(),
    };
    request.validate()?;
    Ok(request)
}

pub fn verify(class_id: i64, images: Vec<Vec<u8>>) -> Result<FaceVerificationRequest> {
    let mut images = images.into_iter();
    let (Some(image), None) = (images.next(), images.next()) else {
        return Err(invalid("verification takes exactly one image"));
    };
    let request = FaceVerificationRequest {
        class_id,
        image: Some(ImageData::new(image)),
    };
    request.validate()?;
    Ok(request)
}

pub fn search(images: Vec<Vec<u8>>, tags: Vec<String>) -> Result<FaceSearchRequest> {
    let request = FaceSearchRequest {
        tags,
        images: images.into_iter().map(ImageData::new).collect(),
    };
    request.validate()?;
    Ok(request)
}

pub fn set_template_tags(class_id: i64, tags: Vec<String>) -> Result<SetTemplateTagsRequest> {
    let request = SetTemplateTagsRequest { class_id, tags };
    request.validate()?;
    Ok(request)
}

pub fn template_status(class_id: i64, download_thumbnails: bool) -> Result<FaceTemplateStatusRequest> {
    let request = FaceTemplateStatusRequest {
        class_id,
        download_thumbnails,
    };
    request.validate()?;
    Ok(request)
}

pub const fn class_count(tags: Vec<String>) -> ClassCountRequest {
    ClassCountRequest { tags }
}

pub fn delete_template(class_id: i64) -> Result<DeleteTemplateRequest> {
    let request = DeleteTemplateRequest { class_id };
    request.validate()?;
    Ok(request)
}

impl Validate for LivenessDetectionRequest {
    fn validate(&self) -> Result<()> {
        check_live_images(&self.live_images)
    }
}

impl Validate for VideoLivenessDetectionRequest {
    fn validate(&self) -> Result<()> {
        if self.video.is_empty() {
            return Err(invalid("video is empty"));
        }
        Ok(())
    }
}

impl Validate for PhotoVerifyRequest {
    fn validate(&self) -> Result<()> {
        check_live_images(&self.live_images)?;
        if self.photo.is_empty() {
            return Err(invalid("reference photo is empty"));
        }
        Ok(())
    }
}

impl Validate for FaceEnrollmentRequest {
    fn validate(&self) -> Result<()> {
        check_class_id(self.class_id)?;
        if self.images.is_empty() {
            return Err(invalid("at least one image is required for enrollment"));
        }
        check_images_not_empty(&self.images)
    }
}

impl Validate for FaceVerificationRequest {
    fn validate(&self) -> Result<()> {
        check_class_id(self.class_id)?;
        match &self.image {
            Some(image) => check_images_not_empty(std::slice::from_ref(image)),
            None => Err(invalid("verification takes exactly one image")),
        }
    }
}

impl Validate for FaceSearchRequest {
    fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(invalid("at least one image is required for search"));
        }
        check_images_not_empty(&self.images)
    }
}

impl Validate for SetTemplateTagsRequest {
    fn validate(&self) -> Result<()> {
        check_class_id(self.class_id)
    }
}

impl Validate for FaceTemplateStatusRequest {
    fn validate(&self) -> Result<()> {
        check_class_id(self.class_id)
    }
}

impl Validate for ClassCountRequest {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl Validate for DeleteTemplateRequest {
    fn validate(&self) -> Result<()> {
        check_class_id(self.class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn img(byte: u8) -> Vec<u8> {
        vec![byte; 4]
    }

    #[test]
    fn test_challenge_tags_second_image_only() {
        let request = liveness_detection(vec![img(1), img(2)], Some("up")).unwrap();
        assert!(request.live_images[0].tags.is_empty());
        assert_eq!(request.live_images[1].tags, vec!["up".to_string()]);
    }

    #[test]
    fn test_challenge_is_opaque() {
        let request = liveness_detection(vec![img(1), img(2)], Some("diagonal-ish")).unwrap();
        assert_eq!(request.live_images[1].tags, vec!["diagonal-ish".to_string()]);
    }

    #[test]
    fn test_challenge_ignored_for_single_image() {
        let request = liveness_detection(vec![img(1)], Some("left")).unwrap();
        assert!(request.live_images[0].tags.is_empty());
    }

    #[test]
    fn test_live_image_count_bounds() {
        let err = liveness_detection(vec![], None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = liveness_detection(vec![img(1), img(2), img(3)], None).unwrap_err();
        assert!(err.to_string().contains("at most 2"));
    }

    #[test]
    fn test_photo_verify_preconditions() {
        let err = photo_verify(vec![], Some(img(9)), None, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = photo_verify(vec![img(1)], None, None, false).unwrap_err();
        assert!(err.to_string().contains("reference photo"));

        let err = photo_verify(vec![img(1)], Some(Vec::new()), None, false).unwrap_err();
        assert!(err.to_string().contains("empty"));

        let request = photo_verify(vec![img(1), img(2)], Some(img(9)), Some("down"), true).unwrap();
        assert!(request.disable_liveness_detection);
        assert_eq!(request.live_images[1].tags, vec!["down".to_string()]);
    }

    #[test]
    fn test_verify_takes_exactly_one_image() {
        assert!(verify(1, vec![]).is_err());
        assert!(verify(1, vec![img(1), img(2)]).is_err());
        assert!(verify(1, vec![img(1)]).is_ok());
    }

    #[test]
    fn test_class_id_must_be_positive() {
        assert!(enroll(0, vec![img(1)]).is_err());
        assert!(delete_template(-1).is_err());
        assert!(template_status(7, true).is_ok());
        assert!(set_template_tags(7, vec![]).is_ok());
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = enroll(3, vec![img(1), Vec::new()]).unwrap_err();
        assert!(err.to_string().contains("image #2"));
    }

    #[test]
    fn test_search_requires_image() {
        assert!(search(vec![], vec!["a".to_string()]).is_err());
        let request = search(vec![img(1)], vec!["a".to_string()]).unwrap();
        assert_eq!(request.tags, vec!["a".to_string()]);
    }
}
