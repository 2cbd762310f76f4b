use serde::Serialize;

use crate::proto::{
    AccuracyLevel, ClassCountResponse, DeleteTemplateResponse, EnrollmentAction,
    FaceEnrollmentResponse, FaceSearchResponse, FaceTemplateStatus, FaceVerificationResponse,
    JobError, LivenessDetectionResponse, PhotoVerifyResponse, SetTemplateTagsResponse,
};

/// A typed response the reporter knows how to present.
pub trait Render: Serialize {
    /// The one-line result shown from `Minimal` upwards.
    fn summary(&self) -> String;

    /// Raw job status, for responses that describe a server-side job.
    fn job_status(&self) -> Option<i32> {
        None
    }

    fn job_errors(&self) -> &[JobError] {
        &[]
    }
}

macro_rules! job_response {
    ($ty:ty, |$this:ident| $summary:expr) => {
        impl Render for $ty {
            fn summary(&self) -> String {
                let $this = self;
                $summary
            }

            fn job_status(&self) -> Option<i32> {
                Some(self.status)
            }

            fn job_errors(&self) -> &[JobError] {
                &self.errors
            }
        }
    };
}

job_response!(LivenessDetectionResponse, |r| format!(
    "Live: {} (score {})",
    r.live, r.liveness_score
));

job_response!(PhotoVerifyResponse, |r| format!(
    "Verification level: {} (score {}), live: {}",
    AccuracyLevel::describe(r.verification_level),
    r.verification_score,
    r.live
));

job_response!(FaceEnrollmentResponse, |r| format!(
    "Enrollment: {}, {} image(s) enrolled",
    EnrollmentAction::describe(r.performed_action),
    r.enrolled_images
));

job_response!(FaceVerificationResponse, |r| format!(
    "Verified: {} (score {})",
    r.verified, r.score
));

job_response!(FaceSearchResponse, |r| {
    let matches: usize = r.results.iter().map(|result| result.matches.len()).sum();
    format!("{matches} match(es)")
});

impl Render for FaceTemplateStatus {
    fn summary(&self) -> String {
        let availability = if self.available {
            "available"
        } else {
            "not available"
        };
        format!("Template {}: {availability}", self.class_id)
    }
}

impl Render for ClassCountResponse {
    fn summary(&self) -> String {
        format!("Class count: {}", self.count)
    }
}

impl Render for SetTemplateTagsResponse {
    fn summary(&self) -> String {
        "SetTemplateTags: done".to_string()
    }
}

impl Render for DeleteTemplateResponse {
    fn summary(&self) -> String {
        "DeleteTemplate: done".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{FaceMatch, ImageSearchResult, JobStatus};

    #[test]
    fn test_liveness_summary() {
        let response = LivenessDetectionResponse {
            live: true,
            liveness_score: 0.75,
            ..Default::default()
        };
        assert_eq!(response.summary(), "Live: true (score 0.75)");
        assert_eq!(response.job_status(), Some(JobStatus::Succeeded as i32));
    }

    #[test]
    fn test_photo_verify_summary_names_level() {
        let response = PhotoVerifyResponse {
            verification_level: AccuracyLevel::Level4 as i32,
            verification_score: 0.5,
            live: false,
            ..Default::default()
        };
        assert_eq!(
            response.summary(),
            "Verification level: LEVEL_4 (score 0.5), live: false"
        );
    }

    #[test]
    fn test_enrollment_summary() {
        let response = FaceEnrollmentResponse {
            performed_action: EnrollmentAction::NewTemplateCreated as i32,
            enrolled_images: 2,
            ..Default::default()
        };
        assert_eq!(
            response.summary(),
            "Enrollment: NEW_TEMPLATE_CREATED, 2 image(s) enrolled"
        );
    }

    #[test]
    fn test_search_counts_all_matches() {
        let hit = |class_id| FaceMatch { class_id, score: 0.9 };
        let response = FaceSearchResponse {
            results: vec![
                ImageSearchResult {
                    matches: vec![hit(1), hit(2)],
                },
                ImageSearchResult {
                    matches: vec![hit(3)],
                },
            ],
            ..Default::default()
        };
        assert_eq!(response.summary(), "3 match(es)");
    }

    #[test]
    fn test_payloads_without_job() {
        let status = FaceTemplateStatus {
            class_id: 42,
            available: false,
            ..Default::default()
        };
        assert_eq!(status.summary(), "Template 42: not available");
        assert_eq!(status.job_status(), None);
        assert!(status.job_errors().is_empty());

        assert_eq!(ClassCountResponse { count: 7 }.summary(), "Class count: 7");
        assert_eq!(DeleteTemplateResponse {}.summary(), "DeleteTemplate: done");
    }
}
