//! Wire contracts shared by both transports.
//!
//! Every message derives `prost::Message` for the gRPC codec and serde for the
//! JSON API. Field names follow the service's camelCase JSON convention, byte
//! fields travel as base64 strings and enum fields as their upper-case names.

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $serde_mod:ident {
        $($variant:ident = $value:literal => $wire:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub const fn wire_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            pub fn from_wire_name(name: &str) -> Option<Self> {
                match name {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Name for a raw wire value, falling back to the number itself.
            pub fn describe(value: i32) -> String {
                Self::try_from(value)
                    .map_or_else(|_| value.to_string(), |known| known.wire_name().to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.wire_name())
            }
        }

        pub mod $serde_mod {
            use serde::de::Error as _;
            use serde::{Deserialize, Deserializer, Serializer};

            use super::$name;

            pub fn serialize<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
                match $name::try_from(*value) {
                    Ok(known) => serializer.serialize_str(known.wire_name()),
                    Err(_) => serializer.serialize_i32(*value),
                }
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Number(i32),
                    Name(String),
                }

                match Raw::deserialize(deserializer)? {
                    Raw::Number(value) => Ok(value),
                    Raw::Name(name) => $name::from_wire_name(&name)
                        .map(|known| known as i32)
                        .ok_or_else(|| {
                            D::Error::custom(format!(
                                "unknown {} value: {name}",
                                stringify!($name)
                            ))
                        }),
                }
            }
        }
    };
}

pub mod common;
pub mod face;
pub mod health;
pub mod liveness;

pub use common::{
    Face, ImageData, ImageProperties, JobError, JobStatus, PointD, QualityAssessment, Timestamp,
};
pub use face::{
    ClassCountRequest, ClassCountResponse, DeleteTemplateRequest, DeleteTemplateResponse,
    EnrollmentAction, FaceEnrollmentRequest, FaceEnrollmentResponse, FaceMatch,
    FaceSearchRequest, FaceSearchResponse, FaceTemplateStatus, FaceTemplateStatusRequest,
    FaceVerificationRequest, FaceVerificationResponse, ImageSearchResult,
    SetTemplateTagsRequest, SetTemplateTagsResponse, Thumbnail,
};
pub use health::{HealthCheckRequest, HealthCheckResponse, ServingStatus};
pub use liveness::{
    AccuracyLevel, LivenessDetectionRequest, LivenessDetectionResponse, PhotoVerifyRequest,
    PhotoVerifyResponse, VideoLivenessDetectionRequest,
};

pub(crate) mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}
