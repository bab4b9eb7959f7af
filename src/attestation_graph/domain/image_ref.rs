use crate::shared::error::AttestError;
use crate::shared::Result;
use serde::Serialize;

/// Maximum length for image references (security limit)
const MAX_IMAGE_REFERENCE_LENGTH: usize = 500;

/// NewType wrapper for a container image reference with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn new(reference: String) -> Result<Self> {
        if reference.is_empty() {
            return Err(AttestError::InvalidImageReference {
                reference,
                reason: "Image reference cannot be empty".to_string(),
            }
            .into());
        }

        // Security: Length limit to prevent DoS through the external tool
        if reference.len() > MAX_IMAGE_REFERENCE_LENGTH {
            let preview: String = reference.chars().take(64).collect();
            return Err(AttestError::InvalidImageReference {
                reference: format!("{}…", preview),
                reason: format!(
                    "Image reference is too long ({} bytes). Maximum allowed: {} bytes",
                    reference.len(),
                    MAX_IMAGE_REFERENCE_LENGTH
                ),
            }
            .into());
        }

        // Security: the reference is passed as a subprocess argument. Reject
        // whitespace and control characters outright.
        if reference
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(AttestError::InvalidImageReference {
                reference,
                reason: "Image reference must not contain whitespace or control characters"
                    .to_string(),
            }
            .into());
        }

        Ok(Self(reference))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Target platform for attestation lookup.
///
/// Restricted to the OS/arch pairs the attestation tool publishes manifests
/// for. Anything outside this set is rejected before any external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    LinuxAmd64,
    LinuxArm64,
    Linux386,
    LinuxArmV6,
    LinuxArmV7,
    LinuxPpc64le,
    LinuxS390x,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LinuxAmd64 => "linux/amd64",
            Platform::LinuxArm64 => "linux/arm64",
            Platform::Linux386 => "linux/386",
            Platform::LinuxArmV6 => "linux/arm/v6",
            Platform::LinuxArmV7 => "linux/arm/v7",
            Platform::LinuxPpc64le => "linux/ppc64le",
            Platform::LinuxS390x => "linux/s390x",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linux/amd64" => Ok(Platform::LinuxAmd64),
            "linux/arm64" => Ok(Platform::LinuxArm64),
            "linux/386" => Ok(Platform::Linux386),
            "linux/arm/v6" => Ok(Platform::LinuxArmV6),
            "linux/arm/v7" => Ok(Platform::LinuxArmV7),
            "linux/ppc64le" => Ok(Platform::LinuxPpc64le),
            "linux/s390x" => Ok(Platform::LinuxS390x),
            other => Err(AttestError::InvalidPlatform {
                platform: other.to_string(),
            }
            .into()),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Platform {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_image_reference_valid() {
        let reference = ImageReference::new("cgr.dev/chainguard/nginx:latest".to_string());
        assert!(reference.is_ok());
        assert_eq!(
            reference.unwrap().as_str(),
            "cgr.dev/chainguard/nginx:latest"
        );
    }

    #[test]
    fn test_image_reference_empty() {
        let result = ImageReference::new(String::new());
        assert!(result.is_err());
        let display = format!("{}", result.unwrap_err());
        assert!(display.contains("cannot be empty"));
    }

    #[test]
    fn test_image_reference_too_long() {
        let result = ImageReference::new("a".repeat(501));
        assert!(result.is_err());
        let display = format!("{}", result.unwrap_err());
        assert!(display.contains("too long"));
    }

    #[test]
    fn test_image_reference_at_limit() {
        let result = ImageReference::new("a".repeat(500));
        assert!(result.is_ok());
    }

    #[test]
    fn test_image_reference_rejects_whitespace() {
        let result = ImageReference::new("nginx:latest --help".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_platform_round_trip() {
        for raw in [
            "linux/amd64",
            "linux/arm64",
            "linux/386",
            "linux/arm/v6",
            "linux/arm/v7",
            "linux/ppc64le",
            "linux/s390x",
        ] {
            let platform = Platform::from_str(raw).unwrap();
            assert_eq!(platform.as_str(), raw);
        }
    }

    #[test]
    fn test_platform_invalid() {
        let result = Platform::from_str("windows/amd64");
        assert!(result.is_err());
        let display = format!("{}", result.unwrap_err());
        assert!(display.contains("Invalid platform"));
    }

    #[test]
    fn test_platform_default() {
        assert_eq!(Platform::default(), Platform::LinuxAmd64);
    }
}
