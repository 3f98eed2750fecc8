use url::Url;

use crate::error::{LessonKitError, Result};

/// Environment variable selecting the lesson backend.
pub const API_URL_ENV: &str = "LESSONKIT_API_URL";

/// Backend used when nothing is configured (local development server).
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Where the remote lesson backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: Url,
}

impl BackendConfig {
    /// Read the backend URL from the environment, falling back to the local default.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::parse(&value),
            _ => Self::parse(DEFAULT_API_URL),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let mut base_url = Url::parse(raw.trim())
            .map_err(|e| LessonKitError::Config(format!("Invalid backend URL '{}': {}", raw, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(LessonKitError::Config(format!(
                "Backend URL '{}' cannot be used as a base",
                raw
            )));
        }

        // Url::join drops the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path (without leading slash) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| LessonKitError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:5000/").expect("default backend URL is valid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_backend() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url().as_str(), "http://localhost:5000/");
        assert_eq!(
            BackendConfig::parse(DEFAULT_API_URL).unwrap(),
            config
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = BackendConfig::parse("https://school.example/api").unwrap();
        assert_eq!(
            config.endpoint("/lessons").unwrap().as_str(),
            "https://school.example/api/lessons"
        );
        assert_eq!(
            config.endpoint("generate_from_id/7").unwrap().as_str(),
            "https://school.example/api/generate_from_id/7"
        );
    }

    #[test]
    fn test_rejects_garbage() {
        let err = BackendConfig::parse("not a url").unwrap_err();
        assert!(matches!(err, LessonKitError::Config(_)));
        assert!(BackendConfig::parse("mailto:someone@example.com").is_err());
    }
}
