use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("QUIZDECK_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/".to_string()),
            session_file: env::var("QUIZDECK_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("auth_tokens.json")),
            http_timeout_secs: env::var("QUIZDECK_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Base URL with a guaranteed trailing slash so relative endpoint paths
    /// join cleanly.
    pub fn api_base(&self) -> String {
        if self.api_base_url.ends_with('/') {
            self.api_base_url.clone()
        } else {
            format!("{}/", self.api_base_url)
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/".to_string(),
            session_file: PathBuf::from("auth_tokens_test.json"),
            http_timeout_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.api_base_url.is_empty());
        assert!(config.http_timeout_secs > 0);
    }

    #[test]
    fn test_api_base_always_has_trailing_slash() {
        let mut config = Config::test_config();
        config.api_base_url = "http://localhost:8000/api".to_string();
        assert_eq!(config.api_base(), "http://localhost:8000/api/");

        config.api_base_url = "http://localhost:8000/api/".to_string();
        assert_eq!(config.api_base(), "http://localhost:8000/api/");
    }
}
