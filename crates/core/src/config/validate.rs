use reqwest::Url;

use super::{types::Config, ConfigError};

/// Highest season number that still fits the two-digit name prefix
const MAX_SEASONS: u32 = 99;

/// Validate configuration
/// Currently validates:
/// - Season count is between 1 and 99
/// - Server port is not 0
/// - Speech service URL is set and the callback URL (if any) is absolute http(s)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let seasons = config.catalog.season_count;
    if seasons == 0 || seasons > MAX_SEASONS {
        return Err(ConfigError::ValidationError(format!(
            "catalog.season_count must be between 1 and {}, got {}",
            MAX_SEASONS, seasons
        )));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(speech) = &config.speech {
        if speech.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "speech.url cannot be empty".to_string(),
            ));
        }

        if let Some(callback_url) = &speech.callback_url {
            validate_http_url("speech.callback_url", callback_url)?;
        }
    }

    Ok(())
}

/// Checks that `value` is an absolute http or https URL.
pub fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| {
        ConfigError::ValidationError(format!("{} is not a valid URL: {}", field, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got {}",
            field,
            url.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeechConfig;

    fn speech(callback_url: Option<&str>) -> SpeechConfig {
        SpeechConfig {
            url: "https://stt.example.com".to_string(),
            api_key: "key".to_string(),
            callback_url: callback_url.map(String::from),
            timeout_secs: 90,
        }
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_season_count_bounds() {
        let mut config = Config::default();
        config.catalog.season_count = 0;
        assert!(validate_config(&config).is_err());

        config.catalog.season_count = 100;
        assert!(validate_config(&config).is_err());

        config.catalog.season_count = 99;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_callback_url() {
        let mut config = Config::default();
        config.speech = Some(speech(Some("https://hooks.example.com/")));
        assert!(validate_config(&config).is_ok());

        config.speech = Some(speech(Some("not a url")));
        assert!(validate_config(&config).is_err());

        config.speech = Some(speech(Some("ftp://hooks.example.com/")));
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_speech_url() {
        let mut config = Config::default();
        let mut section = speech(None);
        section.url = String::new();
        config.speech = Some(section);
        assert!(validate_config(&config).is_err());
    }
}
