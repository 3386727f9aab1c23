use url::Url;

use crate::config::ConfigError;

/// Identity authority, validated against the known-authorities list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    url: Url,
}

impl Authority {
    /// Parse `raw` and check its host against `known`. An empty `known`
    /// list trusts the configured authority as is.
    pub fn parse(raw: &str, known: &[String]) -> Result<Self, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidAuthority(e.to_string()))?;

        let host = url
            .host_str()
            .ok_or_else(|| ConfigError::InvalidAuthority(format!("{} has no host", raw)))?
            .to_ascii_lowercase();

        if !known.is_empty() && !known.iter().any(|k| k.eq_ignore_ascii_case(&host)) {
            return Err(ConfigError::UnknownAuthority(host));
        }

        Ok(Self { url })
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// `{authority}/v2.0/.well-known/openid-configuration`
    pub fn metadata_url(&self) -> String {
        format!(
            "{}/v2.0/.well-known/openid-configuration",
            self.url.as_str().trim_end_matches('/')
        )
    }
}
