use std::path::PathBuf;

/// Default REST API base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default location of the persisted session blob.
pub const DEFAULT_SESSION_FILE: &str = ".portal_session.json";

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST API base URL, without a trailing slash.
    pub api_url: String,
    /// File holding the signed-in identity between runs.
    pub session_file: PathBuf,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            log_json: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                     |
    /// |-----------------------|-----------------------------|
    /// | `PORTAL_API_URL`      | `http://localhost:5000/api` |
    /// | `PORTAL_SESSION_FILE` | `.portal_session.json`      |
    /// | `PORTAL_LOG_JSON`     | unset (`false`)             |
    ///
    /// Invalid values are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = match lookup("PORTAL_API_URL").map(|v| v.trim().to_string()) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(url) if !url.is_empty() => {
                tracing::warn!(value = %url, "PORTAL_API_URL is not an http(s) URL; using default");
                defaults.api_url
            }
            _ => defaults.api_url,
        };

        let session_file = lookup("PORTAL_SESSION_FILE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        let log_json = parse_log_json(lookup("PORTAL_LOG_JSON").as_deref());

        Self {
            api_url,
            session_file,
            log_json,
        }
    }
}

/// Whether `PORTAL_LOG_JSON` asks for JSON logs. Usable before the
/// subscriber is installed.
pub fn json_logs_requested() -> bool {
    parse_log_json(std::env::var("PORTAL_LOG_JSON").ok().as_deref())
}

fn parse_log_json(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
        Some(v) if v == "0" || v.eq_ignore_ascii_case("false") => false,
        Some(v) => {
            tracing::warn!(value = %v, "PORTAL_LOG_JSON is not a boolean; using default");
            false
        }
    }
}
