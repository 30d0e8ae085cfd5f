use std::env;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/refrel-system";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Service configuration, read from the environment with literal defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    /// The single origin allowed by CORS
    pub frontend_url: String,
    /// Serve sample data when the store has nothing to show
    pub demo_mode: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT '{}': {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        let demo_mode = match lookup("DEMO_MODE") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| format!("Invalid DEMO_MODE '{}'", raw))?,
            None => true,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string()),
            frontend_url: lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            demo_mode,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `mongodb_uri` with any `user:password@` replaced, safe to log
    pub fn redacted_mongodb_uri(&self) -> String {
        redact_userinfo(&self.mongodb_uri)
    }
}

fn redact_userinfo(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://").map(|i| i + 3) else {
        return uri.to_string();
    };
    let authority_end = uri[scheme_end..]
        .find(['/', '?'])
        .map_or(uri.len(), |i| scheme_end + i);
    match uri[scheme_end..authority_end].rfind('@') {
        Some(at) => format!("{}***@{}", &uri[..scheme_end], &uri[scheme_end + at + 1..]),
        None => uri.to_string(),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
