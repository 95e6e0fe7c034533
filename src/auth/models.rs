use actix_web::{http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MEASUREMENT_SYSTEM: &str = "imperial";
pub const MEASUREMENT_SYSTEM_FIELD: &str = "measurement_system";
pub const USERNAME_FIELD: &str = "username";

const REDACTED_FIELDS: [&str; 1] = ["password"];

/// Key/value pairs of a submitted form, in submission order.
///
/// The whole set is forwarded upstream untouched; the Syfit API decides
/// which fields are required. For the sign-in form `username` holds whatever
/// the user typed, which may be a username, an email address or a phone
/// number.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// First value submitted under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn username(&self) -> &str {
        self.get(USERNAME_FIELD).unwrap_or_default()
    }

    /// Set `key` to `value` when it was left out or submitted empty.
    /// Any other submitted value is kept as-is.
    pub fn with_default(mut self, key: &str, value: &str) -> Self {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) if existing.is_empty() => *existing = value.to_string(),
            Some(_) => {}
            None => self.0.push((key.to_string(), value.to_string())),
        }
        self
    }

    pub fn with_default_measurement_system(self) -> Self {
        self.with_default(MEASUREMENT_SYSTEM_FIELD, DEFAULT_MEASUREMENT_SYSTEM)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for FormFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.0 {
            if REDACTED_FIELDS.contains(&key.as_str()) {
                map.entry(key, &"***");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

/// Body of a successful `/users/token/` or `/users/signup/` reply
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of an upstream rejection. `detail` is usually a string but may be
/// a structured validation report.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Error payload handed back to the page for rendering
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionFailure {
    pub status: u16,
    pub message: String,
}

impl ActionFailure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn username_conflict(username: &str) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            format!("username {} already exists!", username),
        )
    }

    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_REQUEST);
        HttpResponse::build(status).json(self)
    }
}
