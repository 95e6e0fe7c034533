//! Sign-in page view state
//!
//! Two small state machines behind the sign-in page controls: one flips the
//! identifier input between email and phone entry, the other swaps the page
//! between its "sign in" and "sign up" wording.

use thiserror::Error;
use tracing::error;

pub const EMAIL_PLACEHOLDER: &str = "email address";
pub const PHONE_PLACEHOLDER: &str = "phone number";
pub const SIGN_IN: &str = "sign in";
pub const SIGN_UP: &str = "sign up";
pub const SIGN_UP_PROMPT: &str = "don't have an account?";
pub const SIGN_IN_PROMPT: &str = "already have an account?";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ViewError {
    #[error("Unknown sign-in placeholder: {0}")]
    UnknownPlaceholder(String),
}

/// Identifier input plus the link text offering the other mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInInput {
    pub input_type: String,
    pub placeholder: Option<String>,
    pub label: String,
}

impl SignInInput {
    /// Switch between email and phone entry, keyed off the current placeholder.
    ///
    /// An unset or empty placeholder counts as phone mode, so the first toggle
    /// always lands on email entry.
    pub fn toggle_sign_in_type(&mut self) -> Result<(), ViewError> {
        match self.placeholder.as_deref() {
            None | Some("") | Some(PHONE_PLACEHOLDER) => {
                self.input_type = "email".to_string();
                self.placeholder = Some(EMAIL_PLACEHOLDER.to_string());
                self.label = PHONE_PLACEHOLDER.to_string();
                Ok(())
            }
            Some(EMAIL_PLACEHOLDER) => {
                self.input_type = "tel".to_string();
                self.placeholder = Some(PHONE_PLACEHOLDER.to_string());
                self.label = EMAIL_PLACEHOLDER.to_string();
                Ok(())
            }
            Some(other) => {
                error!("Unknown sign-in placeholder: {}", other);
                Err(ViewError::UnknownPlaceholder(other.to_string()))
            }
        }
    }
}

/// Input state right after the page loads
pub fn on_page_load() -> SignInInput {
    SignInInput {
        input_type: "email".to_string(),
        placeholder: Some(EMAIL_PLACEHOLDER.to_string()),
        label: PHONE_PLACEHOLDER.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInFraming {
    pub header: String,
    pub switch: String,
    pub footer: String,
}

impl Default for SignInFraming {
    fn default() -> Self {
        Self {
            header: SIGN_IN.to_string(),
            switch: SIGN_UP.to_string(),
            footer: SIGN_UP_PROMPT.to_string(),
        }
    }
}

impl SignInFraming {
    pub fn toggle_sign_in_or_up(&mut self) {
        std::mem::swap(&mut self.header, &mut self.switch);

        match self.switch.as_str() {
            SIGN_UP => self.footer = SIGN_UP_PROMPT.to_string(),
            SIGN_IN => self.footer = SIGN_IN_PROMPT.to_string(),
            _ => {}
        }
    }
}
