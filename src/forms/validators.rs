//! Field validators.

use thiserror::Error;
use validator::{ValidateEmail, ValidateLength};

/// Outcome of a failed check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value is invalid; later validators still run.
    #[error("{0}")]
    Invalid(String),
    /// The value is invalid and no further validators should run.
    #[error("{0}")]
    Stop(String),
}

impl ValidationError {
    pub fn message(&self) -> &str {
        match self {
            Self::Invalid(m) | Self::Stop(m) => m,
        }
    }

    pub fn stops_chain(&self) -> bool {
        matches!(self, Self::Stop(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Value must contain something other than whitespace.
    DataRequired { message: Option<String> },
    /// Character count bounds, inclusive. `None` leaves that side open.
    Length {
        min: Option<usize>,
        max: Option<usize>,
        message: Option<String>,
    },
    /// HTML5-style e-mail address check.
    Email { message: Option<String> },
}

impl Validator {
    pub fn required() -> Self {
        Self::DataRequired { message: None }
    }

    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Self::Length {
            min,
            max,
            message: None,
        }
    }

    pub fn email() -> Self {
        Self::Email { message: None }
    }

    /// Replace the default error message.
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Self::DataRequired { message } | Self::Length { message, .. } | Self::Email { message } => {
                *message = text
            }
        }
        self
    }

    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        match self {
            Self::DataRequired { message } => {
                if value.trim().is_empty() {
                    return Err(ValidationError::Stop(
                        message.clone().unwrap_or_else(|| "This field is required.".into()),
                    ));
                }
            }
            Self::Length { min, max, message } => {
                let bounds = |n: Option<usize>| n.map(|n| n as u64);
                if !value.validate_length(bounds(*min), bounds(*max), None) {
                    return Err(ValidationError::Invalid(
                        message.clone().unwrap_or_else(|| length_message(*min, *max)),
                    ));
                }
            }
            Self::Email { message } => {
                if !value.validate_email() {
                    return Err(ValidationError::Invalid(
                        message.clone().unwrap_or_else(|| "Invalid email address.".into()),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn length_message(min: Option<usize>, max: Option<usize>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("Field must be between {} and {} characters long.", min, max),
        (Some(min), None) => format!("Field must be at least {} characters long.", min),
        (None, Some(max)) => format!("Field cannot be longer than {} characters.", max),
        (None, None) => "Invalid field length.".into(),
    }
}
