//! Profile contact address.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProfileId;

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must look like <local>@<domain>")]
    Malformed,
}

/// An address attached to a profile.
///
/// Profiles never ask for a real address, so every profile carries the
/// placeholder from [`Email::placeholder_for`]. Deserialization still checks
/// the `<local>@<domain>` shape so a hand-edited registry is caught on load.
///
/// ```
/// use snowdex_core::{Email, ProfileId};
///
/// let email = Email::placeholder_for(&ProfileId::new("abc"));
/// assert_eq!(email.as_str(), "abc@snowdex.com");
/// assert!(Email::parse("nobody").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Domain of derived placeholder addresses.
    pub const PLACEHOLDER_DOMAIN: &'static str = "snowdex.com";

    /// Validate the `<local>@<domain>` shape.
    ///
    /// # Errors
    ///
    /// Returns an error for empty, over-long, or malformed input.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        match s.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// The placeholder address for a locally created profile.
    #[must_use]
    pub fn placeholder_for(profile_id: &ProfileId) -> Self {
        Self(format!("{profile_id}@{}", Self::PLACEHOLDER_DOMAIN))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the first `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
