//! Opaque user identity.
//!
//! The timer itself never needs an identity; settings and task stores key
//! their records by [`UserId`] and refuse writes for [`Identity::Anonymous`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated(UserId),
    Anonymous,
}

impl Identity {
    pub fn from_option(user: Option<UserId>) -> Self {
        match user {
            Some(id) => Identity::Authenticated(id),
            None => Identity::Anonymous,
        }
    }

    pub fn user(&self) -> Option<&UserId> {
        match self {
            Identity::Authenticated(id) => Some(id),
            Identity::Anonymous => None,
        }
    }

    /// The user id, or [`CoreError::Unauthenticated`].
    pub fn require(&self) -> Result<&UserId> {
        self.user().ok_or(CoreError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_user_ids_are_rejected() {
        assert!(UserId::new("   ").is_none());
        assert_eq!(UserId::new(" alice ").unwrap().as_str(), "alice");
    }

    #[test]
    fn anonymous_identity_fails_require() {
        assert!(matches!(
            Identity::Anonymous.require(),
            Err(CoreError::Unauthenticated)
        ));
        let id = Identity::from_option(UserId::new("bob"));
        assert_eq!(id.require().unwrap().as_str(), "bob");
    }
}
