//! Identity boundary.
//!
//! The timer is fully usable without an identity. A user id only enables
//! history writes.

/// Source of the current user's id. `None` means anonymous.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
}

/// No user signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user_id(&self) -> Option<String> {
        None
    }
}

/// Fixed identity resolved once, e.g. from a flag or configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    /// Blank ids are treated as anonymous.
    pub fn new(user_id: Option<impl Into<String>>) -> Self {
        Self(
            user_id
                .map(Into::into)
                .map(|id: String| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        )
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self::new(Some(user_id))
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identity_is_anonymous() {
        assert!(StaticIdentity::user("  ").current_user_id().is_none());
        assert!(StaticIdentity::new(None::<String>).current_user_id().is_none());
        assert!(Anonymous.current_user_id().is_none());
    }

    #[test]
    fn identity_is_trimmed() {
        assert_eq!(
            StaticIdentity::user(" ana ").current_user_id().as_deref(),
            Some("ana")
        );
    }
}
