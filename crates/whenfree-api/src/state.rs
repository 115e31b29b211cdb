//! Shared application state for the meetup API.
//!
//! [`AppState`] carries the storage coordinator handed over by whatever
//! composes the service, plus the access policy applied to lookups.
//! Handlers never reach for a global store.

use std::sync::Arc;

use whenfree_store::Storage;

use crate::error::ApiError;

/// How refused lookups are reported to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Report a meetup the caller may not see as missing rather than
    /// forbidden, so its existence is not revealed.
    pub conceal_existence: bool,
}

impl AccessPolicy {
    /// Apply the policy to an error on its way out of a lookup.
    pub fn refine(self, error: ApiError) -> ApiError {
        match error {
            ApiError::Forbidden(what) if self.conceal_existence => ApiError::NotFound(what),
            other => other,
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The meetup store.
    pub storage: Arc<Storage>,
    /// Policy for reporting refused lookups.
    pub access: AccessPolicy,
}

impl AppState {
    /// Create application state around an existing store with the
    /// default access policy.
    pub const fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            access: AccessPolicy {
                conceal_existence: false,
            },
        }
    }

    /// Replace the access policy.
    #[must_use]
    pub fn with_access_policy(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_keeps_forbidden() {
        let refined = AccessPolicy::default().refine(ApiError::Forbidden(String::from("m")));
        assert!(matches!(refined, ApiError::Forbidden(_)));
    }

    #[test]
    fn concealing_policy_turns_forbidden_into_not_found() {
        let policy = AccessPolicy {
            conceal_existence: true,
        };
        assert!(matches!(
            policy.refine(ApiError::Forbidden(String::from("m"))),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            policy.refine(ApiError::Unauthenticated),
            ApiError::Unauthenticated
        ));
    }
}
