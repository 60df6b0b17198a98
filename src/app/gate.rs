// Access gate - Decides whether an identity may use the pipeline

use std::sync::Arc;

use tracing::warn;

use crate::domain::errors::DomainError;
use crate::ports::AuthorizationPort;

/// Checked before any input is looked at
pub struct AccessGate {
    authorizer: Arc<dyn AuthorizationPort>,
}

impl AccessGate {
    pub fn new(authorizer: Arc<dyn AuthorizationPort>) -> Self {
        Self { authorizer }
    }

    /// Admit the identity or fail with `PermissionDenied`
    pub fn admit(&self, identity: Option<&str>) -> Result<(), DomainError> {
        match identity {
            Some(identity) if self.authorizer.is_authorized(identity) => Ok(()),
            Some(identity) => {
                warn!(identity = %identity, "Access denied");
                Err(DomainError::PermissionDenied(format!(
                    "Identity '{}' is not allowed",
                    identity.trim()
                )))
            }
            None => Err(DomainError::PermissionDenied(
                "An identity is required (--identity or CLIPPER_IDENTITY)".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AllowListAuthorizer;

    fn gate() -> AccessGate {
        AccessGate::new(Arc::new(AllowListAuthorizer::new(["creator@example.com"])))
    }

    #[test]
    fn test_allowed_identity_passes() {
        assert!(gate().admit(Some("Creator@example.com")).is_ok());
    }

    #[test]
    fn test_unknown_identity_is_denied() {
        let result = gate().admit(Some("intruder@example.com"));
        assert!(matches!(result, Err(DomainError::PermissionDenied(_))));
    }

    #[test]
    fn test_missing_identity_is_denied() {
        let result = gate().admit(None);
        assert!(matches!(result, Err(DomainError::PermissionDenied(_))));
    }
}
