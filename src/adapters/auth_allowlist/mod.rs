// Allow-list authorization adapter

use crate::ports::AuthorizationPort;

/// Grants access to a fixed set of identities.
///
/// Identities are compared after trimming and lower-casing. An empty list
/// grants nobody.
#[derive(Debug, Clone, Default)]
pub struct AllowListAuthorizer {
    allowed: Vec<String>,
}

impl AllowListAuthorizer {
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = identities
            .into_iter()
            .map(|identity| normalize_identity(identity.as_ref()))
            .filter(|identity| !identity.is_empty())
            .collect();
        Self { allowed }
    }
}

fn normalize_identity(identity: &str) -> String {
    identity.trim().to_lowercase()
}

impl AuthorizationPort for AllowListAuthorizer {
    fn is_authorized(&self, identity: &str) -> bool {
        let identity = normalize_identity(identity);
        !identity.is_empty() && self.allowed.iter().any(|allowed| *allowed == identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_identity_is_authorized() {
        let auth = AllowListAuthorizer::new(["creator@example.com"]);
        assert!(auth.is_authorized("creator@example.com"));
        assert!(auth.is_authorized("  Creator@Example.COM "));
    }

    #[test]
    fn test_other_identity_is_denied() {
        let auth = AllowListAuthorizer::new(["creator@example.com"]);
        assert!(!auth.is_authorized("someone@example.com"));
        assert!(!auth.is_authorized(""));
    }

    #[test]
    fn test_empty_list_denies_everyone() {
        let auth = AllowListAuthorizer::new(Vec::<String>::new());
        assert!(!auth.is_authorized("creator@example.com"));
        assert!(!auth.is_authorized(""));
    }

    #[test]
    fn test_blank_entries_are_ignored() {
        let auth = AllowListAuthorizer::new(["", "   ", "a@b.c"]);
        assert!(auth.is_authorized("a@b.c"));
        assert!(!auth.is_authorized(" "));
        assert!(!auth.is_authorized(""));
    }
}
