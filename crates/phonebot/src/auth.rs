//! Identity allow-list

use std::collections::HashSet;

/// Set of chat identities allowed to drive the phone. An empty allow-list
/// rejects everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authorizer {
    allowed: HashSet<String>,
}

impl Authorizer {
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = identities
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        Self { allowed }
    }

    /// Parse a comma-separated list such as `"123, 456,"`
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn is_authorized(&self, identity: &str) -> bool {
        let identity = identity.trim();
        !identity.is_empty() && self.allowed.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
