//! Environment policy for remote delivery
//!
//! Only environments in the allow-set transmit to the remote collector.
//! Everything else is diverted to the local error stream.

use std::collections::BTreeSet;

/// Environments that may transmit by default
pub const DEFAULT_REMOTE_ENVIRONMENTS: [&str; 2] = ["production", "staging"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentPolicy {
    allowed: BTreeSet<String>,
}

impl EnvironmentPolicy {
    /// Policy that allows nothing; every remote record is diverted
    pub fn deny_all() -> Self {
        Self {
            allowed: BTreeSet::new(),
        }
    }

    pub fn allowing<I, S>(environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: environments.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn allow(mut self, environment: impl Into<String>) -> Self {
        self.allowed.insert(environment.into());
        self
    }

    /// Exact, case-sensitive label match
    pub fn is_allowed(&self, environment: &str) -> bool {
        self.allowed.contains(environment)
    }

    pub fn allowed(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}

impl Default for EnvironmentPolicy {
    fn default() -> Self {
        Self::allowing(DEFAULT_REMOTE_ENVIRONMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_production_and_staging() {
        let policy = EnvironmentPolicy::default();
        assert!(policy.is_allowed("production"));
        assert!(policy.is_allowed("staging"));
        assert!(!policy.is_allowed("development"));
        assert!(!policy.is_allowed("testing"));
        assert!(!policy.is_allowed("Production"));
        assert!(!policy.is_allowed(""));
    }

    #[test]
    fn test_extension() {
        let policy = EnvironmentPolicy::default().allow("testing");
        assert!(policy.is_allowed("testing"));
        assert_eq!(policy.allowed().count(), 3);

        assert!(!EnvironmentPolicy::deny_all().is_allowed("production"));
    }
}
