//! Email identity matching.
//!
//! The same person is often known under different addresses by the work
//! tracker and by the HR system (`alice@company.com` vs `alice@company.io`).
//! An [`EmailMatcher`] decides whether two addresses belong to the same
//! person, and [`EmailMap`] / [`EmailSet`] are keyed through it instead of
//! through string equality.
//!
//! Lookups are linear scans. Buckets involve tens of people, not millions.

use std::fmt;
use std::sync::Arc;

use crate::fields::EmailMatching;

/// Equivalence predicate over two email addresses.
pub trait EmailMatcher: Send + Sync {
    fn matches(&self, a: &str, b: &str) -> bool;
}

impl<F> EmailMatcher for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn matches(&self, a: &str, b: &str) -> bool {
        self(a, b)
    }
}

/// Part of the address before the first `@`, or the whole string.
pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Same local part, any domain. Case-sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreDomain;

impl EmailMatcher for IgnoreDomain {
    fn matches(&self, a: &str, b: &str) -> bool {
        local_part(a) == local_part(b)
    }
}

/// Same local part, any domain, ignoring ASCII case.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreDomainCaseInsensitive;

impl EmailMatcher for IgnoreDomainCaseInsensitive {
    fn matches(&self, a: &str, b: &str) -> bool {
        local_part(a).eq_ignore_ascii_case(local_part(b))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Exact;

impl EmailMatcher for Exact {
    fn matches(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

/// Shared handle to a matcher, cheap to clone into every container.
pub type SharedMatcher = Arc<dyn EmailMatcher>;

impl From<EmailMatching> for SharedMatcher {
    fn from(policy: EmailMatching) -> Self {
        match policy {
            EmailMatching::IgnoreDomain => Arc::new(IgnoreDomain),
            EmailMatching::IgnoreDomainCaseInsensitive => Arc::new(IgnoreDomainCaseInsensitive),
            EmailMatching::Exact => Arc::new(Exact),
        }
    }
}

/// Map keyed by email where keys are compared with an [`EmailMatcher`].
///
/// The first spelling of an address to be inserted stays the canonical key;
/// later `set`s with a matching alias overwrite the value under that key.
/// Iteration follows insertion order.
pub struct EmailMap<V> {
    matcher: SharedMatcher,
    entries: Vec<(String, V)>,
}

impl<V> EmailMap<V> {
    pub fn new(matcher: SharedMatcher) -> Self {
        EmailMap {
            matcher,
            entries: Vec::new(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| self.matcher.matches(key, existing))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = self.position(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Insert or overwrite. Returns the value previously stored under a
    /// matching key.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Canonical key under which `key` is (or would be) stored.
    pub fn canonical_key(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].0.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.entries.into_iter().map(|(_, v)| v)
    }
}

impl<V: fmt::Debug> fmt::Debug for EmailMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Set of emails compared through an [`EmailMatcher`]. Adding an alias of an
/// address already present is a no-op.
pub struct EmailSet {
    matcher: SharedMatcher,
    emails: Vec<String>,
}

impl EmailSet {
    pub fn new(matcher: SharedMatcher) -> Self {
        EmailSet {
            matcher,
            emails: Vec::new(),
        }
    }

    pub fn with_emails<I, S>(matcher: SharedMatcher, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = EmailSet::new(matcher);
        for email in emails {
            set.add(email);
        }
        set
    }

    pub fn has(&self, email: &str) -> bool {
        self.emails.iter().any(|e| self.matcher.matches(email, e))
    }

    /// Returns `false` when a matching address was already present.
    pub fn add(&mut self, email: impl Into<String>) -> bool {
        let email = email.into();
        if self.has(&email) {
            return false;
        }
        self.emails.push(email);
        true
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }
}

impl fmt::Debug for EmailSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
