/// The set of domains the user has muted
use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of muted domains.
///
/// Serialized as a bare JSON array of strings, which is also the shape kept
/// in extension storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct MutedDomains {
    domains: Vec<String>,
}

impl MutedDomains {
    pub fn new() -> Self {
        MutedDomains {
            domains: Vec::new(),
        }
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }

    /// Add a domain; returns false if it was already present
    pub fn insert(&mut self, domain: &str) -> bool {
        if self.contains(domain) {
            return false;
        }
        self.domains.push(domain.to_string());
        true
    }

    /// Remove a domain; returns false if it was not present
    pub fn remove(&mut self, domain: &str) -> bool {
        let original_len = self.domains.len();
        self.domains.retain(|d| d != domain);
        self.domains.len() < original_len
    }

    /// Insert or remove `domain` so that membership equals `muted`
    pub fn set(&mut self, domain: &str, muted: bool) -> bool {
        if muted {
            self.insert(domain)
        } else {
            self.remove(domain)
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.domains
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl From<Vec<String>> for MutedDomains {
    fn from(domains: Vec<String>) -> Self {
        let mut set = MutedDomains::new();
        for domain in &domains {
            set.insert(domain);
        }
        set
    }
}

impl From<MutedDomains> for Vec<String> {
    fn from(set: MutedDomains) -> Self {
        set.domains
    }
}
