//! Protocol method and event identifiers.

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};

/// A `Domain.name` identifier naming a command or an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodType(Cow<'static, str>);

impl MethodType {
    /// Create an identifier from a static string without allocating.
    #[must_use]
    pub const fn from_static(method: &'static str) -> Self {
        Self(Cow::Borrowed(method))
    }

    /// Create an identifier from an owned string.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self(Cow::Owned(method.into()))
    }

    /// The full identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The domain part (before the first `.`).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('.').map_or("", |(domain, _)| domain)
    }

    /// The name part (after the first `.`), or the whole identifier if there
    /// is no domain.
    #[must_use]
    pub fn name(&self) -> &str {
        self.as_str()
            .split_once('.')
            .map_or(self.as_str(), |(_, name)| name)
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for MethodType {
    fn from(method: &'static str) -> Self {
        Self::from_static(method)
    }
}

impl From<String> for MethodType {
    fn from(method: String) -> Self {
        Self::new(method)
    }
}

impl AsRef<str> for MethodType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_and_name() {
        let method = MethodType::from_static("Page.loadEventFired");
        assert_eq!(method.domain(), "Page");
        assert_eq!(method.name(), "loadEventFired");

        let bare = MethodType::new("ping");
        assert_eq!(bare.domain(), "");
        assert_eq!(bare.name(), "ping");
    }

    #[test]
    fn test_borrowed_and_owned_compare_equal() {
        assert_eq!(
            MethodType::from_static("Storage.clearDataForOrigin"),
            MethodType::new(String::from("Storage.clearDataForOrigin"))
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&MethodType::from("Page.navigate")).unwrap();
        assert_eq!(json, r#""Page.navigate""#);
    }
}
