//! Label keys and structured label selectors.
//!
//! Selectors are kept as a map of exact `key=value` requirements and only
//! rendered into the API's selector string at the boundary, so repository
//! names never get spliced into a query by hand.

use crate::naming::LabelValue;
use crate::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Marks Jobs created by this dispatcher.
pub const MANAGED_BY_LABEL: &str = "gitjob.io/managed-by";
pub const MANAGED_BY_VALUE: &str = "gitjob";

/// Normalized repository name the Job was created for.
pub const REPOSITORY_LABEL: &str = "gitjob.io/repository";

/// Normalized commit identifier the Job was created for.
pub const COMMIT_SHA_LABEL: &str = "gitjob.io/commit-sha";

// name segment of a key, and any non-empty value
static LABEL_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([-A-Za-z0-9_.]{0,61}[A-Za-z0-9])?$").unwrap()
});

static LABEL_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").unwrap()
});

/// Equality-based label selector: every requirement must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: BTreeMap<String, String>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector matching every Job created by this dispatcher.
    pub fn managed_by() -> Self {
        let mut selector = Self::new();
        selector
            .requirements
            .insert(MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string());
        selector
    }

    /// Add a requirement after validating the key and value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.insert(key.into(), value.into())?;
        Ok(self)
    }

    /// Narrow this selector to the Jobs of a single repository.
    pub fn for_repository(&self, repository: &LabelValue) -> Result<Self> {
        let mut selector = self.clone();
        selector.insert(REPOSITORY_LABEL.to_string(), repository.to_string())?;
        Ok(selector)
    }

    /// Check that this selector can be used as the base selector of a
    /// dispatcher. The repository and commit labels are set per Job, so a
    /// base selector must not pin them.
    pub fn validate_base(&self) -> Result<()> {
        for key in [REPOSITORY_LABEL, COMMIT_SHA_LABEL] {
            if self.requirements.contains_key(key) {
                return Err(Error::InvalidInput(format!(
                    "base selector must not constrain '{}'",
                    key
                )));
            }
        }
        Ok(())
    }

    /// Parse a selector string of the form `k1=v1,k2==v2`.
    ///
    /// Only equality requirements are supported; set-based and inequality
    /// expressions are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let mut selector = Self::new();
        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.contains("!=") {
                return Err(Error::InvalidInput(format!(
                    "unsupported selector requirement '{}': only equality is supported",
                    part
                )));
            }
            let (key, value) = part
                .split_once("==")
                .or_else(|| part.split_once('='))
                .ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "selector requirement '{}' must have the form key=value",
                        part
                    ))
                })?;
            selector.insert(key.trim().to_string(), value.trim().to_string())?;
        }
        Ok(selector)
    }

    /// Returns true if `labels` satisfies every requirement.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.requirements.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.requirements
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, key: String, value: String) -> Result<()> {
        validate_key(&key)?;
        validate_value(&value)?;
        if let Some(existing) = self.requirements.get(&key) {
            if *existing != value {
                return Err(Error::InvalidInput(format!(
                    "conflicting selector requirements for '{}': '{}' and '{}'",
                    key, existing, value
                )));
            }
        }
        self.requirements.insert(key, value);
        Ok(())
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.requirements {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for LabelSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn validate_key(key: &str) -> Result<()> {
    let (prefix, name) = match key.rsplit_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };
    if let Some(prefix) = prefix {
        if prefix.is_empty() || prefix.len() > 253 || !LABEL_PREFIX_REGEX.is_match(prefix) {
            return Err(Error::InvalidInput(format!(
                "invalid label key prefix in '{}'",
                key
            )));
        }
    }
    if !LABEL_NAME_REGEX.is_match(name) {
        return Err(Error::InvalidInput(format!("invalid label key '{}'", key)));
    }
    Ok(())
}

fn validate_value(value: &str) -> Result<()> {
    if value.is_empty() || LABEL_NAME_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "invalid label value '{}'",
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_managed_by_selector() {
        let selector = LabelSelector::managed_by();
        assert_eq!(selector.to_string(), "gitjob.io/managed-by=gitjob");
        assert_eq!(selector.get(MANAGED_BY_LABEL), Some(MANAGED_BY_VALUE));
    }

    #[test]
    fn test_for_repository_adds_requirement() {
        let repo = LabelValue::new("My Repo");
        let selector = LabelSelector::managed_by().for_repository(&repo).unwrap();
        assert_eq!(
            selector.to_string(),
            "gitjob.io/managed-by=gitjob,gitjob.io/repository=my-repo"
        );
    }

    #[test]
    fn test_for_repository_rejects_conflict() {
        let base = LabelSelector::managed_by()
            .with(REPOSITORY_LABEL, "other")
            .unwrap();
        assert!(base.for_repository(&LabelValue::new("other")).is_ok());
        assert!(matches!(
            base.for_repository(&LabelValue::new("demo")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_base() {
        assert!(LabelSelector::managed_by().validate_base().is_ok());
        assert!(LabelSelector::parse("tier=ops").unwrap().validate_base().is_ok());
        assert!(LabelSelector::parse("gitjob.io/repository=demo")
            .unwrap()
            .validate_base()
            .is_err());
        assert!(LabelSelector::parse("gitjob.io/commit-sha=abc")
            .unwrap()
            .validate_base()
            .is_err());
    }

    #[test]
    fn test_parse_equality_forms() {
        let selector = LabelSelector::parse("app=demo, tier==backend").unwrap();
        assert_eq!(selector.get("app"), Some("demo"));
        assert_eq!(selector.get("tier"), Some("backend"));
        assert_eq!(selector.to_string(), "app=demo,tier=backend");
    }

    #[test]
    fn test_parse_empty() {
        let selector = LabelSelector::parse("").unwrap();
        assert!(selector.is_empty());
        assert_eq!(selector.to_string(), "");
    }

    #[test]
    fn test_parse_rejects_unsupported_forms() {
        assert!(LabelSelector::parse("app!=demo").is_err());
        assert!(LabelSelector::parse("app in (a,b)").is_err());
        assert!(LabelSelector::parse("justakey").is_err());
    }

    #[test]
    fn test_rejects_injection_through_values() {
        let result = LabelSelector::new().with("app", "demo,evil=true");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_conflicting_requirements() {
        assert!(LabelSelector::parse("app=a,app=b").is_err());
        assert!(LabelSelector::parse("app=a,app=a").is_ok());
    }

    #[test]
    fn test_key_validation() {
        assert!(LabelSelector::new().with("example.com/name", "x").is_ok());
        assert!(LabelSelector::new().with("Example.com/name", "x").is_err());
        assert!(LabelSelector::new().with("/name", "x").is_err());
        assert!(LabelSelector::new().with("-bad", "x").is_err());
    }

    #[test]
    fn test_matches() {
        let selector = LabelSelector::parse("app=demo,tier=web").unwrap();
        assert!(selector.matches(&labels(&[("app", "demo"), ("tier", "web"), ("x", "y")])));
        assert!(!selector.matches(&labels(&[("app", "demo")])));
        assert!(!selector.matches(&labels(&[("app", "demo"), ("tier", "db")])));
        assert!(LabelSelector::new().matches(&labels(&[])));
    }
}
