//! Client-side item filters
//!
//! A [`FilterSpec`] combines an optional name regex with an optional set of
//! accepted ids. Both must pass for an item to be kept.

use crate::error::{ListError, Result};
use regex::Regex;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    name_regex: Option<Regex>,
    ids: Option<HashSet<String>>,
}

impl FilterSpec {
    /// Build a filter from raw data source arguments.
    ///
    /// The regex is compiled here so a bad pattern fails before any network
    /// call. An empty id list is treated as unset, the same way Terraform
    /// reports an empty `ids` argument.
    pub fn new<I, S>(name_regex: Option<&str>, ids: Option<I>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name_regex = match name_regex {
            Some(pattern) => Some(Regex::new(pattern).map_err(|source| {
                ListError::InvalidNameRegex {
                    pattern: pattern.to_string(),
                    source,
                }
            })?),
            None => None,
        };

        let ids = ids
            .map(|ids| ids.into_iter().map(Into::into).collect::<HashSet<String>>())
            .filter(|set| !set.is_empty());

        Ok(Self { name_regex, ids })
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.name_regex.is_none() && self.ids.is_none()
    }

    pub fn name_regex(&self) -> Option<&Regex> {
        self.name_regex.as_ref()
    }

    pub fn ids(&self) -> Option<&HashSet<String>> {
        self.ids.as_ref()
    }

    pub fn matches_name(&self, name: Option<&str>) -> bool {
        match &self.name_regex {
            Some(regex) => regex.is_match(name.unwrap_or_default()),
            None => true,
        }
    }

    pub fn matches_id(&self, id: &str) -> bool {
        match &self.ids {
            Some(ids) => ids.contains(id),
            None => true,
        }
    }

    pub fn matches(&self, id: &str, name: Option<&str>) -> bool {
        self.matches_name(name) && self.matches_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = FilterSpec::none();
        assert!(filter.is_empty());
        assert!(filter.matches("vpc-1", Some("anything")));
        assert!(filter.matches("vpc-2", None));
    }

    #[test]
    fn name_regex_is_applied_to_name() {
        let filter = FilterSpec::new(Some("^foo"), None::<Vec<String>>).unwrap();
        assert!(filter.matches("a", Some("foo")));
        assert!(filter.matches("c", Some("foobar")));
        assert!(!filter.matches("b", Some("bar")));
    }

    #[test]
    fn missing_name_is_matched_as_empty_string() {
        let strict = FilterSpec::new(Some("^foo"), None::<Vec<String>>).unwrap();
        assert!(!strict.matches("a", None));

        let permissive = FilterSpec::new(Some(".*"), None::<Vec<String>>).unwrap();
        assert!(permissive.matches("a", None));
    }

    #[test]
    fn id_set_is_membership_test() {
        let filter = FilterSpec::new(None, ids(&["vpc-1", "vpc-3"])).unwrap();
        assert!(filter.matches("vpc-1", None));
        assert!(!filter.matches("vpc-2", None));
        assert!(filter.matches("vpc-3", Some("ignored")));
    }

    #[test]
    fn empty_id_list_is_treated_as_unset() {
        let filter = FilterSpec::new(None, ids(&[])).unwrap();
        assert!(filter.ids().is_none());
        assert!(filter.matches("vpc-9", None));
    }

    #[test]
    fn both_filters_must_pass() {
        let filter = FilterSpec::new(Some("^prod-"), ids(&["vpc-1", "vpc-2"])).unwrap();
        assert!(filter.matches("vpc-1", Some("prod-a")));
        assert!(!filter.matches("vpc-1", Some("dev-a")));
        assert!(!filter.matches("vpc-3", Some("prod-c")));
    }

    #[test]
    fn invalid_regex_is_a_config_error() {
        let err = FilterSpec::new(Some("[unclosed"), None::<Vec<String>>).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("[unclosed"));
    }
}
