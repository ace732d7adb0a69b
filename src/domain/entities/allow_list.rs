use std::collections::HashSet;

use super::UserId;
use crate::application::errors::ConfigError;

/// Users permitted to talk to the bridge. Built once at startup, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    users: HashSet<UserId>,
}

impl AllowList {
    pub fn new(users: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list of ids, e.g. `"123,456"`.
    ///
    /// Whitespace around entries and empty entries are ignored; any other
    /// non-numeric entry is rejected.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut users = HashSet::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let id = entry
                .parse::<UserId>()
                .map_err(|_| ConfigError::InvalidValue(format!("allowed user id '{}'", entry)))?;
            users.insert(id);
        }
        Ok(Self { users })
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.users.contains(&user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.users.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ids() {
        let list = AllowList::parse("123, 456,,789 ").unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.contains(456));
        assert!(!list.contains(1));
    }

    #[test]
    fn rejects_non_numeric_entries() {
        let err = AllowList::parse("123,abc").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn negative_group_ids_are_accepted() {
        let list = AllowList::parse("-100200300").unwrap();
        assert!(list.contains(-100200300));
    }
}
