//! Folder-scoped per-asset overrides.

use crate::Settings;

/// Settings a folder meta assigns to named assets in that folder.
///
/// Entries keep insertion order; assigning a name twice replaces the
/// earlier settings in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildrenSettings {
    entries: Vec<(String, Settings)>,
}

impl ChildrenSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `settings` to every name in `names`.
    pub fn insert<I, S>(&mut self, names: I, settings: Settings)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            match self.entries.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => *existing = settings.clone(),
                None => self.entries.push((name, settings.clone())),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Settings> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_expands_and_later_wins() {
        let mut children = ChildrenSettings::new();
        children.insert(
            ["a", "b"],
            Settings {
                global_alpha: Some(1),
                ..Default::default()
            },
        );
        children.insert(
            ["b"],
            Settings {
                global_alpha: Some(2),
                ..Default::default()
            },
        );

        assert_eq!(children.len(), 2);
        assert_eq!(children.get("a").unwrap().global_alpha, Some(1));
        assert_eq!(children.get("b").unwrap().global_alpha, Some(2));
        assert_eq!(children.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(children.get("c").is_none());
    }
}
