//! Ignore rules for discovery.
//!
//! A path is skipped when any of its segments ends with the ignore suffix,
//! or when it matches one of the configured glob patterns.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::ffi::OsStr;
use std::path::Path;

/// Errors for ignore rules
#[derive(Debug, thiserror::Error)]
pub enum IgnoreError {
    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),
}

/// Rules that decide which paths discovery skips
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    suffix: String,
    glob_set: GlobSet,
}

impl IgnoreRules {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            glob_set: GlobSet::empty(),
        }
    }

    /// Add glob patterns matched against root-relative paths
    pub fn with_patterns<S: AsRef<str>>(self, patterns: &[S]) -> Result<Self, IgnoreError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            if !pattern.is_empty() {
                builder.add(Glob::new(pattern)?);
            }
        }

        Ok(Self {
            glob_set: builder.build()?,
            ..self
        })
    }

    /// Check a single file or directory name against the suffix rule
    pub fn is_ignored_name(&self, name: &OsStr) -> bool {
        name.to_string_lossy().ends_with(self.suffix.as_str())
    }

    /// Check a root-relative path: any segment with the suffix, or a glob match
    pub fn is_ignored(&self, rel_path: &Path) -> bool {
        rel_path
            .iter()
            .any(|segment| self.is_ignored_name(segment))
            || self.glob_set.is_match(rel_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_on_any_segment() {
        let rules = IgnoreRules::new("_ignore");

        assert!(rules.is_ignored(Path::new("cache_ignore")));
        assert!(rules.is_ignored(Path::new("cache_ignore/hero.png")));
        assert!(rules.is_ignored(Path::new("ui/wip_ignore/deep/button.png")));
        assert!(!rules.is_ignored(Path::new("ui/ignore_me/button.png")));
        assert!(!rules.is_ignored(Path::new("ui/button.png")));
    }

    #[test]
    fn test_custom_patterns() {
        let rules = IgnoreRules::new("_ignore")
            .with_patterns(&["**/*.psd", "drafts/**"])
            .unwrap();

        assert!(rules.is_ignored(Path::new("ui/layers.psd")));
        assert!(rules.is_ignored(Path::new("drafts/hero.png")));
        assert!(!rules.is_ignored(Path::new("ui/hero.png")));
        // Suffix rule still applies
        assert!(rules.is_ignored(Path::new("old_ignore/a.png")));
    }

    #[test]
    fn test_bad_pattern() {
        assert!(IgnoreRules::new("_ignore").with_patterns(&["a[b"]).is_err());
    }
}
