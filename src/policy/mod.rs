//! Restriction policy
//!
//! Evaluates extension and name-pattern rules against paths. Every check is a
//! pure boolean; an unrecognized policy value denies everything.

pub mod rules;

pub use rules::{ExtensionRules, PatternRules, Policy};

use crate::config::SecurityConfig;
use crate::storage::paths;

/// Extension and pattern rules loaded from the `security` section
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    extensions: ExtensionRules,
    patterns: PatternRules,
}

impl PolicyEngine {
    pub fn new(extensions: ExtensionRules, patterns: PatternRules) -> Self {
        Self {
            extensions,
            patterns,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            ExtensionRules::from_config(&security.extensions),
            PatternRules::from_config(&security.patterns),
        )
    }

    /// Check the extension of `path` against the extension rules
    pub fn is_allowed_extension(&self, path: &str) -> bool {
        self.extensions.permits(paths::extension(path))
    }

    /// Check the basename of `path` against the pattern rules
    pub fn is_allowed_path(&self, path: &str) -> bool {
        self.patterns.permits(paths::basename(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(ext_policy: Policy, exts: &[&str], pat_policy: Policy, pats: &[&str]) -> PolicyEngine {
        let exts = exts.iter().map(|s| s.to_string()).collect();
        let pats: Vec<String> = pats.iter().map(|s| s.to_string()).collect();
        PolicyEngine::new(
            ExtensionRules::new(ext_policy, exts, true),
            PatternRules::new(pat_policy, &pats, true),
        )
    }

    #[test]
    fn test_extension_allow_list() {
        let policy = engine(Policy::AllowList, &["jpg", "png"], Policy::DisallowList, &[]);
        assert!(policy.is_allowed_extension("a.jpg"));
        assert!(policy.is_allowed_extension("/photos/B.PNG"));
        assert!(!policy.is_allowed_extension("a.gif"));
        assert!(!policy.is_allowed_extension("noext"));
    }

    #[test]
    fn test_extension_disallow_list() {
        let policy = engine(Policy::DisallowList, &["exe"], Policy::DisallowList, &[]);
        assert!(!policy.is_allowed_extension("a.exe"));
        assert!(policy.is_allowed_extension("a.txt"));
    }

    #[test]
    fn test_unrecognized_policy_fails_closed() {
        let policy = engine(Policy::Invalid, &[], Policy::Invalid, &[]);
        assert!(!policy.is_allowed_extension("a.txt"));
        assert!(!policy.is_allowed_path("/a.txt"));
    }

    #[test]
    fn test_path_patterns_use_basename() {
        let policy = engine(
            Policy::DisallowList,
            &[],
            Policy::DisallowList,
            &["_thumbs", ".*"],
        );
        assert!(!policy.is_allowed_path("/images/_thumbs/"));
        assert!(!policy.is_allowed_path("/docs/.secret"));
        assert!(policy.is_allowed_path("/docs/report.pdf"));
        assert!(policy.is_allowed_path("/_thumbs_backup/a.txt"));
    }

    #[test]
    fn test_path_allow_list() {
        let policy = engine(Policy::DisallowList, &[], Policy::AllowList, &["*.md"]);
        assert!(policy.is_allowed_path("/notes/README.MD"));
        assert!(!policy.is_allowed_path("/notes/todo.txt"));
    }

    #[test]
    fn test_from_config_parses_policy() {
        let mut security = SecurityConfig::default();
        security.extensions.policy = "WHATEVER".into();
        let policy = PolicyEngine::from_config(&security);
        assert!(!policy.is_allowed_extension("a.txt"));
        assert!(policy.is_allowed_path("/a.txt"));
    }
}
