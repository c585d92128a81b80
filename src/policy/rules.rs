//! Allow/disallow rule sets
//!
//! A rule set pairs a policy with a list of restrictions. Extension rules
//! compare literally, pattern rules are shell globs matched against the
//! basename.

use globset::{Glob, GlobMatcher};
use log::warn;

use crate::config::RuleSetConfig;

/// How restrictions are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Only listed items are permitted
    AllowList,
    /// Everything except listed items is permitted
    DisallowList,
    /// Unrecognized configuration value; denies everything
    Invalid,
}

impl Policy {
    pub fn parse(value: &str) -> Self {
        match value {
            "ALLOW_LIST" => Policy::AllowList,
            "DISALLOW_LIST" => Policy::DisallowList,
            other => {
                warn!("Unrecognized restriction policy {:?}, denying everything", other);
                Policy::Invalid
            }
        }
    }

    /// Apply the policy to the outcome of a restriction lookup
    pub fn permits(self, listed: bool) -> bool {
        match self {
            Policy::AllowList => listed,
            Policy::DisallowList => !listed,
            Policy::Invalid => false,
        }
    }
}

/// Extension rule set
#[derive(Debug, Clone)]
pub struct ExtensionRules {
    policy: Policy,
    restrictions: Vec<String>,
    ignore_case: bool,
}

impl ExtensionRules {
    pub fn new(policy: Policy, restrictions: Vec<String>, ignore_case: bool) -> Self {
        let restrictions = if ignore_case {
            restrictions.iter().map(|r| r.to_lowercase()).collect()
        } else {
            restrictions
        };

        Self {
            policy,
            restrictions,
            ignore_case,
        }
    }

    pub fn from_config(config: &RuleSetConfig) -> Self {
        Self::new(
            Policy::parse(&config.policy),
            config.restrictions.clone(),
            config.ignorecase,
        )
    }

    pub fn permits(&self, extension: &str) -> bool {
        let listed = if self.ignore_case {
            let extension = extension.to_lowercase();
            self.restrictions.iter().any(|r| *r == extension)
        } else {
            self.restrictions.iter().any(|r| r == extension)
        };
        self.policy.permits(listed)
    }
}

/// Basename glob rule set
#[derive(Debug, Clone)]
pub struct PatternRules {
    policy: Policy,
    matchers: Vec<GlobMatcher>,
    ignore_case: bool,
}

impl PatternRules {
    /// Compile the patterns. Patterns that fail to compile are dropped.
    pub fn new(policy: Policy, restrictions: &[String], ignore_case: bool) -> Self {
        let matchers = restrictions
            .iter()
            .filter_map(|pattern| {
                let pattern = if ignore_case {
                    pattern.to_lowercase()
                } else {
                    pattern.clone()
                };
                match Glob::new(&pattern) {
                    Ok(glob) => Some(glob.compile_matcher()),
                    Err(e) => {
                        warn!("Ignoring invalid name pattern {:?}: {}", pattern, e);
                        None
                    }
                }
            })
            .collect();

        Self {
            policy,
            matchers,
            ignore_case,
        }
    }

    pub fn from_config(config: &RuleSetConfig) -> Self {
        Self::new(
            Policy::parse(&config.policy),
            &config.restrictions,
            config.ignorecase,
        )
    }

    pub fn permits(&self, basename: &str) -> bool {
        let basename = if self.ignore_case {
            basename.to_lowercase()
        } else {
            basename.to_string()
        };
        let matched = self.matchers.iter().any(|m| m.is_match(&basename));
        self.policy.permits(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(Policy::parse("ALLOW_LIST"), Policy::AllowList);
        assert_eq!(Policy::parse("DISALLOW_LIST"), Policy::DisallowList);
        assert_eq!(Policy::parse("allow_list"), Policy::Invalid);
        assert_eq!(Policy::parse(""), Policy::Invalid);
    }

    #[test]
    fn test_invalid_policy_never_permits() {
        assert!(!Policy::Invalid.permits(true));
        assert!(!Policy::Invalid.permits(false));
    }

    #[test]
    fn test_extension_case_folding() {
        let folded = ExtensionRules::new(Policy::AllowList, strings(&["JPG"]), true);
        assert!(folded.permits("jpg"));
        assert!(folded.permits("Jpg"));

        let strict = ExtensionRules::new(Policy::AllowList, strings(&["JPG"]), false);
        assert!(!strict.permits("jpg"));
        assert!(strict.permits("JPG"));
    }

    #[test]
    fn test_pattern_matching() {
        let rules = PatternRules::new(
            Policy::DisallowList,
            &strings(&["*/.htaccess", ".*", "*.cgi"]),
            false,
        );
        assert!(!rules.permits(".htaccess"));
        assert!(!rules.permits("index.cgi"));
        assert!(rules.permits("index.html"));
    }

    #[test]
    fn test_invalid_patterns_are_dropped() {
        let rules = PatternRules::new(Policy::AllowList, &strings(&["[", "*.txt"]), false);
        assert!(rules.permits("notes.txt"));
        assert!(!rules.permits("notes.md"));
    }
}
