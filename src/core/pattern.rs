//! Namespace patterns
//!
//! A pattern is an exact namespace, a prefix ending in `*` (`db:*`), or `*`
//! alone, which matches every namespace.

/// Pattern that matches every namespace
pub const WILDCARD: &str = "*";

pub fn matches(pattern: &str, namespace: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => namespace.starts_with(prefix),
        None => pattern == namespace,
    }
}

/// Namespace selection read from an environment variable.
///
/// The value is a comma or whitespace separated list of patterns; a leading
/// `-` excludes matching namespaces (`DEBUG=app:*,-app:noisy`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPatterns {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl EnvPatterns {
    /// `None` when the value is empty, which means "no override"
    pub fn parse(value: &str) -> Option<Self> {
        let mut patterns = EnvPatterns::default();
        for item in value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|item| !item.is_empty())
        {
            match item.strip_prefix('-') {
                Some(excluded) => patterns.exclude.push(excluded.to_string()),
                None => patterns.include.push(item.to_string()),
            }
        }

        if patterns.include.is_empty() && patterns.exclude.is_empty() {
            None
        } else {
            Some(patterns)
        }
    }

    /// Read and parse `var`; absent, non-unicode or empty values give `None`
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var).ok().and_then(|value| Self::parse(&value))
    }

    pub fn enables(&self, namespace: &str) -> bool {
        if self.exclude.iter().any(|p| matches(p, namespace)) {
            return false;
        }
        self.include.iter().any(|p| matches(p, namespace))
    }
}
