//! Path-based access policy

use axum::http::Method;

/// How a rule matches the request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Prefix(String),
}

impl PathPattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(expected) => path == expected,
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// A single public-access rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRule {
    method: Option<Method>,
    pattern: PathPattern,
}

impl PublicRule {
    /// Any method, exact path
    pub fn exact(path: impl Into<String>) -> Self {
        Self {
            method: None,
            pattern: PathPattern::Exact(path.into()),
        }
    }

    /// Any method, path prefix
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            method: None,
            pattern: PathPattern::Prefix(prefix.into()),
        }
    }

    /// Restrict the rule to one HTTP method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.pattern.matches(path)
    }
}

/// Whether a request needs an authenticated principal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// Ordered table of public rules; anything unmatched is protected
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<PublicRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<PublicRule>) -> Self {
        Self { rules }
    }

    /// Append a public rule unless an equal one is already present
    pub fn with_rule(mut self, rule: PublicRule) -> Self {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
        self
    }

    pub fn rules(&self) -> &[PublicRule] {
        &self.rules
    }

    pub fn classify(&self, method: &Method, path: &str) -> Access {
        if self.rules.iter().any(|rule| rule.matches(method, path)) {
            Access::Public
        } else {
            Access::Protected
        }
    }

    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        self.classify(method, path) == Access::Public
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(vec![
            PublicRule::exact("/info"),
            PublicRule::prefix("/info/"),
            PublicRule::exact("/api/v1/users").with_method(Method::POST),
            PublicRule::prefix("/api/v1/auth/"),
            PublicRule::prefix("/swagger-ui/"),
            PublicRule::prefix("/v3/api-docs"),
            PublicRule::exact("/health"),
            PublicRule::exact("/live"),
            PublicRule::exact("/ready"),
            PublicRule::exact("/metrics"),
        ])
    }
}
