use std::fmt;
use std::path::{Path, PathBuf};

/// A rule a present value must satisfy beyond being non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatRule {
    /// The value must begin with `prefix`.
    Prefix {
        key: String,
        prefix: String,
        message: String,
    },
}

impl FormatRule {
    pub fn prefix(key: &str, prefix: &str, message: &str) -> Self {
        Self::Prefix {
            key: key.to_string(),
            prefix: prefix.to_string(),
            message: message.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Prefix { key, .. } => key,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Prefix { message, .. } => message,
        }
    }

    pub fn is_satisfied_by(&self, value: &str) -> bool {
        match self {
            Self::Prefix { prefix, .. } => value.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix { key, prefix, .. } => write!(f, "{key} must start with {prefix}"),
        }
    }
}

/// A named configuration scope backed by `<root>/<module>/.env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDomain {
    pub name: String,
    pub module: String,
    pub required_keys: Vec<String>,
    pub rules: Vec<FormatRule>,
}

impl ConfigDomain {
    pub fn new(name: &str, module: &str) -> Self {
        Self {
            name: name.to_string(),
            module: module.to_string(),
            required_keys: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn require(mut self, key: &str) -> Self {
        self.required_keys.push(key.to_string());
        self
    }

    pub fn rule(mut self, rule: FormatRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Scraper sub-project: social-media API token plus anonymous data-store access.
    pub fn extraction() -> Self {
        Self::new("extraction", "extraction")
            .require("TWITTER_BEARER_TOKEN")
            .require("SUPABASE_URL")
            .require("SUPABASE_ANON_KEY")
            .rule(FormatRule::prefix(
                "SUPABASE_URL",
                "https://",
                "SUPABASE_URL must start with https://",
            ))
            .rule(FormatRule::prefix(
                "TWITTER_BEARER_TOKEN",
                "AAAA",
                "TWITTER_BEARER_TOKEN looks malformed (expected it to start with AAAA)",
            ))
    }

    /// Workflow sub-project: privileged data-store access.
    pub fn orchestration() -> Self {
        Self::new("orchestration", "orchestration")
            .require("SUPABASE_URL")
            .require("SUPABASE_SERVICE_ROLE_KEY")
            .rule(FormatRule::prefix(
                "SUPABASE_URL",
                "https://",
                "SUPABASE_URL must start with https://",
            ))
    }

    /// Domains validated by `validate-env`, in order.
    pub fn builtin() -> Vec<Self> {
        vec![Self::extraction(), Self::orchestration()]
    }

    pub fn env_path(&self, root: &Path) -> PathBuf {
        root.join(&self.module).join(".env")
    }

    pub fn example_path(&self, root: &Path) -> PathBuf {
        root.join(&self.module).join("env.example")
    }

    /// Shell command that creates the env file from its example.
    pub fn copy_hint(&self) -> String {
        format!("cp {0}/env.example {0}/.env", self.module)
    }

    /// Display form of the env file relative to the project root.
    pub fn env_display(&self) -> String {
        format!("{}/.env", self.module)
    }
}
