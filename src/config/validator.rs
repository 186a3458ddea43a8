use crate::config::{load_env_file, non_empty, ConfigDomain, EnvMap};
use crate::logging;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatViolation {
    pub key: String,
    pub message: String,
}

impl fmt::Display for FormatViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Outcome of validating one [`ConfigDomain`].
///
/// A domain is valid only when its file exists and can be read, every required key
/// has a non-empty value, and every format rule on a present key holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub domain: String,
    pub file_found: bool,
    pub load_error: Option<String>,
    pub missing_keys: Vec<String>,
    pub violations: Vec<FormatViolation>,
}

impl ValidationResult {
    fn new(domain: &ConfigDomain) -> Self {
        Self {
            domain: domain.name.clone(),
            file_found: true,
            load_error: None,
            missing_keys: Vec::new(),
            violations: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.file_found
            && self.load_error.is_none()
            && self.missing_keys.is_empty()
            && self.violations.is_empty()
    }
}

/// Validates configuration domains found under a project root.
pub struct DomainValidator {
    root: PathBuf,
}

impl DomainValidator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn validate(&self, domain: &ConfigDomain) -> ValidationResult {
        self.load_and_validate(domain).0
    }

    /// Validate a domain and hand back the map it was validated against.
    ///
    /// The map is `None` when the file is absent or unreadable.
    pub fn load_and_validate(&self, domain: &ConfigDomain) -> (ValidationResult, Option<EnvMap>) {
        let path = domain.env_path(&self.root);

        if !path.exists() {
            let mut result = ValidationResult::new(domain);
            result.file_found = false;
            logging::log_domain_validation(&domain.name, false, 0, 0);
            return (result, None);
        }

        match load_env_file(&path) {
            Ok(env) => {
                logging::log_env_loaded(&domain.name, &path.display().to_string(), env.len());
                let result = Self::validate_env(domain, &env);
                (result, Some(env))
            }
            Err(e) => {
                let mut result = ValidationResult::new(domain);
                result.load_error = Some(format!("{e:#}"));
                logging::log_domain_validation(&domain.name, false, 0, 0);
                (result, None)
            }
        }
    }

    /// Check presence then format for an already loaded map.
    ///
    /// All missing keys and all failing rules are collected; nothing short-circuits.
    pub fn validate_env(domain: &ConfigDomain, env: &EnvMap) -> ValidationResult {
        let mut result = ValidationResult::new(domain);

        result.missing_keys = domain
            .required_keys
            .iter()
            .filter(|key| non_empty(env, key).is_none())
            .cloned()
            .collect();

        for rule in &domain.rules {
            if let Some(value) = non_empty(env, rule.key()) {
                if !rule.is_satisfied_by(value) {
                    result.violations.push(FormatViolation {
                        key: rule.key().to_string(),
                        message: rule.message().to_string(),
                    });
                }
            }
        }

        logging::log_domain_validation(
            &domain.name,
            result.is_valid(),
            result.missing_keys.len(),
            result.violations.len(),
        );

        result
    }
}
