use colored::Colorize;
use std::fmt;

#[derive(Debug)]
pub enum PreflightError {
    ModuleNotFound {
        path: String,
        hint: String,
    },
    DescriptorNotFound {
        path: String,
    },
    DescriptorParse {
        path: String,
        source: serde_json::Error,
    },
    ValidationFailed {
        domains: Vec<String>,
    },
    IoError {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    Other(anyhow::Error),
}

impl PreflightError {
    pub fn module_not_found(path: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            path: path.into(),
            hint: hint.into(),
        }
    }

    pub fn descriptor_not_found(path: impl Into<String>) -> Self {
        Self::DescriptorNotFound { path: path.into() }
    }

    pub fn descriptor_parse(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::DescriptorParse {
            path: path.into(),
            source,
        }
    }

    pub fn validation_failed(domains: Vec<String>) -> Self {
        Self::ValidationFailed { domains }
    }

    pub fn io_error(
        operation: impl Into<String>,
        path: Option<String>,
        source: std::io::Error,
    ) -> Self {
        Self::IoError {
            operation: operation.into(),
            path,
            source,
        }
    }

    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for PreflightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleNotFound { path, hint } => {
                writeln!(
                    f,
                    "{} External module not available: {}",
                    "✗".red().bold(),
                    path.yellow()
                )?;
                writeln!(f, "  {} Run: {}", "💡".blue(), hint.cyan())?;
                Ok(())
            }
            Self::DescriptorNotFound { path } => {
                writeln!(
                    f,
                    "{} Package descriptor not found: {}",
                    "✗".red().bold(),
                    path.yellow()
                )?;
                writeln!(
                    f,
                    "  {} Make sure the submodule checkout is complete",
                    "💡".blue()
                )?;
                Ok(())
            }
            Self::DescriptorParse { path, source } => {
                writeln!(
                    f,
                    "{} Could not parse package descriptor",
                    "✗".red().bold()
                )?;
                writeln!(f, "  {} Path: {}", "→".blue(), path.yellow())?;
                writeln!(f, "  {} Error: {}", "→".blue(), source)?;
                Ok(())
            }
            Self::ValidationFailed { domains } => {
                writeln!(f, "{} Some validations failed", "❌".red().bold())?;
                for domain in domains {
                    writeln!(f, "  {} {}", "•".blue(), domain)?;
                }
                writeln!(
                    f,
                    "  {} Review the errors above and fix the configuration",
                    "💡".blue()
                )?;
                Ok(())
            }
            Self::IoError {
                operation,
                path,
                source,
            } => {
                writeln!(
                    f,
                    "{} I/O error during: {}",
                    "✗".red().bold(),
                    operation.yellow()
                )?;
                if let Some(path) = path {
                    writeln!(f, "  {} Path: {}", "→".blue(), path)?;
                }
                writeln!(f, "  {} Error: {}", "→".blue(), source)?;
                Ok(())
            }
            Self::Other(err) => write!(f, "{} Unexpected error: {}", "❌".red().bold(), err),
        }
    }
}

impl std::error::Error for PreflightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DescriptorParse { source, .. } => Some(source),
            Self::IoError { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PreflightError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            operation: "unknown".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<anyhow::Error> for PreflightError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

pub type Result<T> = std::result::Result<T, PreflightError>;
