//! Environment configuration validation command.
//!
//! Validates each configuration domain in turn, then runs connectivity
//! probes with whatever credentials were loaded. Only domain validation
//! decides success; probe failures are reported and otherwise ignored.

use colored::Colorize;
use std::path::PathBuf;

use crate::config::{ConfigDomain, DomainValidator, ValidationResult};
use crate::error::{PreflightError, Result};
use crate::probe::{
    default_probes, run_probes, LoadedEnv, Probe, ProbeOutcome, ProbeReport, ProbeSettings,
};

/// Everything one run of the command found.
#[derive(Debug, Clone)]
pub struct EnvReport {
    pub results: Vec<ValidationResult>,
    pub probes: Vec<ProbeReport>,
}

impl EnvReport {
    pub fn all_valid(&self) -> bool {
        self.results.iter().all(ValidationResult::is_valid)
    }

    pub fn invalid_domains(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.is_valid())
            .map(|r| r.domain.clone())
            .collect()
    }
}

pub struct ValidateEnvCommand {
    root: PathBuf,
    verbose: bool,
    skip_probes: bool,
    settings: ProbeSettings,
    domains: Vec<ConfigDomain>,
    probes: Option<Vec<Box<dyn Probe>>>,
}

impl ValidateEnvCommand {
    pub fn new(root: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            root: root.into(),
            verbose,
            skip_probes: false,
            settings: ProbeSettings::default(),
            domains: ConfigDomain::builtin(),
            probes: None,
        }
    }

    pub fn skip_probes(mut self, skip: bool) -> Self {
        self.skip_probes = skip;
        self
    }

    pub fn with_settings(mut self, settings: ProbeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_domains(mut self, domains: Vec<ConfigDomain>) -> Self {
        self.domains = domains;
        self
    }

    pub fn with_probes(mut self, probes: Vec<Box<dyn Probe>>) -> Self {
        self.probes = Some(probes);
        self
    }

    /// Validate, probe and report. Fails only when a domain is invalid.
    pub fn execute(&self) -> Result<EnvReport> {
        println!(
            "{}",
            "🚀 Starting environment variable validation...".blue().bold()
        );
        println!();

        let report = self.run();

        println!();
        if report.all_valid() {
            println!("{}", "🎉 All validations passed!".green().bold());
            println!("{} The project is ready to run", "💡".blue());
            Ok(report)
        } else {
            Err(PreflightError::validation_failed(report.invalid_domains()))
        }
    }

    /// Validate every domain and run the probes without deciding the outcome.
    pub fn run(&self) -> EnvReport {
        let validator = DomainValidator::new(&self.root);
        let mut loaded = LoadedEnv::new();
        let mut results = Vec::with_capacity(self.domains.len());

        for domain in &self.domains {
            println!(
                "{} Validating {} environment variables...",
                "🔍".blue(),
                domain.name.cyan()
            );
            let (result, env) = validator.load_and_validate(domain);
            self.print_result(domain, &result);
            if let Some(env) = env {
                loaded.push(domain.name.clone(), env);
            }
            results.push(result);
            println!();
        }

        let probes = self.probe(&loaded);

        EnvReport { results, probes }
    }

    fn probe(&self, loaded: &LoadedEnv) -> Vec<ProbeReport> {
        println!("{} Testing connections to external services...", "🌐".blue());

        if self.skip_probes {
            println!("{} Connectivity probes skipped", "⚠".yellow());
            return Vec::new();
        }

        let reports = match &self.probes {
            Some(probes) => run_probes(probes, loaded, &self.settings),
            None => run_probes(&default_probes(&self.settings), loaded, &self.settings),
        };

        for report in &reports {
            self.print_probe(report);
        }

        reports
    }

    fn print_result(&self, domain: &ConfigDomain, result: &ValidationResult) {
        if !result.file_found {
            println!(
                "{} File not found: {}",
                "❌".red(),
                domain.env_display().yellow()
            );
            println!("{} Create it by copying the example:", "💡".blue());
            println!("   {}", domain.copy_hint());
            if self.verbose && !domain.example_path(&self.root).exists() {
                println!(
                    "   {}",
                    format!("(no example found at {})", domain.example_path(&self.root).display())
                        .dimmed()
                );
            }
            return;
        }

        if let Some(error) = &result.load_error {
            println!(
                "{} Could not read {}",
                "❌".red(),
                domain.env_display().yellow()
            );
            println!("   {}", error.dimmed());
            println!("{} Check that the file is readable UTF-8 text", "💡".blue());
            return;
        }

        if !result.missing_keys.is_empty() {
            println!(
                "{} Missing variables in {}:",
                "❌".red(),
                domain.env_display().yellow()
            );
            for key in &result.missing_keys {
                println!("   - {key}");
            }
        }

        if !result.violations.is_empty() {
            println!("{} Format errors:", "❌".red());
            for violation in &result.violations {
                println!("   - {violation}");
            }
        }

        if result.is_valid() {
            println!(
                "{} {} variables configured correctly",
                "✅".green(),
                domain.name
            );
        }
    }

    fn print_probe(&self, report: &ProbeReport) {
        match &report.outcome {
            ProbeOutcome::Connected => {
                println!("{} {}: connection successful", "✅".green(), report.service);
            }
            ProbeOutcome::Failed(reason) => {
                println!("{} {}: {}", "❌".red(), report.service, reason);
            }
            ProbeOutcome::Skipped(reason) => {
                println!("{} {}: skipped ({})", "⚠".yellow(), report.service, reason);
            }
        }
        if self.verbose {
            println!("   {}", format!("took {} ms", report.duration.as_millis()).dimmed());
        }
    }
}
