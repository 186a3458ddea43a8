use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging based on verbosity level
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pipeline_preflight=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pipeline_preflight=warn,error"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if verbose {
        tracing::info!("Verbose logging enabled");
    }

    Ok(())
}

/// Log the outcome of validating one configuration domain
pub fn log_domain_validation(domain: &str, valid: bool, missing: usize, violations: usize) {
    if valid {
        tracing::info!(domain = domain, "Domain validation passed");
    } else {
        tracing::info!(
            domain = domain,
            missing = missing,
            violations = violations,
            "Domain validation failed"
        );
    }
}

/// Log a dotenv file load
pub fn log_env_loaded(domain: &str, path: &str, keys: usize) {
    tracing::debug!(domain = domain, path = path, keys = keys, "Loaded env file");
}

/// Log HTTP requests
pub fn log_http_request(method: &str, url: &str, status: Option<u16>) {
    if let Some(status_code) = status {
        tracing::info!(
            method = method,
            url = url,
            status = status_code,
            "HTTP request completed"
        );
    } else {
        tracing::debug!(method = method, url = url, "HTTP request initiated");
    }
}

/// Log a probe outcome
pub fn log_probe_result(service: &str, outcome: &str, duration_ms: u64) {
    tracing::info!(
        service = service,
        outcome = outcome,
        duration_ms = duration_ms,
        "Probe finished"
    );
}
