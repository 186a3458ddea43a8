//! One-shot connectivity smoke tests against external services.
//!
//! Probes are advisory. Every failure is folded into a [`ProbeOutcome`] and
//! never changes the exit code of the command that ran them.

pub mod supabase;
pub mod twitter;

use crate::config::{non_empty, EnvMap};
use crate::logging;
use reqwest::blocking::Client;
use std::fmt;
use std::time::{Duration, Instant};

pub use supabase::SupabaseProbe;
pub use twitter::TwitterProbe;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TWITTER_API_BASE: &str = "https://api.twitter.com";
pub const DEFAULT_TWITTER_USERNAME: &str = "twitter";
pub const DEFAULT_SUPABASE_TABLE: &str = "tweets_nosql";

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub twitter_api_base: String,
    pub twitter_username: String,
    pub supabase_table: String,
    pub use_system_proxy: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            twitter_api_base: DEFAULT_TWITTER_API_BASE.to_string(),
            twitter_username: DEFAULT_TWITTER_USERNAME.to_string(),
            supabase_table: DEFAULT_SUPABASE_TABLE.to_string(),
            use_system_proxy: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Connected,
    Failed(String),
    Skipped(String),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Connected => write!(f, "connected"),
            ProbeOutcome::Failed(reason) => write!(f, "failed: {reason}"),
            ProbeOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

/// Credentials loaded by each domain, in validation order.
#[derive(Debug, Clone, Default)]
pub struct LoadedEnv {
    domains: Vec<(String, EnvMap)>,
}

impl LoadedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, domain: impl Into<String>, env: EnvMap) {
        self.domains.push((domain.into(), env));
    }

    /// First non-empty value for `key` across the loaded domains.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.domains.iter().find_map(|(_, env)| non_empty(env, key))
    }

    /// First domain map accepted by `select`.
    pub fn find_map<'a, T>(&'a self, select: impl Fn(&'a EnvMap) -> Option<T>) -> Option<T> {
        self.domains.iter().find_map(|(_, env)| select(env))
    }
}

pub trait Probe {
    fn service(&self) -> &'static str;

    /// Make at most one request. Never panics, never propagates errors.
    fn attempt(&self, env: &LoadedEnv, http: &Client) -> ProbeOutcome;
}

#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub service: String,
    pub outcome: ProbeOutcome,
    pub duration: Duration,
}

pub fn default_probes(settings: &ProbeSettings) -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(TwitterProbe::new(
            &settings.twitter_api_base,
            &settings.twitter_username,
        )),
        Box::new(SupabaseProbe::new(&settings.supabase_table)),
    ]
}

pub fn build_client(settings: &ProbeSettings) -> reqwest::Result<Client> {
    let mut builder = Client::builder()
        .timeout(settings.timeout)
        .connect_timeout(settings.timeout)
        .user_agent(concat!("pipeline-preflight/", env!("CARGO_PKG_VERSION")));

    if !settings.use_system_proxy {
        builder = builder.no_proxy();
    }

    builder.build()
}

/// Run every probe in order, one at a time.
pub fn run_probes(
    probes: &[Box<dyn Probe>],
    env: &LoadedEnv,
    settings: &ProbeSettings,
) -> Vec<ProbeReport> {
    let client = match build_client(settings) {
        Ok(client) => client,
        Err(e) => {
            let reason = format!("could not build HTTP client: {e}");
            return probes
                .iter()
                .map(|probe| ProbeReport {
                    service: probe.service().to_string(),
                    outcome: ProbeOutcome::Failed(reason.clone()),
                    duration: Duration::ZERO,
                })
                .collect();
        }
    };

    probes
        .iter()
        .map(|probe| {
            let start = Instant::now();
            let outcome = probe.attempt(env, &client);
            let duration = start.elapsed();
            logging::log_probe_result(
                probe.service(),
                &outcome.to_string(),
                duration.as_millis() as u64,
            );
            ProbeReport {
                service: probe.service().to_string(),
                outcome,
                duration,
            }
        })
        .collect()
}

/// Pull a human readable reason out of an error body, if there is one.
pub(crate) fn error_detail(body: &serde_json::Value, fields: &[&str]) -> Option<String> {
    let parts: Vec<&str> = fields
        .iter()
        .filter_map(|field| body.get(*field).and_then(|v| v.as_str()))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(": "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticProbe {
        name: &'static str,
        outcome: ProbeOutcome,
    }

    impl Probe for StaticProbe {
        fn service(&self) -> &'static str {
            self.name
        }

        fn attempt(&self, _env: &LoadedEnv, _http: &Client) -> ProbeOutcome {
            self.outcome.clone()
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = ProbeSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.twitter_api_base, "https://api.twitter.com");
        assert_eq!(settings.twitter_username, "twitter");
        assert_eq!(settings.supabase_table, "tweets_nosql");
        assert!(settings.use_system_proxy);
    }

    #[test]
    fn test_default_probes_order() {
        let probes = default_probes(&ProbeSettings::default());
        let names: Vec<_> = probes.iter().map(|p| p.service()).collect();
        assert_eq!(names, vec!["Twitter API", "Supabase"]);
    }

    #[test]
    fn test_failed_probe_does_not_stop_the_next() {
        let probes: Vec<Box<dyn Probe>> = vec![
            Box::new(StaticProbe {
                name: "first",
                outcome: ProbeOutcome::Failed("unreachable".to_string()),
            }),
            Box::new(StaticProbe {
                name: "second",
                outcome: ProbeOutcome::Connected,
            }),
        ];

        let reports = run_probes(&probes, &LoadedEnv::new(), &ProbeSettings::default());
        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[0].outcome,
            ProbeOutcome::Failed("unreachable".to_string())
        );
        assert_eq!(reports[1].outcome, ProbeOutcome::Connected);
    }

    #[test]
    fn test_loaded_env_prefers_earlier_domain() {
        let mut env = LoadedEnv::new();
        env.push(
            "extraction",
            EnvMap::from([("SUPABASE_URL".to_string(), "https://first".to_string())]),
        );
        env.push(
            "orchestration",
            EnvMap::from([
                ("SUPABASE_URL".to_string(), "https://second".to_string()),
                ("SUPABASE_SERVICE_ROLE_KEY".to_string(), "service".to_string()),
            ]),
        );

        assert_eq!(env.value("SUPABASE_URL"), Some("https://first"));
        assert_eq!(env.value("SUPABASE_SERVICE_ROLE_KEY"), Some("service"));
        assert_eq!(env.value("TWITTER_BEARER_TOKEN"), None);
    }

    #[test]
    fn test_error_detail() {
        let body = serde_json::json!({"title": "Unauthorized", "detail": "bad token"});
        assert_eq!(
            error_detail(&body, &["title", "detail"]),
            Some("Unauthorized: bad token".to_string())
        );
        assert_eq!(error_detail(&body, &["message"]), None);
    }
}
