use super::{error_detail, LoadedEnv, Probe, ProbeOutcome};
use crate::logging;
use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use url::Url;

const TOKEN_KEY: &str = "TWITTER_BEARER_TOKEN";

/// Looks up a public account with the configured bearer token.
pub struct TwitterProbe {
    api_base: String,
    username: String,
}

impl TwitterProbe {
    pub fn new(api_base: &str, username: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            username: username.to_string(),
        }
    }

    pub fn endpoint(&self) -> Result<Url> {
        let raw = format!("{}/2/users/by/username/{}", self.api_base, self.username);
        Url::parse(&raw).with_context(|| format!("Invalid Twitter API URL: {raw}"))
    }

    fn lookup(&self, http: &Client, token: &str) -> Result<()> {
        let url = self.endpoint()?;
        logging::log_http_request("GET", url.as_str(), None);

        let response = http
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .context("Request to Twitter API failed")?;

        let status = response.status();
        logging::log_http_request("GET", url.as_str(), Some(status.as_u16()));

        if !status.is_success() {
            let detail = response
                .json::<serde_json::Value>()
                .ok()
                .and_then(|body| error_detail(&body, &["title", "detail"]));
            match detail {
                Some(detail) => bail!("HTTP {status}: {detail}"),
                None => bail!("HTTP {status}"),
            }
        }

        Ok(())
    }
}

impl Probe for TwitterProbe {
    fn service(&self) -> &'static str {
        "Twitter API"
    }

    fn attempt(&self, env: &LoadedEnv, http: &Client) -> ProbeOutcome {
        let Some(token) = env.value(TOKEN_KEY) else {
            return ProbeOutcome::Skipped(format!("{TOKEN_KEY} not set"));
        };

        match self.lookup(http, token) {
            Ok(()) => ProbeOutcome::Connected,
            Err(e) => ProbeOutcome::Failed(format!("{e:#}")),
        }
    }
}
