use super::{error_detail, LoadedEnv, Probe, ProbeOutcome};
use crate::config::non_empty;
use crate::logging;
use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use url::Url;

const URL_KEY: &str = "SUPABASE_URL";
const KEY_CANDIDATES: [&str; 2] = ["SUPABASE_ANON_KEY", "SUPABASE_SERVICE_ROLE_KEY"];

/// Counts rows of a known table through the PostgREST endpoint.
pub struct SupabaseProbe {
    table: String,
}

struct Credentials<'a> {
    url: &'a str,
    key: &'a str,
}

impl SupabaseProbe {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
        }
    }

    pub fn endpoint(&self, base: &str) -> Result<Url> {
        let raw = format!("{}/rest/v1/{}", base.trim_end_matches('/'), self.table);
        let mut url = Url::parse(&raw).with_context(|| format!("Invalid {URL_KEY}: {base}"))?;
        url.query_pairs_mut()
            .append_pair("select", "count")
            .append_pair("limit", "1");
        Ok(url)
    }

    fn credentials<'a>(env: &'a LoadedEnv) -> Option<Credentials<'a>> {
        env.find_map(|map| {
            let url = non_empty(map, URL_KEY)?;
            let key = KEY_CANDIDATES
                .iter()
                .find_map(|candidate| non_empty(map, candidate))?;
            Some(Credentials { url, key })
        })
    }

    fn query(&self, http: &Client, creds: &Credentials<'_>) -> Result<()> {
        let url = self.endpoint(creds.url)?;
        logging::log_http_request("GET", url.as_str(), None);

        let response = http
            .get(url.clone())
            .header("apikey", creds.key)
            .bearer_auth(creds.key)
            .send()
            .context("Request to Supabase failed")?;

        let status = response.status();
        logging::log_http_request("GET", url.as_str(), Some(status.as_u16()));

        if !status.is_success() {
            let detail = response
                .json::<serde_json::Value>()
                .ok()
                .and_then(|body| error_detail(&body, &["message"]));
            match detail {
                Some(detail) => bail!("HTTP {status}: {detail}"),
                None => bail!("HTTP {status}"),
            }
        }

        Ok(())
    }
}

impl Probe for SupabaseProbe {
    fn service(&self) -> &'static str {
        "Supabase"
    }

    fn attempt(&self, env: &LoadedEnv, http: &Client) -> ProbeOutcome {
        let Some(creds) = Self::credentials(env) else {
            return ProbeOutcome::Skipped(format!("{URL_KEY} and an API key not set"));
        };

        match self.query(http, &creds) {
            Ok(()) => ProbeOutcome::Connected,
            Err(e) => ProbeOutcome::Failed(format!("{e:#}")),
        }
    }
}
