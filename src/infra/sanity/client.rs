use metrics::counter;
use reqwest::{Client, header::AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::SanitySettings;
use crate::infra::error::InfraError;

use super::queries::GroqQuery;

pub(crate) const METRIC_CMS_FETCH: &str = "atelier_cms_fetch_total";
pub(crate) const METRIC_CMS_FETCH_FAILED: &str = "atelier_cms_fetch_failed_total";

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Read-only client for the CMS query API.
#[derive(Clone, Debug)]
pub struct SanityClient {
    client: Client,
    query_url: Url,
    token: Option<String>,
}

impl SanityClient {
    pub fn new(settings: &SanitySettings) -> Result<Self, InfraError> {
        let query_url = settings.api_base.join(&format!(
            "v{}/data/query/{}",
            settings.api_version, settings.dataset
        ))?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            client,
            query_url,
            token: settings.token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("atelier/", env!("CARGO_PKG_VERSION"))
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }

    /// Run `query` and decode its `result`. Parameters are passed as `$name`
    /// query arguments holding JSON-encoded values.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: GroqQuery,
        params: &[(&str, Value)],
    ) -> Result<T, InfraError> {
        counter!(METRIC_CMS_FETCH, "query" => query.name).increment(1);
        let result = self.execute(query, params).await;
        if let Err(err) = &result {
            counter!(METRIC_CMS_FETCH_FAILED, "query" => query.name).increment(1);
            warn!(
                target = "infra::sanity",
                query = query.name,
                error = %err,
                "cms query failed"
            );
        }
        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: GroqQuery,
        params: &[(&str, Value)],
    ) -> Result<T, InfraError> {
        let url = self.request_url(query, params);
        debug!(target = "infra::sanity", query = query.name, "running cms query");

        let mut request = self.client.get(url);
        if let Some(token) = self.token.as_deref() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(InfraError::cms(status.as_u16(), text));
        }

        let envelope: QueryResponse<T> = serde_json::from_slice(&bytes).map_err(|err| {
            InfraError::decode(format!("query `{}`: {err}", query.name))
        })?;
        Ok(envelope.result)
    }

    fn request_url(&self, query: GroqQuery, params: &[(&str, Value)]) -> Url {
        let mut url = self.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query.text);
            for (name, value) in params {
                pairs.append_pair(&format!("${name}"), &value.to_string());
            }
        }
        url
    }
}
