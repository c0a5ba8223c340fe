use async_trait::async_trait;
use metrics::counter;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::warn;

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::entities::{Contact, CvData, Post, SiteSettings, Tool};
use crate::infra::error::InfraError;

use super::client::SanityClient;
use super::queries::{self, GroqQuery};

pub(crate) const METRIC_CMS_RECORDS_SKIPPED: &str = "atelier_cms_records_skipped_total";

/// [`ContentRepo`] backed by the CMS query API.
#[derive(Clone, Debug)]
pub struct SanityRepository {
    client: SanityClient,
}

impl SanityRepository {
    pub fn new(client: SanityClient) -> Self {
        Self { client }
    }

    /// Fetch a list query, decoding each record on its own so one bad
    /// document (a draft, an unknown category) only drops itself.
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        query: GroqQuery,
    ) -> Result<Vec<T>, RepoError> {
        let records: Option<Vec<Value>> = self.client.fetch(query, &[]).await?;
        Ok(decode_records(query, records.unwrap_or_default()))
    }
}

fn decode_records<T: DeserializeOwned>(query: GroqQuery, records: Vec<Value>) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match serde_json::from_value(record) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    counter!(METRIC_CMS_RECORDS_SKIPPED, "query" => query.name).increment(1);
                    warn!(
                        target = "infra::sanity",
                        query = query.name,
                        id = %id,
                        error = %err,
                        "skipping record that failed to decode"
                    );
                    None
                }
            }
        })
        .collect()
}

impl From<InfraError> for RepoError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Decode { .. } => RepoError::malformed(err),
            other => RepoError::unavailable(other),
        }
    }
}

#[async_trait]
impl ContentRepo for SanityRepository {
    async fn site_settings(&self) -> Result<Option<SiteSettings>, RepoError> {
        Ok(self.client.fetch(queries::SITE_SETTINGS, &[]).await?)
    }

    async fn contact(&self) -> Result<Option<Contact>, RepoError> {
        Ok(self.client.fetch(queries::CONTACT, &[]).await?)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        self.fetch_list(queries::ALL_POSTS).await
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self
            .client
            .fetch(queries::POST_BY_SLUG, &[("slug", json!(slug))])
            .await?)
    }

    async fn cv(&self) -> Result<Option<CvData>, RepoError> {
        Ok(self.client.fetch(queries::CV, &[]).await?)
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, RepoError> {
        self.fetch_list(queries::TOOLS).await
    }
}
