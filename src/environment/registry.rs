//! Docker Hub tag lookup for base distribution images

use super::EnvironmentError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DOCKER_HUB_URL: &str = "https://hub.docker.com";
const PAGE_SIZE: usize = 100;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TagPage {
    next: Option<String>,
    #[serde(default)]
    results: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Client for the public registry's tag listing API
#[derive(Debug, Clone)]
pub struct DockerHub {
    client: reqwest::Client,
    base_url: String,
}

impl DockerHub {
    pub fn new() -> Result<Self, EnvironmentError> {
        Self::with_base_url(DOCKER_HUB_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, EnvironmentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("deber/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EnvironmentError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Request for the first tag page of an official repository, optionally
    /// narrowed to tags containing `filter`
    pub fn tags_request(
        &self,
        repository: &str,
        filter: Option<&str>,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let url = format!("{}/v2/repositories/library/{}/tags", self.base_url, repository);
        let mut request = self
            .client
            .get(url)
            .query(&[("page_size", PAGE_SIZE.to_string())]);
        if let Some(filter) = filter {
            request = request.query(&[("name", filter)]);
        }
        request.build()
    }

    /// Lists every tag of `repository`, following pagination
    pub async fn list_tags(
        &self,
        repository: &str,
        filter: Option<&str>,
    ) -> Result<Vec<String>, EnvironmentError> {
        let registry_error = |source: reqwest::Error| EnvironmentError::Registry {
            repository: repository.to_string(),
            source,
        };

        let mut tags = Vec::new();
        let mut next = Some(self.tags_request(repository, filter).map_err(registry_error)?);

        while let Some(request) = next {
            debug!(url = %request.url(), "Fetching tag page");
            let page: TagPage = self
                .client
                .execute(request)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(registry_error)?
                .json()
                .await
                .map_err(registry_error)?;

            tags.extend(page.results.into_iter().map(|t| t.name));
            next = page
                .next
                .map(|url| self.client.get(url).build())
                .transpose()
                .map_err(registry_error)?;
        }

        debug!(repository, count = tags.len(), "Listed tags");
        Ok(tags)
    }
}
