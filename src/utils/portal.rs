use anyhow::Context;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{LookupError, Stage};
use crate::models::{CourseResult, StudentInfo};

/// Live portal endpoint serving student profiles.
pub const DEFAULT_STUDENT_INFO_URL: &str = "http://software.diu.edu.bd:8006/result/studentInfo";
/// Live portal endpoint serving per-semester course results.
pub const DEFAULT_RESULTS_URL: &str = "http://software.diu.edu.bd:8189/result";

/// Endpoint configuration for the portal client. Passed in explicitly so
/// lookups can be pointed at a local endpoint during tests.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub student_info_base_url: Url,
    pub results_base_url: Url,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            student_info_base_url: Url::parse(DEFAULT_STUDENT_INFO_URL).unwrap(),
            results_base_url: Url::parse(DEFAULT_RESULTS_URL).unwrap(),
        }
    }
}

impl PortalConfig {
    /// Reads endpoint overrides from the environment, falling back to the
    /// live portal endpoints.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("PORTAL_STUDENT_INFO_URL") {
            config.student_info_base_url =
                Url::parse(&raw).context("PORTAL_STUDENT_INFO_URL is not a valid URL")?;
        }
        if let Ok(raw) = std::env::var("PORTAL_RESULTS_URL") {
            config.results_base_url =
                Url::parse(&raw).context("PORTAL_RESULTS_URL is not a valid URL")?;
        }
        Ok(config)
    }

    fn student_info_url(&self, student_id: &str) -> Url {
        let mut url = self.student_info_base_url.clone();
        url.query_pairs_mut().append_pair("studentId", student_id);
        url
    }

    fn results_url(&self, student_id: &str, semester_id: &str) -> Url {
        let mut url = self.results_base_url.clone();
        url.query_pairs_mut()
            .append_pair("studentId", student_id)
            .append_pair("semesterId", semester_id);
        url
    }
}

/// The seam between the lookup controller and the portal endpoints.
pub trait GradeSource {
    async fn fetch_student_info(&self, student_id: &str) -> Result<StudentInfo, LookupError>;

    async fn fetch_semester_results(
        &self,
        student_id: &str,
        semester_id: &str,
    ) -> Result<Vec<CourseResult>, LookupError>;
}

/// [`GradeSource`] backed by the two portal REST endpoints.
pub struct PortalClient {
    client: Client,
    config: PortalConfig,
}

impl PortalClient {
    pub fn new(config: PortalConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build the client")?;

        Ok(Self { client, config })
    }

    // Issues one GET, checks the status, and decodes the JSON body. Errors
    // carry the stage so failures stay attributable to the call that made them.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, stage: Stage) -> Result<T, LookupError> {
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| LookupError::Network { stage, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Http {
                stage,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| LookupError::Decode { stage, source })
    }
}

impl GradeSource for PortalClient {
    async fn fetch_student_info(&self, student_id: &str) -> Result<StudentInfo, LookupError> {
        let url = self.config.student_info_url(student_id);
        self.get_json(url, Stage::Profile).await
    }

    async fn fetch_semester_results(
        &self,
        student_id: &str,
        semester_id: &str,
    ) -> Result<Vec<CourseResult>, LookupError> {
        let url = self.config.results_url(student_id, semester_id);
        self.get_json(url, Stage::Results).await
    }
}
