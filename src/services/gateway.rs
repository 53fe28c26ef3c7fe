use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult, GatewayErrorCode};
use crate::models::enrollment::RawStudent;
use crate::models::grades::GradeUpdatePayload;
use crate::models::section::RawSection;

/// Remote grades gateway consumed by the portal core. The wire format is the
/// backend's concern; the core only sees these three operations.
#[async_trait]
pub trait GradesGateway: Send + Sync {
    async fn sections_by_faculty(&self, faculty_id: &str) -> AppResult<Vec<RawSection>>;

    async fn section_students(&self, section_id: &str) -> AppResult<Vec<RawStudent>>;

    async fn update_grades(
        &self,
        enrollment_id: &str,
        payload: &GradeUpdatePayload,
    ) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub http_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("GRADEPORT_API_BASE_URL")
            .ok()
            .unwrap_or_else(|| "http://localhost:8080".to_string());
        let bearer_token = std::env::var("GRADEPORT_API_TOKEN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            base_url,
            bearer_token,
            http_timeout: Duration::from_secs(30),
        }
    }

    pub fn for_base_url(base_url: &str, http_timeout: Duration) -> Self {
        Self {
            base_url: base_url.to_string(),
            bearer_token: None,
            http_timeout,
        }
    }
}

pub struct HttpGradesGateway {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpGradesGateway {
    pub fn try_new(config: &GatewayConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|err| AppError::other(format!("failed to build gateway HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: String,
        what: &'static str,
    ) -> AppResult<Vec<T>> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = format!("{}{}", self.base_url, path);

        debug!(
            target: "app::gateway",
            correlation_id = %correlation_id,
            %url,
            what,
            "fetching from grades gateway"
        );

        let mut request = self.client.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|err| Self::error_from_reqwest(err, &correlation_id))?;

        let status = response.status();
        let latency_ms = start.elapsed().as_millis();

        if !status.is_success() {
            warn!(
                target: "app::gateway",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                latency_ms,
                what,
                "gateway returned non-success status"
            );
            return Err(Self::map_http_error(status, &correlation_id));
        }

        let body: JsonValue = response.json().await.map_err(|err| {
            AppError::gateway_with_correlation(
                GatewayErrorCode::InvalidResponse,
                format!("failed to decode gateway response for {what}: {err}"),
                Some(&correlation_id),
            )
        })?;

        // The portal expects a bare array; anything else is a malformed
        // payload, not an empty result.
        if !body.is_array() {
            return Err(AppError::gateway_with_correlation(
                GatewayErrorCode::InvalidResponse,
                format!("gateway returned a non-array payload for {what}"),
                Some(&correlation_id),
            ));
        }

        debug!(
            target: "app::gateway",
            correlation_id = %correlation_id,
            latency_ms,
            what,
            "gateway responded"
        );

        serde_json::from_value(body).map_err(|err| {
            AppError::gateway_with_correlation(
                GatewayErrorCode::InvalidResponse,
                format!("gateway payload for {what} did not match the expected shape: {err}"),
                Some(&correlation_id),
            )
        })
    }

    fn map_http_error(status: StatusCode, correlation_id: &str) -> AppError {
        match status {
            StatusCode::UNAUTHORIZED => AppError::gateway_with_correlation(
                GatewayErrorCode::Unauthorized,
                "portal session is not authorized against the records backend",
                Some(correlation_id),
            ),
            StatusCode::FORBIDDEN => AppError::gateway_with_correlation(
                GatewayErrorCode::Forbidden,
                "the records backend rejected this account's permissions",
                Some(correlation_id),
            ),
            StatusCode::NOT_FOUND => AppError::gateway_with_correlation(
                GatewayErrorCode::NotFound,
                "the requested record does not exist on the backend",
                Some(correlation_id),
            ),
            StatusCode::BAD_REQUEST => AppError::gateway_with_correlation(
                GatewayErrorCode::InvalidRequest,
                "the records backend rejected the request format",
                Some(correlation_id),
            ),
            status if status.is_server_error() => AppError::gateway_with_correlation(
                GatewayErrorCode::Unavailable,
                format!(
                    "the records backend is temporarily unavailable (status {})",
                    status.as_u16()
                ),
                Some(correlation_id),
            ),
            status => AppError::gateway_with_correlation(
                GatewayErrorCode::Unknown,
                format!("the records backend returned status {}", status.as_u16()),
                Some(correlation_id),
            ),
        }
    }

    fn error_from_reqwest(err: reqwest::Error, correlation_id: &str) -> AppError {
        if err.is_timeout() {
            AppError::gateway_with_correlation(
                GatewayErrorCode::HttpTimeout,
                "request to the records backend timed out",
                Some(correlation_id),
            )
        } else if err.is_connect() {
            AppError::gateway_with_correlation(
                GatewayErrorCode::Unavailable,
                "could not connect to the records backend",
                Some(correlation_id),
            )
        } else if let Some(status) = err.status() {
            Self::map_http_error(status, correlation_id)
        } else {
            AppError::gateway_with_correlation(
                GatewayErrorCode::Unknown,
                format!("request to the records backend failed: {err}"),
                Some(correlation_id),
            )
        }
    }
}

#[async_trait]
impl GradesGateway for HttpGradesGateway {
    async fn sections_by_faculty(&self, faculty_id: &str) -> AppResult<Vec<RawSection>> {
        self.fetch_list(format!("/api/faculty/{faculty_id}/sections"), "sections")
            .await
    }

    async fn section_students(&self, section_id: &str) -> AppResult<Vec<RawStudent>> {
        self.fetch_list(format!("/api/sections/{section_id}/students"), "students")
            .await
    }

    async fn update_grades(
        &self,
        enrollment_id: &str,
        payload: &GradeUpdatePayload,
    ) -> AppResult<()> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = format!("{}/api/enrollments/{}/grades", self.base_url, enrollment_id);

        debug!(
            target: "app::gateway",
            correlation_id = %correlation_id,
            enrollment_id,
            "persisting grade update"
        );

        let mut request = self.client.put(&url).json(payload);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|err| Self::error_from_reqwest(err, &correlation_id))?;

        let status = response.status();
        let latency_ms = start.elapsed().as_millis();

        // Only 200 and 204 count as a confirmed save.
        if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
            debug!(
                target: "app::gateway",
                correlation_id = %correlation_id,
                latency_ms,
                enrollment_id,
                "grade update confirmed"
            );
            return Ok(());
        }

        warn!(
            target: "app::gateway",
            correlation_id = %correlation_id,
            status = status.as_u16(),
            latency_ms,
            enrollment_id,
            "grade update rejected"
        );
        Err(Self::map_http_error(status, &correlation_id))
    }
}

pub mod testing {
    use super::*;

    /// Expose gateway error mapping for integration tests without widening
    /// the public API surface.
    pub fn map_http_error(status: StatusCode) -> AppError {
        HttpGradesGateway::map_http_error(status, "test-correlation-id")
    }
}
