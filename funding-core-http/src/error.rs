use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use funding_core_api::error::{ApiError, ApiResult, FieldError};

/// Conflict payloads carry a machine-readable code alongside the message.
#[derive(Debug, Deserialize)]
pub(crate) struct ConflictBody {
    pub code: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidationBody {
    pub errors: Vec<FieldError>,
}

/// Map a non-success status and its body onto the client error taxonomy.
pub(crate) fn status_to_error(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth,
        StatusCode::NOT_FOUND => ApiError::NotFound(body.to_string()),
        StatusCode::CONFLICT => match serde_json::from_str::<ConflictBody>(body) {
            Ok(conflict) if conflict.code == "self_investment" => ApiError::SelfInvestment,
            Ok(conflict) if conflict.code == "active_project_exists" => {
                ApiError::ActiveProjectExists
            }
            _ => ApiError::DuplicateRequest,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            match serde_json::from_str::<ValidationBody>(body) {
                Ok(validation) => ApiError::Validation(validation.errors),
                Err(_) => ApiError::validation("request", body),
            }
        }
        s if s.is_server_error() => ApiError::Internal(format!("{s}: {body}")),
        s => ApiError::Network(format!("{s}: {body}")),
    }
}

#[async_trait]
pub(crate) trait ResponseExt {
    async fn map_api_error(self) -> ApiResult<Response>;
}

#[async_trait]
impl ResponseExt for Response {
    async fn map_api_error(self) -> ApiResult<Response> {
        match self.status() {
            StatusCode::OK
            | StatusCode::CREATED
            | StatusCode::ACCEPTED
            | StatusCode::NO_CONTENT => Ok(self),
            status => {
                let body = self.text().await.unwrap_or_default();
                Err(status_to_error(status, &body))
            }
        }
    }
}

#[async_trait]
impl ResponseExt for Result<Response, reqwest::Error> {
    async fn map_api_error(self) -> ApiResult<Response> {
        match self {
            Ok(response) => response.map_api_error().await,
            Err(e) => Err(ApiError::Network(e.to_string())),
        }
    }
}
