use funding_core_api::error::{ApiError, ApiResult};
use funding_core_client::session::{BearerToken, Identity};

use crate::error::ResponseExt;
use crate::wire::{LoginRequest, TokenResponse};
use crate::HttpGateway;

impl HttpGateway {
    /// Exchange credentials for a bearer token and install it on the
    /// shared session.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Identity> {
        let response = self
            .client
            .post(format!("{}/auth/login", self.url))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<TokenResponse>().await.map_err(|e| {
            ApiError::Internal(format!("unable to parse response from login: {e}"))
        })?;

        let identity = Identity {
            user_id: body.user.id,
            admin: body.user.admin,
        };
        self.session().install(
            identity,
            BearerToken {
                token: body.token,
                expires_at: body.expires_at,
            },
        );
        Ok(identity)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn post_refresh_token(&self) -> ApiResult<BearerToken> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/auth/refresh", self.url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<TokenResponse>().await.map_err(|e| {
            ApiError::Internal(format!(
                "unable to parse response from post_refresh_token: {e}"
            ))
        })?;

        Ok(BearerToken {
            token: body.token,
            expires_at: body.expires_at,
        })
    }
}
