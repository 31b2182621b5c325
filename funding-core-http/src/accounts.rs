use funding_core_api::domain::account::{
    AccountProfile, AccountType, ProfileDetails, ProfilePatch,
};
use funding_core_api::error::{ApiError, ApiResult};
use funding_core_client::gateway::AccountsSnapshot;

use crate::error::ResponseExt;
use crate::wire::{AccountEnvelope, AccountsResponse, ProfileEnvelope, SwitchAccountRequest};
use crate::HttpGateway;

impl HttpGateway {
    #[tracing::instrument(skip(self))]
    pub(crate) async fn get_accounts(&self) -> ApiResult<Option<AccountsSnapshot>> {
        let token = self.bearer()?;
        let response = self
            .client
            .get(format!("{}/accounts", self.url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_api_error()
            .await;

        let response = match response {
            Ok(response) => response,
            // 404 is the documented "no accounts yet" outcome
            Err(ApiError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let body = response.json::<AccountsResponse>().await.map_err(|e| {
            ApiError::Internal(format!("unable to parse response from get_accounts: {e}"))
        })?;

        Ok(Some(AccountsSnapshot {
            borrower: body.accounts.borrower,
            investor: body.accounts.investor,
            server_current_type: body.user.current_account_type,
        }))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn post_switch_account(&self, account_type: AccountType) -> ApiResult<()> {
        let token = self.bearer()?;
        self.client
            .post(format!("{}/accounts/switch", self.url))
            .header("Authorization", format!("Bearer {}", token))
            .json(&SwitchAccountRequest { account_type })
            .send()
            .await
            .map_api_error()
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, details))]
    pub(crate) async fn post_create_account(
        &self,
        details: &ProfileDetails,
    ) -> ApiResult<AccountProfile> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/accounts/create", self.url))
            .header("Authorization", format!("Bearer {}", token))
            .json(details)
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<AccountEnvelope>().await.map_err(|e| {
            ApiError::Internal(format!(
                "unable to parse response from post_create_account: {e}"
            ))
        })?;
        Ok(body.account)
    }

    #[tracing::instrument(skip(self, patch))]
    pub(crate) async fn put_account(
        &self,
        account_type: AccountType,
        patch: &ProfilePatch,
    ) -> ApiResult<AccountProfile> {
        let token = self.bearer()?;
        let response = self
            .client
            .put(format!("{}/accounts/{}", self.url, account_type))
            .header("Authorization", format!("Bearer {}", token))
            .json(patch)
            .send()
            .await
            .map_api_error()
            .await?;

        let body = response.json::<ProfileEnvelope>().await.map_err(|e| {
            ApiError::Internal(format!("unable to parse response from put_account: {e}"))
        })?;
        Ok(body.profile)
    }
}
