use crate::client::DropboxClient;
use crate::error::ApiResult;
use crate::types::FullAccount;

impl DropboxClient {
    /// Account the access token belongs to. Doubles as a connectivity check.
    pub async fn get_current_account(&self) -> ApiResult<FullAccount> {
        self.rpc::<(), _>("users/get_current_account", None).await
    }
}
