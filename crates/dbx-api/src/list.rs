//! Folder listing

use serde::Serialize;

use crate::client::DropboxClient;
use crate::error::ApiResult;
use crate::types::ListFolderResult;

#[derive(Serialize)]
struct ListFolderArg<'a> {
    path: &'a str,
    recursive: bool,
}

#[derive(Serialize)]
struct ListFolderContinueArg<'a> {
    cursor: &'a str,
}

impl DropboxClient {
    /// First page of a folder listing. The root folder is `""`.
    pub async fn list_folder(&self, path: &str, recursive: bool) -> ApiResult<ListFolderResult> {
        self.rpc("files/list_folder", Some(&ListFolderArg { path, recursive }))
            .await
    }

    /// Next page of a listing started with [`DropboxClient::list_folder`].
    pub async fn list_folder_continue(&self, cursor: &str) -> ApiResult<ListFolderResult> {
        self.rpc(
            "files/list_folder/continue",
            Some(&ListFolderContinueArg { cursor }),
        )
        .await
    }
}
