use std::io::Write;

use crate::error::PipelineResult;
use crate::remote::{AccountInfo, RemoteTree};

// ============ Connectivity ============

/// Verify the session works and announce who it is authenticated as.
pub async fn connect<R, W>(remote: &R, out: &mut W) -> PipelineResult<AccountInfo>
where
    R: RemoteTree,
    W: Write,
{
    let info = remote.account_info().await?;
    writeln!(out, "Connected to Dropbox as {}\n", info.email)?;
    Ok(info)
}

// ============ Status ============

pub async fn status<R, W>(remote: &R, out: &mut W) -> PipelineResult<()>
where
    R: RemoteTree,
    W: Write,
{
    let info = connect(remote, out).await?;
    for (name, value) in &info.attributes {
        writeln!(out, "{:>20}: {}", name, value)?;
    }
    Ok(())
}
