use clap::{CommandFactory, Parser};
use dbx_api::DropboxClient;
use std::io::Write;
use std::process::ExitCode;

use dbxcli::account;
use dbxcli::cli::{Cli, Command};
use dbxcli::config::AppConfig;
use dbxcli::download;
use dbxcli::inspect::{self, PeekMode};
use dbxcli::listing::{self, ExcludeFilter, Sink};
use dbxcli::queue;
use dbxcli::{PipelineError, PipelineResult};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("dbxcli=info,dbx_api=info"),
    )
    .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_version<W: Write>(out: &mut W) -> PipelineResult<()> {
    writeln!(out, "dbxcli: {}", dbxcli::PKG_VERSION)?;
    writeln!(out, "dbx-api: {}", dbx_api::PKG_VERSION)?;
    Ok(())
}

fn client(config: &AppConfig) -> PipelineResult<DropboxClient> {
    DropboxClient::new(config.dropbox_config()?)
        .map_err(|source| PipelineError::Connectivity {
            context: "creating Dropbox client".to_string(),
            source,
        })
}

async fn run(cli: Cli) -> PipelineResult<()> {
    let config = AppConfig::resolve(cli.dropbox_token, cli.queue_dir);
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        let mut out = std::io::stdout().lock();
        writeln!(out)?;
        return print_version(&mut out);
    };

    let mut out = std::io::stdout().lock();

    match command {
        Command::Version => print_version(&mut out),

        Command::Status => {
            let remote = client(&config)?;
            account::status(&remote, &mut out).await
        }

        Command::Ls {
            recursive,
            path,
            exclude_paths,
            push_files_to_queue,
        } => {
            let remote = client(&config)?;
            account::connect(&remote, &mut out).await?;
            let sink = match push_files_to_queue.as_deref() {
                Some(queue) => Sink::Enqueue {
                    queue_root: &config.queue_root,
                    queue,
                },
                None => Sink::Print,
            };
            let exclude = ExcludeFilter::new(exclude_paths);
            listing::enumerate(&remote, &path, recursive, &exclude, sink, &mut out).await?;
            Ok(())
        }

        Command::Get {
            recursive,
            src_path,
            dest_path,
            pull_files_from_queue,
            exclude_paths,
        } => {
            let remote = client(&config)?;
            account::connect(&remote, &mut out).await?;
            let exclude = ExcludeFilter::new(exclude_paths);
            let summary = match pull_files_from_queue.as_deref() {
                Some(queue) => {
                    download::drain(&remote, &config.queue_root, queue, &dest_path, &exclude)
                        .await?
                }
                None => {
                    download::walk_and_transfer(&remote, &src_path, &dest_path, recursive, &exclude)
                        .await?
                }
            };
            writeln!(
                out,
                "{} file(s) downloaded ({})",
                summary.downloaded,
                listing::human_size(summary.bytes)
            )?;
            Ok(())
        }

        Command::Peek {
            queue_name,
            flush,
            keep,
        } => {
            let mode = if keep { PeekMode::Keep } else { PeekMode::Drain };
            inspect::peek(&config.queue_root, &queue_name, mode, flush, &mut out).await?;
            Ok(())
        }

        Command::Push {
            queue_name,
            paths_file,
        } => {
            let paths = queue::read_path_list(&paths_file)?;
            let remote = client(&config)?;
            account::connect(&remote, &mut out).await?;
            let summary =
                queue::import_paths(&remote, &config.queue_root, &queue_name, &paths).await?;
            writeln!(
                out,
                "{} item(s) pushed to '{}', {} skipped",
                summary.pushed, queue_name, summary.skipped
            )?;
            Ok(())
        }
    }
}
