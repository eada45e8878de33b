//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{QUEUE_DIR_ENV, TOKEN_ENV};

/// dbxcli - list Dropbox folders and download them, directly or through a
/// durable on-disk work queue
#[derive(Parser, Debug)]
#[command(name = "dbxcli", about, disable_version_flag = true)]
pub struct Cli {
    /// Dropbox access token; overrides the DROPBOX_TOKEN environment variable
    #[arg(
        long = "dropbox-token",
        alias = "dropbox_token",
        env = TOKEN_ENV,
        hide_env_values = true,
        global = true,
        value_name = "TOKEN"
    )]
    pub dropbox_token: Option<String>,

    /// Directory holding the named queues (default: current directory)
    #[arg(long = "queue-dir", env = QUEUE_DIR_ENV, global = true, value_name = "DIR")]
    pub queue_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print version information
    Version,

    /// Print account status information
    Status,

    /// List files and directories
    Ls {
        /// Recursively list files and directories
        #[arg(short = 'r')]
        recursive: bool,

        /// Remote path to list
        #[arg(default_value = "/")]
        path: String,

        /// Remote path prefixes to ignore, e.g. '/Team Folders/IgnoreThisFolder'
        #[arg(long = "excludePaths", num_args = 0.., value_name = "PATH")]
        exclude_paths: Vec<String>,

        /// Push every listed file to the given queue (a plain name under --queue-dir)
        #[arg(long = "pushFilesToQueue", value_name = "NAME")]
        push_files_to_queue: Option<String>,
    },

    /// Download files from Dropbox to a local folder
    Get {
        /// Recursively download files and directories
        #[arg(short = 'r')]
        recursive: bool,

        /// Remote path to download from
        src_path: String,

        /// Local directory to store downloads in
        dest_path: PathBuf,

        /// Download the files waiting in the given queue (a plain name under --queue-dir)
        /// instead of listing src_path
        #[arg(long = "pullFilesFromQueue", value_name = "NAME")]
        pull_files_from_queue: Option<String>,

        /// Remote path prefixes to ignore
        #[arg(long = "excludePaths", num_args = 0.., value_name = "PATH")]
        exclude_paths: Vec<String>,
    },

    /// Print the paths waiting in a queue (removes them unless --keep)
    Peek {
        /// Name of the queue to peek at
        #[arg(long = "queueName", value_name = "NAME")]
        queue_name: String,

        /// Close the queue after peeking
        #[arg(long)]
        flush: bool,

        /// Leave the items in the queue
        #[arg(long)]
        keep: bool,
    },

    /// Push the files named in a JSON array of remote paths to a queue
    Push {
        /// Name of the queue to push to
        #[arg(long = "queueName", value_name = "NAME")]
        queue_name: String,

        /// JSON file holding an array of remote paths
        paths_file: PathBuf,
    },
}
