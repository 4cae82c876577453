mod client;
mod server;

use std::process;

use clap::{Parser, Subcommand};

use crate::client::Write;

#[derive(Parser, Debug)]
#[command(name = "ff-admin")]
#[command(version)]
#[command(about = "Feature flag admin service and client", long_about = None)]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the FeatureAdminService gRPC server
    Serve {
        /// Path to config file
        #[arg(short = 'c', long = "config", default_value = "featureflags.toml")]
        config: String,

        /// Address to bind to
        #[arg(long = "hostname")]
        hostname: Option<String>,

        /// Port to listen on
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
    },
    /// Print a single flag as JSON
    Get {
        key: String,

        #[command(flatten)]
        remote: Remote,
    },
    /// Print all flags as JSON, sorted by key
    List {
        #[command(flatten)]
        remote: Remote,
    },
    /// Create a flag from a JSON file
    Create {
        /// Path to the flag JSON, or - for stdin
        #[arg(short = 'f', long = "file")]
        file: String,

        #[command(flatten)]
        remote: Remote,
    },
    /// Replace an existing flag from a JSON file
    Update {
        /// Path to the flag JSON, or - for stdin
        #[arg(short = 'f', long = "file")]
        file: String,

        #[command(flatten)]
        remote: Remote,
    },
    /// Delete a flag
    Delete {
        key: String,

        #[command(flatten)]
        remote: Remote,
    },
}

#[derive(clap::Args, Debug)]
struct Remote {
    /// Address of the admin server
    #[arg(short = 's', long = "server", env = "FF_SERVER", default_value = client::DEFAULT_SERVER)]
    server: String,
}

#[tokio::main]
async fn main() {
    let cli = Args::parse();
    let result = match cli.cmd {
        Command::Serve {
            config,
            hostname,
            port,
        } => server::run_serve(&config, hostname, port).await,
        Command::Get { key, remote } => client::run_get(&remote.server, &key).await,
        Command::List { remote } => client::run_list(&remote.server).await,
        Command::Create { file, remote } => {
            client::run_write(&remote.server, Write::Create, &file).await
        }
        Command::Update { file, remote } => {
            client::run_write(&remote.server, Write::Update, &file).await
        }
        Command::Delete { key, remote } => client::run_delete(&remote.server, &key).await,
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}
