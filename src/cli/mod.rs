use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod buildings;
pub mod rooms;
pub mod serve;

use crate::api::init_tracing;
use crate::rooms::SlotAlignment;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Print the free rooms of every building as JSON
    Rooms {
        /// Start of the range (ISO-8601), defaults to today 08:00
        #[arg(long)]
        from: Option<String>,
        /// End of the range (ISO-8601), defaults to today 20:00
        #[arg(long)]
        to: Option<String>,
        /// Override how instants are matched to portal slots
        #[arg(long, value_enum)]
        alignment: Option<SlotAlignment>,
    },
    /// Print the building directory as JSON
    Buildings {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Rooms {
            from,
            to,
            alignment,
        }) => {
            rooms::run(from, to, alignment).await?;
        }
        Some(Command::Buildings {}) => {
            buildings::run().await?;
        }
        None => {}
    }

    Ok(())
}
