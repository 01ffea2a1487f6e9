//! todoctl - manage todos through the todoapp HTTP API
//!
//! ```bash
//! todoctl create "Buy milk"
//! todoctl list
//! todoctl done 1
//! todoctl list --json | jq '.[] | select(.done | not)'
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use todoapp_cli::{render_list, render_todo, TodoClient, DEFAULT_ENDPOINT};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "todoctl", version, about = "Manage todos through the todoapp API")]
struct Cli {
    /// todoapp API endpoint
    #[arg(long, env = "TODOAPP_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Print JSON instead of human-readable lines
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create new todo
    Create {
        /// Todo text
        text: String,
    },
    /// List todo
    List,
    /// Mark todo done
    Done {
        /// Todo id
        id: i32,
    },
    /// Mark todo not done
    Undone {
        /// Todo id
        id: i32,
    },
    /// Replace todo text
    Edit {
        /// Todo id
        id: i32,
        /// New text
        text: String,
    },
    /// Delete todo
    Delete {
        /// Todo id
        id: i32,
    },
}

fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let client = TodoClient::new(&cli.endpoint)?;
    tracing::debug!(endpoint = client.endpoint(), command = ?cli.command, "sending request");

    match cli.command {
        Commands::Create { text } => {
            let todo = client.create(&text).await?;
            print_todo(&todo, cli.json)?;
        }
        Commands::List => {
            let todos = client.list().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&todos)?);
            } else {
                println!("{}", render_list(&todos));
            }
        }
        Commands::Done { id } => {
            let todo = client.update(id, None, Some(true)).await?;
            print_todo(&todo, cli.json)?;
        }
        Commands::Undone { id } => {
            let todo = client.update(id, None, Some(false)).await?;
            print_todo(&todo, cli.json)?;
        }
        Commands::Edit { id, text } => {
            let todo = client.update(id, Some(&text), None).await?;
            print_todo(&todo, cli.json)?;
        }
        Commands::Delete { id } => {
            client.delete(id).await?;
            println!("Ok");
        }
    }

    Ok(())
}

fn print_todo(todo: &todoapp_cli::Todo, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(todo)?);
    } else {
        println!("{}", render_todo(todo));
    }
    Ok(())
}
