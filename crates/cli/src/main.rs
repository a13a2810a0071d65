//! Conveyor CLI entry point.
//!
//! This binary is the composition root for the client. Responsibilities:
//!
//! 1. **Parse arguments** — global connection flags (with `CONVEYOR_*`
//!    environment fallbacks) and the command to run.
//! 2. **Resolve configuration** — load the selected profile from
//!    `~/.conveyor/config.toml`, then overlay flag/environment values.
//! 3. **Wire observability** — configure `tracing-subscriber` with an
//!    `EnvFilter` so `RUST_LOG` controls the output of every crate in the
//!    workspace.
//! 4. **Construct infrastructure** — build one [`api::Client`] and run the
//!    requested command against it; responses print as pretty JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use api::{Client, ClientConfig, Role};

#[derive(Debug, Parser)]
#[command(
    name = "conveyor",
    version,
    about = "CLI tool to interact with a Conveyor continuous-delivery server"
)]
struct Cli {
    /// Server base URL, e.g. https://conveyor.example.com
    #[arg(long, global = true, env = "CONVEYOR_SERVER")]
    server: Option<String>,

    /// Basic-auth username.
    #[arg(long, global = true, env = "CONVEYOR_USERNAME")]
    username: Option<String>,

    /// Basic-auth password.
    #[arg(long, global = true, env = "CONVEYOR_PASSWORD")]
    password: Option<String>,

    /// Profile to load from ~/.conveyor/config.toml.
    #[arg(long, global = true, env = "CONVEYOR_PROFILE", default_value = "default")]
    profile: String,

    /// Skip TLS certificate verification (self-signed test servers).
    #[arg(long, global = true)]
    skip_tls_verify: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the server's version descriptor.
    Version,
    /// Manage security roles.
    Role {
        #[command(subcommand)]
        command: RoleCommand,
    },
}

#[derive(Debug, Subcommand)]
enum RoleCommand {
    /// List all roles.
    List,
    /// Show one role.
    Get { name: String },
    /// Create a role holding the given users.
    Create {
        name: String,
        #[arg(long = "user")]
        users: Vec<String>,
    },
    /// Delete a role.
    Delete { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = build_client(&cli)?;

    match cli.command {
        Command::Version => {
            let version = client.server_version().await?;
            print_response("version", version.payload())?;
        }
        Command::Role { command } => match command {
            RoleCommand::List => {
                let roles = client.roles().list().await?;
                print_response("role-list", &roles)?;
            }
            RoleCommand::Get { name } => {
                let role = client.roles().get(&name).await?;
                print_response("role", &role)?;
            }
            RoleCommand::Create { name, users } => {
                let created = client.roles().create(&Role::core(name, users)).await?;
                print_response("role", &created)?;
            }
            RoleCommand::Delete { name } => {
                let message = client.roles().delete(&name).await?;
                print_response("delete", &message)?;
            }
        },
    }

    Ok(())
}

/// Loads the selected profile and overlays flag/environment values.
fn build_client(cli: &Cli) -> Result<Client> {
    let mut config = ClientConfig::load_profile(&cli.profile)?;

    if cli.server.is_some() {
        config.server = cli.server.clone();
    }
    if cli.username.is_some() {
        config.username = cli.username.clone();
    }
    if cli.password.is_some() {
        config.password = cli.password.clone();
    }
    config.skip_tls_verify = config.skip_tls_verify || cli.skip_tls_verify;

    Ok(Client::new(config)?)
}

/// Prints a response wrapped in a `<kind>-response` object, pretty-printed.
fn print_response(kind: &str, value: &impl Serialize) -> Result<()> {
    let mut wrapped = serde_json::Map::new();
    wrapped.insert(format!("{kind}-response"), serde_json::to_value(value)?);
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(wrapped))?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn role_create_collects_repeated_user_flags() {
        let cli = Cli::parse_from([
            "conveyor",
            "role",
            "create",
            "operators",
            "--user",
            "alice",
            "--user",
            "bob",
        ]);

        match cli.command {
            Command::Role {
                command: RoleCommand::Create { name, users },
            } => {
                assert_eq!(name, "operators");
                assert_eq!(users, ["alice", "bob"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
