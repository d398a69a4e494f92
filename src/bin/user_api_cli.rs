//! user-api-cli — 用户管理服务命令行工具
//!
//! Usage:
//!   user-api-cli get <id> [--no-cache]                 Fetch one user
//!   user-api-cli create <email> <name> [--role <r>]     Create a user
//!   user-api-cli update <id> <field=value>...           Patch fields of a user
//!   user-api-cli delete <id>                            Delete a user
//!   user-api-cli list [--page n] [--per-page n] [--role r]
//!   user-api-cli search <query> [--limit n]
//!   user-api-cli permissions <id>

use anyhow::{bail, Context};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use user_api_client::{ListUsersQuery, UserApiClient, UserUpdate};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = args[1].as_str();
    if matches!(command, "help" | "--help" | "-h") {
        print_usage();
        return;
    }
    if matches!(command, "version" | "--version" | "-V") {
        println!("user-api-cli {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = run(command, &args[2..]).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"user-api-cli — user-management service client

USAGE:
    user-api-cli <COMMAND> [OPTIONS]

COMMANDS:
    get <id> [--no-cache]                     Fetch one user
    create <email> <name> [--role <role>]     Create a user
    update <id> <field=value>...              Patch fields (values parsed as JSON, else string)
    delete <id>                               Delete a user
    list [--page n] [--per-page n] [--role r] List users
    search <query> [--limit n]                Search users
    permissions <id>                          Show a user's permissions
    version                                   Show version information
    help                                      Show this help message

ENVIRONMENT:
    USER_API_BASE_URL           Service root, e.g. https://users.example.com/api
    USER_API_KEY                Bearer credential
    USER_API_TIMEOUT_SECS       Request timeout (default 30)
    RUST_LOG                    Log filter (default warn)"#
    );
}

async fn run(command: &str, args: &[String]) -> anyhow::Result<()> {
    let client = UserApiClient::from_env().context("failed to configure client")?;

    let output = match command {
        "get" => {
            let id = positional(args, 0, "id")?;
            client.get_user(id, !has_flag(args, "--no-cache")).await?
        }
        "create" => {
            let email = positional(args, 0, "email")?;
            let name = positional(args, 1, "name")?;
            let role = flag_value(args, "--role");
            client.create_user(email, name, role).await?
        }
        "update" => {
            let id = positional(args, 0, "id")?;
            let update = parse_assignments(&args[1..])?;
            client.update_user(id, &update).await?
        }
        "delete" => {
            let id = positional(args, 0, "id")?;
            let deleted = client.delete_user(id).await?;
            serde_json::json!({ "deleted": deleted })
        }
        "list" => {
            let mut query = ListUsersQuery::new();
            if let Some(page) = flag_value(args, "--page") {
                query = query.page(page.parse().context("--page must be a number")?);
            }
            if let Some(per_page) = flag_value(args, "--per-page") {
                query = query.per_page(per_page.parse().context("--per-page must be a number")?);
            }
            if let Some(role) = flag_value(args, "--role") {
                query = query.role(role);
            }
            serde_json::to_value(client.list_users(&query).await?)?
        }
        "search" => {
            let query = positional(args, 0, "query")?;
            let limit = match flag_value(args, "--limit") {
                Some(l) => Some(l.parse().context("--limit must be a number")?),
                None => None,
            };
            Value::Array(client.search_users(query, limit).await?)
        }
        "permissions" => {
            let id = positional(args, 0, "id")?;
            Value::Array(client.get_user_permissions(id).await?)
        }
        other => bail!("unknown command: {other} (try `user-api-cli help`)"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// The `index`-th argument that is neither a flag nor a flag's value.
fn positional<'a>(args: &'a [String], index: usize, name: &str) -> anyhow::Result<&'a str> {
    let mut skip_next = false;
    let mut seen = 0;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = !matches!(arg.as_str(), "--no-cache");
            continue;
        }
        if seen == index {
            return Ok(arg.as_str());
        }
        seen += 1;
    }
    bail!("missing argument <{name}>")
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_assignments(args: &[String]) -> anyhow::Result<UserUpdate> {
    let mut update = UserUpdate::new();
    for arg in args {
        let Some((field, raw)) = arg.split_once('=') else {
            bail!("expected field=value, got {arg:?}");
        };
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        update.insert(field, value);
    }
    Ok(update)
}
