use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::io::AsyncReadExt;

use crate::config::AppConfig;
use crate::error::HandlerError;
use crate::handler::{self, MoveParams};
use crate::providers;
use crate::server;

#[derive(Debug, PartialEq)]
pub enum Command {
    Serve { bind: Option<String> },
    Handle(HandleArgs),
    Help,
}

#[derive(Debug, Default, PartialEq)]
pub struct HandleArgs {
    pub column_name: Option<String>,
    pub column_id: Option<String>,
    /// Payload file; stdin when absent.
    pub payload: Option<PathBuf>,
}

/// Parse the arguments after the binary name.
///
/// Supported forms:
///   kanban-done
///   kanban-done serve [--bind 127.0.0.1:7071]
///   kanban-done handle --column-name "Merge request" --column-id WEF_... [payload.json]
///   kanban-done help
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Serve { bind: None });
    };

    match command.as_str() {
        "serve" => parse_serve_args(rest),
        "handle" => parse_handle_args(rest).map(Command::Handle),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => bail!("Unknown command '{other}'. Run `kanban-done help` for usage."),
    }
}

fn parse_serve_args(args: &[String]) -> Result<Command> {
    let mut bind = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-b" | "--bind" => {
                i += 1;
                if i < args.len() {
                    bind = Some(args[i].clone());
                } else {
                    bail!("Missing value for --bind flag");
                }
            }
            other => bail!("Unexpected argument '{other}' for serve"),
        }
        i += 1;
    }

    Ok(Command::Serve { bind })
}

fn parse_handle_args(args: &[String]) -> Result<HandleArgs> {
    let mut parsed = HandleArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--column-name" | "--column-id") => {
                i += 1;
                let Some(value) = args.get(i) else {
                    bail!("Missing value for {flag} flag");
                };
                if flag == "--column-name" {
                    parsed.column_name = Some(value.clone());
                } else {
                    parsed.column_id = Some(value.clone());
                }
            }
            path => {
                if parsed.payload.is_some() {
                    bail!("Only one payload file may be given");
                }
                parsed.payload = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

pub async fn run_serve(config: &AppConfig, bind: Option<String>) -> Result<()> {
    let provider = providers::create_provider(config.azure_devops()?)?;
    let bind = bind.unwrap_or_else(|| config.bind());
    println!("Listening for pull request webhooks on http://{bind}{}", server::FUNCTION_PATH);
    println!("Press Ctrl+C to stop\n");

    server::serve(provider, &bind, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Process a single webhook payload and print the summary.
pub async fn run_handle(config: &AppConfig, args: HandleArgs) -> Result<()> {
    let body = match &args.payload {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read payload from {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .context("Failed to read payload from stdin")?;
            buf
        }
    };

    let params = MoveParams {
        kanban_column_name: args.column_name,
        kanban_column_id: args.column_id,
    };
    let provider = providers::create_provider(config.azure_devops()?)?;

    match handler::handle(provider.as_ref(), &params, &body).await {
        Ok(summary) => {
            println!("{summary}");
            Ok(())
        }
        Err(HandlerError::InvalidRequest(reason)) => bail!("Rejected: {reason}"),
        Err(HandlerError::Upstream(e)) => Err(e),
    }
}

pub fn print_help() {
    println!("kanban-done — mark linked work items done when a pull request merges\n");
    println!("USAGE:");
    println!("  kanban-done                  Run the webhook server (same as `serve`)");
    println!("  kanban-done serve            Run the webhook server");
    println!("  kanban-done handle [FILE]    Process one webhook payload from FILE or stdin");
    println!();
    println!("SERVE OPTIONS:");
    println!("  -b, --bind <addr>            Address to listen on (default 0.0.0.0:7071)");
    println!();
    println!("HANDLE OPTIONS:");
    println!("  --column-name <name>         Kanban column display name, e.g. \"Merge request\"");
    println!("  --column-id <id>             Kanban column field prefix, e.g. WEF_CB8F...");
    println!();
    println!("ENVIRONMENT:");
    println!("  Organization, PersonalAccessToken, AZURE_DEVOPS_BASE_URL, KANBAN_DONE_BIND, RUST_LOG");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_serves() {
        assert_eq!(parse_args(&[]).unwrap(), Command::Serve { bind: None });
    }

    #[test]
    fn serve_with_bind() {
        let cmd = parse_args(&args(&["serve", "--bind", "127.0.0.1:8080"])).unwrap();
        assert_eq!(
            cmd,
            Command::Serve {
                bind: Some("127.0.0.1:8080".into())
            }
        );
    }

    #[test]
    fn serve_missing_bind_value_fails() {
        let err = parse_args(&args(&["serve", "-b"])).unwrap_err();
        assert!(err.to_string().contains("Missing value"));
    }

    #[test]
    fn handle_with_file_and_columns() {
        let cmd = parse_args(&args(&[
            "handle",
            "--column-name",
            "Merge request",
            "payload.json",
            "--column-id",
            "WEF_ABC",
        ]))
        .unwrap();
        assert_eq!(
            cmd,
            Command::Handle(HandleArgs {
                column_name: Some("Merge request".into()),
                column_id: Some("WEF_ABC".into()),
                payload: Some(PathBuf::from("payload.json")),
            })
        );
    }

    #[test]
    fn handle_leaves_missing_columns_to_the_handler() {
        let cmd = parse_args(&args(&["handle"])).unwrap();
        assert_eq!(cmd, Command::Handle(HandleArgs::default()));
    }

    #[test]
    fn handle_rejects_two_payloads() {
        let err = parse_args(&args(&["handle", "a.json", "b.json"])).unwrap_err();
        assert!(err.to_string().contains("one payload"));
    }

    #[test]
    fn handle_missing_flag_value_fails() {
        let err = parse_args(&args(&["handle", "--column-id"])).unwrap_err();
        assert!(err.to_string().contains("--column-id"));
    }

    #[test]
    fn unknown_command_fails() {
        let err = parse_args(&args(&["deploy"])).unwrap_err();
        assert!(err.to_string().contains("deploy"));
    }

    #[test]
    fn help_flags() {
        for flag in ["help", "-h", "--help"] {
            assert_eq!(parse_args(&args(&[flag])).unwrap(), Command::Help);
        }
    }
}
