use std::path::PathBuf;

use formation::{resolve_config_source, ConfigSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(crate) enum AppCommand {
    Help,
    WriteDefault {
        path: PathBuf,
    },
    Battle {
        source: ConfigSource,
        party_size: Option<usize>,
        json: bool,
    },
}

pub(crate) struct AppWiring {
    pub(crate) command: AppCommand,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    help: bool,
    config: Option<PathBuf>,
    write_default: Option<PathBuf>,
    party_size: Option<usize>,
    json: bool,
}

pub(crate) fn build_app(args: &[String]) -> Result<AppWiring, String> {
    let cli = parse_args(args)?;
    if cli.help {
        return Ok(AppWiring {
            command: AppCommand::Help,
        });
    }

    init_tracing();
    info!("=== Party Formation Startup ===");

    if let Some(path) = cli.write_default {
        return Ok(AppWiring {
            command: AppCommand::WriteDefault { path },
        });
    }

    let source =
        resolve_config_source(cli.config.as_deref()).map_err(|error| error.to_string())?;
    info!(source = ?source, "config_source_resolved");
    Ok(AppWiring {
        command: AppCommand::Battle {
            source,
            party_size: cli.party_size,
            json: cli.json,
        },
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => {
                cli.help = true;
                index += 1;
            }
            "--config" => {
                cli.config = Some(PathBuf::from(flag_value(args, index, "--config")?));
                index += 2;
            }
            "--write-default" => {
                cli.write_default = Some(PathBuf::from(flag_value(
                    args,
                    index,
                    "--write-default",
                )?));
                index += 2;
            }
            "--party-size" => {
                let value = flag_value(args, index, "--party-size")?;
                cli.party_size = Some(value.parse::<usize>().map_err(|_| {
                    format!("invalid --party-size value '{value}' (expected usize)")
                })?);
                index += 2;
            }
            "--json" => {
                cli.json = true;
                index += 1;
            }
            other => return Err(format!("unknown argument '{other}'\n\n{}", usage_text())),
        }
    }
    Ok(cli)
}

fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str, String> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub(crate) fn usage_text() -> String {
    [
        "usage: battle [--config <path>] [--party-size <n>] [--json]",
        "       battle --write-default <path>",
        "",
        "Config lookup order: --config, FORMATION_CONFIG, ./formation.json, built-in sample.",
        "Log level follows RUST_LOG (default info).",
    ]
    .join("\n")
}
