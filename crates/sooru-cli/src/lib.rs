#![forbid(unsafe_code)]

mod commands;

use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sooru_core::{ErrorCode, ExitCode, MachineError};
use sooru_layout::LayoutError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

pub const CRATE_NAME: &str = "sooru-cli";

const SOORU_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "sooru")]
#[command(version)]
#[command(about = "Sooru floor-plan layout tools")]
#[command(help_template = SOORU_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  RUST_LOG            Log filter override for `serve`\n  SOORU_TOKEN_SECRET  Token signing secret for `serve`"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggested room sizes for a plot.
    Suggest {
        #[arg(long)]
        width: f64,
        #[arg(long)]
        length: f64,
    },
    /// Run the placeholder planner for a set of requirements.
    Generate {
        #[arg(long)]
        width: f64,
        #[arg(long)]
        length: f64,
        #[arg(long, default_value_t = 0)]
        bedrooms: u32,
        #[arg(long, default_value_t = 0)]
        bathrooms: u32,
        #[arg(long, default_value_t = false)]
        no_kitchen: bool,
        #[arg(long, default_value_t = false)]
        no_living_room: bool,
        /// Fail when the generated rooms overlap or leave the plot.
        #[arg(long, default_value_t = false)]
        require_fit: bool,
        #[arg(long)]
        svg_out: Option<PathBuf>,
    },
    /// Check a plan file's rooms for containment and overlap.
    Validate { plan: PathBuf },
    /// Area totals for a plan file.
    Measure { plan: PathBuf },
    /// Print the HTTP API OpenAPI document.
    Openapi,
    /// Run the HTTP server.
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
        /// `memory` or `sqlite:<path>`.
        #[arg(long, default_value = "memory")]
        store: String,
        #[arg(long, default_value_t = false)]
        enforce_generated_fit: bool,
    },
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    Version,
}

#[derive(Clone, Copy)]
struct LogFlags {
    quiet: bool,
    verbose: u8,
}

impl LogFlags {
    fn default_directive(self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub(crate) json: bool,
    pub(crate) quiet: bool,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::from_code(
                        ErrorCode::UsageError,
                        "invalid command line arguments",
                    )
                    .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    let output_mode = OutputMode {
        json: cli.json,
        quiet: cli.quiet,
    };
    let log_flags = LogFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    let command = cli.command.ok_or_else(|| CliError {
        exit_code: ExitCode::Usage,
        machine: MachineError::from_code(ErrorCode::UsageError, "missing command; see --help"),
    })?;

    match command {
        Commands::Suggest { width, length } => commands::suggest(width, length, output_mode),
        Commands::Generate {
            width,
            length,
            bedrooms,
            bathrooms,
            no_kitchen,
            no_living_room,
            require_fit,
            svg_out,
        } => commands::generate(
            commands::GenerateArgs {
                width,
                length,
                bedrooms,
                bathrooms,
                kitchen: !no_kitchen,
                living_room: !no_living_room,
                require_fit,
                svg_out,
            },
            output_mode,
        ),
        Commands::Validate { plan } => commands::validate(&plan, output_mode),
        Commands::Measure { plan } => commands::measure(&plan, output_mode),
        Commands::Openapi => commands::emit_ok(output_mode, &sooru_api::openapi::openapi_v1_spec())
            .map_err(CliError::internal),
        Commands::Serve {
            bind,
            store,
            enforce_generated_fit,
        } => run_serve(bind, &store, enforce_generated_fit, log_flags, output_mode),
        Commands::Completion { shell } => {
            print_completion(shell);
            Ok(())
        }
        Commands::Version => commands::emit_ok(
            output_mode,
            &serde_json::json!({
                "name": "sooru",
                "version": env!("CARGO_PKG_VERSION"),
            }),
        )
        .map_err(CliError::internal),
    }
}

fn run_serve(
    bind: SocketAddr,
    store: &str,
    enforce_generated_fit: bool,
    log_flags: LogFlags,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let store = sooru_server::StoreConfig::parse(store).map_err(CliError::usage)?;
    let token_secret = std::env::var(sooru_core::ENV_SOORU_TOKEN_SECRET)
        .ok()
        .filter(|s| !s.trim().is_empty());
    let defaults = sooru_server::ServerConfig::default();
    let config = sooru_server::ServerConfig {
        bind_addr: bind,
        store,
        token_secret,
        log_json: output_mode.json,
        api: sooru_server::ApiConfig {
            enforce_generated_fit,
            ..defaults.api.clone()
        },
        ..defaults
    };
    sooru_server::validate_startup_config_contract(&config).map_err(CliError::usage)?;

    sooru_server::init_tracing_with(config.log_json, log_flags.default_directive());
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(format!("failed to start async runtime: {e}")))?;
    runtime
        .block_on(sooru_server::run(config))
        .map_err(CliError::dependency)
}

fn print_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    pub(crate) fn usage(message: String) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::from_code(ErrorCode::UsageError, &message),
        }
    }

    pub(crate) fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::from_code(ErrorCode::Internal, &message),
        }
    }

    fn dependency(message: String) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", &message),
        }
    }

    pub(crate) fn input(path: &std::path::Path, message: String) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::from_code(ErrorCode::ValidationFailed, &message)
                .with_detail("path", &path.display().to_string()),
        }
    }
}

impl From<LayoutError> for CliError {
    fn from(err: LayoutError) -> Self {
        let code = err.code();
        Self {
            exit_code: code.exit_code(),
            machine: MachineError::from_code(code, &err.to_string()),
        }
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"Internal\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
