//! horizon - terminal console for HorizonOps Command
//!
//! Every dashboard page of the console is a subcommand. Pages run under a
//! recovery boundary and can keep refreshing with `--watch`.

mod app;
mod boundary;
mod commands;
mod config;
mod live;
mod output;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use horizon_client::HorizonClient;
use horizon_core::{is_known_machine, LogLevel, Navigator, Route, SecurityEventKind, MACHINES};
use horizon_views::{default_machine, TELEMETRY_WINDOW};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::App;
use crate::boundary::{prompt_recovery, run_page, PageOutcome};
use crate::commands::{
    Assignment, ConsoleArgs, FleetArgs, LogsArgs, ParametersArgs, TelemetryArgs,
};
use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "horizon")]
#[command(author, version, about = "HorizonOps Command console")]
#[command(propagate_version = true)]
struct Cli {
    /// Backend URL
    #[arg(short, long, env = "HORIZON_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "HORIZON_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session scope; defaults to one per terminal
    #[arg(long, env = "HORIZON_SESSION_SCOPE")]
    session_scope: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter demo mode
    Demo,

    /// Continue as guest
    Guest,

    /// Sign in
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(long, env = "HORIZON_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and return to login
    Logout,

    /// Show the current session
    Status,

    /// Open a page by path, e.g. /fleet
    Open {
        path: String,
    },

    /// Command Console: live strip, system status and AI analysis
    Console {
        /// Run an AI analysis on the newest point
        #[arg(long)]
        analyze: bool,

        /// Keep refreshing until Ctrl+C
        #[arg(short, long)]
        watch: bool,
    },

    /// Live Telemetry for one machine
    Telemetry {
        /// Machine ID
        #[arg(default_value_t = default_machine())]
        machine: String,

        /// Readings to show
        #[arg(long, default_value_t = 10)]
        rows: usize,

        /// Keep refreshing until Ctrl+C
        #[arg(short, long)]
        watch: bool,
    },

    /// Security Core: posture and event feed
    Security {
        /// Only show events of this kind (access, alert, audit, config)
        #[arg(long)]
        kind: Option<SecurityEventKind>,
    },

    /// Fleet Network: health of every machine
    Fleet {
        /// Machine to show in detail
        #[arg(long)]
        machine: Option<String>,

        /// Keep refreshing until Ctrl+C
        #[arg(short, long)]
        watch: bool,
    },

    /// Kernel Logs
    Logs {
        /// Only show this level (debug, info, warning, error, critical)
        #[arg(long)]
        level: Option<LogLevel>,

        /// Case-insensitive search over message and source
        #[arg(long)]
        search: Option<String>,

        /// Clear the buffer before showing it
        #[arg(long)]
        clear: bool,

        /// Export the buffer into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,

        /// Keep refreshing until Ctrl+C
        #[arg(short, long)]
        watch: bool,
    },

    /// Alert thresholds and model parameters
    Parameters {
        /// Only show this section
        #[arg(long)]
        section: Option<String>,

        /// Set a value, e.g. alerts.vib_warn=35 (repeatable)
        #[arg(long = "set", value_name = "SECTION.PARAM=VALUE")]
        set: Vec<Assignment>,

        /// Restore the shipped defaults
        #[arg(long)]
        reset: bool,
    },

    /// Risk prediction from a machine's newest reading
    Predict {
        /// Machine ID
        #[arg(default_value_t = default_machine())]
        machine: String,
    },
}

/// A dashboard page with its arguments
#[derive(Debug, Clone)]
enum Page {
    Console(ConsoleArgs),
    Telemetry(TelemetryArgs),
    Security(Option<SecurityEventKind>),
    Fleet(FleetArgs),
    Logs(LogsArgs),
    Parameters(ParametersArgs),
}

impl Page {
    /// Page shown for `route` when opened without arguments
    fn default_for(route: Route) -> Option<Page> {
        let page = match route {
            Route::Login => return None,
            Route::Console => Page::Console(ConsoleArgs::default()),
            Route::Telemetry => Page::Telemetry(TelemetryArgs {
                machine: default_machine(),
                rows: 10,
                watch: false,
            }),
            Route::Security => Page::Security(None),
            Route::Fleet => Page::Fleet(FleetArgs {
                machine: None,
                watch: false,
            }),
            Route::Logs => Page::Logs(LogsArgs {
                level: None,
                search: None,
                export: None,
                clear: false,
                watch: false,
            }),
            Route::Parameters => Page::Parameters(ParametersArgs::default()),
        };
        Some(page)
    }

    fn route(&self) -> Route {
        match self {
            Page::Console(_) => Route::Console,
            Page::Telemetry(_) => Route::Telemetry,
            Page::Security(_) => Route::Security,
            Page::Fleet(_) => Route::Fleet,
            Page::Logs(_) => Route::Logs,
            Page::Parameters(_) => Route::Parameters,
        }
    }

    async fn run(self, app: Arc<App>) -> Result<()> {
        match self {
            Page::Console(args) => commands::console(app, args).await,
            Page::Telemetry(args) => commands::telemetry(app, args).await,
            Page::Security(kind) => commands::security(app, kind).await,
            Page::Fleet(args) => commands::fleet(app, args).await,
            Page::Logs(args) => commands::logs(app, args).await,
            Page::Parameters(args) => commands::parameters(app, args).await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(
        cli.server.as_deref(),
        cli.output.map(|format| format.as_str()),
        cli.no_color,
    );

    let format = cli
        .output
        .unwrap_or_else(|| OutputFormat::from_config(&merged.output));
    let ctx = OutputContext::new(format, merged.no_color, cli.quiet, cli.verbose);

    let scope = cli
        .session_scope
        .clone()
        .unwrap_or_else(session::default_scope);
    let store = session::open_store(&merged.session_dir, Some(&scope));

    let client = HorizonClient::with_policy(&merged.server, merged.policy)
        .context("Failed to create client")?
        .with_session(store.clone());

    let mut nav = Navigator::new(Some(store.clone()));
    let app = Arc::new(App {
        ctx,
        client,
        session: store,
    });

    // Execute command
    match cli.command {
        Commands::Demo => commands::auth::demo(&app.session, &app.ctx),
        Commands::Guest => commands::auth::guest(&app.session, &app.ctx),
        Commands::Login { email, password } => {
            commands::auth::login(&app.session, &email, &password, &app.ctx).await?
        }
        Commands::Logout => commands::auth::logout(&mut nav, &app.ctx),
        Commands::Status => commands::auth::status(&app, &scope),

        Commands::Open { path } => {
            if let Some(page) = commands::open::resolve(&mut nav, &path, &app.ctx)
                .and_then(Page::default_for)
            {
                show_page(&app, &mut nav, page).await?;
            }
        }

        Commands::Console { analyze, watch } => {
            show_page(&app, &mut nav, Page::Console(ConsoleArgs { analyze, watch })).await?;
        }

        Commands::Telemetry {
            machine,
            rows,
            watch,
        } => {
            check_machine(&machine)?;
            let rows = rows.min(TELEMETRY_WINDOW);
            show_page(
                &app,
                &mut nav,
                Page::Telemetry(TelemetryArgs {
                    machine,
                    rows,
                    watch,
                }),
            )
            .await?;
        }

        Commands::Security { kind } => {
            show_page(&app, &mut nav, Page::Security(kind)).await?;
        }

        Commands::Fleet { machine, watch } => {
            show_page(&app, &mut nav, Page::Fleet(FleetArgs { machine, watch })).await?;
        }

        Commands::Logs {
            level,
            search,
            clear,
            export,
            watch,
        } => {
            let args = LogsArgs {
                level,
                search,
                export,
                clear,
                watch,
            };
            show_page(&app, &mut nav, Page::Logs(args)).await?;
        }

        Commands::Parameters {
            section,
            set,
            reset,
        } => {
            let args = ParametersArgs {
                section,
                set,
                reset,
            };
            show_page(&app, &mut nav, Page::Parameters(args)).await?;
        }

        Commands::Predict { machine } => {
            check_machine(&machine)?;
            commands::predict(app.clone(), machine).await?;
        }
    }

    Ok(())
}

/// Navigate to the page and run it under the recovery boundary
async fn show_page(app: &Arc<App>, nav: &mut Navigator, page: Page) -> Result<()> {
    let route = nav.navigate(page.route().path());
    if route != page.route() {
        app.ctx
            .info("Sign in with `horizon login`, or use `horizon demo` / `horizon guest`");
        return Ok(());
    }

    let outcome = run_page(
        &app.ctx,
        nav,
        route,
        || page.clone().run(app.clone()),
        &mut prompt_recovery,
    )
    .await?;

    match outcome {
        PageOutcome::Completed => {}
        PageOutcome::SessionExpired => {
            app.ctx
                .info("Sign in again with `horizon login`, or use `horizon demo`");
        }
        PageOutcome::WentHome => app.ctx.info("Back at login"),
    }
    Ok(())
}

fn check_machine(machine: &str) -> Result<()> {
    if !is_known_machine(machine) {
        bail!(
            "Unknown machine: {} (known: {})",
            machine,
            MACHINES.join(", ")
        );
    }
    Ok(())
}
