//! GitHub Action entry point.
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables (or the matching
//! flags when run by hand); the event comes from the `GITHUB_*` variables.

use std::process::ExitCode;

use clap::Parser;
use coderefs_cleanup::{
    action::{self, ActionInputs, EventContext},
    ClientOptions,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Retire a LaunchDarkly Code References branch after a Git branch delete.
#[derive(Parser, Debug)]
#[command(name = "coderefs-cleanup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// LaunchDarkly API access token
    #[arg(long, env = "INPUT_ACCESS-TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Code References repository key (default: the GitHub repository name)
    #[arg(long, env = "INPUT_REPO")]
    repo: Option<String>,

    /// Branch to delete (default: the ref of the triggering event)
    #[arg(long, env = "INPUT_BRANCH")]
    branch: Option<String>,

    /// LaunchDarkly base URI
    #[arg(long, env = "INPUT_BASE-URI")]
    base_uri: Option<String>,

    /// Run even when the delete event is not for a branch
    #[arg(long, env = "INPUT_FORCE")]
    force: bool,

    /// Retries after the first attempt
    #[arg(long, env = "INPUT_MAX-RETRIES")]
    max_retries: Option<usize>,

    /// Base retry delay in milliseconds
    #[arg(long, env = "INPUT_BASE-DELAY-MS")]
    base_delay_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "INPUT_TIMEOUT-MS")]
    timeout_ms: Option<u64>,
}

impl Cli {
    fn into_inputs(self) -> anyhow::Result<ActionInputs> {
        let defaults = ClientOptions::default();
        let base_delay_ms = self.base_delay_ms.unwrap_or(defaults.base_delay_ms);
        anyhow::ensure!(base_delay_ms > 0, "base-delay-ms must be greater than zero");

        Ok(ActionInputs {
            access_token: self.access_token,
            repo: self.repo,
            branch: self.branch,
            base_uri: self.base_uri,
            force: self.force,
            options: ClientOptions {
                timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
                max_retries: self.max_retries.unwrap_or(defaults.max_retries),
                base_delay_ms,
            },
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("Action failed: {err}");
            tracing::error!("{message}");
            // Workflow command: marks the step failed in the Actions UI.
            println!("::error::{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let inputs = cli.into_inputs()?;
    let event = EventContext::from_env();
    action::run(inputs, &event).await?;
    Ok(())
}

/// Info by default; `RUST_LOG` overrides.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
