//! CLI entry point: reconciles declared organizations against GitHub, or
//! generates a canonical permissions document from an org's live state.

mod config;
mod config_gen;
mod console_alert;
mod credentials;
mod errors;
mod reconcile_cmd;

use clap::{Parser, Subcommand};
use colored::Colorize;

pub use errors::Error;

#[derive(Parser)]
#[command(name = "sheriff", about = "Declarative GitHub organization permissions controller")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile every declared organization. Dry-run unless
    /// `--do-it-for-real-this-time` is given.
    Reconcile {
        #[arg(long = "do-it-for-real-this-time")]
        do_it_for_real_this_time: bool,
    },
    /// Emit a canonical permissions document from an organization's live state.
    ConfigGen {
        #[arg(long)]
        organization: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Reconcile { do_it_for_real_this_time } => {
            reconcile_cmd::run(!do_it_for_real_this_time).await
        }
        Command::ConfigGen { organization } => run_config_gen(&organization).await,
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run_config_gen(organization: &str) -> Result<(), Error> {
    let (app_id, private_key) = credentials::load()?;
    let provider = auth_handler::CredentialProvider::new(app_id, private_key, true);
    let scoped = provider.client_for_org(organization, true).await?;

    let generated = config_gen::generate(scoped.client(), organization).await?;
    let yaml = config_gen::render_yaml(&generated)?;
    print!("{yaml}");
    Ok(())
}
