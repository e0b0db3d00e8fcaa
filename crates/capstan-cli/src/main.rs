//! Capstan CLI - release-management tasks for build pipelines

use std::path::PathBuf;

use capstan_tasks::BuildContext;
use clap::{Parser, Subcommand};
use url::Url;

mod commands;
mod config;
mod error;
mod exit_codes;

use config::TaskDocument;
use error::Result;

#[derive(Parser)]
#[command(name = "capstan")]
#[command(author = "Capstan Contributors")]
#[command(version)]
#[command(about = "Release-management tasks for build pipelines", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Task configuration document
    #[arg(short, long, global = true, default_value = "capstan.yaml")]
    config: PathBuf,

    /// Build output directory
    #[arg(long, global = true, default_value = "target")]
    build_dir: PathBuf,

    /// Artifact identifier (defaults to the current directory name)
    #[arg(long, global = true)]
    artifact_id: Option<String>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a chart, creating a release
    Install {
        /// Release name (blank: the service generates one)
        #[arg(long)]
        release_name: Option<String>,

        /// Namespace to install into
        #[arg(short, long)]
        namespace: Option<String>,

        /// Render only; do not touch the cluster
        #[arg(long)]
        dry_run: bool,
    },

    /// Upgrade an existing release
    Upgrade {
        /// Release to upgrade
        #[arg(long)]
        release_name: Option<String>,

        /// Render only; do not touch the cluster
        #[arg(long)]
        dry_run: bool,
    },

    /// Roll a release back to an earlier revision
    Rollback {
        /// Release to roll back
        #[arg(long)]
        release_name: Option<String>,

        /// Target revision (0: previous revision)
        #[arg(long)]
        revision: Option<u32>,
    },

    /// Uninstall a release
    Uninstall {
        /// Release to uninstall
        #[arg(long)]
        release_name: Option<String>,

        /// Remove the release record entirely
        #[arg(long)]
        purge: bool,
    },

    /// Show the status of a release revision
    Status {
        /// Release to inspect
        #[arg(long)]
        release_name: Option<String>,

        /// Revision to inspect (0: latest)
        #[arg(long)]
        revision: Option<u32>,
    },

    /// Show the stored content of a release revision
    Content {
        /// Release to fetch
        #[arg(long)]
        release_name: Option<String>,

        /// Revision to fetch (0: latest)
        #[arg(long)]
        revision: Option<u32>,
    },

    /// Show the revision history of a release
    History {
        /// Release whose history is retrieved
        #[arg(long)]
        release_name: Option<String>,

        /// Maximum number of revisions (0: unbounded)
        #[arg(long)]
        max: Option<u32>,
    },

    /// List releases
    List {
        /// Namespace to list in
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Run release tests
    Test {
        /// Release to test
        #[arg(long)]
        release_name: Option<String>,

        /// Delete test resources after the run
        #[arg(long)]
        cleanup: bool,
    },

    /// Package a chart as a gzip-compressed archive
    Package {
        /// Chart to package (directory or archive URL)
        #[arg(long)]
        chart_url: Option<Url>,

        /// Where to write the archive
        #[arg(long)]
        target_url: Option<Url>,
    },
}

#[tokio::main]
async fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(error) = run(cli).await {
        let code = error.exit_code();
        eprintln!("{:?}", miette::Report::new(error));
        std::process::exit(code);
    }
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let document = TaskDocument::load(&cli.config)?;
    let artifact_id = cli
        .artifact_id
        .clone()
        .unwrap_or_else(default_artifact_id);
    let context = BuildContext::new(&cli.build_dir, artifact_id);

    match cli.command {
        Commands::Install {
            release_name,
            namespace,
            dry_run,
        } => {
            commands::install::run(
                &document,
                &context,
                release_name.as_deref(),
                namespace.as_deref(),
                dry_run,
            )
            .await
        }

        Commands::Upgrade {
            release_name,
            dry_run,
        } => commands::upgrade::run(&document, &context, release_name.as_deref(), dry_run).await,

        Commands::Rollback {
            release_name,
            revision,
        } => commands::rollback::run(&document, release_name.as_deref(), revision).await,

        Commands::Uninstall {
            release_name,
            purge,
        } => commands::uninstall::run(&document, release_name.as_deref(), purge).await,

        Commands::Status {
            release_name,
            revision,
        } => commands::status::run(&document, release_name.as_deref(), revision).await,

        Commands::Content {
            release_name,
            revision,
        } => commands::content::run(&document, release_name.as_deref(), revision).await,

        Commands::History { release_name, max } => {
            commands::history::run(&document, release_name.as_deref(), max).await
        }

        Commands::List { namespace } => {
            commands::list::run(&document, namespace.as_deref()).await
        }

        Commands::Test {
            release_name,
            cleanup,
        } => commands::test::run(&document, release_name.as_deref(), cleanup).await,

        Commands::Package {
            chart_url,
            target_url,
        } => {
            commands::package::run(&document, &context, chart_url.as_ref(), target_url.as_ref())
                .await
        }
    }
}

fn default_artifact_id() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "artifact".to_string())
}
