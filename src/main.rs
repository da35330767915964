//! sg-toolbox CLI - storage-group pod and deployment helper

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sg_toolbox::commands::{self, Context, FilterArgs};
use sg_toolbox::config::Settings;
use sg_toolbox::utils::errors::display_error;
use sg_toolbox::utils::usage::{apply_to_subcommands, FlagUsage};
use sg_toolbox::utils::{dryrun, logger, OutputFormat};
use std::io;
use std::path::PathBuf;

const PROGRAM: &str = "sg-toolbox";

#[derive(Parser)]
#[command(name = "sg-toolbox")]
#[command(author, version, about = "Helper CLI for storage-group pods and deployments", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Kubeconfig file, or a list joined like KUBECONFIG (kube's default lookup if unset)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long, global = true)]
    context: Option<String>,

    /// The storage-group namespace (defaults.namespace in the config, storagepod if unset)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Run without asking for confirmation and without spinners
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show what would be changed without changing it
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List storage-group pods by group, node or row
    Pods {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// List storage-group deployments by group, node or row
    Deployments {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// List the pods of a deployment
    DeploymentPods {
        /// Deployment name, e.g. sg-1-host-1
        deployment: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Check a name against group / node / row filters (no cluster access)
    Match {
        /// Pod or deployment name
        name: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Delete a storage-group pod; its deployment deploys a new one
    DeletePod {
        /// The storage pod name
        pod: String,
    },

    /// Set the pod's active label to disable
    DisablePod {
        /// The storage pod name
        pod: String,
    },

    /// Set the pod's active label to enable
    EnablePod {
        /// The storage pod name
        pod: String,
    },

    /// Update the image of a deployment, or of every deployment matching the filter
    UpdateImage {
        /// New container image
        #[arg(long)]
        image: String,

        /// Deployment name; omit to select by --group / --node / --row
        #[arg(conflicts_with_all = ["group", "node", "row", "row_file"])]
        deployment: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the storage-group service of a tenant
    TenantService {
        /// Tenant domain name
        tenant: String,
    },

    /// Show a secret's keys (and values with --show-values)
    Secret {
        /// Secret name
        name: String,

        /// Print decoded values
        #[arg(long)]
        show_values: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Forward a local port to a service until Ctrl+C
    PortForward {
        /// Service name; omit and use --tenant to look it up
        service: Option<String>,

        /// Tenant whose storage-group service to forward to
        #[arg(long, conflicts_with = "service")]
        tenant: Option<String>,

        /// Service port to forward to
        #[arg(long)]
        remote_port: u16,

        /// Local port to listen on (the remote port if unset, 0 for any free port)
        #[arg(long)]
        local_port: Option<u16>,
    },

    /// Print an example configuration file
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

fn flag_usages() -> Vec<(&'static str, FlagUsage)> {
    vec![
        (
            "pods",
            FlagUsage::new()
                .usage("--group=<sg-N> [--node=<host-N>]")
                .usage("--node=<host-N> [--row=<row> --row-file=<path>]")
                .example("--group=sg-1 --node=host-1"),
        ),
        (
            "deployments",
            FlagUsage::new()
                .usage("--group=<sg-N> [--node=<host-N>]")
                .usage("--node=<host-N> [--row=<row> --row-file=<path>]")
                .example("--node=host-3 --row=r2 --row-file=/etc/sg/rows.txt"),
        ),
        (
            "deployment-pods",
            FlagUsage::new().usage("<deployment>").example("sg-1-host-1"),
        ),
        (
            "match",
            FlagUsage::new()
                .usage("<name> --group=<sg-N> [--node=<host-N>]")
                .example("sg-1-host-1-5d8f7-abcde --node=host-1"),
        ),
        (
            "delete-pod",
            FlagUsage::new().usage("<pod>").example("sg-1-host-1-5d8f7-abcde"),
        ),
        (
            "disable-pod",
            FlagUsage::new().usage("<pod>").example("sg-1-host-1-5d8f7-abcde --quiet"),
        ),
        (
            "enable-pod",
            FlagUsage::new().usage("<pod>").example("sg-1-host-1-5d8f7-abcde"),
        ),
        (
            "update-image",
            FlagUsage::new()
                .usage("--image=<image> <deployment>")
                .usage("--image=<image> --group=<sg-N> [--node=<host-N>]")
                .example("--image=registry.local/sg:2.4.1 sg-1-host-1")
                .example("--image=registry.local/sg:2.4.1 --node=host-2"),
        ),
        (
            "tenant-service",
            FlagUsage::new().usage("<tenant>").example("acme"),
        ),
        (
            "secret",
            FlagUsage::new().usage("<name>").example("acme-sg-credentials --show-values"),
        ),
        (
            "port-forward",
            FlagUsage::new()
                .usage("<service> --remote-port=<port> [--local-port=<port>]")
                .usage("--tenant=<tenant> --remote-port=<port>")
                .example("--tenant=acme --remote-port=8080 --local-port=18080"),
        ),
    ]
}

#[tokio::main]
async fn main() {
    let matches = apply_to_subcommands(Cli::command(), PROGRAM, &flag_usages()).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    logger::init(cli.verbose);

    if cli.dry_run {
        dryrun::enable();
        sg_toolbox::log_info!("DRY RUN MODE: No changes will be made");
    }

    if let Err(e) = run(cli).await {
        display_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new(
        Settings::load(),
        cli.namespace,
        cli.kubeconfig,
        cli.context,
        cli.quiet,
    );

    match cli.command {
        Commands::Pods { filter, output } => commands::list::pods(&ctx, &filter, output).await,
        Commands::Deployments { filter, output } => {
            commands::list::deployments(&ctx, &filter, output).await
        }
        Commands::DeploymentPods { deployment, output } => {
            commands::list::deployment_pods(&ctx, &deployment, output).await
        }
        Commands::Match { name, filter } => {
            if commands::list::match_name(&ctx, &name, &filter)? {
                Ok(())
            } else {
                std::process::exit(2);
            }
        }
        Commands::DeletePod { pod } => commands::pod::delete(&ctx, &pod).await,
        Commands::DisablePod { pod } => commands::pod::disable(&ctx, &pod).await,
        Commands::EnablePod { pod } => commands::pod::enable(&ctx, &pod).await,
        Commands::UpdateImage {
            image,
            deployment,
            filter,
        } => commands::image::update_image(&ctx, &image, deployment.as_deref(), &filter).await,
        Commands::TenantService { tenant } => commands::service::tenant_service(&ctx, &tenant).await,
        Commands::Secret {
            name,
            show_values,
            output,
        } => commands::secret::show(&ctx, &name, show_values, output).await,
        Commands::PortForward {
            service,
            tenant,
            remote_port,
            local_port,
        } => {
            commands::service::port_forward(
                &ctx,
                service.as_deref(),
                tenant.as_deref(),
                local_port.unwrap_or(remote_port),
                remote_port,
            )
            .await
        }
        Commands::Config => handle_config_command(),
        Commands::Completion { shell } => handle_completion_command(shell),
        Commands::Version => handle_version_command(),
    }
}

fn handle_config_command() -> Result<()> {
    if let Some(path) = Settings::find_config_file() {
        sg_toolbox::log_info!("Active config file: {}", path.display());
    }
    print!("{}", Settings::example_config());
    Ok(())
}

fn handle_completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, PROGRAM, &mut io::stdout());
    Ok(())
}

fn handle_version_command() -> Result<()> {
    println!("{} {}", PROGRAM, env!("CARGO_PKG_VERSION"));
    println!("Helper CLI for storage-group pods and deployments");
    Ok(())
}
