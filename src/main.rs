use clap::{Parser, Subcommand};
use colored::Colorize;
use m365_tools::cmd;
use m365_tools::config::{Config, ConfigManager};
use m365_tools::error;
use m365_tools::tui;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "m365tools",
    about = "A collection of useful tools for Microsoft 365 administrators",
    version,
    long_about = "Microsoft 365 admin utilities\n\n\
                  Look up tenant IDs, generate UPNs, jump to service status pages\n\
                  and check a domain's MX, SPF and DKIM records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the Microsoft 365 tenant ID using an email address
    Tenant(cmd::tenant::TenantLookupArgs),

    /// Generate a user principal name (first.last@domain)
    Upn(cmd::upn::UpnArgs),

    /// List Microsoft service status dashboards
    Status(cmd::status::StatusArgs),

    /// Check a domain's MX, SPF and DKIM records
    Dns(cmd::dns::DnsArgs),

    /// Check Microsoft 365 license status for a user
    License,

    /// Check a user's group memberships across Microsoft 365
    Groups,

    /// Launch the interactive terminal UI
    Tui,

    /// Show or initialise the configuration file
    #[command(subcommand)]
    Config(cmd::config::ConfigCommands),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("m365_tools=debug,m365tools=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("m365_tools={}", level)))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> error::Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new()?;
    let config = match (&cli.command, config_manager.load_config()) {
        (_, Ok(config)) => config,
        // Let `config init --force` repair a broken file
        (Commands::Config(_), Err(e)) => {
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
            Config::default()
        }
        (_, Err(e)) => return Err(e),
    };

    // The TUI owns the terminal; log lines would tear the screen
    if !matches!(cli.command, Commands::Tui) {
        init_logging(cli.verbose, &config.log_level);
    }

    match cli.command {
        Commands::Tenant(args) => cmd::tenant::lookup(args, &config).await?,
        Commands::Upn(args) => cmd::upn::generate(args, &config).await?,
        Commands::Status(args) => cmd::status::show(args).await?,
        Commands::Dns(args) => cmd::dns::check(args, &config).await?,
        Commands::License => cmd::placeholder::license().await?,
        Commands::Groups => cmd::placeholder::groups().await?,
        Commands::Tui => tokio::task::block_in_place(|| tui::run_tui(config))?,
        Commands::Config(config_cmd) => cmd::config::run(config_cmd, &config_manager).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tool_commands() {
        let cli = Cli::parse_from(["m365tools", "upn", "Jane", "O'Brien", "contoso.com", "--copy"]);
        assert!(matches!(cli.command, Commands::Upn(_)));

        let cli = Cli::parse_from(["m365tools", "-v", "dns", "contoso.com", "--selector", "s2"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Dns(_)));
    }
}
