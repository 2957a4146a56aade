// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use pkgquery::{PackageRecord, PkgQuery, QueryConfig};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "pkgquery")]
#[command(author, version, about = "Find which installed package owns a path (dpkg, rpm, pacman)", long_about = None)]
struct Cli {
    /// Number of path lookups to remember
    #[arg(long, global = true, env = "PKGQUERY_CACHE_CAPACITY", default_value_t = pkgquery::cache::DEFAULT_CAPACITY)]
    cache_capacity: usize,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the package managers detected on this system
    Managers,
    /// Show which package owns each path
    Owner {
        /// Paths to look up
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// List installed packages of all detected package managers
    List {
        /// Only show packages whose name contains this string
        #[arg(short, long)]
        filter: Option<String>,
        /// Print JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// List the files owned by a package
    Files {
        /// Package name
        package_name: String,
        /// Package architecture (e.g. amd64, x86_64)
        #[arg(short, long, default_value = "")]
        arch: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging; stdout is reserved for results
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        // No command provided, show help
        println!("pkgquery v{}", env!("CARGO_PKG_VERSION"));
        println!("Run 'pkgquery --help' for usage information");
        return Ok(ExitCode::SUCCESS);
    };

    let config = QueryConfig {
        cache_capacity: cli.cache_capacity,
    };
    let query = PkgQuery::with_config(&config)?;

    match command {
        Commands::Managers => {
            if !query.has_supported_manager() {
                println!("No supported package manager found.");
                return Ok(ExitCode::FAILURE);
            }

            for entry in query.backends() {
                println!("{} ({})", entry.backend.name(), entry.role);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Owner { paths } => {
            for path in &paths {
                let package = query.ownership_of(path);
                if package.is_empty() {
                    println!("{}: (none)", path);
                } else {
                    println!("{}: {}", path, package);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::List { filter, json } => {
            let packages: Vec<PackageRecord> = query
                .installed_packages()
                .into_iter()
                .filter(|pkg| filter.as_deref().is_none_or(|f| pkg.name.contains(f)))
                .collect();

            info!("{} package(s) listed", packages.len());

            if json {
                println!("{}", serde_json::to_string_pretty(&packages)?);
            } else if packages.is_empty() {
                println!("No packages found.");
            } else {
                for pkg in &packages {
                    println!("{} {} {}", pkg.name, pkg.version, pkg.architecture);
                }
                println!("\nTotal: {} package(s)", packages.len());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Files { package_name, arch } => {
            let pkg = PackageRecord::new(package_name, "", arch);
            let files = query.file_list_of(&pkg);

            if files.is_empty() {
                println!("No files found for {}.", pkg.name);
                return Ok(ExitCode::FAILURE);
            }

            for file in &files {
                println!("{}", file);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
