// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("pkgquery")
        .version(env!("CARGO_PKG_VERSION"))
        .author("pkgquery Contributors")
        .about("Find which installed package owns a path (dpkg, rpm, pacman)")
        .subcommand_required(false)
        .arg(
            Arg::new("cache_capacity")
                .long("cache-capacity")
                .value_name("N")
                .default_value("500")
                .env("PKGQUERY_CACHE_CAPACITY")
                .global(true)
                .help("Number of path lookups to remember"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log debug output (overridden by RUST_LOG)"),
        )
        .subcommand(Command::new("managers").about("Show the package managers detected on this system"))
        .subcommand(
            Command::new("owner")
                .about("Show which package owns each path")
                .arg(
                    Arg::new("paths")
                        .required(true)
                        .num_args(1..)
                        .help("Paths to look up"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List installed packages of all detected package managers")
                .arg(
                    Arg::new("filter")
                        .short('f')
                        .long("filter")
                        .help("Only show packages whose name contains this string"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print JSON instead of plain text"),
                ),
        )
        .subcommand(
            Command::new("files")
                .about("List the files owned by a package")
                .arg(Arg::new("package_name").required(true).help("Package name"))
                .arg(
                    Arg::new("arch")
                        .short('a')
                        .long("arch")
                        .default_value("")
                        .help("Package architecture (e.g. amd64, x86_64)"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("pkgquery.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
