// src/cli.rs
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf};

use crate::commands::{self, run::RunOptions};
use crate::core::models::DriverType;
use crate::infra::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> String {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        if let Some(lang) = args.get(pos + 1) {
            return lang.clone();
        }
    }
    // Fallback to system language detection
    sys_locale::get_locale().unwrap_or_else(|| "en".to_string())
}

fn build_cli(locale: &str) -> Command {
    Command::new("driver-matrix")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(
                    Arg::new("driver-git")
                        .help(t!("arg_driver_git", locale = locale).to_string())
                        .value_name("DRIVER_GIT")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("install-dir")
                        .help(t!("arg_install_dir", locale = locale).to_string())
                        .value_name("INSTALL_DIR")
                        .default_value("")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("driver-type")
                        .long("driver-type")
                        .help(t!("arg_driver_type", locale = locale).to_string())
                        .value_name("DRIVER_TYPE")
                        .default_value("scylla")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("versions")
                        .long("versions")
                        .help(t!("arg_versions", locale = locale).to_string())
                        .value_name("VERSIONS")
                        .default_value("")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("latest-tags")
                        .long("latest-tags")
                        .help(t!("arg_latest_tags", locale = locale).to_string())
                        .value_name("COUNT")
                        .default_value("2")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("tests")
                        .long("tests")
                        .help(t!("arg_tests", locale = locale).to_string())
                        .value_name("TESTS")
                        .default_value("tests.integration.standard")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("protocols")
                        .long("protocols")
                        .help(t!("arg_protocols", locale = locale).to_string())
                        .value_name("PROTOCOLS")
                        .default_value("3,4")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("scylla-version")
                        .long("scylla-version")
                        .help(t!("arg_scylla_version", locale = locale).to_string())
                        .value_name("SCYLLA_VERSION")
                        .env("SCYLLA_VERSION")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("versions-dir")
                        .long("versions-dir")
                        .help(t!("arg_versions_dir", locale = locale).to_string())
                        .value_name("VERSIONS_DIR")
                        .default_value("versions")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("report-dir")
                        .long("report-dir")
                        .help(t!("arg_report_dir", locale = locale).to_string())
                        .value_name("REPORT_DIR")
                        .default_value("xunit")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let driver_type: DriverType = run_matches
                .get_one::<String>("driver-type")
                .unwrap() // Has default
                .parse()
                .context("invalid --driver-type")?;

            let options = RunOptions {
                driver_git: run_matches
                    .get_one::<PathBuf>("driver-git")
                    .expect("required argument")
                    .clone(),
                install_dir: run_matches
                    .get_one::<String>("install-dir")
                    .unwrap() // Has default
                    .clone(),
                driver_type,
                versions: run_matches
                    .get_one::<String>("versions")
                    .unwrap() // Has default
                    .clone(),
                latest_tags: run_matches
                    .get_one::<usize>("latest-tags")
                    .copied()
                    .unwrap_or(2),
                tests: run_matches
                    .get_one::<String>("tests")
                    .unwrap() // Has default
                    .clone(),
                protocols: run_matches
                    .get_one::<String>("protocols")
                    .unwrap() // Has default
                    .clone(),
                scylla_version: run_matches.get_one::<String>("scylla-version").cloned(),
                versions_dir: run_matches
                    .get_one::<PathBuf>("versions-dir")
                    .unwrap() // Has default
                    .clone(),
                report_dir: run_matches
                    .get_one::<PathBuf>("report-dir")
                    .unwrap() // Has default
                    .clone(),
                html: run_matches.get_one::<PathBuf>("html").cloned(),
            };

            commands::run::execute(options).await?;
        }
        _ => {
            // This case handles when no subcommand is given.
            // Clap will have already printed help info.
        }
    }
    Ok(())
}
