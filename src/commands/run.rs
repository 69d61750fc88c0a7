// src/commands/run.rs

use anyhow::{Context, Result, bail};
use colored::*;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        execution::{self, MatrixSettings},
        models::{DriverType, RunResult},
    },
    infra::{self, git, t},
    reporting,
};

/// Everything the `run` subcommand was invoked with.
/// `run` 子命令被调用时携带的所有内容。
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub driver_git: PathBuf,
    pub install_dir: String,
    pub driver_type: DriverType,
    /// Comma-separated version tags, or `dynamic` for latest-tag discovery.
    pub versions: String,
    /// How many tags `dynamic` discovery takes.
    pub latest_tags: usize,
    pub tests: String,
    /// Comma-separated native protocol versions.
    pub protocols: String,
    pub scylla_version: Option<String>,
    pub versions_dir: PathBuf,
    pub report_dir: PathBuf,
    pub html: Option<PathBuf>,
}

/// Runs the whole matrix: outer loop over driver versions, inner loop over
/// protocol versions, strictly sequential because every cell mutates the
/// shared driver checkout. Returns an error (and therefore a nonzero exit)
/// if any cell's summary carries failures or errors.
///
/// 运行整个矩阵：外层循环遍历驱动版本，内层循环遍历协议版本，
/// 严格顺序执行，因为每个单元格都会修改共享的驱动检出。
/// 如果任何单元格的摘要带有失败或错误，则返回错误（因此退出码非零）。
pub async fn execute(options: RunOptions) -> Result<()> {
    let driver_git = infra::fs::absolute_path(&options.driver_git)?;
    let versions = resolve_versions(&options, &driver_git).await?;
    let protocols = parse_protocols(&options.protocols)?;

    println!(
        "{}",
        t!("run.versions_under_test", versions = versions.join(", "))
    );

    let stop_token = setup_signal_handler();

    let settings = MatrixSettings {
        driver_git,
        driver_type: options.driver_type,
        install_dir: options.install_dir.clone(),
        scylla_version: options.scylla_version.clone(),
        tests: options.tests.clone(),
        versions_root: options.versions_dir.clone(),
        report_root: options.report_dir.clone(),
    };

    let mut results: Vec<RunResult> = Vec::new();
    'matrix: for version in &versions {
        for protocol in &protocols {
            if stop_token.is_cancelled() {
                break 'matrix;
            }
            println!(
                "{}",
                t!("run.cell_banner", version = version, protocol = protocol).bold()
            );
            let result = execution::run_cell(&settings, version, *protocol).await;
            println!("{result}");
            results.push(result);
        }
    }

    // Completed cells are still worth reporting after an interrupt.
    // 中断之后，已完成的单元格仍然值得报告。
    if stop_token.is_cancelled() {
        reporting::console::print_matrix_summary(&results);
        bail!(t!("run.interrupted"));
    }

    reporting::console::print_matrix_summary(&results);

    if let Some(report_path) = &options.html {
        println!(
            "\n{}",
            t!("run.generating_html", path = report_path.display())
        );
        if let Err(e) = reporting::html::generate_html_report(&results, report_path) {
            eprintln!("{} {e:#}", t!("run.html_failed").red());
        }
    }

    if results.iter().any(|result| !result.is_clean()) {
        bail!(t!("run.matrix_failed"));
    }
    println!("\n{}", t!("run.matrix_passed").green().bold());
    Ok(())
}

/// Expands the `--versions` argument into the list of tags under test:
/// either the explicit comma-separated list, or the repository's latest
/// tags when `dynamic` is requested (filtered to the driver flavour).
///
/// 将 `--versions` 参数展开为被测标签列表：
/// 要么是显式的逗号分隔列表，要么在请求 `dynamic` 时取仓库的最新标签
/// （按驱动类型过滤）。
async fn resolve_versions(options: &RunOptions, driver_git: &std::path::Path) -> Result<Vec<String>> {
    if options.versions.contains("dynamic") {
        return git::latest_tags(
            driver_git,
            options.driver_type.tag_filter(),
            options.latest_tags,
        )
        .await;
    }

    let versions: Vec<String> = options
        .versions
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();
    if versions.is_empty() {
        bail!(t!("run.no_versions"));
    }
    Ok(versions)
}

fn parse_protocols(protocols: &str) -> Result<Vec<u8>> {
    let parsed: Vec<u8> = protocols
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .with_context(|| format!("invalid protocol version '{part}'"))
        })
        .collect::<Result<_>>()?;
    if parsed.is_empty() {
        bail!(t!("run.no_protocols"));
    }
    Ok(parsed)
}

fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl-C");
        println!("\n{}", t!("run.shutdown_signal").yellow());
        token_clone.cancel();
    });

    token
}
