//! # Matrix Cell Execution Module / 矩阵单元格执行模块
//!
//! Drives one (version, protocol) matrix cell through its lifecycle:
//! checkout, patch, dependency install, test execution, aggregation.
//! Every transition is an explicit `Result`; the first failed transition
//! moves the cell to `Failed` and records the sentinel summary, so a broken
//! cell stays visible in the matrix instead of aborting the run.
//!
//! 驱动一个（版本，协议）矩阵单元格完成其生命周期：
//! 检出、打补丁、安装依赖、执行测试、聚合。
//! 每个转换都是显式的 `Result`；第一个失败的转换将单元格移到 `Failed`
//! 并记录哨兵摘要，因此损坏的单元格在矩阵中保持可见，而不是中止运行。

use crate::core::ignores;
use crate::core::junit;
use crate::core::models::{CellPhase, DriverType, RunResult, Summary};
use crate::core::versions::{self, ConfigDir, ResolvedTag};
use crate::infra::command::{ExecutionContext, spawn_and_capture};
use crate::infra::git;
use crate::infra::venv::VirtualEnv;
use anyhow::{Context, Result, bail};
use colored::*;
use rust_i18n::t;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Settings shared by every cell of one matrix run.
/// 一次矩阵运行的所有单元格共享的设置。
#[derive(Debug, Clone)]
pub struct MatrixSettings {
    /// Canonical path of the driver git checkout (the shared working
    /// directory every cell mutates in turn).
    pub driver_git: PathBuf,
    pub driver_type: DriverType,
    /// The scylla installation directory exported to the suite when no
    /// release identifier is given.
    pub install_dir: String,
    /// The relocatable release identifier; mutually exclusive with
    /// `install_dir` in the exported environment.
    pub scylla_version: Option<String>,
    /// The test selection string handed to the runner, e.g.
    /// `tests.integration.standard`.
    pub tests: String,
    pub versions_root: PathBuf,
    pub report_root: PathBuf,
}

/// A failed transition: the phase the cell was in when it broke, plus the
/// underlying error.
/// 一次失败的转换：单元格损坏时所处的阶段，以及底层错误。
#[derive(Debug)]
struct PhaseFailure {
    phase: CellPhase,
    error: anyhow::Error,
}

fn fail(phase: CellPhase) -> impl FnOnce(anyhow::Error) -> PhaseFailure {
    move |error| PhaseFailure { phase, error }
}

/// Runs one matrix cell to completion. Never returns an error: any phase
/// failure (including an unreadable report) is logged with its version,
/// protocol and phase, and recorded as the sentinel single-failure summary.
///
/// 将一个矩阵单元格运行到完成。从不返回错误：任何阶段失败
/// （包括不可读的报告）都会与其版本、协议和阶段一起记录，
/// 并记录为哨兵单失败摘要。
pub async fn run_cell(settings: &MatrixSettings, raw_tag: &str, protocol: u8) -> RunResult {
    let tag = ResolvedTag::parse(raw_tag);
    let version = tag.text();

    let summary = match run_phases(settings, &tag, &version, protocol).await {
        Ok(summary) => summary,
        Err(failure) => {
            println!(
                "{}",
                t!(
                    "cell.failed",
                    version = version,
                    protocol = protocol,
                    phase = failure.phase,
                    error = format!("{:#}", failure.error)
                )
                .red()
            );
            Summary::sentinel_failure()
        }
    };

    RunResult {
        driver_type: settings.driver_type,
        version,
        protocol,
        summary,
    }
}

/// The state machine proper:
/// `Pending → CheckedOut → Patched → DependenciesReady → Executed → Aggregated`.
/// Each `?` is a transition into the terminal `Failed` state, labelled with
/// the phase the cell had reached.
async fn run_phases(
    settings: &MatrixSettings,
    tag: &ResolvedTag,
    version: &str,
    protocol: u8,
) -> Result<Summary, PhaseFailure> {
    let config = versions::resolve(&settings.versions_root, settings.driver_type, tag)
        .map_err(fail(CellPhase::Pending))?;
    match &config {
        Some(dir) => println!("{}", t!("cell.config_dir", path = dir.path().display())),
        None => println!("{}", t!("cell.no_config_dir", version = version).dimmed()),
    }

    let ignored =
        ignores::load(config.as_ref(), version, protocol).map_err(fail(CellPhase::Pending))?;

    let ctx = cell_context(settings, protocol);

    // Pending → CheckedOut
    let branch = settings.driver_type.branch_name(version);
    git::checkout(&ctx, &branch)
        .await
        .map_err(fail(CellPhase::Pending))?;

    // CheckedOut → Patched
    apply_patches(&ctx, config.as_ref(), version)
        .await
        .map_err(fail(CellPhase::CheckedOut))?;

    // Patched → DependenciesReady
    let venv = VirtualEnv::for_cell(settings.driver_type, version);
    venv.create(&ctx)
        .await
        .map_err(fail(CellPhase::Patched))?;
    venv.install_requirements(&ctx)
        .await
        .map_err(fail(CellPhase::Patched))?;

    // DependenciesReady → Executed
    let report_file = crate::infra::fs::fresh_report_file(
        &settings.report_root,
        settings.driver_type,
        version,
        protocol,
    )
    .map_err(fail(CellPhase::DependenciesReady))?;
    run_suite(&ctx, &settings.tests, &ignored, &report_file)
        .await
        .map_err(fail(CellPhase::DependenciesReady))?;

    // Executed → Aggregated
    let summary = junit::aggregate(&report_file, &ignored).map_err(fail(CellPhase::Executed))?;
    junit::prefix_classnames(&report_file, version, protocol)
        .map_err(fail(CellPhase::Executed))?;

    Ok(summary)
}

/// The per-cell execution context: the driver checkout as working directory
/// and the suite environment. `SCYLLA_VERSION` and `INSTALL_DIRECTORY` are
/// mutually exclusive.
fn cell_context(settings: &MatrixSettings, protocol: u8) -> ExecutionContext {
    let ctx = ExecutionContext::new(&settings.driver_git)
        .with_env("PROTOCOL_VERSION", protocol.to_string());
    match &settings.scylla_version {
        Some(release) => ctx.with_env("SCYLLA_VERSION", release),
        None => ctx.with_env("INSTALL_DIRECTORY", &settings.install_dir),
    }
}

/// Applies every patch file of the resolved configuration directory with
/// `patch -p1`. The first failure aborts the remaining patches.
///
/// 使用 `patch -p1` 应用解析出的配置目录中的每个补丁文件。
/// 第一个失败会中止剩余的补丁。
async fn apply_patches(
    ctx: &ExecutionContext,
    config: Option<&ConfigDir>,
    version: &str,
) -> Result<()> {
    let Some(config) = config else {
        return Ok(());
    };

    for patch_file in config.patch_files()? {
        let mut cmd = ctx.command("patch");
        cmd.args(["-p1", "-i"]).arg(&patch_file);

        let (status, output) = spawn_and_capture(cmd).await;
        let status = status.context("failed to spawn patch")?;
        if !status.success() {
            bail!(
                "failed to apply patch '{}' to version '{}':\n{output}",
                patch_file.display(),
                version
            );
        }
    }
    Ok(())
}

/// Invokes the external test runner with xunit output directed at the fresh
/// per-cell report file, excluding every identifier in the effective ignore
/// set. The runner's exit status is not the verdict; the report is, so a
/// nonzero status only shows up through the aggregated counts.
///
/// 调用外部测试运行器，将 xunit 输出定向到全新的单元格报告文件，
/// 并排除生效忽略集合中的每个标识符。运行器的退出状态不是判定结果；
/// 报告才是，因此非零状态只会通过聚合计数体现。
async fn run_suite(
    ctx: &ExecutionContext,
    tests: &str,
    ignored: &HashSet<String>,
    report_file: &Path,
) -> Result<()> {
    let mut cmd = ctx.command("nosetests");
    cmd.args(["--with-xunit", "--xunit-file"])
        .arg(report_file)
        .args(["-s", tests]);

    // Sort the excludes so the invocation is reproducible run to run.
    // 对排除项排序，使调用在每次运行之间可复现。
    let mut excluded: Vec<&String> = ignored.iter().collect();
    excluded.sort();
    for test_id in excluded {
        cmd.args(["--exclude-test", test_id]);
    }

    println!("{}", t!("cell.running_suite", tests = tests).blue());

    let (status, output) = spawn_and_capture(cmd).await;
    status.context("failed to spawn nosetests")?;
    if !output.trim().is_empty() {
        println!("{}", output.trim());
    }
    Ok(())
}
