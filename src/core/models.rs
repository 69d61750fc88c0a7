//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the driver
//! matrix runner: driver types, per-cell summaries, run results, and the
//! lifecycle phases a matrix cell moves through.
//!
//! 此模块定义了整个驱动矩阵运行器中使用的核心数据结构：
//! 驱动类型、每个单元格的摘要、运行结果以及矩阵单元格经历的生命周期阶段。

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The flavour of python driver under test. The flavour decides which branch
/// naming scheme is used on checkout and how `dynamic` tag discovery filters
/// the repository tags.
///
/// 被测试的 python 驱动的类型。类型决定检出时使用的分支命名方案，
/// 以及 `dynamic` 标签发现如何过滤仓库标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverType {
    /// The scylla fork of the python driver. Release branches carry a
    /// `-scylla` suffix.
    /// python 驱动的 scylla 分支。发布分支带有 `-scylla` 后缀。
    Scylla,
    /// The upstream cassandra python driver.
    /// 上游的 cassandra python 驱动。
    Cassandra,
    /// The datastax python driver.
    /// datastax python 驱动。
    Datastax,
}

impl DriverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverType::Scylla => "scylla",
            DriverType::Cassandra => "cassandra",
            DriverType::Datastax => "datastax",
        }
    }

    /// Returns the git branch name to check out for a version tag.
    /// Only the scylla driver appends a suffix; the other flavours use the
    /// tag verbatim.
    ///
    /// 返回要为版本标签检出的 git 分支名称。
    /// 只有 scylla 驱动会附加后缀；其他类型按原样使用标签。
    pub fn branch_name(&self, tag: &str) -> String {
        match self {
            DriverType::Scylla => format!("{tag}-scylla"),
            _ => tag.to_string(),
        }
    }

    /// The substring used to filter repository tags in `dynamic` version
    /// discovery, if any.
    pub fn tag_filter(&self) -> Option<&'static str> {
        match self {
            DriverType::Scylla => Some("scylla"),
            _ => None,
        }
    }
}

impl FromStr for DriverType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scylla" => Ok(DriverType::Scylla),
            "cassandra" => Ok(DriverType::Cassandra),
            "datastax" => Ok(DriverType::Datastax),
            other => bail!("unknown driver type '{other}' (expected scylla, cassandra or datastax)"),
        }
    }
}

impl fmt::Display for DriverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lifecycle of a single matrix cell. Every transition is driven by an
/// explicit `Result`; `Failed` is terminal and reachable from any
/// non-terminal phase.
///
/// 单个矩阵单元格的生命周期。每个转换都由显式的 `Result` 驱动；
/// `Failed` 是终止状态，可从任何非终止阶段到达。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellPhase {
    Pending,
    CheckedOut,
    Patched,
    DependenciesReady,
    Executed,
    Aggregated,
    Failed,
}

impl CellPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellPhase::Pending => "pending",
            CellPhase::CheckedOut => "checked-out",
            CellPhase::Patched => "patched",
            CellPhase::DependenciesReady => "dependencies-ready",
            CellPhase::Executed => "executed",
            CellPhase::Aggregated => "aggregated",
            CellPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for CellPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adjusted counts for one matrix cell, derived from the xunit report and
/// the effective ignore set. Failures and errors whose identifier is in the
/// ignore set are reclassified as `ignored_in_analysis` instead of counting
/// against the cell.
///
/// 一个矩阵单元格的调整后计数，由 xunit 报告和生效的忽略集合导出。
/// 标识符在忽略集合中的失败和错误被重新分类为 `ignored_in_analysis`，
/// 而不计入该单元格的失败。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub testcase: u32,
    pub failure: u32,
    pub error: u32,
    pub skipped: u32,
    pub ignored_in_analysis: u32,
}

impl Summary {
    /// The synthetic single-failure summary recorded when a cell fails before
    /// its report exists (checkout, patch, dependency install, or an
    /// unreadable report). The cell stays visible in the matrix instead of
    /// being silently skipped.
    ///
    /// 当单元格在报告存在之前失败（检出、打补丁、依赖安装或报告不可读）时
    /// 记录的合成单失败摘要。该单元格在矩阵中保持可见，而不是被静默跳过。
    pub fn sentinel_failure() -> Self {
        Summary {
            testcase: 1,
            failure: 1,
            error: 0,
            skipped: 0,
            ignored_in_analysis: 0,
        }
    }

    /// `true` when the cell contributes no failures or errors to the matrix
    /// verdict.
    pub fn is_clean(&self) -> bool {
        self.failure == 0 && self.error == 0
    }
}

/// One `Summary` together with its matrix-cell identity. Created exactly
/// once per (version, protocol) pair and never mutated afterwards.
///
/// 一个 `Summary` 及其矩阵单元格标识。每个（版本，协议）对只创建一次，
/// 之后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub driver_type: DriverType,
    pub version: String,
    pub protocol: u8,
    pub summary: Summary,
}

impl RunResult {
    pub fn is_clean(&self) -> bool {
        self.summary.is_clean()
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}){}: v{}: testcases: {}, failures: {}, errors: {}, skipped: {}, ignored_in_analysis: {}",
            self.driver_type,
            self.version,
            self.protocol,
            self.summary.testcase,
            self.summary.failure,
            self.summary.error,
            self.summary.skipped,
            self.summary.ignored_in_analysis,
        )
    }
}
