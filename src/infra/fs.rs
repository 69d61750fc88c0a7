//! # File System Operations Module / 文件系统操作模块
//!
//! Report-file placement and small path helpers.
//! 报告文件的放置以及小型路径辅助函数。

use crate::core::models::DriverType;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the per-cell report path
/// `<report_root>/<tag>/nosetests.<driver_type>.v<protocol>.<tag>.xml`,
/// creating the directory and removing any stale report from a previous
/// run so the cell always starts from a fresh file.
///
/// 返回每个单元格的报告路径
/// `<report_root>/<tag>/nosetests.<driver_type>.v<protocol>.<tag>.xml`，
/// 创建目录并删除上一次运行遗留的旧报告，因此单元格总是从全新文件开始。
pub fn fresh_report_file(
    report_root: &Path,
    driver_type: DriverType,
    tag: &str,
    protocol: u8,
) -> Result<PathBuf> {
    let report_dir = report_root.join(tag);
    fs::create_dir_all(&report_dir)
        .with_context(|| format!("failed to create report directory {}", report_dir.display()))?;

    let report_file = report_dir.join(format!("nosetests.{driver_type}.v{protocol}.{tag}.xml"));
    if report_file.exists() {
        fs::remove_file(&report_file).with_context(|| {
            format!("failed to remove stale report {}", report_file.display())
        })?;
    }
    Ok(report_file)
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("failed to resolve path: {}", path.display()))
}
