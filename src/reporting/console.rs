//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the final matrix summary: one line per (version, protocol) cell
//! with its adjusted counts, colour coded by verdict.
//!
//! 打印最终的矩阵摘要：每个（版本，协议）单元格一行，
//! 带有调整后的计数，并按判定结果着色。

use crate::core::models::RunResult;
use crate::infra::t;
use colored::*;

/// Prints the matrix results banner and one result line per cell.
/// A cell line is green when it contributed no failures or errors,
/// red otherwise (sentinel setup failures included).
///
/// 打印矩阵结果横幅以及每个单元格一行结果。
/// 当单元格没有贡献失败或错误时该行为绿色，否则为红色（包括哨兵设置失败）。
///
/// # Output Format / 输出格式
/// ```text
/// === DRIVER MATRIX RESULTS ===
/// (scylla)3.24.7: v3: testcases: 120, failures: 0, errors: 0, skipped: 4, ignored_in_analysis: 2
/// (scylla)3.24.7: v4: testcases: 1, failures: 1, errors: 0, skipped: 0, ignored_in_analysis: 0
/// ```
pub fn print_matrix_summary(results: &[RunResult]) {
    println!("\n{}", t!("report.results_banner").bold());

    for result in results {
        let line = result.to_string();
        if result.is_clean() {
            println!("{}", line.green());
        } else {
            println!("{}", line.red());
        }
    }

    let failed = results.iter().filter(|r| !r.is_clean()).count();
    if failed > 0 {
        println!(
            "{}",
            t!("report.cells_failed", failed = failed, total = results.len()).red()
        );
    }
}
