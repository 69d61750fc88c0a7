//! # HTML Reporting Module / HTML 报告模块
//!
//! This module handles the generation of the HTML matrix report: a styled
//! standalone file with overall statistics and one row per matrix cell.
//!
//! 此模块处理 HTML 矩阵报告的生成：
//! 一个带样式的独立文件，包含总体统计信息和每个矩阵单元格一行。

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::Path;

use crate::core::models::RunResult;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Generates the HTML matrix report.
///
/// Creates a styled HTML file with the overall cell statistics and a table
/// with one row per (driver type, version, protocol) cell: adjusted counts
/// and the cell verdict.
///
/// 生成 HTML 矩阵报告。
///
/// 创建一个带样式的 HTML 文件，包含总体单元格统计信息和一个表格，
/// 每个（驱动类型，版本，协议）单元格一行：调整后的计数和单元格判定。
pub fn generate_html_report(results: &[RunResult], output_path: &Path) -> Result<()> {
    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html><html><head><title>{}</title>",
        t!("html_report.title")
    ));
    html.push_str("<style>");
    html.push_str(HTML_STYLE);
    html.push_str("</style>");
    html.push_str("</head><body>");
    html.push_str(&format!("<h1>{}</h1>", t!("html_report.main_header")));
    html.push_str(&format!(
        "<p class='generated-at'>{}</p>",
        t!(
            "html_report.generated_at",
            timestamp = Local::now().format("%Y-%m-%d %H:%M:%S")
        )
    ));

    // Add summary statistics
    let total = results.len();
    let passed = results.iter().filter(|r| r.is_clean()).count();
    let failed = total - passed;

    html.push_str("<div class='summary-container'>");
    html.push_str(&format!(
        "<div class='summary-item'><span class='count'>{}</span><span class='label'>{}</span></div>",
        total,
        t!("html_report.summary.total")
    ));
    html.push_str(&format!(
        "<div class='summary-item'><span class='count passed-text'>{}</span><span class='label'>{}</span></div>",
        passed,
        t!("html_report.summary.passed")
    ));
    html.push_str(&format!(
        "<div class='summary-item'><span class='count failed-text'>{}</span><span class='label'>{}</span></div>",
        failed,
        t!("html_report.summary.failed")
    ));
    html.push_str("</div>");

    // Add results table
    html.push_str("<table><thead><tr>");
    for header_key in [
        "html_report.table.header.driver",
        "html_report.table.header.version",
        "html_report.table.header.protocol",
        "html_report.table.header.testcases",
        "html_report.table.header.failures",
        "html_report.table.header.errors",
        "html_report.table.header.skipped",
        "html_report.table.header.ignored",
        "html_report.table.header.status",
    ] {
        html.push_str(&format!("<th>{}</th>", t!(header_key)));
    }
    html.push_str("</tr></thead><tbody>");

    for result in results {
        let (status_class, status_str) = if result.is_clean() {
            ("status-Passed", t!("html_report.status_passed"))
        } else {
            ("status-Failed", t!("html_report.status_failed"))
        };

        html.push_str("<tr>");
        html.push_str(&format!("<td>{}</td>", escape_html(result.driver_type.as_str())));
        html.push_str(&format!("<td>{}</td>", escape_html(&result.version)));
        html.push_str(&format!("<td>v{}</td>", result.protocol));
        html.push_str(&format!("<td>{}</td>", result.summary.testcase));
        html.push_str(&format!("<td>{}</td>", result.summary.failure));
        html.push_str(&format!("<td>{}</td>", result.summary.error));
        html.push_str(&format!("<td>{}</td>", result.summary.skipped));
        html.push_str(&format!("<td>{}</td>", result.summary.ignored_in_analysis));
        html.push_str(&format!(
            "<td><div class='status-cell {}'>{}</div></td>",
            status_class, status_str
        ));
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html.push_str("<script>");
    html.push_str(HTML_SCRIPT);
    html.push_str("</script></body></html>");

    fs::write(output_path, html)
        .with_context(|| format!("failed to write HTML report {}", output_path.display()))?;
    Ok(())
}

/// Simple HTML escape function to replace special characters with their HTML entities
/// 简单的 HTML 转义函数，用 HTML 实体替换特殊字符
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
