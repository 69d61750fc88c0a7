//! # JUnit Report Module / JUnit 报告模块
//!
//! Parses the xunit XML report produced by the external test runner and
//! folds it into a [`Summary`], reclassifying failures and errors that are
//! on the effective ignore list. Also owns the classname rewrite applied to
//! the persisted report so that reports from different matrix cells stay
//! distinguishable when merged downstream.
//!
//! 解析外部测试运行器生成的 xunit XML 报告并将其折叠成 [`Summary`]，
//! 重新分类在生效忽略列表上的失败和错误。还负责对持久化报告应用
//! classname 重写，以便不同矩阵单元格的报告在下游合并时保持可区分。

use crate::core::models::Summary;
use anyhow::{Context, Result, anyhow};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseStatus {
    Passed,
    Failed,
    Errored,
    Skipped,
}

/// One `<testcase>` record while its children are still being read.
/// 一条 `<testcase>` 记录，其子元素仍在读取中。
#[derive(Debug)]
struct PendingCase {
    classname: String,
    name: String,
    status: CaseStatus,
}

impl PendingCase {
    /// A case is ignored when its fully-qualified identifier is on the
    /// ignore list. The bare case name is accepted as well, matching the
    /// identifiers handed to the runner's exclude flags.
    fn is_ignored(&self, ignored: &HashSet<String>) -> bool {
        if self.classname.is_empty() {
            return ignored.contains(&self.name);
        }
        ignored.contains(&format!("{}.{}", self.classname, self.name)) || ignored.contains(&self.name)
    }
}

/// Reads the report file and produces the adjusted summary. A missing or
/// malformed report is an error; the orchestrator records it as a failed
/// cell rather than letting it propagate.
///
/// 读取报告文件并生成调整后的摘要。缺失或格式错误的报告是一个错误；
/// 协调器将其记录为失败的单元格，而不是让它继续传播。
pub fn aggregate(report_file: &Path, ignored: &HashSet<String>) -> Result<Summary> {
    let content = fs::read_to_string(report_file)
        .with_context(|| format!("failed to read test report {}", report_file.display()))?;
    summarize(&content, ignored)
        .with_context(|| format!("malformed test report {}", report_file.display()))
}

/// Folds the xunit document into a [`Summary`]. Counts come from the
/// `<testcase>` records themselves, never from the `<testsuite>` header
/// attributes, so the ignore reclassification stays consistent with the
/// case list.
///
/// 将 xunit 文档折叠成 [`Summary`]。计数来自 `<testcase>` 记录本身，
/// 而不是 `<testsuite>` 头部属性，因此忽略重分类与用例列表保持一致。
pub fn summarize(xml: &str, ignored: &HashSet<String>) -> Result<Summary> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut summary = Summary::default();
    let mut pending: Option<PendingCase> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.name().as_ref() {
                b"testcase" => pending = Some(open_case(&element)?),
                b"failure" => mark(&mut pending, CaseStatus::Failed),
                b"error" => mark(&mut pending, CaseStatus::Errored),
                b"skipped" => mark(&mut pending, CaseStatus::Skipped),
                _ => {}
            },
            Event::Empty(element) => match element.name().as_ref() {
                b"testcase" => close_case(open_case(&element)?, ignored, &mut summary),
                b"failure" => mark(&mut pending, CaseStatus::Failed),
                b"error" => mark(&mut pending, CaseStatus::Errored),
                b"skipped" => mark(&mut pending, CaseStatus::Skipped),
                _ => {}
            },
            Event::End(element) => {
                if element.name().as_ref() == b"testcase" {
                    let case = pending
                        .take()
                        .ok_or_else(|| anyhow!("unmatched </testcase> in report"))?;
                    close_case(case, ignored, &mut summary);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if pending.is_some() {
        return Err(anyhow!("unterminated <testcase> in report"));
    }
    Ok(summary)
}

fn open_case(element: &BytesStart<'_>) -> Result<PendingCase> {
    let mut classname = String::new();
    let mut name = String::new();
    for attribute in element.attributes() {
        let attribute = attribute.context("bad attribute on <testcase>")?;
        match attribute.key.as_ref() {
            b"classname" => classname = attribute.unescape_value()?.into_owned(),
            b"name" => name = attribute.unescape_value()?.into_owned(),
            _ => {}
        }
    }
    Ok(PendingCase {
        classname,
        name,
        status: CaseStatus::Passed,
    })
}

/// The first failure/error/skipped child decides the status; later children
/// (for example a second traceback) do not reclassify the case.
fn mark(pending: &mut Option<PendingCase>, status: CaseStatus) {
    if let Some(case) = pending {
        if case.status == CaseStatus::Passed {
            case.status = status;
        }
    }
}

fn close_case(case: PendingCase, ignored: &HashSet<String>, summary: &mut Summary) {
    summary.testcase += 1;
    match case.status {
        CaseStatus::Passed => {}
        CaseStatus::Skipped => summary.skipped += 1,
        CaseStatus::Failed => {
            if case.is_ignored(ignored) {
                summary.ignored_in_analysis += 1;
            } else {
                summary.failure += 1;
            }
        }
        CaseStatus::Errored => {
            if case.is_ignored(ignored) {
                summary.ignored_in_analysis += 1;
            } else {
                summary.error += 1;
            }
        }
    }
}

/// Rewrites the persisted report so every `classname` is prefixed with the
/// cell identity (`version_<tag>_v<protocol>_`). Applied exactly once per
/// cell, after parsing; a report that already carries the prefix is left
/// untouched, so a re-run cannot double-prefix.
///
/// 重写持久化的报告，使每个 `classname` 都带有单元格标识前缀
/// （`version_<tag>_v<protocol>_`）。在解析之后，每个单元格只应用一次；
/// 已带有前缀的报告保持不变，因此重新运行不会产生双重前缀。
pub fn prefix_classnames(report_file: &Path, tag: &str, protocol: u8) -> Result<()> {
    let replacement = format!("classname=\"version_{tag}_v{protocol}_");
    let content = fs::read_to_string(report_file)
        .with_context(|| format!("failed to read test report {}", report_file.display()))?;

    if content.contains(&replacement) {
        return Ok(());
    }

    let rewritten = content.replace("classname=\"", &replacement);
    fs::write(report_file, rewritten)
        .with_context(|| format!("failed to rewrite test report {}", report_file.display()))?;
    Ok(())
}
