//! # Ignore List Module / 忽略列表模块
//!
//! Loads the per-version `ignore.yaml` specification and computes the
//! effective ignore set for a protocol: the union of the `general` scope
//! and the scope keyed by the protocol number.
//!
//! 加载每个版本的 `ignore.yaml` 规范，并计算协议的生效忽略集合：
//! `general` 范围与以协议号为键的范围的并集。

use crate::core::versions::ConfigDir;
use anyhow::{Context, Result, bail};
use colored::*;
use rust_i18n::t;
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs;

/// Computes the effective ignore set for one matrix cell.
///
/// A missing `ignore.yaml` (or no resolved configuration directory at all)
/// yields the empty set; a malformed one is an error the caller records as
/// a cell failure. The protocol scope is keyed by the protocol's integer
/// value in the document; a quoted numeric key is accepted as well, since
/// the lookup normalizes both forms.
///
/// 计算一个矩阵单元格的生效忽略集合。
///
/// 缺失的 `ignore.yaml`（或根本没有解析出配置目录）产生空集合；
/// 格式错误的文件是调用者记录为单元格失败的错误。
/// 协议范围在文档中以协议的整数值为键；也接受带引号的数字键，
/// 因为查找会规范化这两种形式。
pub fn load(config: Option<&ConfigDir>, tag: &str, protocol: u8) -> Result<HashSet<String>> {
    let Some(config) = config else {
        return Ok(HashSet::new());
    };

    let ignore_file = config.ignore_file();
    if !ignore_file.exists() {
        println!("{}", t!("ignores.no_file", version = tag));
        return Ok(HashSet::new());
    }

    let content = fs::read_to_string(&ignore_file)
        .with_context(|| format!("failed to read {}", ignore_file.display()))?;
    let document: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse {}", ignore_file.display()))?;

    let Value::Mapping(mapping) = &document else {
        bail!(
            "{} is not a mapping of scopes to test lists",
            ignore_file.display()
        );
    };

    let mut ignored = HashSet::new();
    collect_scope(mapping.get(&Value::from("general")), &mut ignored)?;
    collect_scope(protocol_scope(mapping, protocol), &mut ignored)?;

    if ignored.is_empty() {
        println!(
            "{}",
            t!("ignores.empty_scope", version = tag, protocol = protocol).yellow()
        );
    }
    Ok(ignored)
}

/// Looks up the protocol scope by integer key first, then by its decimal
/// string form. Absent keys contribute nothing.
fn protocol_scope(mapping: &serde_yaml::Mapping, protocol: u8) -> Option<&Value> {
    mapping
        .get(&Value::from(protocol as u64))
        .or_else(|| mapping.get(&Value::from(protocol.to_string())))
}

fn collect_scope(scope: Option<&Value>, ignored: &mut HashSet<String>) -> Result<()> {
    let Some(scope) = scope else {
        return Ok(());
    };
    let Value::Sequence(entries) = scope else {
        bail!("ignore scope is not a list of test identifiers");
    };
    for entry in entries {
        let Some(test_id) = entry.as_str() else {
            bail!("ignore list entry is not a string: {entry:?}");
        };
        ignored.insert(test_id.to_string());
    }
    Ok(())
}
