//! # Version Resolution Module / 版本解析模块
//!
//! This module maps a requested driver version tag to the configuration
//! directory (patches and ignore list) that applies to it. Release tags are
//! matched against the closest prior or equal versioned directory; branch
//! names and other non-release tags fall back to a literal directory or the
//! `master` default.
//!
//! 此模块将请求的驱动版本标签映射到适用于它的配置目录（补丁和忽略列表）。
//! 发布标签与最接近的先前或相等版本目录匹配；
//! 分支名称和其他非发布标签回退到字面量目录或 `master` 默认目录。

use crate::core::models::DriverType;
use anyhow::{Context, Result, bail};
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A dotted numeric driver release version with an arbitrary number of
/// components. Comparison pads the shorter side with zeros, so
/// `3.24 == 3.24.0` and `3.24.7.1 > 3.24.7`.
///
/// 带有任意数量组件的点分数字驱动发布版本。
/// 比较时较短的一侧用零填充，因此 `3.24 == 3.24.0` 且 `3.24.7.1 > 3.24.7`。
#[derive(Debug, Clone, Eq)]
pub struct DriverVersion(Vec<u64>);

impl DriverVersion {
    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for DriverVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            bail!("empty version string");
        }
        let components = s
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .with_context(|| format!("'{s}' is not a dotted numeric version"))
            })
            .collect::<Result<Vec<u64>>>()?;
        Ok(DriverVersion(components))
    }
}

impl Ord for DriverVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for DriverVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality must agree with `Ord`, which treats missing trailing components
// as zero. A derived `PartialEq` would make `3.24` != `3.24.0`.
impl PartialEq for DriverVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .0
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&text)
    }
}

/// A version tag after the build qualifier has been stripped and the parse
/// attempted exactly once. All later dispatch is on this tagged form, never
/// on re-parsing the raw string.
///
/// 剥离构建限定符并且只尝试解析一次之后的版本标签。
/// 之后的所有分派都基于这个带标签的形式，而不是重新解析原始字符串。
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTag {
    /// A release version such as `3.24.7` or `3.24.7.1`.
    Release(DriverVersion),
    /// A branch name or other non-release identifier such as `master`.
    Literal(String),
}

impl ResolvedTag {
    /// Strips a trailing build qualifier (everything from the first `-`) and
    /// classifies the remainder: `3.24.7-scylla` parses as release `3.24.7`,
    /// `master` stays a literal.
    ///
    /// 剥离尾部的构建限定符（从第一个 `-` 开始的所有内容）并对剩余部分分类：
    /// `3.24.7-scylla` 解析为发布版本 `3.24.7`，`master` 保持为字面量。
    pub fn parse(raw_tag: &str) -> Self {
        let base = raw_tag.split('-').next().unwrap_or(raw_tag);
        match base.parse::<DriverVersion>() {
            Ok(version) => ResolvedTag::Release(version),
            Err(_) => ResolvedTag::Literal(base.to_string()),
        }
    }

    /// The stripped tag text, used for branch names, report file names and
    /// the virtualenv key.
    pub fn text(&self) -> String {
        match self {
            ResolvedTag::Release(version) => version.to_string(),
            ResolvedTag::Literal(literal) => literal.clone(),
        }
    }
}

/// The configuration resolved for one version: a directory holding zero or
/// more patch files and at most one `ignore.yaml`. Selected once per matrix
/// cell and never mutated.
///
/// 为一个版本解析出的配置：一个包含零个或多个补丁文件以及至多一个
/// `ignore.yaml` 的目录。每个矩阵单元格只选择一次，之后不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    path: PathBuf,
}

impl ConfigDir {
    pub fn new(path: PathBuf) -> Self {
        ConfigDir { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ignore_file(&self) -> PathBuf {
        self.path.join("ignore.yaml")
    }

    /// Patch files are recognized by the exact name `patch` or a `.patch`
    /// suffix. Returned in sorted filename order so patch application is
    /// deterministic.
    ///
    /// 补丁文件通过确切的名称 `patch` 或 `.patch` 后缀识别。
    /// 按文件名排序返回，以便补丁应用是确定性的。
    pub fn patch_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.path)
            .with_context(|| format!("failed to list config directory {}", self.path.display()))?;

        let mut patches = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == "patch" || name.ends_with(".patch") {
                patches.push(entry.path());
            }
        }
        patches.sort();
        Ok(patches)
    }
}

/// Finds the configuration directory for a version tag under
/// `<versions_root>/<driver_type>/`.
///
/// Release tags select, among the directories whose names parse as dotted
/// numeric versions, the greatest one that is less than or equal to the
/// target; an exact match therefore always wins. Literal tags select the
/// directory with exactly that name, falling back to `master`.
///
/// `None` means no configuration is defined for this version. That is not
/// an error: the cell runs with no patches and no ignores.
///
/// 在 `<versions_root>/<driver_type>/` 下查找版本标签的配置目录。
///
/// 发布标签在名称可解析为点分数字版本的目录中，选择小于或等于目标的最大
/// 版本；因此精确匹配总是获胜。字面量标签选择具有该确切名称的目录，
/// 回退到 `master`。
///
/// `None` 表示没有为此版本定义配置。这不是错误：
/// 该单元格在没有补丁和忽略列表的情况下运行。
pub fn resolve(
    versions_root: &Path,
    driver_type: DriverType,
    tag: &ResolvedTag,
) -> Result<Option<ConfigDir>> {
    let type_root = versions_root.join(driver_type.as_str());
    if !type_root.is_dir() {
        return Ok(None);
    }

    let target = match tag {
        ResolvedTag::Literal(literal) => {
            let literal_dir = type_root.join(literal);
            if literal_dir.is_dir() {
                return Ok(Some(ConfigDir::new(literal_dir)));
            }
            let master_dir = type_root.join("master");
            if master_dir.is_dir() {
                return Ok(Some(ConfigDir::new(master_dir)));
            }
            return Ok(None);
        }
        ResolvedTag::Release(version) => version,
    };

    let entries = fs::read_dir(&type_root)
        .with_context(|| format!("failed to list versions directory {}", type_root.display()))?;

    let mut defined: Vec<(DriverVersion, String)> = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Ok(version) = name.parse::<DriverVersion>() {
            defined.push((version, name));
        }
    }

    // Highest version first. Between directory names parsing to the same
    // version (e.g. "3.24" and "3.24.0") the lexicographically smaller name
    // wins, so resolution is deterministic.
    // 最高版本优先。在解析为相同版本的目录名称之间（例如 "3.24" 和
    // "3.24.0"），字典序较小的名称获胜，因此解析是确定性的。
    defined.sort_by(|(va, na), (vb, nb)| vb.cmp(va).then_with(|| na.cmp(nb)));

    for (version, name) in defined {
        if version <= *target {
            return Ok(Some(ConfigDir::new(type_root.join(name))));
        }
    }
    Ok(None)
}
