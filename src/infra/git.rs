//! # Git Module / Git 模块
//!
//! The checkout collaborator: switches the shared driver checkout to a
//! release branch, and discovers the latest repository tags for the
//! `dynamic` version mode.
//!
//! 检出协作者：将共享的驱动检出切换到发布分支，
//! 并为 `dynamic` 版本模式发现仓库的最新标签。

use crate::infra::command::{ExecutionContext, spawn_and_capture};
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Resets local modifications left by a previous cell's patches, then checks
/// out the requested branch.
///
/// 重置上一个单元格的补丁留下的本地修改，然后检出请求的分支。
pub async fn checkout(ctx: &ExecutionContext, branch: &str) -> Result<()> {
    let (status, output) = ctx.run("git", ["checkout", "."]).await;
    let status = status.context("failed to spawn git")?;
    if !status.success() {
        bail!("'git checkout .' failed:\n{output}");
    }

    let (status, output) = ctx.run("git", ["checkout", branch]).await;
    let status = status.context("failed to spawn git")?;
    if !status.success() {
        bail!("'git checkout {branch}' failed:\n{output}");
    }
    Ok(())
}

/// Returns the most recently created tags of the repository, newest first,
/// optionally keeping only tags containing `filter`. Used when the version
/// list is `dynamic`.
///
/// 返回仓库最近创建的标签（最新的在前），可选地只保留包含 `filter` 的
/// 标签。当版本列表为 `dynamic` 时使用。
pub async fn latest_tags(
    repository: &Path,
    filter: Option<&str>,
    count: usize,
) -> Result<Vec<String>> {
    let ctx = ExecutionContext::new(repository);
    let mut cmd = ctx.command("git");
    cmd.args(["tag", "--sort=-creatordate"]);

    let (status, output) = spawn_and_capture(cmd).await;
    let status = status.context("failed to spawn git")?;
    if !status.success() {
        bail!(
            "'git tag --sort=-creatordate' failed in {}:\n{output}",
            repository.display()
        );
    }

    let tags: Vec<String> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| filter.is_none_or(|needle| line.contains(needle)))
        .take(count)
        .map(str::to_string)
        .collect();

    if tags.is_empty() {
        bail!("no matching tags found in {}", repository.display());
    }
    Ok(tags)
}
