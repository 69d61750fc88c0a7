//! # Virtualenv Module / 虚拟环境模块
//!
//! The environment collaborator: one isolated virtualenv per
//! (driver type, version tag), created under the system temp directory and
//! reused across protocols of the same version.
//!
//! 环境协作者：每个（驱动类型，版本标签）一个隔离的虚拟环境，
//! 创建在系统临时目录下，并在同一版本的不同协议之间复用。

use crate::core::models::DriverType;
use crate::infra::command::{ExecutionContext, spawn_and_capture};
use anyhow::{Context, Result, bail};
use colored::*;
use rust_i18n::t;
use std::path::{Path, PathBuf};

/// The requirement files installed when present in the checkout. Absence is
/// skipped, not an error.
/// 检出中存在时要安装的需求文件。不存在时跳过，而不是报错。
pub const REQUIREMENT_FILES: [&str; 2] = ["requirements.txt", "test-requirements.txt"];

#[derive(Debug, Clone)]
pub struct VirtualEnv {
    path: PathBuf,
}

impl VirtualEnv {
    /// The virtualenv keyed by (driver type, version tag), e.g.
    /// `/tmp/.venv/scylla/3.24.7`.
    pub fn for_cell(driver_type: DriverType, tag: &str) -> Self {
        let path = std::env::temp_dir()
            .join(".venv")
            .join(driver_type.as_str())
            .join(tag);
        VirtualEnv { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn pip(&self) -> PathBuf {
        self.path.join("bin").join("pip")
    }

    /// Creates the virtualenv with `python3 -m venv`.
    /// 使用 `python3 -m venv` 创建虚拟环境。
    pub async fn create(&self, ctx: &ExecutionContext) -> Result<()> {
        let mut cmd = ctx.command("python3");
        cmd.args(["-m", "venv"]).arg(&self.path);

        let (status, output) = spawn_and_capture(cmd).await;
        let status = status.context("failed to spawn python3")?;
        if !status.success() {
            bail!(
                "'python3 -m venv {}' failed:\n{output}",
                self.path.display()
            );
        }
        Ok(())
    }

    /// Installs every requirement file present in the checkout into this
    /// virtualenv with the venv's own pip.
    ///
    /// 使用虚拟环境自带的 pip 将检出中存在的每个需求文件安装到此虚拟环境。
    pub async fn install_requirements(&self, ctx: &ExecutionContext) -> Result<()> {
        for requirement_file in REQUIREMENT_FILES {
            if !ctx.cwd().join(requirement_file).exists() {
                println!(
                    "{}",
                    t!("venv.requirements_skipped", file = requirement_file).dimmed()
                );
                continue;
            }

            let mut cmd = ctx.command(&self.pip().to_string_lossy());
            cmd.args(["install", "--force-reinstall", "-r", requirement_file]);

            let (status, output) = spawn_and_capture(cmd).await;
            let status = status.context("failed to spawn pip")?;
            if !status.success() {
                bail!("'pip install -r {requirement_file}' failed:\n{output}");
            }
        }
        Ok(())
    }
}
