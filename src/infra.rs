//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the driver matrix
//! runner: external command execution, git and virtualenv collaborators,
//! file system operations and i18n support.
//!
//! 此模块为驱动矩阵运行器提供基础设施服务：
//! 外部命令执行、git 和虚拟环境协作者、文件系统操作和国际化支持。

pub mod command;
pub mod fs;
pub mod git;
pub mod venv;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
