//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the driver matrix runner:
//! data models, version-to-configuration resolution, ignore-list loading,
//! JUnit aggregation and matrix-cell execution.
//!
//! 此模块包含驱动矩阵运行器的核心功能：
//! 数据模型、版本到配置的解析、忽略列表加载、JUnit 聚合和矩阵单元格执行。

pub mod execution;
pub mod ignores;
pub mod junit;
pub mod models;
pub mod versions;

// Re-exports
pub use self::execution::{MatrixSettings, run_cell};
pub use self::models::{DriverType, RunResult, Summary};
pub use self::versions::{ConfigDir, DriverVersion, ResolvedTag};
