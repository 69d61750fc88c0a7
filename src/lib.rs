//! # Driver Matrix Library / 驱动矩阵库
//!
//! This library provides the core functionality for the driver-matrix tool,
//! a test-matrix runner for the Cassandra/Scylla python driver: it checks
//! out driver release branches, applies version-specific patches, installs
//! requirements into an isolated virtualenv and runs the integration suite
//! once per (driver version, native-protocol version) pair, aggregating the
//! JUnit results into a single matrix verdict.
//!
//! 此库为 driver-matrix 工具提供核心功能，
//! 这是一个针对 Cassandra/Scylla python 驱动的测试矩阵运行器：
//! 它检出驱动发布分支，应用特定版本的补丁，将依赖安装到隔离的虚拟环境，
//! 并为每个（驱动版本，原生协议版本）组合运行一次集成测试套件，
//! 将 JUnit 结果聚合为单一的矩阵判定。
//!
//! ## Modules / 模块
//!
//! - `core` - Version resolution, ignore lists, JUnit aggregation and cell execution
//! - `infra` - Infrastructure services like command execution and the git/venv collaborators
//! - `reporting` - Matrix result reporting
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 版本解析、忽略列表、JUnit 聚合和单元格执行
//! - `infra` - 基础设施服务，如命令执行以及 git/虚拟环境协作者
//! - `reporting` - 矩阵结果报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use self::core::execution;
pub use self::core::models;
pub use self::core::versions;

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
