//! # CLI Tests / 命令行接口测试
//!
//! Argument-surface tests for the `driver-matrix` binary: help output,
//! required arguments and argument validation. The matrix itself is
//! exercised in `integration_matrix_tests.rs`.
//!
//! `driver-matrix` 二进制文件的参数层测试：帮助输出、必需参数和参数验证。
//! 矩阵本身在 `integration_matrix_tests.rs` 中测试。

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn driver_matrix() -> Command {
    Command::cargo_bin("driver-matrix").expect("Failed to find binary")
}

#[cfg(test)]
mod help_tests {
    use super::*;

    #[test]
    fn test_top_level_help() {
        driver_matrix()
            .args(["--lang", "en", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "A test-matrix runner for the Cassandra/Scylla python driver",
            ));
    }

    #[test]
    fn test_run_help_lists_matrix_arguments() {
        driver_matrix()
            .args(["--lang", "en", "run", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--versions"))
            .stdout(predicate::str::contains("--protocols"))
            .stdout(predicate::str::contains("--driver-type"))
            .stdout(predicate::str::contains("--scylla-version"));
    }

    #[test]
    fn test_no_subcommand_succeeds() {
        // Without a subcommand nothing runs and nothing fails.
        driver_matrix().args(["--lang", "en"]).assert().success();
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_run_requires_driver_git() {
        driver_matrix()
            .args(["--lang", "en", "run"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("DRIVER_GIT"));
    }

    #[test]
    fn test_invalid_driver_type_is_rejected() {
        let repo = tempdir().unwrap();
        driver_matrix()
            .args(["--lang", "en", "run"])
            .arg(repo.path())
            .args(["--driver-type", "mysql"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown driver type 'mysql'"));
    }

    #[test]
    fn test_empty_versions_is_an_error() {
        let repo = tempdir().unwrap();
        driver_matrix()
            .args(["--lang", "en", "run"])
            .arg(repo.path())
            .env_remove("SCYLLA_VERSION")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no driver versions specified"));
    }

    #[test]
    fn test_non_numeric_protocol_is_an_error() {
        let repo = tempdir().unwrap();
        driver_matrix()
            .args(["--lang", "en", "run"])
            .arg(repo.path())
            .args(["--versions", "1.0.0", "--protocols", "three"])
            .env_remove("SCYLLA_VERSION")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid protocol version 'three'"));
    }
}
