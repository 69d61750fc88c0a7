//! # JUnit Aggregation Unit Tests / JUnit 聚合单元测试
//!
//! Unit tests for `junit.rs`: summarizing xunit documents, ignore
//! reclassification, error handling for broken reports and the classname
//! prefix rewrite.
//!
//! `junit.rs` 的单元测试：汇总 xunit 文档、忽略重分类、
//! 损坏报告的错误处理以及 classname 前缀重写。

use driver_matrix::core::junit;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn ignore_set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn case(classname: &str, name: &str, child: &str) -> String {
    if child.is_empty() {
        format!(r#"<testcase classname="{classname}" name="{name}" time="0.1"/>"#)
    } else {
        format!(
            r#"<testcase classname="{classname}" name="{name}" time="0.1">{child}</testcase>"#
        )
    }
}

fn report(cases: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"nosetests\">\n{}\n</testsuite>\n",
        cases.join("\n")
    )
}

#[cfg(test)]
mod summarize_tests {
    use super::*;

    #[test]
    fn test_counts_each_status() {
        let xml = report(&[
            case("tests.Suite", "test_pass", ""),
            case("tests.Suite", "test_fail", "<failure>boom</failure>"),
            case("tests.Suite", "test_error", "<error>crash</error>"),
            case("tests.Suite", "test_skip", "<skipped/>"),
        ]);

        let summary = junit::summarize(&xml, &HashSet::new()).unwrap();
        assert_eq!(summary.testcase, 4);
        assert_eq!(summary.failure, 1);
        assert_eq!(summary.error, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.ignored_in_analysis, 0);
    }

    #[test]
    fn test_self_closing_testcase_counts_as_pass() {
        let xml = report(&[case("tests.Suite", "test_quick", "")]);

        let summary = junit::summarize(&xml, &HashSet::new()).unwrap();
        assert_eq!(summary.testcase, 1);
        assert!(summary.is_clean());
    }

    #[test]
    fn test_ignored_failures_are_reclassified() {
        let xml = report(&[
            case("tests.Suite", "test_a", "<failure>1</failure>"),
            case("tests.Suite", "test_b", "<failure>2</failure>"),
            case("tests.Suite", "test_c", "<failure>3</failure>"),
            case("tests.Suite", "test_d", "<failure>4</failure>"),
            case("tests.Suite", "test_e", "<failure>5</failure>"),
        ]);
        let ignored = ignore_set(&["tests.Suite.test_a", "tests.Suite.test_b"]);

        let summary = junit::summarize(&xml, &ignored).unwrap();
        assert_eq!(summary.testcase, 5);
        assert_eq!(summary.failure, 3);
        assert_eq!(summary.ignored_in_analysis, 2);
    }

    #[test]
    fn test_ignored_errors_are_reclassified() {
        let xml = report(&[case("tests.Suite", "test_a", "<error>crash</error>")]);
        let ignored = ignore_set(&["tests.Suite.test_a"]);

        let summary = junit::summarize(&xml, &ignored).unwrap();
        assert_eq!(summary.error, 0);
        assert_eq!(summary.ignored_in_analysis, 1);
        assert!(summary.is_clean());
    }

    #[test]
    fn test_bare_name_matches_ignore_entry() {
        let xml = report(&[case("tests.Suite", "test_a", "<failure>1</failure>")]);
        let ignored = ignore_set(&["test_a"]);

        let summary = junit::summarize(&xml, &ignored).unwrap();
        assert_eq!(summary.failure, 0);
        assert_eq!(summary.ignored_in_analysis, 1);
    }

    #[test]
    fn test_ignoring_a_passed_case_changes_nothing() {
        let xml = report(&[case("tests.Suite", "test_a", "")]);
        let ignored = ignore_set(&["tests.Suite.test_a"]);

        let summary = junit::summarize(&xml, &ignored).unwrap();
        assert_eq!(summary.testcase, 1);
        assert_eq!(summary.ignored_in_analysis, 0);
    }

    #[test]
    fn test_first_child_decides_the_status() {
        let xml = report(&[case(
            "tests.Suite",
            "test_a",
            "<failure>first</failure><error>second</error>",
        )]);

        let summary = junit::summarize(&xml, &HashSet::new()).unwrap();
        assert_eq!(summary.failure, 1);
        assert_eq!(summary.error, 0);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = "<testsuite><testcase name=\"broken\"";
        assert!(junit::summarize(xml, &HashSet::new()).is_err());
    }

    #[test]
    fn test_unterminated_testcase_is_an_error() {
        let xml = "<testsuite><testcase classname=\"c\" name=\"n\"></testsuite>";
        assert!(junit::summarize(xml, &HashSet::new()).is_err());
    }
}

#[cfg(test)]
mod aggregate_tests {
    use super::*;

    #[test]
    fn test_missing_report_file_is_an_error() {
        let missing = PathBuf::from("/nonexistent/report.xml");
        assert!(junit::aggregate(&missing, &HashSet::new()).is_err());
    }

    #[test]
    fn test_aggregate_reads_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nosetests.xml");
        fs::write(&path, report(&[case("tests.Suite", "test_a", "")])).unwrap();

        let summary = junit::aggregate(&path, &HashSet::new()).unwrap();
        assert_eq!(summary.testcase, 1);
    }
}

#[cfg(test)]
mod prefix_tests {
    use super::*;

    #[test]
    fn test_prefix_is_applied_to_every_classname() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nosetests.xml");
        fs::write(
            &path,
            report(&[
                case("tests.Suite", "test_a", ""),
                case("tests.Other", "test_b", ""),
            ]),
        )
        .unwrap();

        junit::prefix_classnames(&path, "3.24.7", 4).unwrap();

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains(r#"classname="version_3.24.7_v4_tests.Suite""#));
        assert!(rewritten.contains(r#"classname="version_3.24.7_v4_tests.Other""#));
    }

    #[test]
    fn test_prefixing_twice_is_a_no_op() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nosetests.xml");
        fs::write(&path, report(&[case("tests.Suite", "test_a", "")])).unwrap();

        junit::prefix_classnames(&path, "3.24.7", 4).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        junit::prefix_classnames(&path, "3.24.7", 4).unwrap();
        let twice = fs::read_to_string(&path).unwrap();

        assert_eq!(once, twice);
        assert!(!twice.contains("version_3.24.7_v4_version_3.24.7_v4_"));
    }

    #[test]
    fn test_prefixed_report_still_summarizes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nosetests.xml");
        fs::write(&path, report(&[case("tests.Suite", "test_a", "")])).unwrap();

        junit::prefix_classnames(&path, "1.0", 3).unwrap();
        let rewritten = fs::read_to_string(&path).unwrap();

        let summary = junit::summarize(&rewritten, &HashSet::new()).unwrap();
        assert_eq!(summary.testcase, 1);
    }
}
