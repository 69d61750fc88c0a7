// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Writes an executable stub script into `bin_dir`. The stub directory is
/// prepended to PATH so the runner talks to these instead of the real
/// git/patch/python3/nosetests.
#[cfg(unix)]
pub fn write_stub(bin_dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = bin_dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write stub");
    let mut perms = fs::metadata(&path).expect("Failed to stat stub").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("Failed to chmod stub");
}

/// Creates a stub toolchain covering every external collaborator:
/// - `git checkout <branch>` fails for branches starting with "bad",
///   `git tag --sort=-creatordate` prints two fake release tags;
/// - `patch` records its arguments in `$PATCH_LOG` and succeeds;
/// - `python3 -m venv <path>` creates the venv skeleton;
/// - `nosetests` copies `$FAKE_XUNIT` to the path given via `--xunit-file`.
#[cfg(unix)]
pub fn stub_toolchain() -> TempDir {
    let bin = tempdir().expect("Failed to create stub dir");

    write_stub(
        bin.path(),
        "git",
        r#"
if [ "$1" = "tag" ]; then
    printf '2.0.0\n1.0.0\n'
    exit 0
fi
if [ "$1" = "checkout" ] && [ "$2" != "." ]; then
    case "$2" in
        bad*) exit 1 ;;
    esac
fi
exit 0
"#,
    );

    write_stub(
        bin.path(),
        "patch",
        r#"
if [ -n "$PATCH_LOG" ]; then
    echo "$@" >> "$PATCH_LOG"
fi
exit 0
"#,
    );

    write_stub(
        bin.path(),
        "python3",
        r#"
# Expects: python3 -m venv <path>
mkdir -p "$3/bin"
exit 0
"#,
    );

    write_stub(
        bin.path(),
        "nosetests",
        r#"
out=""
prev=""
for arg in "$@"; do
    if [ "$prev" = "--xunit-file" ]; then
        out="$arg"
    fi
    prev="$arg"
done
if [ -n "$out" ] && [ -n "$FAKE_XUNIT" ]; then
    cp "$FAKE_XUNIT" "$out"
fi
exit 0
"#,
    );

    bin
}

/// PATH value with the stub directory in front of the inherited one.
pub fn stubbed_path(stub_bin: &Path) -> String {
    let inherited = std::env::var("PATH").unwrap_or_default();
    format!("{}:{}", stub_bin.display(), inherited)
}

/// A minimal driver checkout: just a directory; the stub git accepts any
/// branch that does not start with "bad".
pub fn fake_driver_repo() -> TempDir {
    tempdir().expect("Failed to create fake driver repo")
}

/// Creates `<root>/<driver_type>/<version>/` with an optional `ignore.yaml`
/// and an optional patch file, and returns the config directory path.
pub fn config_dir_fixture(
    root: &Path,
    driver_type: &str,
    version: &str,
    ignore_yaml: Option<&str>,
    patch: Option<&str>,
) -> PathBuf {
    let dir = root.join(driver_type).join(version);
    fs::create_dir_all(&dir).expect("Failed to create config dir");
    if let Some(content) = ignore_yaml {
        fs::write(dir.join("ignore.yaml"), content).expect("Failed to write ignore.yaml");
    }
    if let Some(content) = patch {
        fs::write(dir.join("fix.patch"), content).expect("Failed to write patch file");
    }
    dir
}

/// A report where every case passed.
pub fn all_pass_report() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="nosetests" tests="2" errors="0" failures="0" skip="0">
  <testcase classname="tests.integration.standard.test_cluster.ClusterTests" name="test_connect" time="0.512"/>
  <testcase classname="tests.integration.standard.test_cluster.ClusterTests" name="test_shutdown" time="0.203"/>
</testsuite>
"#
}

/// A report with one real failure and one failure that the fixture ignore
/// list reclassifies.
pub fn mixed_failure_report() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="nosetests" tests="3" errors="0" failures="2" skip="0">
  <testcase classname="tests.integration.standard.test_cluster.ClusterTests" name="test_connect" time="0.512"/>
  <testcase classname="tests.integration.standard.test_cluster.ClusterTests" name="test_flaky" time="1.004">
    <failure type="AssertionError" message="flaky as always">trace</failure>
  </testcase>
  <testcase classname="tests.integration.standard.test_cluster.ClusterTests" name="test_real" time="0.330">
    <failure type="AssertionError" message="genuinely broken">trace</failure>
  </testcase>
</testsuite>
"#
}

/// Ignore list matching the flaky case of [`mixed_failure_report`].
pub fn flaky_ignore_yaml() -> &'static str {
    r#"general:
  - tests.integration.standard.test_cluster.ClusterTests.test_flaky
"#
}
