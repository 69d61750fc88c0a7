//! # Command Execution Module / 命令执行模块
//!
//! Every external process (git, patch, python, the test runner) is invoked
//! through an [`ExecutionContext`]: an explicit working directory plus the
//! environment variables injected for the run. The process-wide working
//! directory and environment are never mutated.
//!
//! 每个外部进程（git、patch、python、测试运行器）都通过
//! [`ExecutionContext`] 调用：一个显式的工作目录加上为本次运行注入的
//! 环境变量。进程级的工作目录和环境永远不会被修改。

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// The explicit execution context threaded through every external-process
/// call for one matrix cell.
///
/// 贯穿一个矩阵单元格的每次外部进程调用的显式执行上下文。
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    cwd: PathBuf,
    env: Vec<(String, String)>,
}

impl ExecutionContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        ExecutionContext {
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    /// Adds an environment variable visible to every command built from this
    /// context.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Builds a command rooted in this context: working directory set, the
    /// context environment applied on top of the inherited one, and the
    /// child killed if the future is dropped.
    ///
    /// 构建一个以此上下文为根的命令：设置工作目录，在继承的环境之上应用
    /// 上下文环境，并在 future 被丢弃时杀死子进程。
    pub fn command(&self, program: &str) -> Command {
        let mut cmd = Command::new(program);
        cmd.current_dir(&self.cwd).kill_on_drop(true);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    /// Convenience wrapper: build, run and capture in one call.
    /// 便捷封装：一次调用完成构建、运行和捕获。
    pub async fn run<I, S>(&self, program: &str, args: I) -> (std::io::Result<ExitStatus>, String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = self.command(program);
        cmd.args(args);
        spawn_and_capture(cmd).await
    }
}

/// Spawns a command and captures stdout and stderr, reading both streams
/// concurrently so neither pipe can fill up and stall the child.
///
/// # Returns
/// The `ExitStatus` (wrapped in an `io::Result`) and the combined output.
///
/// 派生一个命令并捕获 stdout 和 stderr，两个流并发读取，
/// 因此任何一个管道都不会被填满而阻塞子进程。
///
/// # Returns
/// `ExitStatus`（包装在 `io::Result` 中）以及合并后的输出。
pub async fn spawn_and_capture(mut cmd: Command) -> (std::io::Result<ExitStatus>, String) {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_task = tokio::spawn(read_lines(stdout));
    let stderr_task = tokio::spawn(read_lines(stderr));

    let status = child.wait().await;

    // Join the readers after the child exits so every line is captured.
    // 在子进程退出后再汇合读取任务，以便捕获所有输出行。
    let stdout_text = stdout_task.await.unwrap_or_default();
    let stderr_text = stderr_task.await.unwrap_or_default();

    (status, format!("{stdout_text}{stderr_text}"))
}

async fn read_lines<R>(stream: Option<R>) -> String
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return String::new();
    };
    let mut lines = BufReader::new(stream).lines();
    let mut text = String::new();
    while let Ok(Some(line)) = lines.next_line().await {
        text.push_str(&line);
        text.push('\n');
    }
    text
}
