// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A predictor that delegates to an external program.
//!
//! Each call spawns the program once:
//!
//! ```text
//!   render_prompt(record) ──stdin──▶ program ──stdout──▶ extract_answer
//! ```
//!
//! The record key and the system instruction are passed through the
//! `BATCH_INFER_QID` and `BATCH_INFER_SYSTEM_PROMPT` environment variables.
//! A call that outlives its timeout is killed.

use crate::answer::extract_answer;
use crate::prompt::{render_prompt, SYSTEM_PROMPT};
use crate::{PredictionError, PredictionErrorKind, Predictor};
use dataset::Record;
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Runs an external program per record.
#[derive(Debug, Clone)]
pub struct CommandPredictor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandPredictor {
    /// Creates a predictor invoking `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// The per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn spawn(&self, qid: &str) -> std::io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .env("BATCH_INFER_QID", qid)
            .env("BATCH_INFER_SYSTEM_PROMPT", SYSTEM_PROMPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }

    /// Waits for the child, killing it once the timeout elapses.
    fn wait_with_timeout(&self, child: &mut Child) -> Result<ExitStatus, PredictionErrorKind> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(PredictionErrorKind::Timeout(self.timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn run(&self, record: &Record) -> Result<String, PredictionErrorKind> {
        let mut child = self.spawn(&record.qid)?;

        let prompt = render_prompt(record);
        let stdin = child.stdin.take().map(|mut pipe| {
            std::thread::spawn(move || match pipe.write_all(prompt.as_bytes()) {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = self.wait_with_timeout(&mut child)?;

        if let Some(handle) = stdin {
            join(handle)??;
        }
        let out = match stdout {
            Some(handle) => join(handle)??,
            None => String::new(),
        };

        if !status.success() {
            let err = match stderr {
                Some(handle) => join(handle)?.unwrap_or_default(),
                None => String::new(),
            };
            let detail = err.lines().next().unwrap_or("").trim();
            return Err(PredictionErrorKind::Backend(format!(
                "'{}' exited with {status}{}{detail}",
                self.program,
                if detail.is_empty() { "" } else { ": " },
            )));
        }

        Ok(out)
    }
}

/// Reads a pipe to the end on a helper thread.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<String>> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        pipe.read_to_string(&mut buf).map(|_| buf)
    })
}

fn join<T>(handle: JoinHandle<T>) -> Result<T, PredictionErrorKind> {
    handle
        .join()
        .map_err(|_| PredictionErrorKind::Backend("pipe thread panicked".into()))
}

impl Predictor for CommandPredictor {
    fn name(&self) -> &str {
        "command"
    }

    fn predict(&self, record: &Record) -> Result<String, PredictionError> {
        let raw = self
            .run(record)
            .map_err(|kind| PredictionError::new(&record.qid, kind))?;
        let answer = extract_answer(&raw, record.max_choice_letter());
        tracing::debug!(
            "{}: raw {:?} -> {answer}",
            record.qid,
            raw.chars().take(30).collect::<String>(),
        );
        Ok(answer)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, timeout_ms: u64) -> CommandPredictor {
        CommandPredictor::new(
            "sh",
            vec!["-c".into(), script.into()],
            Duration::from_millis(timeout_ms),
        )
    }

    fn record() -> Record {
        Record::new(
            "q1",
            "Thủ đô của Việt Nam là gì?",
            vec!["Huế".into(), "Hà Nội".into(), "Đà Nẵng".into(), "Vinh".into()],
        )
    }

    #[test]
    fn test_extracts_answer_from_stdout() {
        let p = sh("cat > /dev/null; echo 'Đáp án: B'", 5_000);
        assert_eq!(p.predict(&record()).unwrap(), "B");
    }

    #[test]
    fn test_prompt_is_sent_on_stdin() {
        let p = sh("grep -q 'B. Hà Nội' && echo C || echo D", 5_000);
        assert_eq!(p.predict(&record()).unwrap(), "C");
    }

    #[test]
    fn test_qid_in_environment() {
        let p = sh(
            "cat > /dev/null; [ \"$BATCH_INFER_QID\" = q1 ] && echo D || echo B",
            5_000,
        );
        assert_eq!(p.predict(&record()).unwrap(), "D");
    }

    #[test]
    fn test_nonzero_exit_is_backend_error() {
        let p = sh("cat > /dev/null; echo 'model crashed' >&2; exit 3", 5_000);
        let err = p.predict(&record()).unwrap_err();
        assert_eq!(err.key, "q1");
        match err.kind {
            PredictionErrorKind::Backend(msg) => assert!(msg.contains("model crashed"), "{msg}"),
            other => panic!("expected Backend, got {other}"),
        }
    }

    #[test]
    fn test_timeout_kills_child() {
        let p = sh("sleep 5", 100);
        let start = Instant::now();
        let err = p.predict(&record()).unwrap_err();
        assert!(matches!(err.kind, PredictionErrorKind::Timeout(_)));
        assert!(err.is_transient());
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let p = CommandPredictor::new(
            "/nonexistent/batch-infer-model",
            vec![],
            Duration::from_secs(1),
        );
        let err = p.predict(&record()).unwrap_err();
        assert!(matches!(err.kind, PredictionErrorKind::Io(_)));
    }
}
