//! Sandboxed Python execution for agent scripts. A single dedicated thread
//! owns the embedded interpreter; scripts are queued to it one at a time,
//! which also serializes the process-wide stdout/stderr redirection the
//! capture relies on.
//!
//! Timeouts are enforced twice: a trace hook inside the interpreter cancels
//! pure-Python code at the deadline, and the async caller races the reply
//! against the same budget. A script parked in a C call (say `time.sleep`)
//! cannot be cancelled by the hook; the caller still gets the timeout
//! message, and the worker stays occupied until the call returns, delaying
//! queued scripts rather than breaking them.

mod session;

use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;
use tokio::sync::{OnceCell, oneshot};

use crate::flowsheet::{Flowsheet, ObjectKind};

use session::{SandboxSession, ScriptOutcome};

/// Budget for a single script run.
const EXECUTION_TIMEOUT: Duration = Duration::from_millis(5000);

pub struct ScriptSandbox {
    flowsheet: Arc<Flowsheet>,
    timeout: Duration,
    worker: OnceCell<SandboxWorker>,
}

impl ScriptSandbox {
    pub fn new(flowsheet: Arc<Flowsheet>) -> Self {
        Self {
            flowsheet,
            timeout: EXECUTION_TIMEOUT,
            worker: OnceCell::new(),
        }
    }

    /// Same sandbox with a custom per-script budget. Tests shrink it so
    /// timeout paths finish quickly.
    pub fn with_timeout(flowsheet: Arc<Flowsheet>, timeout: Duration) -> Self {
        Self {
            flowsheet,
            timeout,
            worker: OnceCell::new(),
        }
    }

    /// Runs one script and renders its combined stdout/stderr plus any
    /// captured log records. Every failure, including the interpreter's own,
    /// comes back as an `Error: ` string rather than an `Err`.
    pub async fn run(&self, script: &str) -> String {
        match self.run_inner(script).await {
            Ok(output) => output,
            Err(err) => format!("Error: {err}"),
        }
    }

    async fn run_inner(&self, script: &str) -> Result<String> {
        // First caller pays for interpreter startup; concurrent first callers
        // share the one in-flight initialization.
        let worker = self
            .worker
            .get_or_try_init(|| SandboxWorker::spawn(self.bound_object_names()))
            .await?;

        let reply = tokio::time::timeout(self.timeout, worker.run(script, self.timeout)).await;
        match reply {
            Err(_) => Err(timeout_error(self.timeout)),
            Ok(outcome) => match outcome? {
                ScriptOutcome::DeadlineExceeded => Err(timeout_error(self.timeout)),
                ScriptOutcome::Failed { exc_type, message } => {
                    Err(anyhow!("{exc_type}: {message}"))
                }
                ScriptOutcome::Completed {
                    stdout,
                    stderr,
                    logs,
                } => Ok(compose_output(&stdout, &stderr, &logs)),
            },
        }
    }

    fn bound_object_names(&self) -> Vec<String> {
        self.flowsheet
            .objects()
            .iter()
            .filter(|object| object.kind() != ObjectKind::FlowsheetSettings)
            .map(|object| object.name().to_string())
            .collect()
    }
}

fn timeout_error(timeout: Duration) -> anyhow::Error {
    anyhow!(
        "Execution timed out after {} seconds.",
        timeout.as_secs_f64()
    )
}

fn compose_output(stdout: &str, stderr: &str, logs: &str) -> String {
    let mut output = format!("{stdout}{stderr}").trim().to_string();
    if !logs.is_empty() {
        output.push_str("\n\n--- Captured Logs ---\n");
        output.push_str(logs.trim());
    }
    output.trim().to_string()
}

struct ScriptJob {
    script: String,
    timeout: Duration,
    reply: oneshot::Sender<Result<ScriptOutcome>>,
}

struct SandboxWorker {
    jobs: mpsc::Sender<ScriptJob>,
}

impl SandboxWorker {
    /// Brings up the interpreter thread and waits until its prelude is
    /// installed. The thread owns the session; dropping the sandbox closes
    /// the job channel and lets the thread exit.
    async fn spawn(object_names: Vec<String>) -> Result<Self> {
        let (job_sender, job_receiver) = mpsc::channel::<ScriptJob>();
        let (ready_sender, ready_receiver) = oneshot::channel::<Result<()>>();

        std::thread::Builder::new()
            .name("sandbox-python".to_string())
            .spawn(move || {
                let session = match SandboxSession::initialize(&object_names) {
                    Ok(session) => {
                        if ready_sender.send(Ok(())).is_err() {
                            return;
                        }
                        session
                    }
                    Err(err) => {
                        let _ = ready_sender.send(Err(err));
                        return;
                    }
                };

                while let Ok(job) = job_receiver.recv() {
                    let outcome = session.run_script(&job.script, job.timeout.as_secs_f64());
                    // The caller may have timed out and dropped its receiver.
                    let _ = job.reply.send(outcome);
                }
            })
            .context("failed to spawn sandbox interpreter thread")?;

        ready_receiver
            .await
            .context("sandbox interpreter thread exited during initialization")??;
        Ok(Self { jobs: job_sender })
    }

    async fn run(&self, script: &str, timeout: Duration) -> Result<ScriptOutcome> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.jobs
            .send(ScriptJob {
                script: script.to_string(),
                timeout,
                reply: reply_sender,
            })
            .map_err(|_| anyhow!("sandbox interpreter thread is gone"))?;
        reply_receiver
            .await
            .map_err(|_| anyhow!("sandbox interpreter dropped a script job"))?
    }
}
