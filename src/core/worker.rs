//! Dedicated inference thread for models that are not thread-safe

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::Direction;

struct Job {
    text: String,
    reply: oneshot::Sender<anyhow::Result<String>>,
}

/// Owns a model on its own thread and runs queued jobs one at a time.
///
/// A panic while handling a job fails that job only; the thread keeps
/// serving later requests.
#[derive(Debug)]
pub struct InferenceWorker {
    direction: Direction,
    jobs: mpsc::UnboundedSender<Job>,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl InferenceWorker {
    /// Spawn the thread, build the model with `load` and block until it is ready.
    pub fn spawn<M, L, R>(direction: Direction, load: L, run: R) -> Result<Self>
    where
        M: 'static,
        L: FnOnce() -> anyhow::Result<M> + Send + 'static,
        R: Fn(&M, &str) -> anyhow::Result<String> + Send + 'static,
    {
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();
        let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel::<std::result::Result<(), String>>(1);

        thread::Builder::new()
            .name(format!("inference-{}", direction))
            .spawn(move || {
                let model = match catch_unwind(AssertUnwindSafe(load)) {
                    Ok(Ok(model)) => {
                        let _ = ready_tx.send(Ok(()));
                        model
                    }
                    Ok(Err(e)) => {
                        let _ = ready_tx.send(Err(format!("{:#}", e)));
                        return;
                    }
                    Err(payload) => {
                        let _ = ready_tx.send(Err(format!("panicked: {}", panic_message(payload))));
                        return;
                    }
                };

                while let Some(job) = queue.blocking_recv() {
                    debug!("{} worker picked up {} chars", direction, job.text.len());
                    let result = catch_unwind(AssertUnwindSafe(|| run(&model, &job.text)))
                        .unwrap_or_else(|payload| {
                            Err(anyhow::anyhow!("inference panicked: {}", panic_message(payload)))
                        });
                    if let Err(e) = &result {
                        error!("{} inference failed: {:#}", direction, e);
                    }
                    let _ = job.reply.send(result);
                }
                debug!("{} worker shutting down", direction);
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { direction, jobs }),
            Ok(Err(message)) => Err(TranslationError::ModelLoad { direction, message }),
            Err(_) => Err(TranslationError::ModelLoad {
                direction,
                message: "model thread exited during load".to_string(),
            }),
        }
    }

    /// Queue `text` and wait for the result
    pub async fn submit(&self, text: &str) -> anyhow::Result<String> {
        let (reply, response) = oneshot::channel();
        self.jobs
            .send(Job {
                text: text.to_string(),
                reply,
            })
            .map_err(|_| anyhow::anyhow!("{} model worker is not running", self.direction))?;

        response
            .await
            .map_err(|_| anyhow::anyhow!("{} model worker dropped the request", self.direction))?
    }
}
