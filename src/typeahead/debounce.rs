//! Trailing-edge debounced channel.
//!
//! Each [`debounce`] call spawns its own timer task; nothing is shared between
//! instances. The task keeps a single pending value and a single `Sleep`: every
//! push replaces the value and re-arms the timer, and the value is forwarded only
//! once the timer completes. Closing the source (dropping every [`Debouncer`])
//! ends the stream without flushing an unexpired value.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Input side of a debounced channel.
pub struct Debouncer<T> {
    tx: UnboundedSender<T>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Debouncer<T> {
    /// Feeds a value. Returns `false` once the output side is gone.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Output side of a debounced channel. Dropping it stops the timer task.
pub struct Debounced<T> {
    rx: UnboundedReceiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debounced<T> {
    /// Next settled value, or `None` once the source closed.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Creates a debounced channel whose timer task runs on `handle`.
pub fn debounce<T>(handle: &Handle, quiet: Duration) -> (Debouncer<T>, Debounced<T>)
where
    T: Send + 'static,
{
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (output_tx, output_rx) = mpsc::unbounded_channel();
    let task = handle.spawn(run_timer(input_rx, output_tx, quiet));
    (
        Debouncer { tx: input_tx },
        Debounced {
            rx: output_rx,
            task,
        },
    )
}

async fn run_timer<T>(mut input: UnboundedReceiver<T>, output: UnboundedSender<T>, quiet: Duration) {
    let mut pending: Option<T> = None;
    let timer = tokio::time::sleep(quiet);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            biased;

            received = input.recv() => match received {
                Some(value) => {
                    pending = Some(value);
                    timer.as_mut().reset(Instant::now() + quiet);
                }
                None => {
                    if pending.is_some() {
                        tracing::trace!("debounce source closed with an unexpired value");
                    }
                    break;
                }
            },
            () = &mut timer, if pending.is_some() => {
                let Some(value) = pending.take() else {
                    continue;
                };
                tracing::trace!(quiet_ms = quiet.as_millis() as u64, "debounce settled");
                if output.send(value).is_err() {
                    break;
                }
            }
        }
    }
}
