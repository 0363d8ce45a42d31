//! Re-registration signalling.
//!
//! State mutations raise a signal; a worker thread picks it up and runs the
//! announcement (republishing discovery metadata). The channel holds at most
//! one pending signal, so a burst of mutations collapses into one pass.

use std::io;
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::Result;

/// Pause between waking and announcing, so closely spaced mutations land in
/// the same pass.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Create a connected signal and listener.
pub fn reregister_channel() -> (ReregisterSignal, ReregisterListener) {
    let (tx, rx) = mpsc::sync_channel(1);
    (ReregisterSignal { tx }, ReregisterListener { rx })
}

/// Sending half. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ReregisterSignal {
    tx: SyncSender<()>,
}

impl ReregisterSignal {
    /// Request a re-registration pass. Never blocks.
    ///
    /// Returns `false` if a pass was already pending or the listener is gone.
    pub fn signal(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => false,
            Err(TrySendError::Disconnected(())) => {
                debug!("re-registration listener gone, signal dropped");
                false
            }
        }
    }
}

/// Receiving half.
#[derive(Debug)]
pub struct ReregisterListener {
    rx: Receiver<()>,
}

impl ReregisterListener {
    /// Block until a signal arrives.
    ///
    /// Returns `false` once every [`ReregisterSignal`] has been dropped.
    pub fn wait(&self) -> bool {
        self.rx.recv().is_ok()
    }

    /// Discard any signal that arrived since the last `wait`.
    pub fn drain(&self) {
        loop {
            match self.rx.try_recv() {
                Ok(()) => continue,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Run `announce` on a dedicated thread for every (debounced) signal.
    ///
    /// The thread exits when every signal handle has been dropped. Errors
    /// from `announce` are logged and the worker keeps waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<F>(self, debounce: Duration, mut announce: F) -> io::Result<JoinHandle<()>>
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        thread::Builder::new()
            .name("reregister".into())
            .spawn(move || {
                while self.wait() {
                    thread::sleep(debounce);
                    self.drain();
                    info!("re-registering with home automation hub");
                    if let Err(e) = announce() {
                        error!(error = %e, kind = e.kind().as_str(), "re-registration failed");
                    }
                }
                debug!("re-registration worker stopped");
            })
    }
}
