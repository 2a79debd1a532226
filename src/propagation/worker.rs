//! Background orbit-set builds
//!
//! Builds are tagged with a generation number. When several requests are
//! queued only the newest is built; a result for an older generation is
//! still delivered, and it is up to the receiver to discard it whole.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use super::{build_orbits_from, now_instant, OrbitRecord, Propagator};
use crate::data::TrackedObject;

#[derive(Debug)]
enum OrbitCommand {
    Build {
        generation: u64,
        objects: Vec<TrackedObject>,
        sample_count: usize,
        start: satkit::Instant,
    },
    Stop,
}

/// Finished orbit set for one generation
#[derive(Debug)]
pub struct OrbitSetResult {
    pub generation: u64,
    pub orbits: Vec<OrbitRecord>,
}

pub struct OrbitWorker {
    sender: Sender<OrbitCommand>,
    receiver: Receiver<OrbitSetResult>,
    _handle: thread::JoinHandle<()>,
}

impl OrbitWorker {
    pub fn new<P: Propagator + 'static>(propagator: P) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<OrbitCommand>();
        let (result_tx, result_rx) = mpsc::channel::<OrbitSetResult>();

        let handle = thread::spawn(move || {
            while let Ok(mut command) = cmd_rx.recv() {
                // Coalesce: skip straight to the newest queued command
                while let Ok(next) = cmd_rx.try_recv() {
                    if let OrbitCommand::Build { generation, .. } = &command {
                        log::debug!("Skipping superseded orbit build #{}", generation);
                    }
                    command = next;
                }

                match command {
                    OrbitCommand::Build {
                        generation,
                        objects,
                        sample_count,
                        start,
                    } => {
                        let orbits =
                            build_orbits_from(&propagator, &objects, &start, sample_count);
                        if result_tx.send(OrbitSetResult { generation, orbits }).is_err() {
                            break;
                        }
                    }
                    OrbitCommand::Stop => break,
                }
            }
        });

        Self {
            sender: cmd_tx,
            receiver: result_rx,
            _handle: handle,
        }
    }

    /// Queue a build starting now. Returns false if the worker has stopped.
    pub fn request(&self, generation: u64, objects: Vec<TrackedObject>, sample_count: usize) -> bool {
        self.request_from(generation, objects, sample_count, now_instant())
    }

    pub fn request_from(
        &self,
        generation: u64,
        objects: Vec<TrackedObject>,
        sample_count: usize,
        start: satkit::Instant,
    ) -> bool {
        self.sender
            .send(OrbitCommand::Build {
                generation,
                objects,
                sample_count,
                start,
            })
            .is_ok()
    }

    /// Drain finished builds without blocking, keeping the newest
    pub fn try_latest(&self) -> Option<OrbitSetResult> {
        let mut latest = None;
        while let Ok(result) = self.receiver.try_recv() {
            latest = Some(result);
        }
        latest
    }

    /// Block until the build for `generation` (or a newer one) arrives
    pub fn wait_for(&self, generation: u64, timeout: Duration) -> Option<OrbitSetResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(result) if result.generation >= generation => return Some(result),
                Ok(stale) => {
                    log::debug!("Discarding stale orbit set #{}", stale.generation);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }
}

impl Drop for OrbitWorker {
    fn drop(&mut self) {
        let _ = self.sender.send(OrbitCommand::Stop);
    }
}
