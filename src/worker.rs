//! Single worker thread dispatching decode passes across submodes.
//!
//! The reference decoder pairs one worker thread with a counting
//! semaphore signalled once per completed receive period; a job is
//! processed at most once per signal, with excess signals simply
//! coalescing into "run again". A bounded `mpsc` channel of capacity 1 is
//! the idiomatic Rust equivalent: `trigger()` is non-blocking and drops a
//! signal already pending rather than queuing duplicates.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::JoinHandle;

use crate::config::JobParams;
use crate::decoder::SyncNotice;
use crate::events::{Event, SyncOutcome};
use crate::ldpc::{constants::{K, N}, encode::generator_matrix};
use crate::submode::Submode;

pub struct Worker {
    trigger: Option<SyncSender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn the worker thread. `dd` is read fresh from the ring buffer at
    /// the start of each job by `read_buffer`; `emit` delivers events back
    /// to the caller (UI, logger, test harness).
    pub fn spawn<R, E>(mut read_buffer: R, mut emit: E, mut next_job: impl FnMut() -> Option<JobParams> + Send + 'static) -> Self
    where
        R: FnMut() -> Vec<i16> + Send + 'static,
        E: FnMut(Event) + Send + 'static,
    {
        let (trigger, rx): (SyncSender<()>, Receiver<()>) = sync_channel(1);
        let generator = generator_matrix();

        let handle = std::thread::spawn(move || {
            while rx.recv().is_ok() {
                let Some(job) = next_job() else { break };
                let dd = read_buffer();
                run_job(&dd, &job, &generator, &mut emit);
            }
        });

        Self { trigger: Some(trigger), handle: Some(handle) }
    }

    /// Signal the worker that a new receive period is ready. Non-blocking:
    /// if a signal is already pending, this one is dropped.
    pub fn trigger(&self) {
        if let Some(trigger) = &self.trigger {
            let _ = trigger.try_send(());
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.trigger.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_job(dd: &[i16], job: &JobParams, generator: &[[u8; N]; K], emit: &mut impl FnMut(Event)) {
    emit(Event::DecodeStarted { submodes_mask: job.enabled_submodes });
    let mut total = 0usize;

    for &submode in Submode::DISPATCH_ORDER.iter() {
        if !job.submode_enabled(submode) {
            continue;
        }

        let mut buf = dd.to_vec();
        emit(Event::SyncStart { pos: 0, size: buf.len() });

        let decoded = if job.sync_stats {
            let mut notify = |notice: SyncNotice| {
                let event = match notice {
                    SyncNotice::Candidate { freq, dt, sync } => {
                        Event::SyncState { kind: SyncOutcome::Candidate, submode, freq, dt, detail: sync }
                    }
                    SyncNotice::Decoded { freq, dt, snr } => {
                        Event::SyncState { kind: SyncOutcome::Decoded, submode, freq, dt, detail: snr }
                    }
                };
                emit(event);
            };
            crate::decoder::decode_pass_with_events(&mut buf, submode, job, generator, &mut notify)
        } else {
            crate::decoder::decode_pass(&mut buf, submode, job, generator)
        };

        total += decoded.len();
        for message in decoded {
            emit(Event::Decoded { submode, message });
        }
    }

    emit(Event::DecodeFinished { count: total });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn worker_runs_one_job_per_trigger_and_then_exits() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let mut jobs = vec![JobParams { nfa: 200, nfb: 2500, ..Default::default() }].into_iter();

        let worker = Worker::spawn(
            || vec![0i16; 12_000],
            move |event| events_clone.lock().unwrap().push(format!("{event:?}")),
            move || jobs.next(),
        );
        worker.trigger();
        drop(worker);

        let recorded = events.lock().unwrap();
        assert!(recorded.iter().any(|e| e.contains("DecodeFinished")));
    }
}
