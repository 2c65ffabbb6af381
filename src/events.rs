//! Decode pipeline notifications.
//!
//! Mirrors the reference decoder's `Event` signals, which a UI or logging
//! layer subscribes to in order to show progress without blocking on the
//! worker thread.

use crate::decoder::Decoded;
use crate::submode::Submode;

/// Which of the two sync outcomes a [`Event::SyncState`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A candidate was found but did not go on to decode.
    Candidate,
    /// A candidate decoded successfully (emitted alongside `Event::Decoded`).
    Decoded,
}

#[derive(Debug, Clone)]
pub enum Event {
    /// A submode's sync search has begun over the read window `[pos, pos+size)`.
    SyncStart { pos: usize, size: usize },
    /// A sync candidate was considered, successful or not. `detail` carries
    /// the candidate's sync value for [`SyncOutcome::Candidate`] or its SNR
    /// for [`SyncOutcome::Decoded`].
    SyncState { kind: SyncOutcome, submode: Submode, freq: f32, dt: f32, detail: f32 },
    /// A message has been successfully decoded.
    Decoded { submode: Submode, message: Decoded },
    /// A job's decode has started, covering every submode in `submodes_mask`.
    DecodeStarted { submodes_mask: u32 },
    /// A job's decode has finished; `count` sums decodes across all submodes.
    DecodeFinished { count: usize },
}
