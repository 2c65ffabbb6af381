//! Period-aligned ring buffer for decimated 12kHz samples.
//!
//! Samples accumulate at a fixed write cursor (`kin`) until the receive
//! period rolls over, at which point the buffer restarts from position 0.
//! Rollover is detected by the wall-clock second-within-period going
//! backwards; any decrease (not just a wrap to exactly zero) triggers a
//! reset, since a receive period can itself change length mid-session.

pub const NTMAX_SECONDS: usize = 60;
pub const SAMPLE_RATE: usize = 12_000;
pub const BUFFER_LEN: usize = NTMAX_SECONDS * SAMPLE_RATE;

pub struct RingBuffer {
    samples: Vec<i16>,
    kin: usize,
    period_secs: u32,
    last_second: u32,
}

impl RingBuffer {
    pub fn new(period_secs: u32) -> Self {
        Self {
            samples: vec![0i16; BUFFER_LEN],
            kin: 0,
            period_secs,
            last_second: 0,
        }
    }

    pub fn second_in_period(&self, now_ms: u64) -> u32 {
        let second_in_day = (now_ms % 86_400_000) / 1000;
        (second_in_day as u32) % self.period_secs
    }

    /// Call once per write to check for a period rollover. Resets the
    /// buffer to position 0 whenever the observed second-in-period value
    /// decreases, rather than only on an exact wrap to zero.
    pub fn observe_clock(&mut self, now_ms: u64) {
        let ns = self.second_in_period(now_ms);
        if ns < self.last_second {
            self.kin = 0;
        }
        self.last_second = ns;
    }

    /// Recompute `kin` from the current wall-clock second-within-period and
    /// rotate the backing array by the signed delta between the old and new
    /// cursor, so in-flight samples keep their phase relative to the new
    /// write position rather than being discarded outright. A positive
    /// delta rotates the array forward, a negative delta rotates it back.
    pub fn reset_position(&mut self, now_ms: u64) {
        let ns = self.second_in_period(now_ms);
        let new_kin = (ns as usize * SAMPLE_RATE).min(BUFFER_LEN);
        let delta = new_kin as i64 - self.kin as i64;
        let len = self.samples.len();
        if len > 0 {
            if delta > 0 {
                self.samples.rotate_right((delta as usize) % len);
            } else if delta < 0 {
                self.samples.rotate_left(((-delta) as usize) % len);
            }
        }
        self.kin = new_kin;
        self.last_second = ns;
    }

    /// Append decimated samples at the current write cursor, clamping to
    /// the buffer's capacity (excess samples are dropped, matching the
    /// reference decoder's end-of-period behavior).
    pub fn push(&mut self, decimated: &[i16]) {
        let space = BUFFER_LEN.saturating_sub(self.kin);
        let n = decimated.len().min(space);
        self.samples[self.kin..self.kin + n].copy_from_slice(&decimated[..n]);
        self.kin += n;
    }

    pub fn reset(&mut self) {
        self.samples.fill(0);
        self.kin = 0;
    }

    pub fn written(&self) -> usize {
        self.kin
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_advances_write_cursor() {
        let mut buf = RingBuffer::new(15);
        buf.push(&[1, 2, 3]);
        buf.push(&[4, 5]);
        assert_eq!(buf.written(), 5);
        assert_eq!(&buf.as_slice()[..5], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn push_past_capacity_is_clamped_not_wrapped() {
        let mut buf = RingBuffer::new(15);
        buf.push(&vec![7i16; BUFFER_LEN + 100]);
        assert_eq!(buf.written(), BUFFER_LEN);
    }

    #[test]
    fn clock_decrease_resets_write_cursor() {
        let mut buf = RingBuffer::new(15);
        buf.observe_clock(5_000); // second 5
        buf.push(&[9, 9, 9]);
        assert_eq!(buf.written(), 3);

        buf.observe_clock(3_000); // second 3: decreased, rolled over to new period
        assert_eq!(buf.written(), 0);
    }

    #[test]
    fn monotonic_clock_does_not_reset() {
        let mut buf = RingBuffer::new(15);
        buf.observe_clock(1_000);
        buf.push(&[1, 2]);
        buf.observe_clock(2_000);
        assert_eq!(buf.written(), 2);
    }

    #[test]
    fn reset_position_rotates_samples_forward_by_the_positive_delta() {
        let mut buf = RingBuffer::new(15);
        buf.push(&[1, 2, 3]);
        assert_eq!(buf.kin, 3);

        buf.reset_position(5_000); // second 5 -> kin = 5 * 12000
        let expected_kin = 5 * SAMPLE_RATE;
        assert_eq!(buf.kin, expected_kin);
        let delta = expected_kin - 3;
        assert_eq!(&buf.samples[delta..delta + 3], &[1, 2, 3]);
    }

    #[test]
    fn reset_position_rotates_samples_back_by_the_negative_delta() {
        let mut buf = RingBuffer::new(15);
        buf.reset_position(9_000); // kin = 9 * 12000
        buf.push(&[7, 8, 9]);
        let before_kin = buf.kin;

        buf.reset_position(2_000); // kin = 2 * 12000, delta negative
        assert_eq!(buf.kin, 2 * SAMPLE_RATE);
        let shift = before_kin - buf.kin;
        assert_eq!(&buf.samples[before_kin - 3 - shift..before_kin - shift], &[7, 8, 9]);
    }
}
