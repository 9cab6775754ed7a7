//! Oscilloscope tap on the output bus.
//!
//! The render loop pushes every post-filter sample into a fixed ring
//! buffer; a display thread pulls snapshots whenever it wants to draw a
//! frame. The tap never affects the audio and never blocks the writer.

/// Number of samples a [`ScopeTap`] retains.
pub const SCOPE_SIZE: usize = 2048;

/// Fixed-size ring buffer over the most recent output samples.
///
/// Writes overwrite the oldest sample once the buffer has wrapped;
/// [`snapshot`](ScopeTap::snapshot) copies the window out oldest-first.
/// Before [`SCOPE_SIZE`] samples have been pushed the unwritten tail
/// reads as silence.
#[derive(Debug, Clone)]
pub struct ScopeTap {
    buffer: [f32; SCOPE_SIZE],
    write_pos: usize,
}

impl ScopeTap {
    /// Create an empty tap (all silence).
    pub fn new() -> Self {
        Self {
            buffer: [0.0; SCOPE_SIZE],
            write_pos: 0,
        }
    }

    /// Record one output sample, evicting the oldest.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % SCOPE_SIZE;
    }

    /// Copy the retained window into `out`, oldest sample first.
    ///
    /// `out` shorter than [`SCOPE_SIZE`] receives the most recent
    /// `out.len()` samples; longer gets the extra tail zeroed.
    pub fn snapshot(&self, out: &mut [f32]) {
        let n = out.len().min(SCOPE_SIZE);
        // Oldest-first: start n samples behind the write cursor.
        let start = (self.write_pos + SCOPE_SIZE - n) % SCOPE_SIZE;
        for (i, slot) in out.iter_mut().take(n).enumerate() {
            *slot = self.buffer[(start + i) % SCOPE_SIZE];
        }
        for slot in out.iter_mut().skip(n) {
            *slot = 0.0;
        }
    }

    /// Reset the tap to silence.
    pub fn clear(&mut self) {
        self.buffer = [0.0; SCOPE_SIZE];
        self.write_pos = 0;
    }
}

impl Default for ScopeTap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tap_reads_silence() {
        let tap = ScopeTap::new();
        let mut out = [1.0f32; SCOPE_SIZE];
        tap.snapshot(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn snapshot_is_oldest_first() {
        let mut tap = ScopeTap::new();
        for i in 0..SCOPE_SIZE {
            tap.push(i as f32);
        }
        let mut out = [0.0f32; SCOPE_SIZE];
        tap.snapshot(&mut out);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[SCOPE_SIZE - 1], (SCOPE_SIZE - 1) as f32);
    }

    #[test]
    fn wraparound_evicts_oldest() {
        let mut tap = ScopeTap::new();
        // Push one full window plus 10 extra samples.
        for i in 0..(SCOPE_SIZE + 10) {
            tap.push(i as f32);
        }
        let mut out = [0.0f32; SCOPE_SIZE];
        tap.snapshot(&mut out);
        assert_eq!(out[0], 10.0, "the 10 oldest samples must be gone");
        assert_eq!(out[SCOPE_SIZE - 1], (SCOPE_SIZE + 9) as f32);
    }

    #[test]
    fn short_snapshot_gets_most_recent() {
        let mut tap = ScopeTap::new();
        for i in 0..SCOPE_SIZE {
            tap.push(i as f32);
        }
        let mut out = [0.0f32; 4];
        tap.snapshot(&mut out);
        assert_eq!(
            out,
            [
                (SCOPE_SIZE - 4) as f32,
                (SCOPE_SIZE - 3) as f32,
                (SCOPE_SIZE - 2) as f32,
                (SCOPE_SIZE - 1) as f32
            ]
        );
    }

    #[test]
    fn long_snapshot_zero_pads_tail() {
        let mut tap = ScopeTap::new();
        for _ in 0..SCOPE_SIZE {
            tap.push(0.5);
        }
        let mut out = [1.0f32; SCOPE_SIZE + 8];
        tap.snapshot(&mut out);
        assert!(out[..SCOPE_SIZE].iter().all(|&s| s == 0.5));
        assert!(out[SCOPE_SIZE..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn clear_resets_to_silence() {
        let mut tap = ScopeTap::new();
        for _ in 0..100 {
            tap.push(0.9);
        }
        tap.clear();
        let mut out = [1.0f32; 16];
        tap.snapshot(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
