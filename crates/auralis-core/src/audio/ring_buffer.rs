// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounded stereo FIFO bridging the audio producer and the frame loop.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Interleaved channel count of every frame stored in the buffer.
pub const CHANNELS: usize = 2;

/// A bounded FIFO of interleaved stereo `f32` samples.
///
/// One producer (the audio delivery callback) and one consumer (the frame
/// loop) share it through a single buffer-wide lock. Neither side blocks
/// beyond that critical section.
///
/// The queue always holds whole frames, so its sample length is even. When an
/// enqueue would overflow, the oldest frames are evicted first.
#[derive(Debug)]
pub struct AudioRingBuffer {
    capacity_frames: usize,
    samples: Mutex<VecDeque<f32>>,
}

impl AudioRingBuffer {
    /// Two seconds at 48 kHz.
    pub const DEFAULT_CAPACITY_FRAMES: usize = 48_000 * 2;

    /// Creates an empty buffer holding at most `capacity_frames` stereo frames.
    pub fn new(capacity_frames: usize) -> Self {
        Self {
            capacity_frames,
            samples: Mutex::new(VecDeque::with_capacity(capacity_frames * CHANNELS)),
        }
    }

    /// Appends up to `frame_count` frames from `samples`.
    ///
    /// The frame count is capped by what `samples` actually holds. Empty or
    /// zero-frame input is ignored.
    ///
    /// ## Returns
    /// The number of frames accepted before eviction.
    pub fn enqueue(&self, samples: &[f32], frame_count: usize) -> usize {
        let frames = frame_count.min(samples.len() / CHANNELS);
        if frames == 0 || self.capacity_frames == 0 {
            return 0;
        }

        let mut incoming = &samples[..frames * CHANNELS];
        let mut queue = self.lock();

        if frames >= self.capacity_frames {
            // The newest `capacity` frames of this push replace everything.
            queue.clear();
            incoming = &incoming[(frames - self.capacity_frames) * CHANNELS..];
        } else {
            let stored = queue.len() / CHANNELS;
            let overflow = (stored + frames).saturating_sub(self.capacity_frames);
            if overflow > 0 {
                queue.drain(..overflow * CHANNELS);
                log::trace!("Audio ring buffer evicted {overflow} frames.");
            }
        }

        queue.extend(incoming.iter().copied());
        frames
    }

    /// Pops up to `max_frames` of the oldest frames into `out`.
    ///
    /// Never blocks on data: returns fewer frames (possibly zero) when the
    /// queue or `out` is short.
    ///
    /// ## Returns
    /// The number of frames written to the front of `out`.
    pub fn dequeue(&self, out: &mut [f32], max_frames: usize) -> usize {
        let mut queue = self.lock();
        let frames = max_frames
            .min(queue.len() / CHANNELS)
            .min(out.len() / CHANNELS);

        for (slot, sample) in out.iter_mut().zip(queue.drain(..frames * CHANNELS)) {
            *slot = sample;
        }
        frames
    }

    /// Number of frames currently queued.
    pub fn len_frames(&self) -> usize {
        self.lock().len() / CHANNELS
    }

    /// Returns `true` if no frame is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of frames the buffer holds.
    pub fn capacity_frames(&self) -> usize {
        self.capacity_frames
    }

    /// Drops every queued frame.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<f32>> {
        // A producer that panicked mid-push still leaves whole frames behind.
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AudioRingBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn frames(range: std::ops::Range<u32>) -> Vec<f32> {
        range.flat_map(|i| [i as f32, -(i as f32)]).collect()
    }

    #[test]
    fn enqueue_then_dequeue_preserves_order() {
        let ring = AudioRingBuffer::new(16);
        assert_eq!(ring.enqueue(&frames(0..4), 4), 4);

        let mut out = [0.0; 8];
        assert_eq!(ring.dequeue(&mut out, 4), 4);
        assert_eq!(out.to_vec(), frames(0..4));
        assert!(ring.is_empty());
    }

    #[test]
    fn overflow_evicts_oldest_whole_frames() {
        let ring = AudioRingBuffer::new(4);
        ring.enqueue(&frames(0..3), 3);
        ring.enqueue(&frames(3..6), 3);
        assert_eq!(ring.len_frames(), 4);

        let mut out = [0.0; 8];
        assert_eq!(ring.dequeue(&mut out, 8), 4);
        assert_eq!(out.to_vec(), frames(2..6));
    }

    #[test]
    fn oversized_push_keeps_newest_frames() {
        let ring = AudioRingBuffer::new(3);
        ring.enqueue(&frames(0..2), 2);
        assert_eq!(ring.enqueue(&frames(10..20), 10), 10);
        assert_eq!(ring.len_frames(), 3);

        let mut out = [0.0; 6];
        ring.dequeue(&mut out, 3);
        assert_eq!(out.to_vec(), frames(17..20));
    }

    #[test]
    fn malformed_input_is_ignored() {
        let ring = AudioRingBuffer::new(8);
        assert_eq!(ring.enqueue(&[], 10), 0);
        assert_eq!(ring.enqueue(&[0.5], 1), 0);
        assert_eq!(ring.enqueue(&frames(0..2), 0), 0);
        assert!(ring.is_empty());
    }

    #[test]
    fn frame_count_is_capped_by_slice_length() {
        let ring = AudioRingBuffer::new(8);
        // Five samples hold two whole frames; the stray sample is dropped.
        assert_eq!(ring.enqueue(&[1.0, 2.0, 3.0, 4.0, 5.0], 100), 2);
        assert_eq!(ring.len_frames(), 2);
    }

    #[test]
    fn dequeue_never_exceeds_request_available_or_output() {
        let ring = AudioRingBuffer::new(32);
        ring.enqueue(&frames(0..10), 10);

        let mut out = [0.0; 64];
        assert_eq!(ring.dequeue(&mut out, 3), 3);
        let mut small = [0.0; 4];
        assert_eq!(ring.dequeue(&mut small, 100), 2);
        assert_eq!(ring.dequeue(&mut out, 100), 5);
        assert_eq!(ring.dequeue(&mut out, 100), 0);
    }

    #[test]
    fn mixed_sequence_never_exceeds_capacity() {
        let ring = AudioRingBuffer::new(100);
        let mut out = vec![0.0; 2 * 64];
        for step in 0..500u32 {
            let n = (step * 37 % 90) as usize;
            let push: Vec<f32> = vec![0.25; n * 2];
            ring.enqueue(&push, n);
            assert!(ring.len_frames() <= ring.capacity_frames());

            let want = (step * 13 % 70) as usize;
            let before = ring.len_frames();
            let got = ring.dequeue(&mut out, want);
            assert!(got <= want && got <= before);
        }
    }

    #[test]
    fn producer_and_consumer_threads_share_the_buffer() {
        let ring = Arc::new(AudioRingBuffer::new(512));
        let producer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let chunk = vec![0.1f32; 64 * 2];
                for _ in 0..200 {
                    ring.enqueue(&chunk, 64);
                }
            })
        };

        let mut out = vec![0.0; 128 * 2];
        let mut total = 0;
        for _ in 0..200 {
            total += ring.dequeue(&mut out, 128);
            assert!(ring.len_frames() <= 512);
        }
        producer.join().ok();
        total += ring.dequeue(&mut out, 128);
        assert!(total > 0);
    }
}
