use std::collections::VecDeque;

/// Fixed-depth queue of outstanding GPU submissions.
///
/// With a depth of 1 every frame is waited on before `render_frame` returns, which is
/// the fully synchronous present cycle. A depth of N lets up to N - 1 frames stay
/// outstanding between calls; the oldest is waited on once the queue is full.
#[derive(Debug)]
pub struct FramePacer<T> {
    depth: usize,
    in_flight: VecDeque<T>,
}

impl<T> FramePacer<T> {
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            depth,
            in_flight: VecDeque::with_capacity(depth),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn push(&mut self, submission: T) -> Option<T> {
        self.in_flight.push_back(submission);
        if self.in_flight.len() >= self.depth {
            self.in_flight.pop_front()
        } else {
            None
        }
    }

    /// Waiting on the newest submission also covers the older ones on the same queue.
    pub fn drain(&mut self) -> Option<T> {
        let newest = self.in_flight.pop_back();
        self.in_flight.clear();
        newest
    }
}
