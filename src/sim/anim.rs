/// What an animation does after its last frame has been shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Finish and report done.
    Stop,
    /// Wrap back to the first frame.
    Loop,
}

/// Frame sequence advanced once per scheduler tick.
///
/// Animations carry no timer of their own; whoever owns one calls
/// [`tick`](Self::tick) from the fixed-rate loop, so dropping the value is a
/// complete cancel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<u16>,
    current_frame: usize,
    ticks_remaining: u32,
    ticks_per_frame: u32,
    on_complete: Completion,
}

impl Animation {
    /// `None` for an empty frame list.
    pub fn new(frames: Vec<u16>, ticks_per_frame: u32, on_complete: Completion) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        let ticks_per_frame = ticks_per_frame.max(1);
        Some(Self {
            frames,
            current_frame: 0,
            ticks_remaining: ticks_per_frame,
            ticks_per_frame,
            on_complete,
        })
    }

    /// Frame index to draw this tick.
    #[inline]
    pub fn frame(&self) -> u16 {
        self.frames[self.current_frame]
    }

    /// Advance by one tick.  Returns `true` once a `Stop` animation has
    /// shown its last frame for the full duration.
    pub fn tick(&mut self) -> bool {
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        if self.ticks_remaining > 0 {
            return false;
        }
        self.ticks_remaining = self.ticks_per_frame;
        if self.current_frame + 1 < self.frames.len() {
            self.current_frame += 1;
            return false;
        }
        match self.on_complete {
            Completion::Loop => {
                self.current_frame = 0;
                false
            }
            Completion::Stop => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_is_rejected() {
        assert!(Animation::new(vec![], 1, Completion::Stop).is_none());
    }

    #[test]
    fn stop_runs_every_frame_once() {
        let mut a = Animation::new(vec![1, 2, 0], 2, Completion::Stop).unwrap();
        let mut seen = vec![a.frame()];
        let mut done = false;
        for _ in 0..6 {
            done = a.tick();
            seen.push(a.frame());
        }
        assert!(done);
        assert_eq!(seen, vec![1, 1, 2, 2, 0, 0, 0]);
    }

    #[test]
    fn loop_wraps_around() {
        let mut a = Animation::new(vec![5, 6], 1, Completion::Loop).unwrap();
        assert!(!a.tick());
        assert_eq!(a.frame(), 6);
        assert!(!a.tick());
        assert_eq!(a.frame(), 5);
    }
}
