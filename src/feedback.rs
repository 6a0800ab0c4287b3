//! Audio and haptic capability seams
//!
//! The shell never synthesizes sound or buzzes hardware itself; it emits
//! cues through these traits and the host wires in real implementations.
//! Null implementations keep headless hosts and tests trivial.

/// Sound cues the shell and modules can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Catch / shard break / pulse feedback.
    Hit,
    LevelUp,
    Death,
}

/// Host-side audio output.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Host-side vibration output.
pub trait HapticSink {
    fn pulse(&mut self, duration_ms: u32);
}

/// Discards all cues.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Discards all pulses.
#[derive(Debug, Default)]
pub struct NullHaptics;

impl HapticSink for NullHaptics {
    fn pulse(&mut self, _duration_ms: u32) {}
}

#[cfg(test)]
pub(crate) mod recording {
    //! Recording sinks for asserting on emitted cues in tests. The handle
    //! is shared so the test can keep reading after the sink moves into
    //! the shell.

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub cues: Rc<RefCell<Vec<AudioCue>>>,
    }

    impl RecordingAudio {
        pub fn handle(&self) -> Rc<RefCell<Vec<AudioCue>>> {
            Rc::clone(&self.cues)
        }
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) {
            self.cues.borrow_mut().push(cue);
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingHaptics {
        pub pulses: Rc<RefCell<Vec<u32>>>,
    }

    impl RecordingHaptics {
        pub fn handle(&self) -> Rc<RefCell<Vec<u32>>> {
            Rc::clone(&self.pulses)
        }
    }

    impl HapticSink for RecordingHaptics {
        fn pulse(&mut self, duration_ms: u32) {
            self.pulses.borrow_mut().push(duration_ms);
        }
    }
}
