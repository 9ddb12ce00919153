/// Call-outs to whatever plays sound.  The core owns no audio state.
pub trait AudioHooks {
    fn play_theme(&mut self);
    fn trigger_shot(&mut self);
}

/// Silent back end for headless runs and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioHooks for NullAudio {
    fn play_theme(&mut self) {}
    fn trigger_shot(&mut self) {}
}
