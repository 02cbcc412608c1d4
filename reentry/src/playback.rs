//! Replays a computed profile sample by sample

/// Cursor over a profile that advances in real time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    position: f32,
    pub playing: bool,
    /// Samples per second of wall time; the profile has two samples per simulated second
    pub speed: f32,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            position: 0.0,
            playing: true,
            speed: 60.0,
        }
    }
}

impl Playback {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: speed.max(0.0),
            ..Self::default()
        }
    }

    pub fn restart(&mut self) {
        self.position = 0.0;
        self.playing = true;
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Jump straight to the end of the profile
    pub fn finish(&mut self, len: usize) {
        self.position = len.saturating_sub(1) as f32;
        self.playing = false;
    }

    /// Advance by `dt` seconds; playback stops on the last sample
    pub fn advance(&mut self, dt: f32, len: usize) {
        if !self.playing || len == 0 {
            return;
        }
        let last = (len - 1) as f32;
        self.position = (self.position + dt * self.speed).min(last);
        if self.position >= last {
            self.playing = false;
        }
    }

    pub fn seek(&mut self, index: usize, len: usize) {
        self.position = index.min(len.saturating_sub(1)) as f32;
    }

    /// Index of the sample currently shown, if the profile is non-empty
    pub fn index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| (self.position as usize).min(len - 1))
    }

    pub fn is_finished(&self, len: usize) -> bool {
        self.index(len).map_or(true, |i| i + 1 == len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_and_stops_at_end() {
        let mut playback = Playback::new(10.0);
        playback.advance(0.25, 100);
        assert_eq!(playback.index(100), Some(2));

        playback.advance(100.0, 100);
        assert_eq!(playback.index(100), Some(99));
        assert!(!playback.playing);
        assert!(playback.is_finished(100));
    }

    #[test]
    fn paused_playback_holds_position() {
        let mut playback = Playback::new(10.0);
        playback.toggle();
        playback.advance(1.0, 50);
        assert_eq!(playback.index(50), Some(0));
    }

    #[test]
    fn empty_profile_has_no_index() {
        let mut playback = Playback::default();
        playback.advance(1.0, 0);
        assert_eq!(playback.index(0), None);
        assert!(playback.is_finished(0));
    }

    #[test]
    fn seek_clamps_to_profile() {
        let mut playback = Playback::default();
        playback.seek(500, 10);
        assert_eq!(playback.index(10), Some(9));
        playback.restart();
        assert_eq!(playback.index(10), Some(0));
        assert!(playback.playing);
    }
}
