use std::time::{Duration, Instant};

/// What a tap on the media area does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    CloseSidebar,
    ShowControls,
    HideControls,
}

pub fn tap_action(sidebar_open: bool, controls_visible: bool) -> TapAction {
    if sidebar_open {
        TapAction::CloseSidebar
    } else if controls_visible {
        TapAction::HideControls
    } else {
        TapAction::ShowControls
    }
}

/// Auto-hides the controls overlay.
///
/// The countdown restarts whenever visibility, playback or the sidebar
/// changes. When it runs out the overlay hides, but only if media is playing
/// and the sidebar is closed at that moment.
#[derive(Debug, Clone)]
pub struct ControlsTimer {
    visible: bool,
    hide_after: Duration,
    deadline: Option<Instant>,
    last_inputs: Option<(bool, bool, bool)>,
}

impl ControlsTimer {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            visible: true,
            hide_after,
            deadline: None,
            last_inputs: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Re-arm on input changes and hide once the deadline passes.
    /// Returns true when this call hid the overlay.
    pub fn update(&mut self, now: Instant, is_playing: bool, sidebar_open: bool) -> bool {
        let inputs = (self.visible, is_playing, sidebar_open);
        if self.last_inputs != Some(inputs) {
            self.last_inputs = Some(inputs);
            self.deadline = Some(now + self.hide_after);
        }

        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.visible && is_playing && !sidebar_open {
                    self.visible = false;
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Time left before the pending deadline, for scheduling a repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIDE: Duration = Duration::from_secs(3);

    #[test]
    fn test_hides_after_delay_while_playing() {
        let start = Instant::now();
        let mut timer = ControlsTimer::new(HIDE);

        assert!(!timer.update(start, true, false));
        assert!(timer.is_visible());
        assert!(!timer.update(start + Duration::from_secs(2), true, false));
        assert!(timer.is_visible());
        assert!(timer.update(start + Duration::from_secs(3), true, false));
        assert!(!timer.is_visible());
    }

    #[test]
    fn test_stays_visible_while_paused() {
        let start = Instant::now();
        let mut timer = ControlsTimer::new(HIDE);

        timer.update(start, false, false);
        assert!(!timer.update(start + Duration::from_secs(10), false, false));
        assert!(timer.is_visible());
    }

    #[test]
    fn test_stays_visible_with_sidebar_open() {
        let start = Instant::now();
        let mut timer = ControlsTimer::new(HIDE);

        timer.update(start, true, true);
        timer.update(start + Duration::from_secs(5), true, true);
        assert!(timer.is_visible());
    }

    #[test]
    fn test_state_change_rearms_countdown() {
        let start = Instant::now();
        let mut timer = ControlsTimer::new(HIDE);

        timer.update(start, false, false);
        // Playback starts two seconds in: the countdown restarts from there.
        timer.update(start + Duration::from_secs(2), true, false);
        assert!(!timer.update(start + Duration::from_secs(4), true, false));
        assert!(timer.is_visible());
        assert!(timer.update(start + Duration::from_secs(5), true, false));
    }

    #[test]
    fn test_remaining() {
        let start = Instant::now();
        let mut timer = ControlsTimer::new(HIDE);
        assert_eq!(timer.remaining(start), None);

        timer.update(start, true, false);
        assert_eq!(timer.remaining(start + Duration::from_secs(1)), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_tap_action() {
        assert_eq!(tap_action(true, true), TapAction::CloseSidebar);
        assert_eq!(tap_action(true, false), TapAction::CloseSidebar);
        assert_eq!(tap_action(false, true), TapAction::HideControls);
        assert_eq!(tap_action(false, false), TapAction::ShowControls);
    }
}
