//! Drag classification.
//!
//! A drag moves through `Idle -> Pending -> Dragging(axis) -> Settling -> Idle`.
//! The axis is locked the moment the pointer leaves the slop radius; on
//! release the gesture either commits to one [`GestureAction`] or reverts.
//! Either way the visual offset springs back to rest.

use super::Spring;
use crate::config::GestureConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    /// Pointer down, not yet past the slop radius.
    Pending,
    Dragging(Axis),
    /// Released; the offset is springing back.
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Next,
    Previous,
    OpenSidebar,
    CloseSidebar,
}

/// Cumulative displacement since the drag began and the current velocity.
/// Distances in points, velocities in points per millisecond.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSample {
    pub dx: f32,
    pub dy: f32,
    pub vx: f32,
    pub vy: f32,
}

impl DragSample {
    pub fn new(dx: f32, dy: f32, vx: f32, vy: f32) -> Self {
        Self { dx, dy, vx, vy }
    }

    pub fn dominant_axis(&self) -> Axis {
        if self.dx.abs() > self.dy.abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

/// Decide what a released drag along `axis` does.
///
/// Horizontal drags are symmetric: a closed sidebar opens past `+threshold`,
/// an open one closes past `-threshold`, anything short of that leaves it as
/// it was.
pub fn classify_release(
    axis: Axis,
    sample: &DragSample,
    sidebar_open: bool,
    config: &GestureConfig,
) -> Option<GestureAction> {
    let distance = config.distance_threshold;
    let velocity = config.velocity_threshold;

    match axis {
        Axis::Horizontal => {
            if !sidebar_open && (sample.dx > distance || sample.vx > velocity) {
                Some(GestureAction::OpenSidebar)
            } else if sidebar_open && (sample.dx < -distance || sample.vx < -velocity) {
                Some(GestureAction::CloseSidebar)
            } else {
                None
            }
        }
        Axis::Vertical => {
            if sample.dy.abs() <= distance && sample.vy.abs() <= velocity {
                return None;
            }
            let upward = if sample.dy != 0.0 {
                sample.dy < 0.0
            } else {
                sample.vy < 0.0
            };
            Some(if upward {
                GestureAction::Next
            } else {
                GestureAction::Previous
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct GestureBridge {
    config: GestureConfig,
    phase: DragPhase,
    offset_x: Spring,
    offset_y: Spring,
}

impl GestureBridge {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: DragPhase::Idle,
            offset_x: Spring::default(),
            offset_y: Spring::default(),
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Current visual offset of the media layer.
    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x.value, self.offset_y.value)
    }

    pub fn is_animating(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    pub fn begin(&mut self) {
        self.phase = DragPhase::Pending;
    }

    pub fn update(&mut self, sample: DragSample, sidebar_open: bool) {
        if self.phase == DragPhase::Idle || self.phase == DragPhase::Settling {
            self.begin();
        }

        if self.phase == DragPhase::Pending {
            let slop = self.config.slop;
            if sample.dx.abs() > slop || sample.dy.abs() > slop {
                let axis = sample.dominant_axis();
                log::trace!("Drag locked to {:?}", axis);
                self.phase = DragPhase::Dragging(axis);
            }
        }

        match self.phase {
            DragPhase::Dragging(Axis::Horizontal) => {
                let width = self.config.sidebar_width;
                let dx = if sidebar_open {
                    sample.dx.clamp(-width, 0.0)
                } else {
                    sample.dx.clamp(0.0, width)
                };
                self.offset_x.set(dx);
            }
            DragPhase::Dragging(Axis::Vertical) => self.offset_y.set(sample.dy),
            _ => {}
        }
    }

    /// Finish the drag. Returns the action to dispatch, if the gesture
    /// committed to one.
    pub fn release(&mut self, sample: DragSample, sidebar_open: bool) -> Option<GestureAction> {
        let action = match self.phase {
            DragPhase::Dragging(axis) => classify_release(axis, &sample, sidebar_open, &self.config),
            // Never left the slop radius: a tap, not a swipe.
            _ => None,
        };

        // Only the locked axis carries the fling; the other never moved.
        let (vx, vy) = match self.phase {
            DragPhase::Dragging(Axis::Horizontal) => (sample.vx * 1000.0, 0.0),
            DragPhase::Dragging(Axis::Vertical) => (0.0, sample.vy * 1000.0),
            _ => (0.0, 0.0),
        };
        self.offset_x.release_to(0.0, vx);
        self.offset_y.release_to(0.0, vy);
        self.phase = DragPhase::Settling;

        if let Some(action) = action {
            log::debug!("Gesture committed: {:?}", action);
        }
        action
    }

    /// Advance the return animation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if self.phase != DragPhase::Settling {
            return;
        }
        let moving_x = self.offset_x.step(dt);
        let moving_y = self.offset_y.step(dt);
        if !moving_x && !moving_y {
            self.phase = DragPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge() -> GestureBridge {
        GestureBridge::new(GestureConfig::default())
    }

    fn settle(bridge: &mut GestureBridge) {
        for _ in 0..600 {
            bridge.step(1.0 / 60.0);
            if bridge.phase() == DragPhase::Idle {
                return;
            }
        }
        panic!("offset never settled");
    }

    #[test]
    fn test_horizontal_distance_opens_sidebar() {
        let mut bridge = bridge();
        let sample = DragSample::new(80.0, 5.0, 0.2, 0.0);

        bridge.begin();
        bridge.update(sample, false);
        assert_eq!(bridge.phase(), DragPhase::Dragging(Axis::Horizontal));
        assert_eq!(bridge.release(sample, false), Some(GestureAction::OpenSidebar));
    }

    #[test]
    fn test_horizontal_velocity_opens_sidebar() {
        let config = GestureConfig::default();
        let sample = DragSample::new(20.0, 0.0, 0.8, 0.0);
        assert_eq!(
            classify_release(Axis::Horizontal, &sample, false, &config),
            Some(GestureAction::OpenSidebar)
        );
    }

    #[test]
    fn test_short_horizontal_drag_keeps_sidebar_state() {
        let config = GestureConfig::default();
        let sample = DragSample::new(30.0, 0.0, 0.1, 0.0);
        assert_eq!(classify_release(Axis::Horizontal, &sample, false, &config), None);

        let back = DragSample::new(-30.0, 0.0, -0.1, 0.0);
        assert_eq!(classify_release(Axis::Horizontal, &back, true, &config), None);
    }

    #[test]
    fn test_horizontal_close_is_symmetric() {
        let config = GestureConfig::default();
        let by_distance = DragSample::new(-80.0, 0.0, -0.2, 0.0);
        let by_velocity = DragSample::new(-20.0, 0.0, -0.8, 0.0);
        assert_eq!(
            classify_release(Axis::Horizontal, &by_distance, true, &config),
            Some(GestureAction::CloseSidebar)
        );
        assert_eq!(
            classify_release(Axis::Horizontal, &by_velocity, true, &config),
            Some(GestureAction::CloseSidebar)
        );
        // Dragging the wrong way does nothing.
        assert_eq!(classify_release(Axis::Horizontal, &by_distance, false, &config), None);
    }

    #[test]
    fn test_vertical_up_fires_next_once_and_springs_back() {
        let mut bridge = bridge();
        let sample = DragSample::new(0.0, -60.0, 0.0, -0.1);

        bridge.begin();
        bridge.update(sample, false);
        assert_eq!(bridge.offset(), (0.0, -60.0));

        assert_eq!(bridge.release(sample, false), Some(GestureAction::Next));
        assert_eq!(bridge.phase(), DragPhase::Settling);

        settle(&mut bridge);
        assert_eq!(bridge.offset(), (0.0, 0.0));
        // Stepping further never fires anything again.
        bridge.step(1.0);
        assert_eq!(bridge.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_vertical_down_fires_previous() {
        let config = GestureConfig::default();
        let sample = DragSample::new(0.0, 70.0, 0.0, 0.0);
        assert_eq!(
            classify_release(Axis::Vertical, &sample, false, &config),
            Some(GestureAction::Previous)
        );
    }

    #[test]
    fn test_fast_flick_uses_velocity() {
        let config = GestureConfig::default();
        let flick = DragSample::new(0.0, -20.0, 0.0, -0.9);
        assert_eq!(classify_release(Axis::Vertical, &flick, false, &config), Some(GestureAction::Next));

        let zero_dy = DragSample::new(0.0, 0.0, 0.0, 0.9);
        assert_eq!(classify_release(Axis::Vertical, &zero_dy, false, &config), Some(GestureAction::Previous));
    }

    #[test]
    fn test_small_vertical_drag_reverts() {
        let mut bridge = bridge();
        let sample = DragSample::new(0.0, 30.0, 0.0, 0.1);

        bridge.begin();
        bridge.update(sample, false);
        assert_eq!(bridge.release(sample, false), None);

        settle(&mut bridge);
        assert_eq!(bridge.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_axis_is_locked_after_slop() {
        let mut bridge = bridge();
        bridge.begin();
        bridge.update(DragSample::new(2.0, -15.0, 0.0, 0.0), false);
        assert_eq!(bridge.phase(), DragPhase::Dragging(Axis::Vertical));

        // Later horizontal movement does not switch the axis.
        let sample = DragSample::new(120.0, -20.0, 0.6, 0.0);
        bridge.update(sample, false);
        assert_eq!(bridge.phase(), DragPhase::Dragging(Axis::Vertical));
        assert_eq!(bridge.release(sample, false), None);
    }

    #[test]
    fn test_tap_inside_slop_is_not_a_swipe() {
        let mut bridge = bridge();
        let sample = DragSample::new(3.0, 4.0, 0.9, 0.9);
        bridge.begin();
        bridge.update(sample, false);
        assert_eq!(bridge.phase(), DragPhase::Pending);
        assert_eq!(bridge.release(sample, false), None);
    }

    #[test]
    fn test_horizontal_offset_is_clamped() {
        let mut bridge = bridge();
        bridge.begin();
        bridge.update(DragSample::new(500.0, 0.0, 0.0, 0.0), false);
        assert_eq!(bridge.offset().0, 200.0);

        let mut open = GestureBridge::new(GestureConfig::default());
        open.begin();
        open.update(DragSample::new(60.0, 0.0, 0.0, 0.0), true);
        assert_eq!(open.offset().0, 0.0);
    }

    #[test]
    fn test_release_fling_stays_on_locked_axis() {
        let mut bridge = bridge();
        bridge.begin();
        bridge.update(DragSample::new(0.0, -30.0, 0.0, 0.0), false);

        // Diagonal flick on a vertical drag: the horizontal offset stays at rest.
        bridge.release(DragSample::new(40.0, -30.0, 2.0, -0.2), false);
        for _ in 0..30 {
            bridge.step(1.0 / 60.0);
            assert_eq!(bridge.offset().0, 0.0);
        }
        settle(&mut bridge);
        assert_eq!(bridge.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_release_inside_slop_adds_no_motion() {
        let mut bridge = bridge();
        bridge.begin();
        bridge.update(DragSample::new(3.0, 3.0, 0.0, 0.0), false);
        bridge.release(DragSample::new(3.0, 3.0, 1.5, 1.5), false);

        bridge.step(1.0 / 60.0);
        assert_eq!(bridge.offset(), (0.0, 0.0));
    }
}
