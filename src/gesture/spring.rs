/// A damped spring pulling a value back to its rest position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
    stiffness: f32,
    damping: f32,
}

const MAX_STEP: f32 = 1.0 / 120.0;
const REST_DISTANCE: f32 = 0.5;
const REST_VELOCITY: f32 = 2.0;

impl Spring {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
            stiffness,
            damping,
        }
    }

    /// Jump to `value` with no motion, e.g. while a finger drives it.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
    }

    /// Start returning to `target`, keeping the current velocity.
    pub fn release_to(&mut self, target: f32, velocity: f32) {
        self.target = target;
        self.velocity = velocity;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_DISTANCE && self.velocity.abs() < REST_VELOCITY
    }

    /// Advance by `dt` seconds. Returns true while still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        let mut remaining = dt.max(0.0);
        while remaining > 0.0 && !self.is_settled() {
            let h = remaining.min(MAX_STEP);
            let accel = -self.stiffness * (self.value - self.target) - self.damping * self.velocity;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            false
        } else {
            true
        }
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::new(180.0, 24.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_returns_to_rest() {
        let mut spring = Spring::default();
        spring.set(-60.0);
        spring.release_to(0.0, 0.0);

        let mut frames = 0;
        while spring.step(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 600, "spring never settled");
        }
        assert_eq!(spring.value, 0.0);
        assert_eq!(spring.velocity, 0.0);
    }

    #[test]
    fn test_spring_moves_toward_target() {
        let mut spring = Spring::default();
        spring.set(100.0);
        spring.release_to(0.0, 0.0);

        spring.step(0.05);
        assert!(spring.value < 100.0);
        assert!(spring.value > 0.0);
    }

    #[test]
    fn test_settled_spring_stays_put() {
        let mut spring = Spring::default();
        assert!(!spring.step(1.0));
        assert_eq!(spring.value, 0.0);
    }
}
