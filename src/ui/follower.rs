use crate::store::types::Position;

pub const DEFAULT_SMOOTHING: f64 = 0.1;

/// Eases the displayed tool-head position toward the latest telemetry target.
///
/// The streams move the head in discrete jumps; renderers call [`step`](Self::step)
/// once per frame and draw the returned position instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolHeadFollower {
    current: Position,
    factor: f64,
}

impl Default for ToolHeadFollower {
    fn default() -> Self {
        Self::new(Position::rest(), DEFAULT_SMOOTHING)
    }
}

impl ToolHeadFollower {
    /// `factor` is clamped to [0, 1]; 1 snaps straight to the target.
    pub fn new(start: Position, factor: f64) -> Self {
        Self {
            current: start,
            factor: factor.clamp(0.0, 1.0),
        }
    }

    pub fn position(&self) -> Position {
        self.current
    }

    pub fn step(&mut self, target: Position) -> Position {
        let k = self.factor;
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        self.current = Position {
            x: lerp(self.current.x, target.x),
            y: lerp(self.current.y, target.y),
            z: lerp(self.current.z, target.z),
        };
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_on_target() {
        let mut f = ToolHeadFollower::default();
        let target = Position::new(1.0, 1.5, -2.0);
        let first = f.step(target);
        assert!((first.x - 0.1).abs() < 1e-12);
        assert!((first.y - 1.95).abs() < 1e-12);
        for _ in 0..200 {
            f.step(target);
        }
        let p = f.position();
        assert!((p.x - target.x).abs() < 1e-6);
        assert!((p.y - target.y).abs() < 1e-6);
        assert!((p.z - target.z).abs() < 1e-6);
    }

    #[test]
    fn factor_one_snaps() {
        let mut f = ToolHeadFollower::new(Position::rest(), 4.0);
        let target = Position::new(-1.0, 3.0, 0.5);
        assert_eq!(f.step(target), target);
    }
}
