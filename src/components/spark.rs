use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Speed lost per frame.
const SPARK_DECAY: f32 = 0.1;

/// A short-lived streak that flies straight and shrinks as it slows.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    /// Direction of travel in radians.
    pub angle: f32,
    pub speed: f32,
}

impl Spark {
    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self { pos, angle, speed }
    }

    /// Advance one frame. Returns `false` once the spark has died out.
    pub fn update(&mut self) -> bool {
        self.pos += Vec2::from_angle(self.angle) * self.speed;
        self.speed = (self.speed - SPARK_DECAY).max(0.0);
        self.speed > 0.0
    }

    /// Diamond outline stretched along the direction of travel.
    pub fn polygon(&self, offset: Vec2) -> [Vec2; 4] {
        let point = |angle: f32, length: f32| {
            self.pos + Vec2::from_angle(angle) * self.speed * length - offset
        };
        let half_turn = std::f32::consts::FRAC_PI_2;
        [
            point(self.angle, 3.0),
            point(self.angle + half_turn, 0.5),
            point(self.angle + std::f32::consts::PI, 3.0),
            point(self.angle - half_turn, 0.5),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_and_decays_until_dead() {
        let mut spark = Spark::new(Vec2::ZERO, 0.0, 0.35);
        assert!(spark.update());
        assert!((spark.pos.x - 0.35).abs() < 1e-6);
        assert!(spark.update());
        assert!(spark.update());
        assert!(!spark.update());
        assert_eq!(spark.speed, 0.0);
    }

    #[test]
    fn test_polygon_tips() {
        let spark = Spark::new(Vec2::new(10.0, 10.0), 0.0, 2.0);
        let points = spark.polygon(Vec2::new(10.0, 0.0));
        assert!((points[0] - Vec2::new(6.0, 10.0)).length() < 1e-5);
        assert!((points[1] - Vec2::new(0.0, 11.0)).length() < 1e-5);
        assert!((points[2] - Vec2::new(-6.0, 10.0)).length() < 1e-5);
    }
}
