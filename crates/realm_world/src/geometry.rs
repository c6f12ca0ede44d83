use serde::{Deserialize, Serialize};

/// Position in world units. `y` is up; the ground plane is `x`/`z`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    pub const ORIGIN: WorldPos = WorldPos {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

pub const DEFAULT_PROXIMITY_RADIUS: f64 = 5.0;

pub fn space_distance(a: WorldPos, b: WorldPos) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    ((dx * dx) + (dy * dy) + (dz * dz)).sqrt()
}

/// Proximity gate: inclusive at the boundary, full 3D distance.
pub fn within_range(a: WorldPos, b: WorldPos, radius: f64) -> bool {
    space_distance(a, b) <= radius
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide.
pub fn direction_towards(from: WorldPos, to: WorldPos) -> Option<(f64, f64, f64)> {
    let distance = space_distance(from, to);
    if distance <= f64::EPSILON {
        return None;
    }
    Some((
        (to.x - from.x) / distance,
        (to.y - from.y) / distance,
        (to.z - from.z) / distance,
    ))
}

/// Yaw (radians about +y) that faces `to` from `from`, ignoring height.
pub fn yaw_towards(from: WorldPos, to: WorldPos) -> Option<f64> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx.abs() <= f64::EPSILON && dz.abs() <= f64::EPSILON {
        return None;
    }
    Some(dx.atan2(dz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_range_is_inclusive_at_boundary() {
        let origin = WorldPos::ORIGIN;
        assert!(within_range(origin, WorldPos::new(5.0, 0.0, 0.0), 5.0));
        assert!(!within_range(origin, WorldPos::new(5.0001, 0.0, 0.0), 5.0));
        assert!(within_range(origin, WorldPos::new(3.0, 0.0, 4.0), 5.0));
    }

    #[test]
    fn within_range_uses_height() {
        let origin = WorldPos::ORIGIN;
        assert!(!within_range(origin, WorldPos::new(3.0, 3.0, 3.0), 5.0));
    }

    #[test]
    fn within_range_is_symmetric() {
        let samples = [
            (WorldPos::new(1.0, 0.0, 2.0), WorldPos::new(-3.0, 0.0, 4.5)),
            (WorldPos::new(-7.25, 0.0, 0.0), WorldPos::new(-2.25, 0.0, 0.0)),
            (WorldPos::new(0.1, 0.2, 0.3), WorldPos::new(9.0, -1.0, 2.0)),
        ];
        for (a, b) in samples {
            for radius in [0.0, 1.0, 5.0, 5.0001, 12.0] {
                assert_eq!(within_range(a, b, radius), within_range(b, a, radius));
            }
        }
    }

    #[test]
    fn yaw_faces_along_z_and_x() {
        let origin = WorldPos::ORIGIN;
        let forward = yaw_towards(origin, WorldPos::new(0.0, 0.0, 4.0)).unwrap();
        let right = yaw_towards(origin, WorldPos::new(4.0, 9.0, 0.0)).unwrap();
        assert!(forward.abs() < 1e-12);
        assert!((right - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(yaw_towards(origin, WorldPos::new(0.0, 3.0, 0.0)).is_none());
    }

    #[test]
    fn direction_is_unit_length() {
        let (x, y, z) =
            direction_towards(WorldPos::ORIGIN, WorldPos::new(3.0, 0.0, 4.0)).unwrap();
        assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-12);
        assert!(direction_towards(WorldPos::ORIGIN, WorldPos::ORIGIN).is_none());
    }
}
