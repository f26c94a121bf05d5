//! Image-space landmarks → scene space.
//!
//! Scene space is right-handed, `+y` up, camera looking down `−z`.

use glam::Vec3;

use hand_gesture::geometry::palm_normal;
use hand_gesture::landmark::{INDEX_MCP, PINKY_MCP};
use hand_gesture::{Hand, Landmark};

/// Distance the blood origin is pushed off the palm along its normal.
const BLOOD_ORIGIN_LIFT: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneMapping {
    /// Scale for x and y.
    pub planar: f32,
    pub depth:  f32,
}

impl Default for SceneMapping {
    fn default() -> Self {
        SceneMapping { planar: 50.0, depth: 30.0 }
    }
}

impl SceneMapping {
    pub fn new(planar: f32, depth: f32) -> Self {
        SceneMapping { planar, depth }
    }

    /// `((x − ½)·s, (½ − y)·s, −z·d)`.
    pub fn to_scene(&self, lm: Landmark) -> Vec3 {
        Vec3::new(
            (lm.x - 0.5) * self.planar,
            (0.5 - lm.y) * self.planar,
            -lm.z * self.depth,
        )
    }

    /// Palm centroid (wrist, index knuckle, pinky knuckle) lifted along the
    /// palm direction.
    pub fn blood_origin(&self, hand: &Hand) -> Vec3 {
        let centroid = (self.to_scene(hand.wrist())
            + self.to_scene(hand[INDEX_MCP])
            + self.to_scene(hand[PINKY_MCP]))
            / 3.0;
        centroid + palm_direction(hand) * BLOOD_ORIGIN_LIFT
    }
}

/// Palm normal flipped into scene axes (`y` and `z` inverted), unit length.
pub fn palm_direction(hand: &Hand) -> Vec3 {
    let n = palm_normal(hand);
    Vec3::new(n.x, -n.y, -n.z).try_normalize().unwrap_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::HandPose;

    #[test]
    fn frame_centre_maps_to_origin() {
        let m = SceneMapping::default();
        assert_eq!(m.to_scene(Landmark::new(0.5, 0.5, 0.0)), Vec3::ZERO);
        assert_eq!(m.to_scene(Landmark::new(1.0, 0.0, 0.1)), Vec3::new(25.0, 25.0, -3.0));
    }

    #[test]
    fn palm_facing_camera_points_toward_viewer() {
        let dir = palm_direction(&HandPose::blood().build());
        assert!(dir.z > 0.9, "{dir:?}");
    }

    #[test]
    fn blood_origin_sits_in_front_of_the_palm() {
        let hand = HandPose::blood().build();
        let m = SceneMapping::default();
        let origin = m.blood_origin(&hand);
        assert!((origin.z - BLOOD_ORIGIN_LIFT).abs() < 1e-4);
        assert!(origin.y < 0.0);
    }
}
