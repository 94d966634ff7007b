use glam::{DMat4, DVec3, Mat4};
use serde::{Deserialize, Serialize};

use crate::geo::mercator::MercatorCoordinate;

/// Geographic placement of a local scene (model plus smoke emitter)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoAnchor {
    /// `[longitude, latitude]` in degrees
    pub origin: [f64; 2],
    /// Meters above sea level
    #[serde(default)]
    pub altitude: f64,
    /// Euler rotation in radians applied X, then Y, then Z
    #[serde(default)]
    pub rotation: [f64; 3],
}

impl Default for GeoAnchor {
    fn default() -> Self {
        Self {
            origin: [148.9819, -35.39847],
            altitude: 0.0,
            rotation: [std::f64::consts::FRAC_PI_2, 0.0, 0.0],
        }
    }
}

/// Local-to-mercator transform for an anchored scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub translate: DVec3,
    pub rotate: DVec3,
    /// Meters to mercator units at the anchor latitude
    pub scale: f64,
}

impl ModelTransform {
    pub fn from_anchor(anchor: &GeoAnchor) -> Self {
        let coordinate = MercatorCoordinate::from_lng_lat(anchor.origin[0], anchor.origin[1], anchor.altitude);
        Self {
            translate: DVec3::new(coordinate.x, coordinate.y, coordinate.z),
            rotate: DVec3::from_array(anchor.rotation),
            scale: coordinate.meter_in_mercator_units(),
        }
    }

    /// Model matrix in double precision.
    ///
    /// Y is mirrored because mercator y grows southward while local y is up.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_translation(self.translate)
            * DMat4::from_scale(DVec3::new(self.scale, -self.scale, self.scale))
            * DMat4::from_rotation_x(self.rotate.x)
            * DMat4::from_rotation_y(self.rotate.y)
            * DMat4::from_rotation_z(self.rotate.z)
    }

    /// Combine the host map's column-major view-projection with this model
    pub fn camera_matrix(&self, map_matrix: &[f64; 16]) -> Mat4 {
        (DMat4::from_cols_array(map_matrix) * self.matrix()).as_mat4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_anchor() {
        let anchor = GeoAnchor {
            origin: [0.0, 0.0],
            altitude: 0.0,
            rotation: [0.0; 3],
        };
        let transform = ModelTransform::from_anchor(&anchor);
        let p = transform.matrix().transform_point3(DVec3::ZERO);
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!((p.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_one_meter_east() {
        let anchor = GeoAnchor {
            origin: [10.0, 45.0],
            altitude: 0.0,
            rotation: [0.0; 3],
        };
        let transform = ModelTransform::from_anchor(&anchor);
        let origin = transform.matrix().transform_point3(DVec3::ZERO);
        let east = transform.matrix().transform_point3(DVec3::X);
        assert!(((east.x - origin.x) - transform.scale).abs() < 1e-15);
    }

    #[test]
    fn test_local_up_points_north_without_rotation() {
        let anchor = GeoAnchor {
            origin: [0.0, 0.0],
            altitude: 0.0,
            rotation: [0.0; 3],
        };
        let m = ModelTransform::from_anchor(&anchor).matrix();
        let up = m.transform_vector3(DVec3::Y);
        assert!(up.y < 0.0);
    }

    #[test]
    fn test_default_rotation_turns_local_up_into_altitude() {
        let m = ModelTransform::from_anchor(&GeoAnchor::default()).matrix();
        let up = m.transform_vector3(DVec3::Y);
        assert!(up.z > 0.0);
        assert!(up.x.abs() < 1e-15 && up.y.abs() < 1e-15);
    }

    #[test]
    fn test_identity_map_matrix() {
        let transform = ModelTransform::from_anchor(&GeoAnchor::default());
        let identity = DMat4::IDENTITY.to_cols_array();
        assert_eq!(transform.camera_matrix(&identity), transform.matrix().as_mat4());
    }
}
