use crate::constants::geo::{EARTH_CIRCUMFERENCE, MAX_MERCATOR_LATITUDE};

/// Position in normalized Web-Mercator space.
///
/// `x` runs west to east and `y` north to south, both in `[0, 1]` across the
/// projected world; `z` is altitude in the same units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorCoordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    latitude: f64,
}

impl MercatorCoordinate {
    /// Project a longitude/latitude (degrees) and altitude (meters)
    pub fn from_lng_lat(lng: f64, lat: f64, altitude: f64) -> Self {
        let lat = lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);

        let x = (180.0 + lng) / 360.0;
        let y = (180.0
            - (180.0 / std::f64::consts::PI)
                * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln())
            / 360.0;
        let z = altitude / circumference_at_latitude(lat);

        Self { x, y, z, latitude: lat }
    }

    /// Longitude and latitude (degrees) of this coordinate
    pub fn to_lng_lat(&self) -> (f64, f64) {
        let lng = self.x * 360.0 - 180.0;
        let y2 = 180.0 - self.y * 360.0;
        let lat = 360.0 / std::f64::consts::PI * (y2 * std::f64::consts::PI / 180.0).exp().atan() - 90.0;
        (lng, lat)
    }

    /// Altitude in meters
    pub fn altitude(&self) -> f64 {
        self.z * circumference_at_latitude(self.latitude)
    }

    /// Size of one meter in mercator units at this latitude
    pub fn meter_in_mercator_units(&self) -> f64 {
        1.0 / circumference_at_latitude(self.latitude)
    }
}

/// Length of the parallel at `lat` degrees, in meters
pub fn circumference_at_latitude(lat: f64) -> f64 {
    EARTH_CIRCUMFERENCE * lat.to_radians().cos()
}
