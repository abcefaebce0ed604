// rt-core/src/units.rs

use uom::si::f64::{Angle as UomAngle, AngularVelocity as UomAngularVelocity};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type AngularVelocity = UomAngularVelocity;

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

#[inline]
pub fn rpm(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::revolution_per_minute;
    AngularVelocity::new::<revolution_per_minute>(v)
}

/// Degrees to radians through the unit system.
#[inline]
pub fn deg_to_rad(v: f64) -> f64 {
    use uom::si::angle::radian;
    deg(v).get::<radian>()
}

#[inline]
pub fn rad_to_deg(v: f64) -> f64 {
    use uom::si::angle::degree;
    rad(v).get::<degree>()
}

/// Angular velocity in rad/s.
#[inline]
pub fn to_rad_per_s(w: AngularVelocity) -> f64 {
    use uom::si::angular_velocity::radian_per_second;
    w.get::<radian_per_second>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _a = deg(10.0);
        let _w = rad_per_s(40.0);
        let _n = rpm(300.0);
    }

    #[test]
    fn angle_conversions() {
        assert!((deg_to_rad(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((rad_to_deg(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
        assert!((deg_to_rad(0.1) - 0.1_f64.to_radians()).abs() < 1e-15);
    }

    #[test]
    fn rpm_is_converted_to_rad_per_s() {
        let w = to_rad_per_s(rpm(60.0));
        assert!((w - 2.0 * std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(to_rad_per_s(rad_per_s(40.0)), 40.0);
    }
}
