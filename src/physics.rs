//! Closed-form quantities derived from the component masses.
//!
//! Masses are in solar masses throughout.

use crate::domain::{DerivedScalars, FeatureFlags, WaveformRequest};

/// `GM_sun / c^2` in kilometers (approximate).
pub const SOLAR_GRAVITATIONAL_RADIUS_KM: f64 = 1.477;

/// Chirp mass: `(m1 m2)^(3/5) / (m1 + m2)^(1/5)`.
pub fn chirp_mass(mass1: f64, mass2: f64) -> f64 {
    (mass1 * mass2).powf(3.0 / 5.0) / (mass1 + mass2).powf(1.0 / 5.0)
}

/// ISCO radius in km using the linear `6 M` heuristic.
pub fn isco_radius_km(mass1: f64, mass2: f64) -> f64 {
    let total_mass = mass1 + mass2;
    6.0 * total_mass * SOLAR_GRAVITATIONAL_RADIUS_KM
}

pub fn derive_scalars(request: &WaveformRequest, features: &FeatureFlags) -> DerivedScalars {
    let (m1, m2) = (request.mass1(), request.mass2());
    DerivedScalars {
        chirp_mass: chirp_mass(m1, m2),
        isco_radius_km: features.include_isco.then(|| isco_radius_km(m1, m2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn equal_mass_reference_values() {
        let mc = chirp_mass(30.0, 30.0);
        assert!((mc - 30.0 * 2f64.powf(-0.2)).abs() < 1e-9);
        assert!((mc - 26.11).abs() < 1e-2, "got {mc}");

        let r = isco_radius_km(30.0, 30.0);
        assert!((r - 531.72).abs() < 1e-6, "got {r}");
    }

    #[test]
    fn isco_is_optional() {
        let req = WaveformRequest::default();
        let with = derive_scalars(&req, &FeatureFlags::default());
        assert!(with.isco_radius_km.is_some());

        let features = FeatureFlags {
            include_isco: false,
            ..FeatureFlags::default()
        };
        let without = derive_scalars(&req, &features);
        assert_eq!(without.isco_radius_km, None);
        assert_eq!(without.chirp_mass, with.chirp_mass);
    }

    proptest! {
        #[test]
        fn chirp_mass_bounded_by_half_total(m1 in 0.01f64..1000.0, m2 in 0.01f64..1000.0) {
            let mc = chirp_mass(m1, m2);
            prop_assert!(mc > 0.0);
            prop_assert!(mc <= (m1 + m2) / 2.0);
        }

        #[test]
        fn formulas_are_symmetric(m1 in 1.0f64..100.0, m2 in 1.0f64..100.0) {
            let a = chirp_mass(m1, m2);
            let b = chirp_mass(m2, m1);
            prop_assert!((a - b).abs() <= 1e-12 * a.abs());
            prop_assert_eq!(isco_radius_km(m1, m2), isco_radius_km(m2, m1));
        }
    }
}
