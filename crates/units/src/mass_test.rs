mod tests {
    use approx::assert_relative_eq;

    use crate::mass::{Mass, EARTH_MASS_KG, SOLAR_MASS_KG};

    #[test]
    fn test_mass_conversions() {
        let mass_sm = Mass::from_solar_masses(1.0);
        assert_relative_eq!(mass_sm.to_kg(), SOLAR_MASS_KG);
        assert_relative_eq!(mass_sm.to_grams(), SOLAR_MASS_KG * 1000.0);

        let mass_kg = Mass::from_kg(SOLAR_MASS_KG);
        assert_relative_eq!(mass_kg.to_solar_masses(), 1.0);

        // Galaxy-scale round trip
        let original = 3.5e11;
        let round_trip = Mass::from_kg(Mass::from_solar_masses(original).to_kg()).to_solar_masses();
        assert_relative_eq!(round_trip, original, max_relative = 1e-14);

        assert_relative_eq!(Mass::from_earth_masses(1.0).to_kg(), EARTH_MASS_KG);
        assert_relative_eq!(Mass::from_grams(2500.0).to_kg(), 2.5);
    }

    #[test]
    fn test_mass_arithmetic_operations() {
        let mass1 = Mass::from_solar_masses(2.0);
        let mass2 = Mass::from_solar_masses(1.5);

        assert_relative_eq!((mass1 + mass2).to_solar_masses(), 3.5);
        assert_relative_eq!((mass1 - mass2).to_solar_masses(), 0.5);
        assert_relative_eq!((mass1 * 3.0).to_solar_masses(), 6.0);
        assert_relative_eq!((mass1 / 4.0).to_solar_masses(), 0.5);
        assert_relative_eq!((2.5 * mass2).to_solar_masses(), 3.75);
        assert_relative_eq!(mass1 / mass2, 4.0 / 3.0);
    }

    #[test]
    fn test_mass_physical_domain() {
        assert!(Mass::zero().is_physical());
        assert!(Mass::from_solar_masses(1e14).is_physical());
        assert!(!Mass::from_kg(-1.0).is_physical());
        assert!(!Mass::from_kg(f64::NAN).is_physical());
        assert!(!Mass::from_kg(f64::INFINITY).is_physical());
    }
}
