// pf-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, DynamicViscosity as UomDynamicViscosity,
    Length as UomLength, MassDensity as UomMassDensity, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
    VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type DynVisc = UomDynamicViscosity;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn lps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::liter_per_second;
    VolumeRate::new::<liter_per_second>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

/// Degrees Celsius of a temperature (uom stores kelvin).
#[inline]
pub fn to_celsius(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

/// Convert a pressure into metres of head of a fluid with the given density.
#[inline]
pub fn pressure_to_head(p: Pressure, rho: Density, g: Accel) -> f64 {
    p.value / (rho.value * g.value)
}

/// Convert metres of head of a fluid with the given density into pressure.
#[inline]
pub fn head_to_pressure(head_m: f64, rho: Density, g: Accel) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(head_m * rho.value * g.value)
}

pub mod constants {
    use super::*;

    pub const G0_MPS2: f64 = 9.806_65;

    #[inline]
    pub fn g0() -> Accel {
        mps2(G0_MPS2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = kpa(500.0);
        let _t = celsius(20.0);
        let _l = m(2.0);
        let _q = lps(0.2);
        let _g0 = constants::g0();
    }

    #[test]
    fn millimetres_are_stored_in_metres() {
        assert!((mm(25.0).value - 0.025).abs() < 1e-15);
        assert!((lps(1.0).value - 0.001).abs() < 1e-15);
    }

    #[test]
    fn celsius_round_trip() {
        let t = celsius(60.0);
        assert!((t.value - 333.15).abs() < 1e-9);
        assert!((to_celsius(t) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn head_pressure_round_trip() {
        let rho = kg_per_m3(1000.0);
        let g = constants::g0();
        let head = pressure_to_head(kpa(98.0665), rho, g);
        assert!((head - 10.0).abs() < 1e-9);
        assert!((head_to_pressure(head, rho, g).value - 98_066.5).abs() < 1e-6);
    }
}
