use crate::core::units::WATTS_PER_KILOWATT;

/// Thermal properties of the tank/distribution medium, expressed in the
/// litre/kWh unit system the energy balance is written in.
#[derive(Clone, Copy, Debug)]
pub struct WaterProperties {
    volumetric_heat_capacity: f64, // Wh/(litre.K)
}

impl WaterProperties {
    pub const fn new(volumetric_heat_capacity: f64) -> Self {
        Self {
            volumetric_heat_capacity,
        }
    }

    pub fn volumetric_heat_capacity(&self) -> f64 {
        self.volumetric_heat_capacity
    }

    /// Return the energy needed to raise `litres` of water by `delta_t`, in kWh
    ///
    /// Arguments:
    /// * `litres`  - volume of water to be heated, in litres
    /// * `delta_t` - temperature rise to be achieved, in K
    pub fn heating_energy_kwh(&self, litres: f64, delta_t: f64) -> f64 {
        litres * self.volumetric_heat_capacity * delta_t / WATTS_PER_KILOWATT as f64
    }

    /// Return the temperature rise of `litres` of water absorbing `energy_kwh`, in K
    pub fn temperature_rise(&self, litres: f64, energy_kwh: f64) -> f64 {
        energy_kwh * WATTS_PER_KILOWATT as f64 / (litres * self.volumetric_heat_capacity)
    }
}

pub const WATER: WaterProperties = WaterProperties::new(1.163);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::*;

    #[fixture]
    fn water() -> WaterProperties {
        WATER
    }

    #[rstest]
    fn should_have_correct_volumetric_heat_capacity(water: WaterProperties) {
        assert_eq!(water.volumetric_heat_capacity(), 1.163);
    }

    #[rstest]
    fn should_calculate_correct_heating_energy(water: WaterProperties) {
        // 200 litres raised by 30 K
        assert_relative_eq!(water.heating_energy_kwh(200., 30.), 6.978, max_relative = 1e-12);
        assert_eq!(water.heating_energy_kwh(150., 0.), 0.);
    }

    #[rstest]
    fn temperature_rise_inverts_heating_energy(water: WaterProperties) {
        let energy = water.heating_energy_kwh(120., 25.);
        assert_relative_eq!(water.temperature_rise(120., energy), 25., max_relative = 1e-12);
    }
}
