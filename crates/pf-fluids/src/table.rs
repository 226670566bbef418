//! Tabulated liquid properties.

use std::collections::BTreeMap;

use pf_core::numeric::interpolate;
use pf_core::units::{Temperature, kg_per_m3, pa_s, to_celsius};
use serde::{Deserialize, Serialize};

use crate::error::{FluidError, FluidResult};
use crate::model::{FluidModel, FluidProperties, validation};

/// Name of the built-in water table.
pub const WATER: &str = "water";

/// One row of a fluid table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidTablePoint {
    pub temperature_c: f64,
    pub density_kg_m3: f64,
    pub viscosity_pa_s: f64,
}

/// Density and viscosity of one liquid against temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidTable {
    pub name: String,
    pub points: Vec<FluidTablePoint>,
}

impl FluidTable {
    /// Saturated liquid water at atmospheric pressure, 0-100 °C.
    pub fn water() -> Self {
        const ROWS: [(f64, f64, f64); 11] = [
            (0.0, 999.84, 1.792e-3),
            (10.0, 999.70, 1.307e-3),
            (20.0, 998.21, 1.002e-3),
            (30.0, 995.65, 0.798e-3),
            (40.0, 992.22, 0.653e-3),
            (50.0, 988.03, 0.547e-3),
            (60.0, 983.20, 0.467e-3),
            (70.0, 977.76, 0.404e-3),
            (80.0, 971.79, 0.355e-3),
            (90.0, 965.31, 0.315e-3),
            (100.0, 958.35, 0.282e-3),
        ];
        Self {
            name: WATER.to_string(),
            points: ROWS
                .iter()
                .map(|&(temperature_c, density_kg_m3, viscosity_pa_s)| FluidTablePoint {
                    temperature_c,
                    density_kg_m3,
                    viscosity_pa_s,
                })
                .collect(),
        }
    }

    fn column(&self, value: impl Fn(&FluidTablePoint) -> f64) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.temperature_c, value(p)))
            .collect()
    }

    fn range_c(&self) -> Option<(f64, f64)> {
        Some((
            self.points.first()?.temperature_c,
            self.points.last()?.temperature_c,
        ))
    }
}

/// Fluid model backed by per-fluid temperature tables.
///
/// Lookups interpolate linearly between rows; temperatures outside a table are
/// rejected rather than extrapolated. Fluid names are case-insensitive.
#[derive(Debug, Clone)]
pub struct TabulatedFluidModel {
    tables: BTreeMap<String, FluidTable>,
}

impl Default for TabulatedFluidModel {
    /// A model holding the built-in water table.
    fn default() -> Self {
        let mut model = Self::empty();
        model.insert(FluidTable::water());
        model
    }
}

impl TabulatedFluidModel {
    /// A model with no tables.
    pub fn empty() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Add or replace a table. Rows are sorted by temperature.
    pub fn insert(&mut self, mut table: FluidTable) {
        table
            .points
            .sort_by(|a, b| a.temperature_c.total_cmp(&b.temperature_c));
        self.tables.insert(table.name.to_ascii_lowercase(), table);
    }

    pub fn fluids(&self) -> impl Iterator<Item = &str> {
        self.tables.values().map(|t| t.name.as_str())
    }

    fn table(&self, fluid: &str) -> FluidResult<&FluidTable> {
        self.tables
            .get(&fluid.to_ascii_lowercase())
            .ok_or_else(|| FluidError::UnknownFluid {
                name: fluid.to_string(),
            })
    }
}

impl FluidModel for TabulatedFluidModel {
    fn name(&self) -> &str {
        "tabulated"
    }

    fn supports(&self, fluid: &str) -> bool {
        self.tables.contains_key(&fluid.to_ascii_lowercase())
    }

    fn properties(&self, fluid: &str, t: Temperature) -> FluidResult<FluidProperties> {
        validation::validate_temperature(t)?;
        let table = self.table(fluid)?;
        let (min_c, max_c) = table.range_c().ok_or_else(|| FluidError::UnknownFluid {
            name: fluid.to_string(),
        })?;

        let t_c = to_celsius(t);
        if t_c < min_c - 1e-9 || t_c > max_c + 1e-9 {
            return Err(FluidError::OutOfRange {
                fluid: table.name.clone(),
                temperature_c: t_c,
                min_c,
                max_c,
            });
        }

        let rho = interpolate(&table.column(|p| p.density_kg_m3), t_c).unwrap_or(f64::NAN);
        let mu = interpolate(&table.column(|p| p.viscosity_pa_s), t_c).unwrap_or(f64::NAN);
        validation::validate_density(rho)?;
        validation::validate_viscosity(mu)?;

        Ok(FluidProperties {
            density: kg_per_m3(rho),
            dynamic_viscosity: pa_s(mu),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::celsius;

    #[test]
    fn water_at_table_rows() {
        let model = TabulatedFluidModel::default();
        let props = model.properties(WATER, celsius(60.0)).unwrap();
        assert!((props.density.value - 983.20).abs() < 1e-9);
        assert!((props.dynamic_viscosity.value - 0.467e-3).abs() < 1e-12);
    }

    #[test]
    fn water_interpolates_between_rows() {
        let model = TabulatedFluidModel::default();
        let props = model.properties("Water", celsius(15.0)).unwrap();
        assert!((props.density.value - 0.5 * (999.70 + 998.21)).abs() < 1e-9);
        let props = model.properties("WATER", celsius(15.0)).unwrap();
        assert!((props.dynamic_viscosity.value - 0.5 * (1.307e-3 + 1.002e-3)).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let model = TabulatedFluidModel::default();
        let err = model.properties(WATER, celsius(120.0)).unwrap_err();
        assert!(matches!(err, FluidError::OutOfRange { .. }));
    }

    #[test]
    fn unknown_fluid_is_rejected() {
        let model = TabulatedFluidModel::default();
        assert!(!model.supports("glycol"));
        assert_eq!(
            model.properties("glycol", celsius(20.0)),
            Err(FluidError::UnknownFluid {
                name: "glycol".into()
            })
        );
    }

    #[test]
    fn inserted_tables_are_sorted() {
        let mut model = TabulatedFluidModel::empty();
        model.insert(FluidTable {
            name: "Brine".into(),
            points: vec![
                FluidTablePoint {
                    temperature_c: 40.0,
                    density_kg_m3: 1100.0,
                    viscosity_pa_s: 1.0e-3,
                },
                FluidTablePoint {
                    temperature_c: 0.0,
                    density_kg_m3: 1140.0,
                    viscosity_pa_s: 3.0e-3,
                },
            ],
        });
        let props = model.properties("brine", celsius(10.0)).unwrap();
        assert!((props.density.value - 1130.0).abs() < 1e-9);
        assert_eq!(model.fluids().collect::<Vec<_>>(), vec!["Brine"]);
    }

    #[test]
    fn table_deserializes_from_json() {
        let table: FluidTable = serde_json::from_str(
            r#"{"name":"oil","points":[{"temperature_c":20.0,"density_kg_m3":870.0,"viscosity_pa_s":0.03}]}"#,
        )
        .unwrap();
        assert_eq!(table.points.len(), 1);
    }
}
