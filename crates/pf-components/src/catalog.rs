//! Product catalog: pipe sizes, valve K-values and mixing-valve curves.
//!
//! Tables are stored as authored and looked up by name. K-values and
//! pressure-drop curves are interpolated linearly and clamped at the ends, so
//! a catalog only needs the points a manufacturer publishes.

use std::collections::BTreeMap;

use pf_core::numeric::interpolate;
use serde::{Deserialize, Serialize};

use crate::error::{ComponentError, ComponentResult};

/// Nominal sizes closer than this are the same size.
const NOMINAL_MATCH_MM: f64 = 1e-6;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Pipe materials keyed by name (e.g. `copper`).
    #[serde(default)]
    pub pipes: BTreeMap<String, PipeMaterial>,
    /// Valves and fittings keyed by name.
    #[serde(default)]
    pub valves: BTreeMap<String, ValveKTable>,
    /// Thermostatic mixing valves keyed by model.
    #[serde(default)]
    pub mixing_valves: BTreeMap<String, MixingValveTable>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipeMaterial {
    /// Absolute (Colebrook) roughness [mm].
    pub colebrook_roughness_mm: f64,
    pub sizes: Vec<PipeSize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipeSize {
    pub nominal_mm: f64,
    pub internal_diameter_mm: f64,
}

/// Loss coefficient K as a function of connected pipe bore.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValveKTable {
    pub k_values: Vec<KValuePoint>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KValuePoint {
    pub diameter_mm: f64,
    pub k: f64,
}

/// Pressure drop [kPa] as a function of flow [L/s].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixingValveTable {
    pub pressure_drop: Vec<PressureDropPoint>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PressureDropPoint {
    pub flow_ls: f64,
    pub kpa: f64,
}

/// Resolved geometry of one pipe size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipeSpec {
    pub internal_diameter_mm: f64,
    pub roughness_mm: f64,
}

impl Catalog {
    /// Bore and roughness of `material` at nominal size `nominal_mm`.
    pub fn pipe_spec(&self, material: &str, nominal_mm: f64) -> ComponentResult<PipeSpec> {
        let entry = self
            .pipes
            .get(material)
            .ok_or_else(|| missing(format!("pipe material '{material}'")))?;
        let size = entry
            .sizes
            .iter()
            .find(|s| (s.nominal_mm - nominal_mm).abs() < NOMINAL_MATCH_MM)
            .ok_or_else(|| missing(format!("{material} pipe of nominal size {nominal_mm} mm")))?;
        Ok(PipeSpec {
            internal_diameter_mm: size.internal_diameter_mm,
            roughness_mm: entry.colebrook_roughness_mm,
        })
    }

    /// K-value of `valve` fitted to a pipe of internal diameter `diameter_mm`.
    pub fn k_value(&self, valve: &str, diameter_mm: f64) -> ComponentResult<f64> {
        let entry = self
            .valves
            .get(valve)
            .ok_or_else(|| missing(format!("valve '{valve}'")))?;
        let points: Vec<(f64, f64)> = entry
            .k_values
            .iter()
            .map(|p| (p.diameter_mm, p.k))
            .collect();
        interpolate(&points, diameter_mm)
            .ok_or_else(|| missing(format!("K-values for valve '{valve}'")))
    }

    /// Pressure drop [kPa] across mixing valve `model` at `flow_ls`.
    pub fn mixing_valve_drop_kpa(&self, model: &str, flow_ls: f64) -> ComponentResult<f64> {
        let entry = self
            .mixing_valves
            .get(model)
            .ok_or_else(|| missing(format!("mixing valve '{model}'")))?;
        let points: Vec<(f64, f64)> = entry
            .pressure_drop
            .iter()
            .map(|p| (p.flow_ls, p.kpa))
            .collect();
        interpolate(&points, flow_ls)
            .ok_or_else(|| missing(format!("pressure-drop curve for mixing valve '{model}'")))
    }

    /// Sort every interpolation table by its abscissa.
    ///
    /// Lookups assume ascending tables; loaders call this once after parsing.
    pub fn normalize(&mut self) {
        for valve in self.valves.values_mut() {
            valve
                .k_values
                .sort_by(|a, b| a.diameter_mm.total_cmp(&b.diameter_mm));
        }
        for mixer in self.mixing_valves.values_mut() {
            mixer
                .pressure_drop
                .sort_by(|a, b| a.flow_ls.total_cmp(&b.flow_ls));
        }
    }
}

fn missing(what: String) -> ComponentError {
    ComponentError::MissingCatalogEntry { what }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.pipes.insert(
            "copper".into(),
            PipeMaterial {
                colebrook_roughness_mm: 0.0015,
                sizes: vec![
                    PipeSize {
                        nominal_mm: 15.0,
                        internal_diameter_mm: 13.6,
                    },
                    PipeSize {
                        nominal_mm: 20.0,
                        internal_diameter_mm: 20.0,
                    },
                ],
            },
        );
        catalog.valves.insert(
            "ball".into(),
            ValveKTable {
                k_values: vec![
                    KValuePoint {
                        diameter_mm: 20.0,
                        k: 0.5,
                    },
                    KValuePoint {
                        diameter_mm: 10.0,
                        k: 1.5,
                    },
                ],
            },
        );
        catalog.mixing_valves.insert(
            "tmv".into(),
            MixingValveTable {
                pressure_drop: vec![
                    PressureDropPoint {
                        flow_ls: 0.0,
                        kpa: 0.0,
                    },
                    PressureDropPoint {
                        flow_ls: 0.5,
                        kpa: 50.0,
                    },
                ],
            },
        );
        catalog.normalize();
        catalog
    }

    #[test]
    fn pipe_spec_lookup() {
        let spec = catalog().pipe_spec("copper", 15.0).unwrap();
        assert_eq!(spec.internal_diameter_mm, 13.6);
        assert_eq!(spec.roughness_mm, 0.0015);
    }

    #[test]
    fn pipe_spec_missing_size() {
        let err = catalog().pipe_spec("copper", 25.0).unwrap_err();
        assert!(matches!(err, ComponentError::MissingCatalogEntry { .. }));
        assert!(catalog().pipe_spec("pex", 15.0).is_err());
    }

    #[test]
    fn k_value_interpolates_after_normalize() {
        let catalog = catalog();
        assert!((catalog.k_value("ball", 15.0).unwrap() - 1.0).abs() < 1e-12);
        // Clamped beyond the table.
        assert_eq!(catalog.k_value("ball", 5.0).unwrap(), 1.5);
        assert_eq!(catalog.k_value("ball", 40.0).unwrap(), 0.5);
    }

    #[test]
    fn empty_k_table_is_missing() {
        let mut catalog = catalog();
        catalog
            .valves
            .insert("gate".into(), ValveKTable { k_values: vec![] });
        assert!(catalog.k_value("gate", 15.0).is_err());
    }

    #[test]
    fn mixing_valve_curve() {
        let drop = catalog().mixing_valve_drop_kpa("tmv", 0.2).unwrap();
        assert!((drop - 20.0).abs() < 1e-12);
    }
}
