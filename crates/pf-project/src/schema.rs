//! Network file schema definitions.

use pf_components::Catalog;
use pf_core::units::constants::G0_MPS2;
use pf_fluids::{FluidTable, WATER};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default = "default_gravity")]
    pub gravity_mps2: f64,
    #[serde(default)]
    pub systems: Vec<SystemDef>,
    #[serde(default)]
    pub catalog: Catalog,
    /// Extra fluid tables on top of the built-in water table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fluids: Vec<FluidTable>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

fn default_gravity() -> f64 {
    G0_MPS2
}

/// A flow system: one fluid at one operating temperature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemDef {
    pub id: String,
    #[serde(default = "default_fluid")]
    pub fluid: String,
    pub temperature_c: f64,
}

fn default_fluid() -> String {
    WATER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum NodeKind {
    Junction,
    /// Fixed-pressure supply, e.g. a mains connection or a pump outlet.
    Source { pressure_kpa: f64 },
    /// Draw-off point with a fixed demand.
    Fixture { demand_ls: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub system: String,
    pub kind: ElementKindDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ElementKindDef {
    Pipe {
        from_node_id: String,
        to_node_id: String,
        material: String,
        nominal_mm: f64,
        length_m: f64,
    },
    Fitting {
        from_node_id: String,
        to_node_id: String,
        valve: String,
    },
    MixingValve {
        model: String,
        hot_inlet_node_id: String,
        cold_inlet_node_id: String,
        outlet_node_id: String,
    },
    /// Lossless link, e.g. from a source into the pipework.
    Connection {
        from_node_id: String,
        to_node_id: String,
    },
}

impl ElementKindDef {
    /// Every node this element attaches to.
    pub fn node_ids(&self) -> Vec<&str> {
        match self {
            ElementKindDef::Pipe {
                from_node_id,
                to_node_id,
                ..
            }
            | ElementKindDef::Fitting {
                from_node_id,
                to_node_id,
                ..
            }
            | ElementKindDef::Connection {
                from_node_id,
                to_node_id,
            } => vec![from_node_id.as_str(), to_node_id.as_str()],
            ElementKindDef::MixingValve {
                hot_inlet_node_id,
                cold_inlet_node_id,
                outlet_node_id,
                ..
            } => vec![
                hot_inlet_node_id.as_str(),
                cold_inlet_node_id.as_str(),
                outlet_node_id.as_str(),
            ],
        }
    }
}
