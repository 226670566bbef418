//! Turn a validated project into a solvable network.

use std::collections::HashMap;

use pf_components::{Element, ElementKind, Fitting, MixingValve, Pipe};
use pf_core::units::{celsius, m, mps2};
use pf_solver::{FlowNetwork, FlowSystem};

use crate::ProjectResult;
use crate::schema::{ElementKindDef, NodeKind, Project};
use crate::validate::{fluid_model, validate_project};

/// A network together with the boundary conditions its nodes declare.
pub struct CompiledNetwork {
    pub network: FlowNetwork,
    /// Fixture demands [L/s]
    pub demands: HashMap<String, f64>,
    /// Source pressures [kPa]
    pub supplies_kpa: HashMap<String, f64>,
}

pub fn compile(project: &Project) -> ProjectResult<CompiledNetwork> {
    validate_project(project)?;

    let mut catalog = project.catalog.clone();
    catalog.normalize();
    let mut network = FlowNetwork::new(catalog, fluid_model(project))
        .with_gravity(mps2(project.gravity_mps2));

    for system in &project.systems {
        network.add_system(
            system.id.clone(),
            FlowSystem {
                fluid: system.fluid.clone(),
                temperature: celsius(system.temperature_c),
            },
        );
    }

    let mut demands = HashMap::new();
    let mut supplies_kpa = HashMap::new();
    for node in &project.nodes {
        network.add_node(node.id.clone());
        match node.kind {
            NodeKind::Junction => {}
            NodeKind::Source { pressure_kpa } => {
                supplies_kpa.insert(node.id.clone(), pressure_kpa);
            }
            NodeKind::Fixture { demand_ls } => {
                demands.insert(node.id.clone(), demand_ls);
            }
        }
    }

    for def in &project.elements {
        let system = def.system.clone();
        match &def.kind {
            ElementKindDef::Pipe {
                from_node_id,
                to_node_id,
                material,
                nominal_mm,
                length_m,
            } => {
                let pipe = Pipe::new(material.clone(), *nominal_mm, m(*length_m));
                network.connect(
                    def.id.clone(),
                    from_node_id.clone(),
                    to_node_id.clone(),
                    Element::new(system, ElementKind::Pipe(pipe)),
                )?;
            }
            ElementKindDef::Fitting {
                from_node_id,
                to_node_id,
                valve,
            } => {
                network.connect(
                    def.id.clone(),
                    from_node_id.clone(),
                    to_node_id.clone(),
                    Element::new(system, ElementKind::Fitting(Fitting::new(valve.clone()))),
                )?;
            }
            ElementKindDef::MixingValve {
                model,
                hot_inlet_node_id,
                cold_inlet_node_id,
                outlet_node_id,
            } => {
                let valve = MixingValve {
                    model: model.clone(),
                    hot_inlet: hot_inlet_node_id.clone(),
                    cold_inlet: cold_inlet_node_id.clone(),
                    outlet: outlet_node_id.clone(),
                };
                network.add_mixing_valve(
                    def.id.clone(),
                    Element::new(system, ElementKind::MixingValve(valve)),
                )?;
            }
            ElementKindDef::Connection {
                from_node_id,
                to_node_id,
            } => {
                network.connect(
                    def.id.clone(),
                    from_node_id.clone(),
                    to_node_id.clone(),
                    Element::boundary(system),
                )?;
            }
        }
    }

    network.validate()?;
    Ok(CompiledNetwork {
        network,
        demands,
        supplies_kpa,
    })
}
