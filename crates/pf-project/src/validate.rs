//! Network file validation logic.

use crate::schema::{ElementDef, ElementKindDef, NodeDef, NodeKind, Project};
use pf_components::Catalog;
use pf_fluids::{FluidModel, TabulatedFluidModel};
use std::collections::HashSet;

/// Highest file format version this build understands.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    positive("gravity_mps2", project.gravity_mps2)?;

    let fluids = fluid_model(project);
    let mut system_ids = HashSet::new();
    for system in &project.systems {
        if !system_ids.insert(system.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: system.id.clone(),
                context: "systems".to_string(),
            });
        }
        finite(
            &format!("system '{}' temperature_c", system.id),
            system.temperature_c,
        )?;
        if !fluids.supports(&system.fluid) {
            return Err(ValidationError::MissingReference {
                id: system.fluid.clone(),
                context: format!("system '{}' fluid", system.id),
            });
        }
    }

    let mut node_ids = HashSet::new();
    for node in &project.nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
                context: "nodes".to_string(),
            });
        }
        validate_node(node)?;
    }

    let mut element_ids = HashSet::new();
    for element in &project.elements {
        if !element_ids.insert(element.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: element.id.clone(),
                context: "elements".to_string(),
            });
        }
        if !system_ids.contains(element.system.as_str()) {
            return Err(ValidationError::MissingReference {
                id: element.system.clone(),
                context: format!("element '{}' system", element.id),
            });
        }
        for node_id in element.kind.node_ids() {
            if !node_ids.contains(node_id) {
                return Err(ValidationError::MissingReference {
                    id: node_id.to_string(),
                    context: format!("element '{}' node", element.id),
                });
            }
        }
        validate_element(element, &project.catalog)?;
    }

    Ok(())
}

/// Built-in tables plus any the file defines.
pub(crate) fn fluid_model(project: &Project) -> TabulatedFluidModel {
    let mut model = TabulatedFluidModel::default();
    for table in &project.fluids {
        model.insert(table.clone());
    }
    model
}

fn validate_node(node: &NodeDef) -> Result<(), ValidationError> {
    match &node.kind {
        NodeKind::Junction => Ok(()),
        NodeKind::Source { pressure_kpa } => {
            finite(&format!("node '{}' pressure_kpa", node.id), *pressure_kpa)
        }
        NodeKind::Fixture { demand_ls } => {
            let field = format!("node '{}' demand_ls", node.id);
            finite(&field, *demand_ls)?;
            if *demand_ls < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field,
                    value: demand_ls.to_string(),
                    reason: "demand must not be negative".to_string(),
                });
            }
            Ok(())
        }
    }
}

fn validate_element(element: &ElementDef, catalog: &Catalog) -> Result<(), ValidationError> {
    let missing = |id: String, what: &str| ValidationError::MissingReference {
        id,
        context: format!("element '{}' {what}", element.id),
    };

    match &element.kind {
        ElementKindDef::Pipe {
            material,
            nominal_mm,
            length_m,
            ..
        } => {
            positive(&format!("element '{}' length_m", element.id), *length_m)?;
            catalog
                .pipe_spec(material, *nominal_mm)
                .map_err(|_| missing(format!("{material} {nominal_mm} mm"), "pipe size"))?;
        }
        ElementKindDef::Fitting { valve, .. } => {
            if !catalog.valves.contains_key(valve) {
                return Err(missing(valve.clone(), "valve"));
            }
        }
        ElementKindDef::MixingValve {
            model,
            hot_inlet_node_id,
            cold_inlet_node_id,
            outlet_node_id,
        } => {
            if !catalog.mixing_valves.contains_key(model) {
                return Err(missing(model.clone(), "mixing valve model"));
            }
            let ports = HashSet::from([
                hot_inlet_node_id.as_str(),
                cold_inlet_node_id.as_str(),
                outlet_node_id.as_str(),
            ]);
            if ports.len() != 3 {
                return Err(ValidationError::InvalidValue {
                    field: format!("element '{}' ports", element.id),
                    value: format!(
                        "{hot_inlet_node_id}, {cold_inlet_node_id}, {outlet_node_id}"
                    ),
                    reason: "mixing valve ports must be three distinct nodes".to_string(),
                });
            }
        }
        ElementKindDef::Connection { .. } => {}
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        })
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}
