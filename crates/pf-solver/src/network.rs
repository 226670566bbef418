//! Piping network: topology, elements and the data their losses depend on.

use std::collections::HashMap;

use pf_components::{Catalog, ComponentError, ComponentResult, Element, ElementKind, LossContext};
use pf_core::units::{Accel, Temperature, constants::g0};
use pf_fluids::{FluidModel, FluidProperties};
use pf_graph::{EdgeUid, Graph};

use crate::error::{SolverError, SolverResult};

/// Fluid and operating temperature shared by every element of one system
/// (e.g. the cold-water or hot-water side of a building).
#[derive(Clone, Debug, PartialEq)]
pub struct FlowSystem {
    pub fluid: String,
    pub temperature: Temperature,
}

/// Undirected piping network.
///
/// Nodes are connection points. Every element is an edge whose value is the
/// element id. A mixing valve occupies two edges, one per inlet, both ending at
/// its outlet.
pub struct FlowNetwork {
    graph: Graph<String, String>,
    elements: HashMap<String, Element>,
    systems: HashMap<String, FlowSystem>,
    catalog: Catalog,
    fluids: Box<dyn FluidModel>,
    gravity: Accel,
}

impl FlowNetwork {
    pub fn new(catalog: Catalog, fluids: impl FluidModel + 'static) -> Self {
        Self {
            graph: Graph::new(),
            elements: HashMap::new(),
            systems: HashMap::new(),
            catalog,
            fluids: Box::new(fluids),
            gravity: g0(),
        }
    }

    pub fn with_gravity(mut self, gravity: Accel) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn add_system(&mut self, id: impl Into<String>, system: FlowSystem) {
        self.systems.insert(id.into(), system);
    }

    pub fn add_node(&mut self, id: impl Into<String>) {
        self.graph.add_node(id.into());
    }

    /// Connect `from` and `to` through a two-port element. Returns the edge uid,
    /// which is the element id.
    pub fn connect(
        &mut self,
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        element: Element,
    ) -> SolverResult<EdgeUid> {
        let id = id.into();
        if let ElementKind::MixingValve(_) = element.kind {
            return Err(SolverError::ProblemSetup {
                what: format!("mixing valve {id} must be added with add_mixing_valve"),
            });
        }
        self.insert_element(&id, element)?;
        Ok(self
            .graph
            .add_edge(from.into(), to.into(), id.clone(), Some(id)))
    }

    /// Add a mixing valve as two edges, `hot_inlet -> outlet` and `cold_inlet -> outlet`.
    /// Returns their uids `<id>:hot` and `<id>:cold`.
    pub fn add_mixing_valve(
        &mut self,
        id: impl Into<String>,
        element: Element,
    ) -> SolverResult<(EdgeUid, EdgeUid)> {
        let id = id.into();
        let ElementKind::MixingValve(valve) = &element.kind else {
            return Err(SolverError::ProblemSetup {
                what: format!("element {id} is not a mixing valve"),
            });
        };
        let (hot, cold, outlet) = (
            valve.hot_inlet.clone(),
            valve.cold_inlet.clone(),
            valve.outlet.clone(),
        );
        self.insert_element(&id, element)?;
        let hot_uid =
            self.graph
                .add_edge(hot, outlet.clone(), id.clone(), Some(format!("{id}:hot")));
        let cold_uid = self
            .graph
            .add_edge(cold, outlet, id.clone(), Some(format!("{id}:cold")));
        Ok((hot_uid, cold_uid))
    }

    fn insert_element(&mut self, id: &str, element: Element) -> SolverResult<()> {
        if self.elements.contains_key(id) {
            return Err(SolverError::ProblemSetup {
                what: format!("duplicate element id {id}"),
            });
        }
        self.elements.insert(id.to_string(), element);
        Ok(())
    }

    pub fn graph(&self) -> &Graph<String, String> {
        &self.graph
    }

    pub fn element(&self, id: &str) -> SolverResult<&Element> {
        self.elements
            .get(id)
            .ok_or_else(|| SolverError::ProblemSetup {
                what: format!("edge refers to unknown element {id}"),
            })
    }

    pub fn elements(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.elements.iter().map(|(id, e)| (id.as_str(), e))
    }

    pub fn system(&self, id: &str) -> Option<&FlowSystem> {
        self.systems.get(id)
    }

    /// Check the graph invariants and that every reference resolves.
    pub fn validate(&self) -> SolverResult<()> {
        self.graph.validate()?;
        for edge in self.graph.edges() {
            self.element(&edge.value)?;
        }
        for (id, element) in &self.elements {
            let system = self
                .systems
                .get(&element.system)
                .ok_or_else(|| SolverError::ProblemSetup {
                    what: format!("element {id} uses unknown system {}", element.system),
                })?;
            if !self.fluids.supports(&system.fluid) {
                return Err(SolverError::ProblemSetup {
                    what: format!(
                        "system {} uses fluid {} which the {} fluid model has no data for",
                        element.system,
                        system.fluid,
                        self.fluids.name()
                    ),
                });
            }
        }
        Ok(())
    }
}

impl LossContext for FlowNetwork {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn gravity(&self) -> Accel {
        self.gravity
    }

    fn fluid(&self, system: &str) -> ComponentResult<FluidProperties> {
        let flow_system = self
            .systems
            .get(system)
            .ok_or_else(|| ComponentError::UnknownSystem {
                system: system.to_string(),
            })?;
        Ok(self
            .fluids
            .properties(&flow_system.fluid, flow_system.temperature)?)
    }

    fn smallest_connected_diameter_mm(&self, from: &str, to: &str) -> ComponentResult<f64> {
        let mut smallest: Option<f64> = None;
        for node in [from, to] {
            for edge in self.graph.out_edges(&node.to_string()) {
                let Some(element) = self.elements.get(&edge.value) else {
                    continue;
                };
                if let Some(d) = element.pipe_diameter_mm(self)? {
                    smallest = Some(smallest.map_or(d, |s: f64| s.min(d)));
                }
            }
        }
        smallest.ok_or_else(|| ComponentError::MissingDiameter {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_components::{Fitting, MixingValve, Pipe, PipeMaterial, PipeSize};
    use pf_core::units::{celsius, m};
    use pf_fluids::{TabulatedFluidModel, WATER};

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
        catalog
    }

    fn network() -> FlowNetwork {
        let mut net = FlowNetwork::new(catalog(), TabulatedFluidModel::default());
        net.add_system(
            "cold",
            FlowSystem {
                fluid: WATER.into(),
                temperature: celsius(20.0),
            },
        );
        net
    }

    fn pipe(nominal_mm: f64) -> Element {
        Element::new(
            "cold",
            ElementKind::Pipe(Pipe::new("copper", nominal_mm, m(2.0))),
        )
    }

    #[test]
    fn fitting_takes_smallest_neighbouring_bore() {
        let mut net = network();
        net.connect("p1", "a", "b", pipe(20.0)).unwrap();
        net.connect(
            "v1",
            "b",
            "c",
            Element::new("cold", ElementKind::Fitting(Fitting::new("ball"))),
        )
        .unwrap();
        net.connect("p2", "c", "d", pipe(15.0)).unwrap();

        assert_eq!(net.smallest_connected_diameter_mm("b", "c").unwrap(), 13.6);
        assert!(net.validate().is_ok());
    }

    #[test]
    fn fitting_between_boundaries_has_no_bore() {
        let mut net = network();
        net.connect("s", "a", "b", Element::boundary("cold")).unwrap();
        let err = net.smallest_connected_diameter_mm("a", "b").unwrap_err();
        assert!(matches!(err, ComponentError::MissingDiameter { .. }));
    }

    #[test]
    fn duplicate_element_ids_rejected() {
        let mut net = network();
        net.connect("p1", "a", "b", pipe(20.0)).unwrap();
        let err = net.connect("p1", "b", "c", pipe(20.0)).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }

    #[test]
    fn mixing_valve_occupies_two_edges() {
        let mut net = network();
        let valve = Element::new(
            "cold",
            ElementKind::MixingValve(MixingValve {
                model: "tmv".into(),
                hot_inlet: "h".into(),
                cold_inlet: "c".into(),
                outlet: "o".into(),
            }),
        );
        assert!(net.connect("tmv1", "h", "o", valve.clone()).is_err());
        let (hot, cold) = net.add_mixing_valve("tmv1", valve).unwrap();
        assert_eq!(hot, "tmv1:hot");
        assert_eq!(cold, "tmv1:cold");
        assert_eq!(net.graph().edges().len(), 4);
        assert!(net.validate().is_ok());
    }

    #[test]
    fn unknown_system_fails_validation() {
        let mut net = network();
        net.connect("p1", "a", "b", Element::new("hot", ElementKind::Boundary))
            .unwrap();
        assert!(matches!(
            net.validate(),
            Err(SolverError::ProblemSetup { .. })
        ));
        assert!(matches!(
            net.fluid("hot"),
            Err(ComponentError::UnknownSystem { .. })
        ));
    }

    #[test]
    fn unsupported_fluid_names_the_model() {
        let mut net = network();
        net.add_system(
            "glycol",
            FlowSystem {
                fluid: "propylene glycol".into(),
                temperature: celsius(20.0),
            },
        );
        net.connect("p1", "a", "b", Element::new("glycol", ElementKind::Boundary))
            .unwrap();
        let Err(SolverError::ProblemSetup { what }) = net.validate() else {
            panic!("expected a setup error");
        };
        assert!(what.contains("propylene glycol"), "{what}");
        assert!(what.contains("tabulated"), "{what}");
    }
}
