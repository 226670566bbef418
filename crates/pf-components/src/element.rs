//! Network elements and the signed head-loss dispatch.

use crate::common::{check_finite, velocity_mps};
use crate::error::ComponentResult;
use crate::pipe::Pipe;
use crate::traits::LossContext;
use crate::valve::{Fitting, MixingValve};

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Pipe(Pipe),
    Fitting(Fitting),
    MixingValve(MixingValve),
    /// Sources, fixtures and plain connections: no loss.
    Boundary,
}

/// One edge of a piping network: what it is and which flow system it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub system: String,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(system: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            system: system.into(),
            kind,
        }
    }

    pub fn boundary(system: impl Into<String>) -> Self {
        Self::new(system, ElementKind::Boundary)
    }

    /// Short type name for reports and logs.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Pipe(_) => "pipe",
            ElementKind::Fitting(_) => "fitting",
            ElementKind::MixingValve(_) => "mixing_valve",
            ElementKind::Boundary => "boundary",
        }
    }

    /// Internal diameter [mm] if this element is a pipe.
    pub fn pipe_diameter_mm(&self, ctx: &dyn LossContext) -> ComponentResult<Option<f64>> {
        match &self.kind {
            ElementKind::Pipe(pipe) => pipe.internal_diameter_mm(ctx).map(Some),
            _ => Ok(None),
        }
    }

    /// Head loss [m] for `flow_ls` travelling `from -> to`.
    ///
    /// A negative flow is evaluated as the same magnitude travelling `to -> from`.
    /// With `signed` set the loss then comes back negated, so it always opposes
    /// the flow; otherwise the magnitude is returned.
    pub fn head_loss(
        &self,
        ctx: &dyn LossContext,
        flow_ls: f64,
        from: &str,
        to: &str,
        signed: bool,
    ) -> ComponentResult<f64> {
        check_finite(flow_ls, "flow rate")?;
        let (flow, from, to, flipped) = if flow_ls < 0.0 {
            (-flow_ls, to, from, true)
        } else {
            (flow_ls, from, to, false)
        };

        let loss = match &self.kind {
            ElementKind::Pipe(pipe) => pipe.head_loss(ctx, &self.system, flow)?,
            ElementKind::Fitting(fitting) => fitting.head_loss(ctx, flow, from, to)?,
            ElementKind::MixingValve(valve) => {
                valve.head_loss(ctx, &self.system, flow, from, to)?
            }
            ElementKind::Boundary => 0.0,
        };
        check_finite(loss, "head loss")?;

        Ok(if signed && flipped { -loss } else { loss })
    }

    /// Mean velocity [m/s] for elements with a defined bore.
    ///
    /// Pipes use their own bore, fittings the narrowest neighbour. Mixing valves
    /// and boundaries have none.
    pub fn velocity_mps(
        &self,
        ctx: &dyn LossContext,
        flow_ls: f64,
        from: &str,
        to: &str,
    ) -> ComponentResult<Option<f64>> {
        let diameter_mm = match &self.kind {
            ElementKind::Pipe(pipe) => pipe.internal_diameter_mm(ctx)?,
            ElementKind::Fitting(_) => ctx.smallest_connected_diameter_mm(from, to)?,
            ElementKind::MixingValve(_) | ElementKind::Boundary => return Ok(None),
        };
        Ok(Some(velocity_mps(flow_ls.abs(), diameter_mm)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        Catalog, KValuePoint, MixingValveTable, PipeMaterial, PipeSize, PressureDropPoint,
        ValveKTable,
    };
    use crate::error::ComponentError;
    use crate::valve::BACKFLOW_PENALTY;
    use pf_core::units::{constants::g0, kg_per_m3, m, pa_s};
    use pf_core::units::Accel;
    use pf_fluids::FluidProperties;

    struct Fixture {
        catalog: Catalog,
        fitting_bore_mm: Option<f64>,
    }

    impl LossContext for Fixture {
        fn catalog(&self) -> &Catalog {
            &self.catalog
        }

        fn gravity(&self) -> Accel {
            g0()
        }

        fn fluid(&self, system: &str) -> ComponentResult<FluidProperties> {
            if system != "cold" {
                return Err(ComponentError::UnknownSystem {
                    system: system.into(),
                });
            }
            Ok(FluidProperties {
                density: kg_per_m3(998.21),
                dynamic_viscosity: pa_s(1.002e-3),
            })
        }

        fn smallest_connected_diameter_mm(&self, from: &str, to: &str) -> ComponentResult<f64> {
            self.fitting_bore_mm
                .ok_or_else(|| ComponentError::MissingDiameter {
                    from: from.into(),
                    to: to.into(),
                })
        }
    }

    fn fixture() -> Fixture {
        let mut catalog = Catalog::default();
        catalog.pipes.insert(
            "copper".into(),
            PipeMaterial {
                colebrook_roughness_mm: 0.0015,
                sizes: vec![PipeSize {
                    nominal_mm: 20.0,
                    internal_diameter_mm: 20.0,
                }],
            },
        );
        catalog.valves.insert(
            "ball".into(),
            ValveKTable {
                k_values: vec![KValuePoint {
                    diameter_mm: 13.6,
                    k: 0.5,
                }],
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
        Fixture {
            catalog,
            fitting_bore_mm: Some(13.6),
        }
    }

    fn pipe() -> Element {
        Element::new("cold", ElementKind::Pipe(Pipe::new("copper", 20.0, m(10.0))))
    }

    fn mixer() -> Element {
        Element::new(
            "cold",
            ElementKind::MixingValve(MixingValve {
                model: "tmv".into(),
                hot_inlet: "h".into(),
                cold_inlet: "c".into(),
                outlet: "o".into(),
            }),
        )
    }

    #[test]
    fn pipe_loss_matches_hand_calculation() {
        let ctx = fixture();
        let loss = pipe().head_loss(&ctx, 0.2, "a", "b", true).unwrap();
        assert!((loss - 0.301_202_643_134_974_3).abs() < 1e-9, "{loss}");
    }

    #[test]
    fn negative_flow_flips_sign_only_when_signed() {
        let ctx = fixture();
        let forward = pipe().head_loss(&ctx, 0.2, "a", "b", true).unwrap();
        let signed = pipe().head_loss(&ctx, -0.2, "a", "b", true).unwrap();
        let unsigned = pipe().head_loss(&ctx, -0.2, "a", "b", false).unwrap();
        assert_eq!(signed, -forward);
        assert_eq!(unsigned, forward);
    }

    #[test]
    fn zero_flow_is_lossless() {
        let ctx = fixture();
        assert_eq!(pipe().head_loss(&ctx, 0.0, "a", "b", true).unwrap(), 0.0);
    }

    #[test]
    fn fitting_uses_connected_bore() {
        let ctx = fixture();
        let fitting = Element::new("cold", ElementKind::Fitting(Fitting::new("ball")));
        let loss = fitting.head_loss(&ctx, 0.2, "a", "b", true).unwrap();
        assert!((loss - 0.048_321_891_761_412_32).abs() < 1e-9, "{loss}");

        let velocity = fitting.velocity_mps(&ctx, -0.2, "a", "b").unwrap().unwrap();
        assert!((velocity - 1.376_772_864_116_741_8).abs() < 1e-9);
    }

    #[test]
    fn fitting_without_pipes_fails() {
        let mut ctx = fixture();
        ctx.fitting_bore_mm = None;
        let fitting = Element::new("cold", ElementKind::Fitting(Fitting::new("ball")));
        let err = fitting.head_loss(&ctx, 0.2, "a", "b", true).unwrap_err();
        assert!(matches!(err, ComponentError::MissingDiameter { .. }));
    }

    #[test]
    fn mixing_valve_forward_converts_kpa_to_head() {
        let ctx = fixture();
        let loss = mixer().head_loss(&ctx, 0.2, "c", "o", true).unwrap();
        assert!((loss - 2.043_089_556_261_565).abs() < 1e-9, "{loss}");
        assert_eq!(
            mixer().head_loss(&ctx, 0.2, "h", "o", true).unwrap(),
            loss
        );
    }

    #[test]
    fn mixing_valve_penalizes_backflow() {
        let ctx = fixture();
        let loss = mixer().head_loss(&ctx, 0.2, "o", "c", false).unwrap();
        assert_eq!(loss, BACKFLOW_PENALTY + 0.2);
        // Inlet to inlet is not a valid path either.
        let loss = mixer().head_loss(&ctx, 0.1, "h", "c", false).unwrap();
        assert_eq!(loss, BACKFLOW_PENALTY + 0.1);
        // Negative flow o <- c is really c -> o.
        let loss = mixer().head_loss(&ctx, -0.2, "o", "c", true).unwrap();
        assert!(loss < 0.0 && loss > -3.0);
    }

    #[test]
    fn boundary_is_lossless() {
        let ctx = fixture();
        let boundary = Element::boundary("cold");
        assert_eq!(boundary.head_loss(&ctx, 5.0, "s", "a", true).unwrap(), 0.0);
        assert_eq!(boundary.velocity_mps(&ctx, 5.0, "s", "a").unwrap(), None);
    }

    #[test]
    fn unknown_system_is_an_error() {
        let ctx = fixture();
        let mut element = pipe();
        element.system = "steam".into();
        assert!(matches!(
            element.head_loss(&ctx, 0.2, "a", "b", true),
            Err(ComponentError::UnknownSystem { .. })
        ));
    }

    #[test]
    fn non_finite_flow_is_rejected() {
        let ctx = fixture();
        assert!(pipe().head_loss(&ctx, f64::NAN, "a", "b", true).is_err());
    }
}
