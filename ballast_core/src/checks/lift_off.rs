//! Lift-off check: factored downward holding force against factored uplift.

use super::sliding::vertical_envelope;
use super::{finish, pooled_loads, CheckContext, CheckKind, CheckOutcome, DirectionResult};
use crate::audit::{codes, DocBundle, Formula};
use crate::construction::Construction;
use crate::errors::CalcResult;
use crate::geometry::EPS;

/// Run the lift-off check.
pub fn check_lift_off(construction: &mut dyn Construction, ctx: &CheckContext<'_>) -> CalcResult<CheckOutcome> {
    let kind = CheckKind::LiftOff;
    let protocol = ctx.protocol(kind);
    construction.validate()?;
    let entries = pooled_loads(construction, ctx)?;
    let elements = construction.elements();
    let settings = ctx.settings;

    let mut per_direction = Vec::with_capacity(entries.len());
    let mut trails = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(direction) = entry.direction else {
            continue;
        };
        let mut trail = protocol.child("wind_angle", direction.label());
        trail.merge_docs(entry.protocol);

        let vertical = vertical_envelope(elements, &entry.loads, &mut trail);
        let (ratio, ballast_kg) = if vertical.upward <= EPS {
            trail.info(codes::NO_UPLIFT, "No upward force");
            (f64::INFINITY, 0.0)
        } else {
            let deficit = (settings.required_safety * vertical.upward - vertical.downward).max(0.0);
            (
                vertical.downward / vertical.upward,
                deficit / (settings.constants.gravity * settings.ballast_safety_factor),
            )
        };
        trail.document(
            Formula::LiftOffSafety
                .bundle(ratio)
                .with_sub_value(DocBundle::new("D", vertical.downward).with_unit("N"))
                .with_sub_value(DocBundle::new("U", vertical.upward).with_unit("N")),
        );
        per_direction.push(DirectionResult {
            angle_deg: direction.angle_deg,
            ratio,
            ballast_kg,
            axis: None,
        });
        trails.push(trail);
    }

    Ok(finish(kind, per_direction, trails, protocol, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Material};
    use crate::construction::Assembly;
    use crate::elements::{BasePlate, PipeElement};
    use crate::geometry::Vec3;
    use crate::norms::Norm;
    use crate::settings::AnalysisSettings;
    use crate::wind_profile::primary_scenario;

    #[test]
    fn test_horizontal_wind_gives_no_uplift() {
        let mut gate = Assembly::new("Gate")
            .with(BasePlate::new("BP", "BP-600x600", Vec3::zeros(), Material::Concrete))
            .with(PipeElement::new("Post", "60.3x3.6", Vec3::zeros(), Vec3::new(0.0, 0.0, 3.0)));
        let settings = AnalysisSettings::default();
        let scenario = primary_scenario(Norm::En17879, &settings, 3.0).unwrap();
        let catalog = Catalog::builtin();
        let ctx = CheckContext {
            norm: Norm::En17879,
            scenario: &scenario,
            settings: &settings,
            catalog: &catalog,
            reset: false,
        };
        let out = check_lift_off(&mut gate, &ctx).unwrap();
        assert!(out.ratio.is_infinite());
        assert_eq!(out.ballast_kg, 0.0);
        assert_eq!(out.per_direction.len(), 4);
    }
}
