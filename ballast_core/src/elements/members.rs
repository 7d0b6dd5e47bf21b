//! Elongated members: lattice trusses and pipes.

use uuid::Uuid;

use super::segmentation::segment_by_height;
use super::{Element, WeightBearing, WindInput, WindLoaded};
use crate::aero::{member_wind_force, MemberSegment, Section};
use crate::audit::{codes, Protocol};
use crate::catalog::Catalog;
use crate::errors::CalcResult;
use crate::geometry::{normalize, project_onto_plane, require_distinct, up, Vec3};
use crate::loads::{LoadCase, LoadType, Variability};
use crate::settings::PhysicalConstants;

/// Reference direction of a member section when none is given: the upward
/// direction projected onto the section plane, or +x for vertical members.
fn default_reference(start: &Vec3, end: &Vec3) -> Vec3 {
    normalize(&(end - start))
        .and_then(|axis| project_onto_plane(&up(), &axis))
        .and_then(|r| normalize(&r))
        .unwrap_or_else(|_| Vec3::new(1.0, 0.0, 0.0))
}

/// Straight member geometry shared by trusses and pipes.
#[derive(Debug, Clone, PartialEq)]
struct Member {
    id: Uuid,
    label: String,
    start: Vec3,
    end: Vec3,
    reference: Vec3,
}

impl Member {
    fn new(label: impl Into<String>, start: Vec3, end: Vec3) -> Self {
        Member {
            id: Uuid::new_v4(),
            label: label.into(),
            start,
            end,
            reference: default_reference(&start, &end),
        }
    }

    fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    fn weight(&self, linear_mass: f64, constants: &PhysicalConstants) -> CalcResult<Vec<LoadCase>> {
        require_distinct(&self.start, &self.end, "member weight")?;
        let force = Vec3::new(0.0, 0.0, -linear_mass * self.length() * constants.gravity);
        Ok(vec![LoadCase::new(
            format!("Weight {}", self.label),
            LoadType::Weight,
            Variability::Permanent,
            vec![force],
            vec![vec![self.start, self.end]],
            None,
        )?])
    }

    /// One wind record with one force per height segment.
    ///
    /// An undefined coefficient on any segment drops the whole record and
    /// logs why, so no non-finite force leaves this function.
    fn wind(&self, section: Section<'_>, input: &WindInput<'_>, protocol: &mut Protocol) -> CalcResult<Vec<LoadCase>> {
        let segments = segment_by_height(&self.start, &self.end, input.profile, protocol);
        let segments = protocol.recover(segments, Vec::new)?;
        if segments.is_empty() {
            return Ok(Vec::new());
        }

        let mut forces = Vec::with_capacity(segments.len());
        let mut lines = Vec::with_capacity(segments.len());
        for (i, seg) in segments.iter().enumerate() {
            let mut seg_protocol = protocol.child("segment", (i + 1).to_string());
            let piece = MemberSegment {
                start: seg.start,
                end: seg.end,
                reference: self.reference,
                pressure: seg.pressure,
            };
            let force = member_wind_force(
                input.norm,
                section,
                &piece,
                &input.direction.vector,
                input.constants,
                &mut seg_protocol,
            )?;
            protocol.merge(seg_protocol);
            if !force.iter().all(|c| c.is_finite()) {
                protocol.error(
                    codes::WIND_LOAD_SKIPPED,
                    format!("Wind force on '{}' undefined for segment {}", self.label, i + 1),
                );
                return Ok(Vec::new());
            }
            forces.push(force);
            lines.push(vec![seg.start, seg.end]);
        }

        Ok(vec![LoadCase::new(
            format!("Wind {} ({} deg)", self.label, input.direction.label()),
            LoadType::Wind,
            Variability::Variable,
            forces,
            lines,
            None,
        )?])
    }
}

/// Lattice truss between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct TrussElement {
    member: Member,
    /// Catalog name of the truss type
    pub truss: String,
}

impl TrussElement {
    pub fn new(label: impl Into<String>, truss: impl Into<String>, start: Vec3, end: Vec3) -> Self {
        TrussElement {
            member: Member::new(label, start, end),
            truss: truss.into(),
        }
    }

    /// Override the section reference direction (a face normal of the truss).
    pub fn with_reference(mut self, reference: Vec3) -> CalcResult<Self> {
        self.member.reference = normalize(&reference)?;
        Ok(self)
    }

    pub fn start(&self) -> Vec3 {
        self.member.start
    }

    pub fn end(&self) -> Vec3 {
        self.member.end
    }

    pub fn reference(&self) -> Vec3 {
        self.member.reference
    }
}

impl Element for TrussElement {
    fn id(&self) -> Uuid {
        self.member.id
    }

    fn label(&self) -> &str {
        &self.member.label
    }

    fn top_height(&self) -> f64 {
        self.member.start.z.max(self.member.end.z)
    }

    fn as_weight_bearing(&self) -> Option<&dyn WeightBearing> {
        Some(self)
    }

    fn as_wind_loaded(&self) -> Option<&dyn WindLoaded> {
        Some(self)
    }
}

impl WeightBearing for TrussElement {
    fn weight_loads(&self, constants: &PhysicalConstants, catalog: &Catalog) -> CalcResult<Vec<LoadCase>> {
        let spec = catalog.get_truss(&self.truss)?;
        self.member.weight(spec.linear_mass, constants)
    }
}

impl WindLoaded for TrussElement {
    fn wind_loads(&self, input: &WindInput<'_>, protocol: &mut Protocol) -> CalcResult<Vec<LoadCase>> {
        let spec = protocol.recover(input.catalog.get_truss(&self.truss).map(Some), || None)?;
        match spec {
            Some(spec) => self.member.wind(Section::Truss(spec), input, protocol),
            None => Ok(Vec::new()),
        }
    }
}

/// Circular pipe between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeElement {
    member: Member,
    /// Catalog name of the pipe section
    pub pipe: String,
}

impl PipeElement {
    pub fn new(label: impl Into<String>, pipe: impl Into<String>, start: Vec3, end: Vec3) -> Self {
        PipeElement {
            member: Member::new(label, start, end),
            pipe: pipe.into(),
        }
    }

    pub fn start(&self) -> Vec3 {
        self.member.start
    }

    pub fn end(&self) -> Vec3 {
        self.member.end
    }
}

impl Element for PipeElement {
    fn id(&self) -> Uuid {
        self.member.id
    }

    fn label(&self) -> &str {
        &self.member.label
    }

    fn top_height(&self) -> f64 {
        self.member.start.z.max(self.member.end.z)
    }

    fn as_weight_bearing(&self) -> Option<&dyn WeightBearing> {
        Some(self)
    }

    fn as_wind_loaded(&self) -> Option<&dyn WindLoaded> {
        Some(self)
    }
}

impl WeightBearing for PipeElement {
    fn weight_loads(&self, constants: &PhysicalConstants, catalog: &Catalog) -> CalcResult<Vec<LoadCase>> {
        let spec = catalog.get_pipe(&self.pipe)?;
        self.member.weight(spec.linear_mass(), constants)
    }
}

impl WindLoaded for PipeElement {
    fn wind_loads(&self, input: &WindInput<'_>, protocol: &mut Protocol) -> CalcResult<Vec<LoadCase>> {
        let spec = protocol.recover(input.catalog.get_pipe(&self.pipe).map(Some), || None)?;
        match spec {
            Some(spec) => self.member.wind(Section::Pipe(spec), input, protocol),
            None => Ok(Vec::new()),
        }
    }
}
