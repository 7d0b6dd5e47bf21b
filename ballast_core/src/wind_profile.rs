//! # Wind Pressure Profiles
//!
//! Piecewise-constant dynamic pressure over height, and the scenarios each
//! norm evaluates:
//!
//! | norm     | primary                              | fallback                      |
//! |----------|--------------------------------------|-------------------------------|
//! | EN 13814 | out of service, height table to 50 m | in service, 0.20 kN/m² to 50 m |
//! | EN 17879 | non-operating, wind-zone table       | operating, ½ρv² to 25 m       |
//! | EN 1991  | wind-zone table                      | none                          |
//!
//! Zone tables cover 0–10 m, 10–18 m and 18–25 m. An optional temporary
//! reduction factor scales zone pressures. A construction taller than the
//! table is [`CalcError::HeightExceedsTable`].

use serde::{Deserialize, Serialize};

use crate::audit::{Formula, Protocol, Source};
use crate::errors::{CalcError, CalcResult};
use crate::norms::Norm;
use crate::settings::{AnalysisSettings, WindZone};

/// One band of constant pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightBand {
    /// Lower edge (m)
    pub bottom: f64,
    /// Upper edge (m)
    pub top: f64,
    /// Dynamic pressure (N/m²)
    pub pressure: f64,
}

/// Dynamic pressure over height. Bands are contiguous from 0 m upwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindProfile {
    bands: Vec<HeightBand>,
}

impl WindProfile {
    /// Build a profile from ascending band tops and one pressure per band.
    pub fn from_table(tops: &[f64], pressures: &[f64]) -> CalcResult<Self> {
        if tops.is_empty() || tops.len() != pressures.len() {
            return Err(CalcError::invalid_input(
                "wind_profile",
                format!("{} tops, {} pressures", tops.len(), pressures.len()),
                "need one pressure per band and at least one band",
            ));
        }
        let mut bottom = 0.0;
        let mut bands = Vec::with_capacity(tops.len());
        for (&top, &pressure) in tops.iter().zip(pressures) {
            if !(top > bottom && top.is_finite()) {
                return Err(CalcError::invalid_input(
                    "wind_profile.tops",
                    format!("{:?}", tops),
                    "band tops must be positive and strictly increasing",
                ));
            }
            if !(pressure.is_finite() && pressure >= 0.0) {
                return Err(CalcError::invalid_input(
                    "wind_profile.pressures",
                    pressure.to_string(),
                    "pressures must be finite and non-negative",
                ));
            }
            bands.push(HeightBand { bottom, top, pressure });
            bottom = top;
        }
        Ok(WindProfile { bands })
    }

    /// Single band of constant pressure.
    pub fn constant(top: f64, pressure: f64) -> CalcResult<Self> {
        Self::from_table(&[top], &[pressure])
    }

    pub fn bands(&self) -> &[HeightBand] {
        &self.bands
    }

    /// Top of the highest band
    pub fn max_height(&self) -> f64 {
        self.bands.last().map(|b| b.top).unwrap_or(0.0)
    }

    /// Interior band boundaries, ascending (tops of all bands but the last).
    pub fn boundaries(&self) -> Vec<f64> {
        self.bands[..self.bands.len().saturating_sub(1)]
            .iter()
            .map(|b| b.top)
            .collect()
    }

    /// Index of the band containing `z`. Heights above the table use the last band.
    pub fn band_index(&self, z: f64) -> usize {
        self.bands
            .iter()
            .position(|b| z < b.top)
            .unwrap_or(self.bands.len().saturating_sub(1))
    }

    pub fn pressure_at(&self, z: f64) -> f64 {
        self.bands[self.band_index(z)].pressure
    }

    /// Highest pressure of any band touched by the height range.
    pub fn max_pressure_between(&self, z_low: f64, z_high: f64) -> f64 {
        let (lo, hi) = (self.band_index(z_low), self.band_index(z_high));
        self.bands[lo.min(hi)..=lo.max(hi)]
            .iter()
            .map(|b| b.pressure)
            .fold(0.0, f64::max)
    }

    /// Same profile with every pressure multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        WindProfile {
            bands: self
                .bands
                .iter()
                .map(|b| HeightBand {
                    pressure: b.pressure * factor,
                    ..*b
                })
                .collect(),
        }
    }
}

/// A labelled pressure profile a norm is evaluated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub norm: Norm,
    pub label: String,
    pub profile: WindProfile,
}

impl Scenario {
    /// Key identifying the loads this scenario generates.
    pub fn fingerprint(&self) -> String {
        let pressures: Vec<String> = self
            .profile
            .bands()
            .iter()
            .map(|b| format!("{}:{}", b.top, b.pressure))
            .collect();
        format!("{}|{}|{}", self.norm.code(), self.label, pressures.join(","))
    }

    pub fn source(&self) -> Source {
        match self.norm {
            Norm::En13814 => Source::En13814 { section: "wind loads" },
            Norm::En17879 => Source::En17879 { section: "wind actions" },
            Norm::En1991 => Source::En1991 { section: "4.5, national wind zone map" },
        }
    }

    /// Document every band pressure.
    pub fn document(&self, protocol: &mut Protocol) {
        for band in self.profile.bands() {
            protocol.document(
                Formula::DynamicPressure
                    .bundle_cited(band.pressure, &self.source())
                    .with_context("band", format!("{}-{} m", band.bottom, band.top)),
            );
        }
    }
}

/// EN 13814 out-of-service height table (tops in m, pressures in N/m²)
const EN13814_TOPS: [f64; 4] = [8.0, 20.0, 35.0, 50.0];
const EN13814_OUT_OF_SERVICE: [f64; 4] = [500.0, 650.0, 800.0, 900.0];
/// EN 13814 in-service pressure
const EN13814_IN_SERVICE: f64 = 200.0;

/// Wind-zone tables
const ZONE_TOPS: [f64; 3] = [10.0, 18.0, 25.0];

fn zone_pressures(zone: WindZone) -> [f64; 3] {
    match zone {
        WindZone::Zone1 => [500.0, 650.0, 750.0],
        WindZone::Zone2 => [650.0, 800.0, 900.0],
        WindZone::Zone3 => [800.0, 950.0, 1100.0],
        WindZone::Zone4 => [950.0, 1150.0, 1300.0],
    }
}

/// Operating-state profile height limit for event structures (m)
const OPERATING_MAX_HEIGHT: f64 = 25.0;

fn check_height(profile: &WindProfile, height: f64) -> CalcResult<()> {
    if !height.is_finite() || height < 0.0 {
        return Err(CalcError::invalid_input("height", height.to_string(), "construction height must be non-negative"));
    }
    if height > profile.max_height() {
        return Err(CalcError::HeightExceedsTable {
            height_m: height,
            max_height_m: profile.max_height(),
        });
    }
    Ok(())
}

fn zone_profile(settings: &AnalysisSettings) -> CalcResult<WindProfile> {
    let profile = WindProfile::from_table(&ZONE_TOPS, &zone_pressures(settings.wind_zone))?;
    Ok(match settings.temporary_reduction {
        Some(factor) => profile.scaled(factor),
        None => profile,
    })
}

fn zone_label(prefix: &str, settings: &AnalysisSettings) -> String {
    match settings.temporary_reduction {
        Some(r) => format!("{} {} (reduced x{})", prefix, settings.wind_zone.code(), r),
        None => format!("{} {}", prefix, settings.wind_zone.code()),
    }
}

/// Primary scenario of a norm for a construction of the given height.
pub fn primary_scenario(norm: Norm, settings: &AnalysisSettings, height: f64) -> CalcResult<Scenario> {
    let (label, profile) = match norm {
        Norm::En13814 => (
            "out of service".to_string(),
            WindProfile::from_table(&EN13814_TOPS, &EN13814_OUT_OF_SERVICE)?,
        ),
        Norm::En17879 => (zone_label("non-operating", settings), zone_profile(settings)?),
        Norm::En1991 => (zone_label("wind zone", settings), zone_profile(settings)?),
    };
    check_height(&profile, height)?;
    Ok(Scenario { norm, label, profile })
}

/// Alternate scenario evaluated when the primary one falls short, if the norm has one.
pub fn fallback_scenario(norm: Norm, settings: &AnalysisSettings, height: f64) -> Option<CalcResult<Scenario>> {
    let built = match norm {
        Norm::En13814 => WindProfile::constant(EN13814_TOPS[EN13814_TOPS.len() - 1], EN13814_IN_SERVICE)
            .map(|p| ("in service".to_string(), p)),
        Norm::En17879 => {
            let v = settings.operating_wind_speed;
            let q = 0.5 * settings.constants.air_density * v * v;
            WindProfile::constant(OPERATING_MAX_HEIGHT, q).map(|p| (format!("operating (v = {} m/s)", v), p))
        }
        Norm::En1991 => return None,
    };
    Some(built.and_then(|(label, profile)| {
        check_height(&profile, height)?;
        Ok(Scenario { norm, label, profile })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_band_lookup() {
        let p = WindProfile::from_table(&EN13814_TOPS, &EN13814_OUT_OF_SERVICE).unwrap();
        assert_eq!(p.pressure_at(0.0), 500.0);
        assert_eq!(p.pressure_at(7.99), 500.0);
        assert_eq!(p.pressure_at(8.0), 650.0);
        assert_eq!(p.pressure_at(60.0), 900.0);
        assert_eq!(p.boundaries(), vec![8.0, 20.0, 35.0]);
        assert_eq!(p.max_pressure_between(5.0, 21.0), 800.0);
    }

    #[test]
    fn test_invalid_tables() {
        assert!(WindProfile::from_table(&[10.0, 5.0], &[1.0, 2.0]).is_err());
        assert!(WindProfile::from_table(&[10.0], &[1.0, 2.0]).is_err());
        assert!(WindProfile::from_table(&[10.0], &[-1.0]).is_err());
    }

    #[test]
    fn test_zone_table_with_reduction() {
        let settings = AnalysisSettings {
            wind_zone: WindZone::Zone3,
            temporary_reduction: Some(0.5),
            ..AnalysisSettings::default()
        };
        let s = primary_scenario(Norm::En1991, &settings, 12.0).unwrap();
        assert_relative_eq!(s.profile.pressure_at(12.0), 475.0);
        assert!(s.label.contains("WZ3"));
    }

    #[test]
    fn test_height_exceeds_table() {
        let settings = AnalysisSettings::default();
        let err = primary_scenario(Norm::En1991, &settings, 30.0).unwrap_err();
        assert!(matches!(err, CalcError::HeightExceedsTable { .. }));
        assert!(primary_scenario(Norm::En13814, &settings, 30.0).is_ok());
    }

    #[test]
    fn test_fallbacks() {
        let settings = AnalysisSettings::default();
        let en17879 = fallback_scenario(Norm::En17879, &settings, 6.0).unwrap().unwrap();
        // 0.5 * 1.25 * 15^2
        assert_relative_eq!(en17879.profile.pressure_at(3.0), 140.625);
        let en13814 = fallback_scenario(Norm::En13814, &settings, 6.0).unwrap().unwrap();
        assert_eq!(en13814.profile.pressure_at(3.0), 200.0);
        assert!(fallback_scenario(Norm::En1991, &settings, 6.0).is_none());
        assert!(fallback_scenario(Norm::En17879, &settings, 40.0).unwrap().is_err());
    }

    #[test]
    fn test_fingerprint_distinguishes_scenarios() {
        let settings = AnalysisSettings::default();
        let a = primary_scenario(Norm::En17879, &settings, 5.0).unwrap();
        let b = fallback_scenario(Norm::En17879, &settings, 5.0).unwrap().unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), primary_scenario(Norm::En17879, &settings, 5.0).unwrap().fingerprint());
    }
}
