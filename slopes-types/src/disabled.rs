//! Which parameters currently have no visual effect.
//!
//! A rule fires when its source parameter is "off" (an amount at zero or a flag
//! set to false) and marks its dependents as disabled. Disabled parameters keep
//! their values; consumers only present them as inert.

use std::collections::BTreeSet;

use crate::param::{ParamName, Parameters};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisableRule {
    pub source: ParamName,
    pub disables: &'static [ParamName],
}

pub const DISABLE_RULES: &[DisableRule] = &[
    // No peaks: nothing for wavelength, octaves, spikes or the curve to shape.
    DisableRule {
        source: ParamName::AmplitudeAmount,
        disables: &[
            ParamName::Wavelength,
            ParamName::OctaveAmount,
            ParamName::Spikyness,
            ParamName::PeaksCurve,
        ],
    },
    DisableRule {
        source: ParamName::LineAmount,
        disables: &[ParamName::Perspective, ParamName::EnableOcclusion, ParamName::StaticAmount],
    },
    // Flat view: lines never overlap.
    DisableRule {
        source: ParamName::Perspective,
        disables: &[ParamName::EnableOcclusion],
    },
    DisableRule {
        source: ParamName::PolarAmount,
        disables: &[ParamName::Omega, ParamName::BallSize],
    },
    DisableRule {
        source: ParamName::SplitUniverse,
        disables: &[ParamName::EnableMirrored],
    },
];

pub fn resolve(parameters: &Parameters) -> BTreeSet<ParamName> {
    resolve_with(DISABLE_RULES, parameters)
}

pub fn resolve_with(rules: &[DisableRule], parameters: &Parameters) -> BTreeSet<ParamName> {
    rules
        .iter()
        .filter(|rule| parameters.is_off(rule.source))
        .flat_map(|rule| rule.disables.iter().copied())
        .collect()
}
