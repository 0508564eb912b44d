//! Randomized regeneration of the parameter set.

use rand::Rng;

use crate::param::{ParamKind, ParamName, Parameters, DEFAULT_SEED, SEED_MAX};

/// How shuffle draws a new value for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sampling {
    /// Keep whatever the current set has.
    Carry,
    /// `true` with the given probability.
    Coin(f64),
    /// Whole number drawn uniformly from the declared range.
    Uniform,
    /// Zero with the given probability, otherwise `Uniform`. Used for effects
    /// that look best when most shuffles leave them out.
    OftenZero(f64),
    /// Redraw the interior control points.
    Curve,
}

pub fn sampling(name: ParamName) -> Sampling {
    match name {
        ParamName::EnableDarkMode | ParamName::EnableMargins => Sampling::Carry,
        ParamName::Seed => Sampling::Uniform,
        ParamName::EnableOcclusion => Sampling::Coin(0.75),
        ParamName::EnableMirrored => Sampling::Coin(0.5),
        ParamName::PeaksCurve => Sampling::Curve,
        ParamName::AmplitudeAmount
        | ParamName::Wavelength
        | ParamName::Perspective
        | ParamName::LineAmount
        | ParamName::PersonInflateAmount
        | ParamName::WaterBoilAmount
        | ParamName::BallSize => Sampling::Uniform,
        ParamName::OctaveAmount
        | ParamName::Spikyness
        | ParamName::StaticAmount
        | ParamName::PolarAmount
        | ParamName::Omega
        | ParamName::SplitUniverse
        | ParamName::DotAmount => Sampling::OftenZero(0.6),
    }
}

pub fn random_seed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(0..=SEED_MAX)
}

/// A random seed that is never `DEFAULT_SEED`.
pub fn fresh_seed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    loop {
        let seed = random_seed(rng);
        if seed != DEFAULT_SEED {
            return seed;
        }
    }
}

/// Draw a new parameter set. Never fails and never returns a blank set:
/// if every powered numeric lands on zero, `lineAmount` is redrawn above zero.
pub fn shuffle<R: Rng + ?Sized>(current: &Parameters, rng: &mut R) -> Parameters {
    let mut next = current.clone();
    next.seed = random_seed(rng);

    for name in ParamName::ALL {
        match (sampling(name), name.kind()) {
            (Sampling::Coin(p), ParamKind::Flag) => {
                if let Some(slot) = next.flag_mut(name) {
                    *slot = rng.gen_bool(p);
                }
            }
            (Sampling::Uniform, ParamKind::Amount(range)) => {
                if let Some(slot) = next.amount_mut(name) {
                    *slot = range.clamp(rng.gen_range(range.min..=range.max).round());
                }
            }
            (Sampling::OftenZero(p), ParamKind::Amount(range)) => {
                if let Some(slot) = next.amount_mut(name) {
                    *slot = if rng.gen_bool(p) {
                        range.min
                    } else {
                        range.clamp(rng.gen_range(range.min..=range.max).round())
                    };
                }
            }
            (Sampling::Curve, ParamKind::Curve) => {
                next.peaks_curve = current.peaks_curve.resample_interior(rng);
            }
            _ => {}
        }
    }

    if next.is_blank() {
        if let ParamKind::Amount(range) = ParamName::LineAmount.kind() {
            next.line_amount = range.clamp(rng.gen_range(1.0..=range.max).round());
        }
    }

    log::debug!(target: "engine::shuffle", "shuffled to seed {}", next.seed);
    next
}
