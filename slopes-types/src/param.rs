use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;

/// Largest seed the randomizer hands out.
pub const SEED_MAX: u32 = 1_000_000;

/// Seed baked into `Parameters::default()`. Fresh sessions and power-on never reuse it.
pub const DEFAULT_SEED: u32 = 31_415;

/// Partial mapping of parameter name to value: only the keys one history step touched.
pub type ParameterSnapshot = BTreeMap<ParamName, ParamValue>;

/// The closed set of tunable parameters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ParamName {
    Seed,
    EnableDarkMode,
    EnableMargins,
    EnableOcclusion,
    AmplitudeAmount,
    Wavelength,
    OctaveAmount,
    Perspective,
    LineAmount,
    Spikyness,
    StaticAmount,
    PolarAmount,
    Omega,
    SplitUniverse,
    PersonInflateAmount,
    WaterBoilAmount,
    BallSize,
    DotAmount,
    PeaksCurve,
    /// Undocumented flag; behaves like any other boolean.
    EnableMirrored,
}

impl ParamName {
    pub const ALL: [ParamName; 20] = [
        ParamName::Seed,
        ParamName::EnableDarkMode,
        ParamName::EnableMargins,
        ParamName::EnableOcclusion,
        ParamName::AmplitudeAmount,
        ParamName::Wavelength,
        ParamName::OctaveAmount,
        ParamName::Perspective,
        ParamName::LineAmount,
        ParamName::Spikyness,
        ParamName::StaticAmount,
        ParamName::PolarAmount,
        ParamName::Omega,
        ParamName::SplitUniverse,
        ParamName::PersonInflateAmount,
        ParamName::WaterBoilAmount,
        ParamName::BallSize,
        ParamName::DotAmount,
        ParamName::PeaksCurve,
        ParamName::EnableMirrored,
    ];

    /// Flags that survive a power cycle and are left alone by shuffle.
    pub const COSMETIC: [ParamName; 2] = [ParamName::EnableDarkMode, ParamName::EnableMargins];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::Seed => "seed",
            ParamName::EnableDarkMode => "enableDarkMode",
            ParamName::EnableMargins => "enableMargins",
            ParamName::EnableOcclusion => "enableOcclusion",
            ParamName::AmplitudeAmount => "amplitudeAmount",
            ParamName::Wavelength => "wavelength",
            ParamName::OctaveAmount => "octaveAmount",
            ParamName::Perspective => "perspective",
            ParamName::LineAmount => "lineAmount",
            ParamName::Spikyness => "spikyness",
            ParamName::StaticAmount => "staticAmount",
            ParamName::PolarAmount => "polarAmount",
            ParamName::Omega => "omega",
            ParamName::SplitUniverse => "splitUniverse",
            ParamName::PersonInflateAmount => "personInflateAmount",
            ParamName::WaterBoilAmount => "waterBoilAmount",
            ParamName::BallSize => "ballSize",
            ParamName::DotAmount => "dotAmount",
            ParamName::PeaksCurve => "peaksCurve",
            ParamName::EnableMirrored => "enableMirrored",
        }
    }

    pub fn kind(self) -> ParamKind {
        let amount = |default: f32| ParamKind::Amount(AmountRange::percent(default));
        match self {
            ParamName::Seed => ParamKind::Seed,
            ParamName::EnableDarkMode
            | ParamName::EnableMargins
            | ParamName::EnableOcclusion
            | ParamName::EnableMirrored => ParamKind::Flag,
            ParamName::PeaksCurve => ParamKind::Curve,
            ParamName::AmplitudeAmount => amount(50.0),
            ParamName::Wavelength => amount(25.0),
            ParamName::OctaveAmount => amount(0.0),
            ParamName::Perspective => amount(45.0),
            ParamName::LineAmount => amount(45.0),
            ParamName::Spikyness => amount(0.0),
            ParamName::StaticAmount => amount(0.0),
            ParamName::PolarAmount => amount(0.0),
            ParamName::Omega => amount(0.0),
            ParamName::SplitUniverse => amount(0.0),
            ParamName::PersonInflateAmount => amount(50.0),
            ParamName::WaterBoilAmount => amount(100.0),
            ParamName::BallSize => amount(50.0),
            ParamName::DotAmount => amount(0.0),
        }
    }

    /// Bounded numerics are the "powered" parameters: they drop to zero when the machine is off.
    pub fn is_powered(self) -> bool {
        matches!(self.kind(), ParamKind::Amount(_))
    }

    pub fn powered() -> impl Iterator<Item = ParamName> {
        Self::ALL.into_iter().filter(|name| name.is_powered())
    }

    /// Parse user text into a value of this parameter's kind.
    pub fn parse_value(self, text: &str) -> Result<ParamValue, EngineError> {
        let text = text.trim();
        let invalid = || EngineError::InvalidValue {
            name: self,
            reason: format!("cannot parse {:?}", text),
        };
        match self.kind() {
            ParamKind::Seed => text.parse::<u32>().map(ParamValue::Int).map_err(|_| invalid()),
            ParamKind::Flag => match text.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(ParamValue::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(ParamValue::Bool(false)),
                _ => Err(invalid()),
            },
            ParamKind::Amount(_) => text.parse::<f32>().map(ParamValue::Float).map_err(|_| invalid()),
            ParamKind::Curve => text.parse::<Curve>().map(ParamValue::Curve).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| EngineError::InvalidParameterName(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    Seed,
    Flag,
    Amount(AmountRange),
    Curve,
}

impl ParamKind {
    pub fn label(&self) -> &'static str {
        match self {
            ParamKind::Seed => "seed",
            ParamKind::Flag => "boolean",
            ParamKind::Amount(_) => "numeric",
            ParamKind::Curve => "curve",
        }
    }
}

/// Declared range of a bounded numeric. The powered-off value is always `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl AmountRange {
    pub fn percent(default: f32) -> Self {
        Self { min: 0.0, max: 100.0, default }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Control points of a curve, ordered, each inside the unit square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f32; 2]>", into = "Vec<[f32; 2]>")]
pub struct Curve(Vec<[f32; 2]>);

impl Curve {
    pub fn new(points: Vec<[f32; 2]>) -> Result<Self, String> {
        if points.len() < 2 {
            return Err(format!("a curve needs at least 2 points, got {}", points.len()));
        }
        if points.iter().flatten().any(|c| !c.is_finite()) {
            return Err("curve coordinates must be finite".to_string());
        }
        Ok(Self(
            points
                .into_iter()
                .map(|[x, y]| [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)])
                .collect(),
        ))
    }

    pub fn peaks_default() -> Self {
        Self(vec![[0.5, 0.0], [0.5, 0.5], [0.5, 1.0]])
    }

    pub fn points(&self) -> &[[f32; 2]] {
        &self.0
    }

    /// Redraw every interior control point; the end points stay put.
    pub fn resample_interior<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let last = self.0.len().saturating_sub(1);
        let points = self
            .0
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 || i == last {
                    *p
                } else {
                    [round2(rng.gen::<f32>()), round2(rng.gen::<f32>())]
                }
            })
            .collect();
        Self(points)
    }
}

impl TryFrom<Vec<[f32; 2]>> for Curve {
    type Error = String;

    fn try_from(points: Vec<[f32; 2]>) -> Result<Self, Self::Error> {
        Curve::new(points)
    }
}

impl From<Curve> for Vec<[f32; 2]> {
    fn from(curve: Curve) -> Self {
        curve.0
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::peaks_default()
    }
}

/// `x,y x,y ...` with at least two points.
impl FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let points = s
            .split_whitespace()
            .map(|pair| {
                let (x, y) = pair
                    .split_once(',')
                    .ok_or_else(|| format!("expected x,y but got {:?}", pair))?;
                let x = x.parse::<f32>().map_err(|e| e.to_string())?;
                let y = y.parse::<f32>().map_err(|e| e.to_string())?;
                Ok([x, y])
            })
            .collect::<Result<Vec<_>, String>>()?;
        Curve::new(points)
    }
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// A single parameter value. Untagged so JSON stays `80`, `true` or `[[0.5, 0.0], ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(u32),
    Float(f32),
    Curve(Curve),
}

impl ParamValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ParamValue::Int(v) => Some(*v as f32),
            ParamValue::Float(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    fn as_seed(&self) -> Option<u32> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) if v.is_finite() && *v >= 0.0 => Some(v.round() as u32),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{:.2}", v),
            ParamValue::Curve(c) => {
                let parts: Vec<String> = c.points().iter().map(|[x, y]| format!("{},{}", x, y)).collect();
                f.write_str(&parts.join(" "))
            }
        }
    }
}

/// The full parameter set. Serializes as a flat object keyed by parameter name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub seed: u32,
    pub enable_dark_mode: bool,
    pub enable_margins: bool,
    pub enable_occlusion: bool,
    pub amplitude_amount: f32,
    pub wavelength: f32,
    pub octave_amount: f32,
    pub perspective: f32,
    pub line_amount: f32,
    pub spikyness: f32,
    pub static_amount: f32,
    pub polar_amount: f32,
    pub omega: f32,
    pub split_universe: f32,
    pub person_inflate_amount: f32,
    pub water_boil_amount: f32,
    pub ball_size: f32,
    pub dot_amount: f32,
    #[serde(deserialize_with = "curve_or_default")]
    pub peaks_curve: Curve,
    pub enable_mirrored: bool,
}

/// A stored curve that fails validation is replaced by the default rather than
/// rejecting the whole record.
fn curve_or_default<'de, D>(deserializer: D) -> Result<Curve, D::Error>
where
    D: Deserializer<'de>,
{
    let points = Vec::<[f32; 2]>::deserialize(deserializer)?;
    Ok(Curve::new(points).unwrap_or_else(|reason| {
        log::warn!(target: "engine", "replacing invalid peaksCurve: {}", reason);
        Curve::peaks_default()
    }))
}

impl Default for Parameters {
    fn default() -> Self {
        Self::defaults_with_seed(DEFAULT_SEED)
    }
}

impl Parameters {
    pub fn defaults_with_seed(seed: u32) -> Self {
        let mut params = Self {
            seed: seed.min(SEED_MAX),
            enable_dark_mode: false,
            enable_margins: true,
            enable_occlusion: true,
            amplitude_amount: 0.0,
            wavelength: 0.0,
            octave_amount: 0.0,
            perspective: 0.0,
            line_amount: 0.0,
            spikyness: 0.0,
            static_amount: 0.0,
            polar_amount: 0.0,
            omega: 0.0,
            split_universe: 0.0,
            person_inflate_amount: 0.0,
            water_boil_amount: 0.0,
            ball_size: 0.0,
            dot_amount: 0.0,
            peaks_curve: Curve::peaks_default(),
            enable_mirrored: false,
        };
        for name in ParamName::powered() {
            if let (Some(slot), ParamKind::Amount(range)) = (params.amount_mut(name), name.kind()) {
                *slot = range.default;
            }
        }
        params
    }

    /// Defaults for a new session: fresh seed, cosmetic flags decided by coin flip.
    pub fn session_defaults<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut params = Self::defaults_with_seed(crate::shuffle::fresh_seed(rng));
        params.enable_dark_mode = rng.gen_bool(0.5);
        params.enable_margins = rng.gen_bool(0.5);
        params
    }

    /// Pull every amount back into its declared range. Used on records read from outside.
    pub fn clamped(mut self) -> Self {
        self.seed = self.seed.min(SEED_MAX);
        for name in ParamName::powered() {
            if let (Some(slot), ParamKind::Amount(range)) = (self.amount_mut(name), name.kind()) {
                *slot = if slot.is_finite() { range.clamp(*slot) } else { range.default };
            }
        }
        self
    }

    pub fn get(&self, name: ParamName) -> ParamValue {
        match name.kind() {
            ParamKind::Seed => ParamValue::Int(self.seed),
            ParamKind::Curve => ParamValue::Curve(self.peaks_curve.clone()),
            ParamKind::Flag => ParamValue::Bool(self.flag(name).unwrap_or_default()),
            ParamKind::Amount(_) => ParamValue::Float(self.amount(name).unwrap_or_default()),
        }
    }

    /// Assign one parameter. Amounts are clamped into their range; a value of the
    /// wrong kind is rejected and leaves `self` untouched.
    pub fn set(&mut self, name: ParamName, value: &ParamValue) -> Result<(), EngineError> {
        let kind = name.kind();
        let mismatch = || EngineError::KindMismatch { name, expected: kind.label() };
        match kind {
            ParamKind::Seed => {
                self.seed = value.as_seed().ok_or_else(mismatch)?.min(SEED_MAX);
            }
            ParamKind::Flag => {
                let v = value.as_bool().ok_or_else(mismatch)?;
                if let Some(slot) = self.flag_mut(name) {
                    *slot = v;
                }
            }
            ParamKind::Amount(range) => {
                let v = value.as_f32().ok_or_else(mismatch)?;
                if let Some(slot) = self.amount_mut(name) {
                    *slot = range.clamp(v);
                }
            }
            ParamKind::Curve => match value {
                ParamValue::Curve(c) => {
                    self.peaks_curve = Curve::new(c.points().to_vec())
                        .map_err(|reason| EngineError::InvalidValue { name, reason })?;
                }
                _ => return Err(mismatch()),
            },
        }
        Ok(())
    }

    /// Shallow-merge a snapshot onto this set. Stops at the first invalid entry.
    pub fn apply(&mut self, snapshot: &ParameterSnapshot) -> Result<(), EngineError> {
        for (name, value) in snapshot {
            self.set(*name, value)?;
        }
        Ok(())
    }

    /// Current values of the given keys.
    pub fn snapshot<I>(&self, names: I) -> ParameterSnapshot
    where
        I: IntoIterator<Item = ParamName>,
    {
        names.into_iter().map(|name| (name, self.get(name))).collect()
    }

    /// Pin every powered numeric to its off value. Flags, seed and curve are untouched.
    pub fn power_off(&mut self) {
        for name in ParamName::powered() {
            if let (Some(slot), ParamKind::Amount(range)) = (self.amount_mut(name), name.kind()) {
                *slot = range.min;
            }
        }
    }

    /// True when every powered numeric sits at zero: nothing would be drawn.
    pub fn is_blank(&self) -> bool {
        ParamName::powered().all(|name| self.amount(name) == Some(0.0))
    }

    /// A parameter is "off" when a flag is false or an amount is at zero.
    pub fn is_off(&self, name: ParamName) -> bool {
        match name.kind() {
            ParamKind::Flag => self.flag(name) == Some(false),
            ParamKind::Amount(_) => self.amount(name) == Some(0.0),
            ParamKind::Seed | ParamKind::Curve => false,
        }
    }

    pub fn flag(&self, name: ParamName) -> Option<bool> {
        match name {
            ParamName::EnableDarkMode => Some(self.enable_dark_mode),
            ParamName::EnableMargins => Some(self.enable_margins),
            ParamName::EnableOcclusion => Some(self.enable_occlusion),
            ParamName::EnableMirrored => Some(self.enable_mirrored),
            _ => None,
        }
    }

    pub(crate) fn flag_mut(&mut self, name: ParamName) -> Option<&mut bool> {
        match name {
            ParamName::EnableDarkMode => Some(&mut self.enable_dark_mode),
            ParamName::EnableMargins => Some(&mut self.enable_margins),
            ParamName::EnableOcclusion => Some(&mut self.enable_occlusion),
            ParamName::EnableMirrored => Some(&mut self.enable_mirrored),
            _ => None,
        }
    }

    pub fn amount(&self, name: ParamName) -> Option<f32> {
        let value = match name {
            ParamName::AmplitudeAmount => self.amplitude_amount,
            ParamName::Wavelength => self.wavelength,
            ParamName::OctaveAmount => self.octave_amount,
            ParamName::Perspective => self.perspective,
            ParamName::LineAmount => self.line_amount,
            ParamName::Spikyness => self.spikyness,
            ParamName::StaticAmount => self.static_amount,
            ParamName::PolarAmount => self.polar_amount,
            ParamName::Omega => self.omega,
            ParamName::SplitUniverse => self.split_universe,
            ParamName::PersonInflateAmount => self.person_inflate_amount,
            ParamName::WaterBoilAmount => self.water_boil_amount,
            ParamName::BallSize => self.ball_size,
            ParamName::DotAmount => self.dot_amount,
            _ => return None,
        };
        Some(value)
    }

    pub(crate) fn amount_mut(&mut self, name: ParamName) -> Option<&mut f32> {
        let slot = match name {
            ParamName::AmplitudeAmount => &mut self.amplitude_amount,
            ParamName::Wavelength => &mut self.wavelength,
            ParamName::OctaveAmount => &mut self.octave_amount,
            ParamName::Perspective => &mut self.perspective,
            ParamName::LineAmount => &mut self.line_amount,
            ParamName::Spikyness => &mut self.spikyness,
            ParamName::StaticAmount => &mut self.static_amount,
            ParamName::PolarAmount => &mut self.polar_amount,
            ParamName::Omega => &mut self.omega,
            ParamName::SplitUniverse => &mut self.split_universe,
            ParamName::PersonInflateAmount => &mut self.person_inflate_amount,
            ParamName::WaterBoilAmount => &mut self.water_boil_amount,
            ParamName::BallSize => &mut self.ball_size,
            ParamName::DotAmount => &mut self.dot_amount,
            _ => return None,
        };
        Some(slot)
    }
}
