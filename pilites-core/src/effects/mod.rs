//! Effect schema registry.
//!
//! A closed set of effect kinds ([`EffectKind`]) paired with a static
//! table of parameter definitions ([`EffectSchema`]). Adding a kind means
//! adding an enum case and a row in [`schema`]; every lookup is a single
//! index into that table.
//!
//! The registry is read-only. Editors and cue resolution consult it, and
//! [`default_params_for`] always hands out a freshly built mapping.

mod params;
mod schema;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PilitesError;

pub use params::{ParamValue, Params, is_hex_color};
pub use schema::REGISTRY;

// ── EffectKind ───────────────────────────────────────────────────

/// Every effect the controller knows how to render.
///
/// Discriminants double as indices into [`REGISTRY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    StaticColor,
    FadeIn,
    FadeOut,
    ColorWash,
    Gradient,
    Chase,
    Strobe,
    Rainbow,
    Lightning,
    Pulse,
    Twinkle,
}

impl EffectKind {
    /// All kinds, in registry order.
    pub const ALL: [EffectKind; 11] = [
        EffectKind::StaticColor,
        EffectKind::FadeIn,
        EffectKind::FadeOut,
        EffectKind::ColorWash,
        EffectKind::Gradient,
        EffectKind::Chase,
        EffectKind::Strobe,
        EffectKind::Rainbow,
        EffectKind::Lightning,
        EffectKind::Pulse,
        EffectKind::Twinkle,
    ];

    /// Wire identifier (`"static_color"`, `"chase"`, ...).
    pub fn id(self) -> &'static str {
        match self {
            Self::StaticColor => "static_color",
            Self::FadeIn => "fade_in",
            Self::FadeOut => "fade_out",
            Self::ColorWash => "color_wash",
            Self::Gradient => "gradient",
            Self::Chase => "chase",
            Self::Strobe => "strobe",
            Self::Rainbow => "rainbow",
            Self::Lightning => "lightning",
            Self::Pulse => "pulse",
            Self::Twinkle => "twinkle",
        }
    }

    /// The schema row for this kind.
    pub fn schema(self) -> &'static EffectSchema {
        &REGISTRY[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.schema().label
    }

    /// A fresh mapping of every parameter key to its default.
    pub fn default_params(self) -> Params {
        self.schema()
            .params
            .iter()
            .map(|p| (p.key.to_string(), p.spec.default_value()))
            .collect()
    }

    /// Check every entry of `params` against this kind's schema.
    ///
    /// Keys missing from `params` are allowed (the controller falls back
    /// to defaults); unknown keys are not.
    pub fn validate(self, params: &Params) -> Result<(), PilitesError> {
        let schema = self.schema();
        for (key, value) in params {
            let def = schema.param(key).ok_or_else(|| {
                crate::error::ValidationError::UnknownParam {
                    kind: self.id(),
                    key: key.clone(),
                }
            })?;
            def.check(value)?;
        }
        Ok(())
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EffectKind {
    type Err = PilitesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| PilitesError::Other(format!("unknown effect kind: {s}")))
    }
}

// ── Schema types ─────────────────────────────────────────────────

/// One row of the registry.
#[derive(Debug)]
pub struct EffectSchema {
    pub kind: EffectKind,
    /// Human-readable name shown in editors.
    pub label: &'static str,
    /// Parameters in display order.
    pub params: &'static [ParamDef],
}

impl EffectSchema {
    pub fn param(&self, key: &str) -> Option<&'static ParamDef> {
        self.params.iter().find(|p| p.key == key)
    }
}

/// A single typed parameter definition.
#[derive(Debug)]
pub struct ParamDef {
    pub key: &'static str,
    pub label: &'static str,
    pub spec: ParamSpec,
}

/// The three parameter variants and their constraints.
#[derive(Debug)]
pub enum ParamSpec {
    /// `#rrggbb` lowercase hex color.
    Color { default: &'static str },
    /// Bounded numeric value; invariant `min <= default <= max`, `step > 0`.
    Number {
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    /// One of a fixed list of string options (at least two).
    Select {
        default: &'static str,
        options: &'static [SelectOption],
    },
}

impl ParamSpec {
    pub fn default_value(&self) -> ParamValue {
        match self {
            Self::Color { default } => ParamValue::Text((*default).to_string()),
            Self::Number { default, .. } => ParamValue::Number(*default),
            Self::Select { default, .. } => ParamValue::Text((*default).to_string()),
        }
    }
}

#[derive(Debug)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

// ── Registry operations ──────────────────────────────────────────

/// Default parameters for a wire kind identifier.
///
/// Unknown or empty identifiers yield an empty mapping. Every call builds
/// a new map.
pub fn default_params_for(kind: &str) -> Params {
    describe(kind)
        .map(|schema| schema.kind.default_params())
        .unwrap_or_default()
}

/// Look up the schema row for a wire kind identifier.
pub fn describe(kind: &str) -> Option<&'static EffectSchema> {
    kind.parse::<EffectKind>().ok().map(EffectKind::schema)
}

// ── Tests ────────────────────────────────────────────────────────
