//! The static effect table.

use super::{EffectKind, EffectSchema, ParamDef, ParamSpec, SelectOption};

// ── Shared parameter rows ────────────────────────────────────────

const DIRECTION: ParamDef = ParamDef {
    key: "direction",
    label: "Direction",
    spec: ParamSpec::Select {
        default: "forward",
        options: &[
            SelectOption {
                value: "forward",
                label: "Forward",
            },
            SelectOption {
                value: "reverse",
                label: "Reverse",
            },
        ],
    },
};

const OFFSET: ParamDef = ParamDef {
    key: "offsetSec",
    label: "Offset (sec)",
    spec: ParamSpec::Number {
        default: 0.0,
        min: 0.0,
        max: 60.0,
        step: 0.1,
    },
};

const SPEED: ParamDef = ParamDef {
    key: "speed",
    label: "Speed",
    spec: ParamSpec::Number {
        default: 1.0,
        min: 0.1,
        max: 5.0,
        step: 0.1,
    },
};

const INTENSITY: ParamDef = ParamDef {
    key: "intensity",
    label: "Intensity",
    spec: ParamSpec::Number {
        default: 1.0,
        min: 0.0,
        max: 1.0,
        step: 0.01,
    },
};

const DURATION: ParamDef = ParamDef {
    key: "durationSec",
    label: "Duration (sec)",
    spec: ParamSpec::Number {
        default: 1.0,
        min: 0.1,
        max: 60.0,
        step: 0.1,
    },
};

const fn color(key: &'static str, label: &'static str, default: &'static str) -> ParamDef {
    ParamDef {
        key,
        label,
        spec: ParamSpec::Color { default },
    }
}

const fn number(
    key: &'static str,
    label: &'static str,
    default: f64,
    min: f64,
    max: f64,
    step: f64,
) -> ParamDef {
    ParamDef {
        key,
        label,
        spec: ParamSpec::Number {
            default,
            min,
            max,
            step,
        },
    }
}

const WHITE: &str = "#ffffff";
const BLACK: &str = "#000000";

// ── Registry ─────────────────────────────────────────────────────

/// One row per [`EffectKind`], in discriminant order.
pub static REGISTRY: [EffectSchema; 11] = [
    EffectSchema {
        kind: EffectKind::StaticColor,
        label: "Static Color",
        params: &[color("color", "Color", WHITE), INTENSITY],
    },
    EffectSchema {
        kind: EffectKind::FadeIn,
        label: "Fade In",
        params: &[color("color", "Color", WHITE), DURATION, OFFSET],
    },
    EffectSchema {
        kind: EffectKind::FadeOut,
        label: "Fade Out",
        params: &[color("fromColor", "From Color", WHITE), DURATION, OFFSET],
    },
    EffectSchema {
        kind: EffectKind::ColorWash,
        label: "Color Wash",
        params: &[color("color", "Color", WHITE), INTENSITY, SPEED],
    },
    EffectSchema {
        kind: EffectKind::Gradient,
        label: "Gradient",
        params: &[
            color("startColor", "Start Color", WHITE),
            color("endColor", "End Color", BLACK),
            DIRECTION,
        ],
    },
    EffectSchema {
        kind: EffectKind::Chase,
        label: "Chase",
        params: &[
            color("color", "Color", WHITE),
            color("backgroundColor", "Background", BLACK),
            SPEED,
            DIRECTION,
            OFFSET,
        ],
    },
    EffectSchema {
        kind: EffectKind::Strobe,
        label: "Strobe",
        params: &[
            color("color", "Color", WHITE),
            number("rate", "Rate (flashes/sec)", 8.0, 0.5, 30.0, 0.5),
            number("dutyCycle", "Duty Cycle", 0.5, 0.01, 0.99, 0.01),
            OFFSET,
        ],
    },
    EffectSchema {
        kind: EffectKind::Rainbow,
        label: "Rainbow",
        params: &[SPEED, DIRECTION, INTENSITY, OFFSET],
    },
    EffectSchema {
        kind: EffectKind::Lightning,
        label: "Lightning",
        params: &[
            color("flashColor", "Flash Color", WHITE),
            color("backgroundColor", "Background", BLACK),
            INTENSITY,
            number("strikeRate", "Strike Rate (per min)", 12.0, 1.0, 120.0, 1.0),
            number("decaySec", "Decay (sec)", 0.2, 0.05, 2.0, 0.05),
            OFFSET,
        ],
    },
    EffectSchema {
        kind: EffectKind::Pulse,
        label: "Pulse",
        params: &[
            color("color", "Color", WHITE),
            color("backgroundColor", "Background", BLACK),
            SPEED,
            number("minIntensity", "Min Intensity", 0.1, 0.0, 1.0, 0.01),
            number("maxIntensity", "Max Intensity", 1.0, 0.0, 1.0, 0.01),
            OFFSET,
        ],
    },
    EffectSchema {
        kind: EffectKind::Twinkle,
        label: "Twinkle",
        params: &[
            color("color", "Color", WHITE),
            color("backgroundColor", "Background", BLACK),
            number("density", "Density", 0.3, 0.0, 1.0, 0.01),
            SPEED,
            OFFSET,
        ],
    },
];
