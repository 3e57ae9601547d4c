//! Physical LED channels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PilitesError, ValidationError};

// ── GpioPin ──────────────────────────────────────────────────────

/// The PWM-capable output pins a channel may be wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GpioPin {
    Gpio12,
    Gpio13,
    Gpio18,
    Gpio19,
}

impl GpioPin {
    pub const ALL: [GpioPin; 4] = [Self::Gpio12, Self::Gpio13, Self::Gpio18, Self::Gpio19];

    pub fn number(self) -> u8 {
        match self {
            Self::Gpio12 => 12,
            Self::Gpio13 => 13,
            Self::Gpio18 => 18,
            Self::Gpio19 => 19,
        }
    }
}

impl TryFrom<u8> for GpioPin {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.number() == value)
            .ok_or_else(|| format!("gpioPin must be one of [12, 13, 18, 19], got {value}"))
    }
}

impl From<GpioPin> for u8 {
    fn from(pin: GpioPin) -> u8 {
        pin.number()
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.number())
    }
}

// ── ColorOrder ───────────────────────────────────────────────────

/// Byte order the LED driver expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorOrder {
    Rgb,
    Grb,
    Rgbw,
    Grbw,
}

impl fmt::Display for ColorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rgb => "RGB",
            Self::Grb => "GRB",
            Self::Rgbw => "RGBW",
            Self::Grbw => "GRBW",
        };
        f.write_str(s)
    }
}

// ── Channel ──────────────────────────────────────────────────────

/// One LED strand driven by a single controller output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub gpio_pin: GpioPin,
    /// Fixed length of the addressable pixel array (at least 1).
    pub led_count: u32,
    /// Free-form driver tag, e.g. `ws2811`.
    pub led_type: String,
    pub color_order: ColorOrder,
}

impl Channel {
    /// A new channel with the editor's defaults: GPIO18, 150 LEDs, GRB.
    pub fn with_defaults(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            gpio_pin: GpioPin::Gpio18,
            led_count: 150,
            led_type: "ws2811".into(),
            color_order: ColorOrder::Grb,
        }
    }

    /// Client-side checks run before an upsert is sent.
    pub fn validate(&self) -> Result<(), PilitesError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        if self.led_count == 0 {
            return Err(ValidationError::ZeroLedCount.into());
        }
        Ok(())
    }

    /// Index of the last pixel, or `None` for an empty strand.
    pub fn last_index(&self) -> Option<u32> {
        self.led_count.checked_sub(1)
    }
}
