//! Regions and pixel ranges.

use serde::{Deserialize, Serialize};

use crate::error::{PilitesError, ValidationError};

/// Swatches handed out to regions that have no stored color.
pub const REGION_PALETTE: [&str; 8] = [
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#06b6d4", "#6366f1", "#a855f7", "#ec4899",
];

// ── PixelRange ───────────────────────────────────────────────────

/// Inclusive, zero-based interval into a channel's pixel array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: u32,
    pub end: u32,
}

impl PixelRange {
    /// The range a new region starts with.
    pub const DEFAULT: PixelRange = PixelRange { start: 0, end: 49 };

    pub fn new(start: u32, end: u32) -> Result<Self, ValidationError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start > self.end {
            return Err(ValidationError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Number of pixels covered.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn overlaps(&self, other: &PixelRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, index: u32) -> bool {
        self.start <= index && index <= self.end
    }
}

// ── Region ───────────────────────────────────────────────────────

/// A named subset of one channel's pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
    /// Lookup-only reference to a [`Channel`](super::Channel).
    pub channel_id: String,
    pub ranges: Vec<PixelRange>,
    /// Stored display color; see [`Region::display_color`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_color: Option<String>,
}

impl Region {
    pub fn new(id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            channel_id: channel_id.into(),
            ranges: vec![PixelRange::DEFAULT],
            ui_color: None,
        }
    }

    /// Palette entry for the region at `index` in its play.
    pub fn palette_color(index: usize) -> &'static str {
        REGION_PALETTE[index % REGION_PALETTE.len()]
    }

    /// The color to draw this region with, given its position in the play.
    pub fn display_color(&self, index: usize) -> &str {
        self.ui_color
            .as_deref()
            .unwrap_or_else(|| Self::palette_color(index))
    }

    /// Checks applied before a region draft is committed.
    pub fn validate(&self) -> Result<(), PilitesError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        if self.channel_id.is_empty() {
            return Err(ValidationError::MissingChannel.into());
        }
        if self.ranges.is_empty() {
            return Err(ValidationError::EmptyRanges.into());
        }
        for range in &self.ranges {
            range.validate()?;
        }

        let mut sorted = self.ranges.clone();
        sorted.sort_by_key(|r| r.start);
        for pair in sorted.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(ValidationError::OverlappingRanges {
                    a_start: pair[0].start,
                    a_end: pair[0].end,
                    b_start: pair[1].start,
                    b_end: pair[1].end,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Total pixels covered across all ranges.
    pub fn pixel_count(&self) -> u32 {
        self.ranges.iter().map(PixelRange::len).sum()
    }
}
