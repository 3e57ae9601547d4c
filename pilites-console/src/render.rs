//! Fixed-width text rendering of strands.
//!
//! A strand of `led_count` pixels is drawn as a bar of at most
//! `strip_width` character cells; each cell samples the pixel at its left
//! edge.
//!
//! ```text
//! Main Strand (GPIO18, 20 LEDs, GRB)
//! ··AAAA···BBBBBBBBBBB
//! 0    5    10  14  19
//! ```

use std::fmt::Write;

use crossterm::style::{Color, Stylize};
use pilites_core::segment::ruler_ticks;
use pilites_core::{Channel, Segment, SegmentOwner, SessionSnapshot};

const UNASSIGNED: char = '·';
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// How strips are drawn.
#[derive(Debug, Clone, Copy)]
pub struct StripStyle {
    pub width: u16,
    pub color: bool,
}

/// Number of cells used for a strand.
pub fn cell_count(led_count: u32, width: u16) -> usize {
    led_count.min(u32::from(width)) as usize
}

fn pixel_at(cell: usize, cells: usize, led_count: u32) -> u32 {
    (cell as u64 * u64::from(led_count) / cells as u64) as u32
}

fn cell_at(pixel: u32, led_count: u32, cells: usize) -> usize {
    (u64::from(pixel) * cells as u64 / u64::from(led_count)) as usize
}

/// `#rrggbb` to its components.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn region_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

fn paint(out: &mut String, ch: char, color: Option<&str>, style: StripStyle) {
    match color.and_then(parse_hex) {
        Some((r, g, b)) if style.color => {
            let _ = write!(out, "{}", ch.with(Color::Rgb { r, g, b }));
        }
        _ => out.push(ch),
    }
}

// ── Layout ───────────────────────────────────────────────────────

/// One-line header for a channel.
pub fn channel_header(channel: &Channel) -> String {
    format!(
        "{} ({}, {} LEDs, {})",
        channel.name, channel.gpio_pin, channel.led_count, channel.color_order
    )
}

/// The segmentation of one strand, one letter per region.
///
/// Where segments overlap, the one emitted last wins the cell.
pub fn layout_bar(segments: &[Segment<'_>], led_count: u32, style: StripStyle) -> String {
    let cells = cell_count(led_count, style.width);
    let mut out = String::with_capacity(cells);
    for cell in 0..cells {
        let pixel = pixel_at(cell, cells, led_count);
        let owner = segments.iter().rev().find_map(|s| match s.owner {
            SegmentOwner::Region { index, .. } if s.start <= pixel && pixel <= s.end => {
                Some((index, s))
            }
            _ => None,
        });
        match owner {
            Some((index, segment)) => {
                paint(&mut out, region_letter(index), segment.color(), style);
            }
            None => out.push(UNASSIGNED),
        }
    }
    out
}

/// `"A  Left Wing  0-49, 60-70"` for every region in the layout.
pub fn legend(segments: &[Segment<'_>], style: StripStyle) -> Vec<String> {
    let mut seen: Vec<usize> = Vec::new();
    let mut lines = Vec::new();
    for segment in segments {
        let SegmentOwner::Region { region, index } = segment.owner else {
            continue;
        };
        if seen.contains(&index) {
            continue;
        }
        seen.push(index);

        let mut line = String::new();
        paint(&mut line, region_letter(index), segment.color(), style);
        let ranges: Vec<String> = region
            .ranges
            .iter()
            .map(|r| format!("{}-{}", r.start, r.end))
            .collect();
        let _ = write!(line, "  {}  {}", region.name, ranges.join(", "));
        lines.push(line);
    }
    lines
}

/// Pixel indices at 0, 25, 50, 75 and 100 %, aligned under the bar.
pub fn ruler(led_count: u32, width: u16) -> String {
    let cells = cell_count(led_count, width);
    let mut line = vec![' '; cells];
    let mut next_free = 0;
    for tick in ruler_ticks(led_count) {
        let label = tick.to_string();
        let start = cell_at(tick, led_count, cells).min(cells.saturating_sub(label.len()));
        if start < next_free {
            continue;
        }
        for (offset, ch) in label.chars().enumerate() {
            if let Some(slot) = line.get_mut(start + offset) {
                *slot = ch;
            }
        }
        next_free = start + label.len() + 1;
    }
    line.into_iter().collect::<String>().trim_end().to_string()
}

// ── Frames ───────────────────────────────────────────────────────

fn shade(r: u8, g: u8, b: u8) -> char {
    let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
    SHADES[(luma as usize * (SHADES.len() - 1) + 127) / 255]
}

/// Current pixel colors of one strand.
///
/// Without color output, brightness is drawn as a shade block.
pub fn frame_bar(pixels: &[String], style: StripStyle) -> String {
    let led_count = pixels.len() as u32;
    let cells = cell_count(led_count, style.width);
    let mut out = String::with_capacity(cells);
    for cell in 0..cells {
        let color = &pixels[pixel_at(cell, cells, led_count) as usize];
        let (r, g, b) = parse_hex(color).unwrap_or((0, 0, 0));
        if style.color {
            paint(&mut out, '█', Some(color), style);
        } else {
            out.push(shade(r, g, b));
        }
    }
    out
}

/// `"[Live] Connected | play-1 | cue 2 Finale | BLACKOUT | frames 12"`.
pub fn status_line(snapshot: &SessionSnapshot) -> String {
    let status = &snapshot.status;
    let mut parts = vec![format!("[{}] {}", snapshot.kind, snapshot.phase)];
    if status.is_running {
        parts.push(status.play_id.clone().unwrap_or_else(|| "?".into()));
        let cue = snapshot.cue_position() + 1;
        parts.push(match &status.cue_name {
            Some(name) => format!("cue {cue} {name}"),
            None => format!("cue {cue}"),
        });
    } else {
        parts.push("idle".into());
    }
    if status.is_blackout {
        parts.push("BLACKOUT".into());
    }
    parts.push(format!("frames {}", snapshot.frames_received));
    parts.join(" | ")
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pilites_core::show::PixelRange;
    use pilites_core::{Region, SessionKind, segment_channel};

    const PLAIN: StripStyle = StripStyle {
        width: 20,
        color: false,
    };

    fn region(id: &str, start: u32, end: u32) -> Region {
        Region {
            name: id.to_uppercase(),
            ranges: vec![PixelRange { start, end }],
            ..Region::new(id, "ch-1")
        }
    }

    #[test]
    fn layout_one_cell_per_pixel() {
        let a = region("a", 2, 5);
        let b = region("b", 9, 30);
        let segments = segment_channel(20, [&a, &b]);
        assert_eq!(layout_bar(&segments, 20, PLAIN), "··AAAA···BBBBBBBBBBB");
    }

    #[test]
    fn layout_is_scaled_down() {
        let a = region("a", 2, 5);
        let b = region("b", 9, 30);
        let segments = segment_channel(20, [&a, &b]);
        let narrow = StripStyle { width: 10, ..PLAIN };
        assert_eq!(layout_bar(&segments, 20, narrow), "·AA··BBBBB");
    }

    #[test]
    fn short_strands_are_not_stretched() {
        assert_eq!(cell_count(8, 60), 8);
        assert_eq!(cell_count(150, 60), 60);
        assert_eq!(layout_bar(&segment_channel(8, Vec::<&Region>::new()), 8, PLAIN), "········");
    }

    #[test]
    fn legend_lists_each_region_once() {
        let a = Region {
            ranges: vec![PixelRange { start: 0, end: 1 }, PixelRange { start: 6, end: 7 }],
            ..region("a", 0, 0)
        };
        let segments = segment_channel(10, [&a]);
        assert_eq!(legend(&segments, PLAIN), ["A  A  0-1, 6-7"]);
    }

    #[test]
    fn ruler_labels_quarters() {
        assert_eq!(ruler(20, 20), "0    5    10  14  19");
        assert_eq!(ruler(0, 20), "");
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex("ff8000"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }

    #[test]
    fn frames_shade_by_brightness() {
        let pixels: Vec<String> = ["#000000", "#ffffff", "#808080", "not-a-color"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(frame_bar(&pixels, PLAIN), " █▒ ");
    }

    #[test]
    fn colored_frames_keep_the_block() {
        let pixels = vec!["#ff0000".to_string()];
        let colored = StripStyle {
            color: true,
            ..PLAIN
        };
        let bar = frame_bar(&pixels, colored);
        assert!(bar.contains('█'));
    }

    #[test]
    fn idle_status_line() {
        let snapshot = SessionSnapshot::new(SessionKind::Live);
        assert_eq!(status_line(&snapshot), "[Live] Disconnected | idle | frames 0");
    }

    #[test]
    fn running_status_line() {
        let mut snapshot = SessionSnapshot::new(SessionKind::Live);
        snapshot.status.is_running = true;
        snapshot.status.play_id = Some("play-1".into());
        snapshot.status.cue_index = Some(1);
        snapshot.status.cue_name = Some("Finale".into());
        snapshot.status.is_blackout = true;
        assert_eq!(
            status_line(&snapshot),
            "[Live] Disconnected | play-1 | cue 2 Finale | BLACKOUT | frames 0"
        );
    }
}
