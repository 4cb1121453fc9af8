//! # Map Rendering
//!
//! Renders the UI surface to ASCII for terminal output: the address prompt,
//! the map viewport with its pin, the viewport readout and the compass overlay.

use crate::{config::DisplayConfig, map_state::MapSnapshot, Coordinate, Region};

/// Prompt shown above the map, mirroring the text field placeholder and button
pub const PROMPT: &str = "Enter an address  [Find address]";

const PIN: char = 'X';
const CENTER: char = '+';
const EMPTY: char = '·';

/// Overlay label for the compass heading.
///
/// The heading is truncated toward zero, so 359.9° reads as 359°.
pub fn heading_label(heading: f64) -> String {
    format!("Compass Heading: {}°", heading.trunc() as i64)
}

/// Project `coordinate` onto a `width` × `height` grid covering `region`.
/// Returns `(row, column)`, or `None` when the coordinate is off-screen.
pub fn project(
    region: &Region,
    coordinate: Coordinate,
    width: usize,
    height: usize,
) -> Option<(usize, usize)> {
    if width == 0 || height == 0 || !region.contains(coordinate) {
        return None;
    }

    let west = region.center.longitude - region.span.longitude_delta / 2.0;
    let north = region.center.latitude + region.span.latitude_delta / 2.0;

    // Degenerate spans put everything on the center cell
    let fraction = |offset: f64, extent: f64| {
        if extent > 0.0 {
            (offset / extent).clamp(0.0, 1.0)
        } else {
            0.5
        }
    };
    let x = fraction(coordinate.longitude - west, region.span.longitude_delta);
    let y = fraction(north - coordinate.latitude, region.span.latitude_delta);

    let column = (x * (width - 1) as f64).round() as usize;
    let row = (y * (height - 1) as f64).round() as usize;
    Some((row, column))
}

/// Render the full screen as a string.
pub fn render(snapshot: &MapSnapshot, heading: f64, display: &DisplayConfig) -> String {
    let width = display.width.max(1);
    let height = display.height.max(1);
    let region = &snapshot.region;

    let mut grid = vec![vec![EMPTY; width]; height];
    if let Some((row, column)) = project(region, region.center, width, height) {
        grid[row][column] = CENTER;
    }
    for pin in &snapshot.pins {
        if let Some((row, column)) = project(region, pin.coordinate, width, height) {
            grid[row][column] = PIN;
        }
    }

    let mut out = String::new();
    out.push_str(PROMPT);
    out.push('\n');

    let border = "─".repeat(width);
    out.push_str(&format!("┌{border}┐\n"));
    for row in grid {
        out.push('│');
        out.extend(row);
        out.push_str("│\n");
    }
    out.push_str(&format!("└{border}┘\n"));

    out.push_str(&format!(
        "Center {:.4}, {:.4}  Span {:.3}° × {:.3}°\n",
        region.center.latitude,
        region.center.longitude,
        region.span.latitude_delta,
        region.span.longitude_delta
    ));
    for pin in &snapshot.pins {
        let name = if pin.name.is_empty() {
            "(unnamed)"
        } else {
            pin.name.as_str()
        };
        out.push_str(&format!(
            "{PIN} {name} ({:.4}, {:.4})\n",
            pin.coordinate.latitude, pin.coordinate.longitude
        ));
    }

    out.push_str(&heading_label(heading));
    out.push('\n');
    out
}
