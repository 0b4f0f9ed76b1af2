//! Deterministic auto-color assignment for columns and groups.
//!
//! Maps an entity's id to a color from a curated palette using a simple
//! hash. Group colors additionally avoid the owning column's color so a
//! group stays visually separable from its background.

use crate::types::EntityColor;

/// Curated palette of 16 colors (6-char hex without `#`).
///
/// Chosen to be distinct and readable on both light and dark backgrounds.
const PALETTE: &[&str] = &[
    "d73a4a", // red
    "e36209", // orange
    "f9c513", // yellow
    "0e8a16", // green
    "006b75", // teal
    "1d76db", // blue
    "5319e7", // purple
    "b60205", // dark red
    "d876e3", // pink
    "0075ca", // ocean
    "7057ff", // violet
    "008672", // sea green
    "e4e669", // lime
    "bfd4f2", // light blue
    "c5def5", // periwinkle
    "fbca04", // gold
];

/// Return a deterministic palette color for a seed.
pub fn auto_color(seed: &str) -> &'static str {
    let idx = (fnv1a(seed) as usize) % PALETTE.len();
    PALETTE[idx]
}

/// Return a deterministic palette color that differs from `avoid`.
///
/// Starts at the seed's hash slot and walks forward until the color
/// differs; with one color to avoid and 16 in the palette this always
/// terminates with a distinct pick.
pub fn distinct_color(seed: &str, avoid: &str) -> &'static str {
    let start = (fnv1a(seed) as usize) % PALETTE.len();
    for offset in 0..PALETTE.len() {
        let candidate = PALETTE[(start + offset) % PALETTE.len()];
        if candidate != avoid {
            return candidate;
        }
    }
    PALETTE[start]
}

/// Auto-picked color record for a column.
pub fn column_color(seed: &str) -> EntityColor {
    EntityColor::uniform(auto_color(seed))
}

/// Auto-picked color record for a group inside a column.
pub fn group_color(seed: &str, column: &EntityColor) -> EntityColor {
    EntityColor::uniform(distinct_color(seed, &column.column_color))
}

/// FNV-1a hash (32-bit) for short strings.
fn fnv1a(s: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in s.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}
