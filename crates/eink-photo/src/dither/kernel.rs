//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// The kernel defines how quantization error is distributed to neighboring
/// pixels that haven't been processed yet. Each entry specifies an offset
/// (dx, dy) and a weight for that neighbor; each neighbor receives
/// `error * weight / divisor`.
///
/// The `max_dy` field indicates how many rows ahead the kernel reaches,
/// which determines the error buffer depth needed: `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    ///
    /// - `dx`: horizontal offset (positive = right)
    /// - `dy`: vertical offset (0 = current row, positive = below)
    /// - `weight`: numerator of the diffused fraction
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Maximum dy value in entries.
    pub max_dy: usize,
}

impl Kernel {
    /// Sum of all weights; equals `divisor` for full error propagation.
    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|&(_, _, w)| w as u32).sum()
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};
