//! Tone adjustment options.

/// Configuration for the tone adjuster.
///
/// # Defaults
///
/// Tuned for Spectra 6 panels, which render noticeably flatter and darker
/// than a monitor:
/// - Saturation: 1.15
/// - Contrast amount: 0.2 (unsharp mask strength 140%)
/// - Blur radius: 1.0
/// - Threshold: 2
///
/// # Example
///
/// ```
/// use eink_photo::ToneOptions;
///
/// let options = ToneOptions::new().saturation(1.3).contrast_amount(0.1);
/// assert_eq!(options.sharpen_percent(), 120);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ToneOptions {
    /// Saturation multiplier applied as a blend away from the luminance gray.
    ///
    /// - 1.0 = no change
    /// - 0.0 = grayscale
    pub saturation: f32,

    /// Local contrast strength; the unsharp mask percent is
    /// `100 + amount * 200`.
    pub contrast_amount: f32,

    /// Gaussian blur radius of the unsharp mask.
    pub blur_radius: f32,

    /// Minimum per-channel difference between a pixel and its blurred value
    /// before sharpening applies.
    pub threshold: u8,

    /// Whether the fixed tone curve is applied.
    pub tone_curve: bool,
}

impl Default for ToneOptions {
    fn default() -> Self {
        Self {
            saturation: 1.15,
            contrast_amount: 0.2,
            blur_radius: 1.0,
            threshold: 2,
            tone_curve: true,
        }
    }
}

impl ToneOptions {
    /// Create tone options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that leave every pixel unchanged.
    pub fn identity() -> Self {
        Self {
            saturation: 1.0,
            contrast_amount: 0.0,
            blur_radius: 1.0,
            threshold: 2,
            tone_curve: false,
        }
    }

    /// Set saturation multiplier.
    #[inline]
    pub fn saturation(mut self, factor: f32) -> Self {
        self.saturation = factor;
        self
    }

    /// Set local contrast amount.
    #[inline]
    pub fn contrast_amount(mut self, amount: f32) -> Self {
        self.contrast_amount = amount;
        self
    }

    /// Set unsharp mask blur radius.
    #[inline]
    pub fn blur_radius(mut self, radius: f32) -> Self {
        self.blur_radius = radius;
        self
    }

    /// Set unsharp mask threshold.
    #[inline]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Enable or disable the tone curve.
    #[inline]
    pub fn tone_curve(mut self, enabled: bool) -> Self {
        self.tone_curve = enabled;
        self
    }

    /// Unsharp mask strength in percent, rounded to an integer.
    pub fn sharpen_percent(&self) -> i32 {
        (100.0 + self.contrast_amount * 200.0).round() as i32
    }
}
