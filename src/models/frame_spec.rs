/// Output geometry and input limits of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSpec {
    pub width: u32,
    pub height: u32,
    pub max_input_bytes: usize,
}

impl FrameSpec {
    /// 7.3" Spectra 6 panel: 800x480, uploads up to 5 MiB
    pub const DEFAULT: Self = Self {
        width: 800,
        height: 480,
        max_input_bytes: 5 * 1024 * 1024,
    };

    /// Whether an upload of `bytes` is within the input limit
    pub fn accepts_input_size(&self, bytes: usize) -> bool {
        bytes <= self.max_input_bytes
    }
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}
