use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Midtone lift exponent applied first.
const MIDTONE_EXPONENT: f64 = 0.9;
/// Highlight roll-off exponent applied to the inverted midtone value.
const HIGHLIGHT_EXPONENT: f64 = 1.1;

/// Tone curve: lift midtones, then roll off highlights.
fn tone_curve_exact(level: u32) -> u8 {
    let normalized = level as f64 / 255.0;
    let midtone = normalized.powf(MIDTONE_EXPONENT);
    let rolled = 1.0 - (1.0 - midtone).powf(HIGHLIGHT_EXPONENT);
    // Truncate after clamping, matching the integer conversion of the curve
    (rolled * 255.0).clamp(0.0, 255.0) as u8
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("tone_lut.rs");
    let mut file = File::create(&dest_path).unwrap();

    writeln!(file, "/// Lookup table for the photo tone curve").unwrap();
    writeln!(file, "/// Index: input channel level, Value: output channel level").unwrap();
    writeln!(file, "pub static TONE_CURVE: [u8; 256] = [").unwrap();
    for level in 0..256u32 {
        if level > 0 && level % 16 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, " {},", tone_curve_exact(level)).unwrap();
    }
    writeln!(file, "\n];").unwrap();

    println!("cargo::rerun-if-changed=build.rs");
}
