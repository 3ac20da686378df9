//! Calibration chart for tuning a palette against a physical panel.
//!
//! The chart shows one swatch per palette color, a gray ramp and a few
//! skin and sky patches. Photograph the panel showing it and edit
//! `palette.json` until the rendered colors match.

use eink_photo::Palette;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 480;

const SWATCH_HEIGHT: u32 = 120;
const GRADIENT_TOP: u32 = SWATCH_HEIGHT + 20;
const GRADIENT_HEIGHT: u32 = 80;
const PATCH_TOP: u32 = GRADIENT_TOP + GRADIENT_HEIGHT + 20;
const PATCH_SIZE: u32 = 80;

const OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);

/// Skin and sky reference colors
pub const CALIBRATION_PATCHES: [[u8; 3]; 4] = [
    [205, 133, 63],
    [240, 200, 170],
    [120, 80, 60],
    [90, 120, 140],
];

/// Draw the calibration chart for `palette` on a white 800x480 canvas.
pub fn render_calibration_chart(palette: &Palette) -> RgbImage {
    let mut chart = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, Rgb([255, 255, 255]));

    let swatch_width = CHART_WIDTH / palette.len() as u32;
    for (idx, color) in palette.colors().iter().enumerate() {
        let x0 = idx * swatch_width as usize;
        let rect = Rect::at(x0 as i32, 0).of_size(swatch_width + 1, SWATCH_HEIGHT + 1);
        draw_outlined(&mut chart, rect, Rgb(*color));
    }

    for x in 0..CHART_WIDTH {
        let shade = (x * 255 / (CHART_WIDTH - 1)) as u8;
        let column = Rect::at(x as i32, GRADIENT_TOP as i32).of_size(1, GRADIENT_HEIGHT + 1);
        draw_filled_rect_mut(&mut chart, column, Rgb([shade; 3]));
    }

    for (idx, color) in CALIBRATION_PATCHES.iter().enumerate() {
        let x0 = 40 + idx as u32 * (PATCH_SIZE + 40);
        let rect = Rect::at(x0 as i32, PATCH_TOP as i32).of_size(PATCH_SIZE + 1, PATCH_SIZE + 1);
        draw_outlined(&mut chart, rect, Rgb(*color));
    }

    chart
}

/// `palette.json` contents for `palette`, in the format the loader reads
pub fn palette_json(palette: &Palette) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "palette": palette.colors() }))
}

/// Filled rectangle with a 1px black outline
fn draw_outlined(image: &mut RgbImage, rect: Rect, fill: Rgb<u8>) {
    draw_filled_rect_mut(image, rect, fill);
    draw_hollow_rect_mut(image, rect, OUTLINE);
}
