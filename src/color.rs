//! Color-space conversions for the road and park detectors.
//!
//! Both conversions produce 8-bit planes in the conventions most camera
//! tooling uses, so thresholds tuned on a live rig carry over directly:
//!
//! - HSV: hue in `[0, 180)` (degrees halved), saturation and value in
//!   `[0, 255]`.
//! - Opponent chrominance `a` (green–red axis of CIE L\*a\*b\*, D65 white,
//!   sRGB input) offset by 128: values below 128 lean green, above lean red.
use crate::error::FrameError;
use crate::image::ColorImage;
use std::sync::OnceLock;

/// 8-bit HSV plane, row-major, one `[h, s, v]` triple per pixel.
#[derive(Clone, Debug)]
pub struct HsvImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<[u8; 3]>,
}

impl HsvImage {
    pub fn from_color(color: &ColorImage<'_>) -> Self {
        let mut data = Vec::with_capacity(color.w * color.h);
        for y in 0..color.h {
            for x in 0..color.w {
                data.push(rgb_to_hsv(color.rgb(x, y)));
            }
        }
        Self {
            w: color.w,
            h: color.h,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        self.data[y * self.w + x]
    }
}

/// Inclusive per-channel HSV bounds.
#[inline]
pub fn hsv_in_range(px: [u8; 3], lower: [u8; 3], upper: [u8; 3]) -> bool {
    (0..3).all(|c| px[c] >= lower[c] && px[c] <= upper[c])
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;
    let s = if v == 0 {
        0.0
    } else {
        diff * 255.0 / v as f32
    };
    let mut hue = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (gf - bf) / diff
    } else if v == g {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if hue < 0.0 {
        hue += 360.0;
    }
    let h8 = (hue * 0.5).round() as u32 % 180;
    [h8 as u8, s.round().min(255.0) as u8, v]
}

fn srgb_to_linear_table() -> &'static [f32; 256] {
    static TABLE: OnceLock<[f32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0f32; 256];
        for (i, out) in table.iter_mut().enumerate() {
            let c = i as f32 / 255.0;
            *out = if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            };
        }
        table
    })
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// Green–red chrominance of one RGB pixel, offset to `[0, 255]`.
pub fn rgb_to_chroma_a([r, g, b]: [u8; 3]) -> u8 {
    let lin = srgb_to_linear_table();
    let (rl, gl, bl) = (lin[r as usize], lin[g as usize], lin[b as usize]);
    let x = (0.412453 * rl + 0.357580 * gl + 0.180423 * bl) / 0.950456;
    let y = 0.212671 * rl + 0.715160 * gl + 0.072169 * bl;
    let a = 500.0 * (lab_f(x) - lab_f(y)) + 128.0;
    a.round().clamp(0.0, 255.0) as u8
}

/// Chrominance plane for a whole frame, row-major.
pub fn chroma_a_plane(color: &ColorImage<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(color.w * color.h);
    for y in 0..color.h {
        for x in 0..color.w {
            out.push(rgb_to_chroma_a(color.rgb(x, y)));
        }
    }
    out
}

/// Both colour planes of one frame, converted once and shared by the road
/// and park detectors.
#[derive(Clone, Debug)]
pub struct ColorPlanes {
    pub hsv: HsvImage,
    /// Offset `a` channel, row-major.
    pub chroma_a: Vec<u8>,
}

impl ColorPlanes {
    pub fn from_color(color: &ColorImage<'_>) -> Result<Self, FrameError> {
        color.validate()?;
        Ok(Self {
            hsv: HsvImage::from_color(color),
            chroma_a: chroma_a_plane(color),
        })
    }

    pub fn width(&self) -> usize {
        self.hsv.w
    }

    pub fn height(&self) -> usize {
        self.hsv.h
    }
}
