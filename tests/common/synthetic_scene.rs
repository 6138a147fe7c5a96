use sandbox_terrain::image::{ChannelOrder, ColorImage, DepthImage};

pub const SAND: [u8; 3] = [210, 200, 170];
pub const ASPHALT: [u8; 3] = [60, 60, 60];
pub const PARK_GREEN: [u8; 3] = [40, 160, 50];
/// Inside the HSV green box, chrominance too neutral.
pub const GREY_GREEN: [u8; 3] = [100, 120, 100];
/// Green-leaning chrominance, hue past the green box.
pub const TEAL: [u8; 3] = [0, 180, 200];

/// Metres per raw unit used by every synthetic scene.
pub const DEPTH_SCALE: f32 = 0.001;

/// Half-open pixel rectangle `[x0, x1) × [y0, y1)`.
#[derive(Clone, Copy, Debug)]
pub struct Rect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Rect {
    pub const fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn area(&self) -> usize {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }

    pub fn centre(&self) -> (usize, usize) {
        ((self.x0 + self.x1) / 2, (self.y0 + self.y1) / 2)
    }
}

/// Aligned depth (raw units) and RGB buffers of a sand table.
#[derive(Clone, Debug)]
pub struct SyntheticScene {
    pub w: usize,
    pub h: usize,
    pub depth: Vec<u16>,
    pub rgb: Vec<u8>,
}

impl SyntheticScene {
    /// Flat sand at `ground` raw depth units.
    pub fn flat(w: usize, h: usize, ground: u16) -> Self {
        assert!(w > 0 && h > 0, "scene dimensions must be positive");
        let mut rgb = Vec::with_capacity(w * h * 3);
        for _ in 0..w * h {
            rgb.extend_from_slice(&SAND);
        }
        Self {
            w,
            h,
            depth: vec![ground; w * h],
            rgb,
        }
    }

    /// Add `f(x, y)` raw units to every pixel.
    pub fn tilt(mut self, f: impl Fn(usize, usize) -> u16) -> Self {
        for y in 0..self.h {
            for x in 0..self.w {
                let d = &mut self.depth[y * self.w + x];
                *d = d.saturating_add(f(x, y));
            }
        }
        self
    }

    /// Raise `rect` by `delta` raw units over whatever is below it.
    pub fn raise(mut self, rect: Rect, delta: u16) -> Self {
        self.for_each_in(rect, |scene, i| {
            scene.depth[i] = scene.depth[i].saturating_add(delta)
        });
        self
    }

    /// Knock out the depth return inside `rect`.
    pub fn invalidate(mut self, rect: Rect) -> Self {
        self.for_each_in(rect, |scene, i| scene.depth[i] = 0);
        self
    }

    pub fn paint(mut self, rect: Rect, rgb: [u8; 3]) -> Self {
        self.for_each_in(rect, |scene, i| {
            scene.rgb[i * 3..i * 3 + 3].copy_from_slice(&rgb)
        });
        self
    }

    pub fn depth_view(&self) -> DepthImage<'_> {
        DepthImage::new(self.w, self.h, &self.depth)
    }

    pub fn color_view(&self) -> ColorImage<'_> {
        ColorImage::new(self.w, self.h, ChannelOrder::Rgb, &self.rgb)
    }

    fn for_each_in(&mut self, rect: Rect, mut f: impl FnMut(&mut Self, usize)) {
        for y in rect.y0..rect.y1.min(self.h) {
            for x in rect.x0..rect.x1.min(self.w) {
                let i = y * self.w + x;
                f(self, i);
            }
        }
    }
}
