//! Connected regions of a binary mask and their outer contours.
//!
//! Regions use 8-connectivity for foreground (and therefore 4-connectivity
//! for the background they enclose). Each region carries its pixel area, an
//! inclusive bounding box and its outer boundary traced clockwise with the
//! Moore-neighbour rule starting at the region's first pixel in raster order.
//!
//! Contour attributes follow the polygon through boundary pixel centres:
//! shoelace area, closed arc length, and the isoperimetric compactness
//! `4π·area / perimeter²` (1 for a disc, lower for angular or elongated
//! shapes).
use crate::image::Mask;
use nalgebra::Point2;
use serde::Serialize;

/// Clockwise Moore neighbourhood (image y axis points down), starting east.
const NEIGHBOURS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const WEST: usize = 4;

/// Inclusive pixel bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl BoundingBox {
    fn at(x: usize, y: usize) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }

    pub fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0 + 1
    }

    /// Long side over short side (>= 1).
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = (self.width() as f32, self.height() as f32);
        w.max(h) / w.min(h)
    }
}

/// Ordered closed boundary through pixel centres.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    pub points: Vec<Point2<f32>>,
}

impl Contour {
    /// Enclosed polygon area (shoelace).
    pub fn area(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f32 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        0.5 * twice.abs()
    }

    /// Closed arc length.
    pub fn perimeter(&self) -> f32 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| nalgebra::distance(&self.points[i], &self.points[(i + 1) % n]))
            .sum()
    }

    /// `4π·area / perimeter²`, 0 for degenerate contours.
    pub fn compactness(&self) -> f32 {
        let perimeter = self.perimeter();
        if perimeter <= f32::EPSILON {
            return 0.0;
        }
        4.0 * std::f32::consts::PI * self.area() / (perimeter * perimeter)
    }
}

/// One 8-connected region.
#[derive(Clone, Debug)]
pub struct Region {
    /// Label in [`Components::labels`] (1-based).
    pub label: u32,
    /// Pixel count.
    pub area: usize,
    pub bbox: BoundingBox,
    pub contour: Contour,
}

/// Label image plus per-region attributes.
#[derive(Clone, Debug)]
pub struct Components {
    pub w: usize,
    pub h: usize,
    /// 0 for background, otherwise the region label.
    pub labels: Vec<u32>,
    pub regions: Vec<Region>,
}

/// Label the 8-connected regions of `mask` in raster order.
pub fn label_components(mask: &Mask) -> Components {
    let (w, h) = (mask.w, mask.h);
    let mut labels = vec![0u32; w * h];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if !mask.data[idx] || labels[idx] != 0 {
                continue;
            }
            let label = regions.len() as u32 + 1;
            labels[idx] = label;
            stack.push((x, y));
            let mut area = 0usize;
            let mut bbox = BoundingBox::at(x, y);
            while let Some((cx, cy)) = stack.pop() {
                area += 1;
                bbox.include(cx, cy);
                for &(dx, dy) in &NEIGHBOURS {
                    let nx = cx as isize + dx;
                    let ny = cy as isize + dy;
                    if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                        continue;
                    }
                    let nidx = ny as usize * w + nx as usize;
                    if mask.data[nidx] && labels[nidx] == 0 {
                        labels[nidx] = label;
                        stack.push((nx as usize, ny as usize));
                    }
                }
            }
            let contour = trace_outer_boundary(&labels, w, h, label, (x, y), area);
            regions.push(Region {
                label,
                area,
                bbox,
                contour,
            });
        }
    }

    Components {
        w,
        h,
        labels,
        regions,
    }
}

fn direction_of(dx: isize, dy: isize) -> usize {
    NEIGHBOURS
        .iter()
        .position(|&d| d == (dx, dy))
        .unwrap_or(WEST)
}

/// Moore-neighbour tracing. `start` must be the region's first pixel in
/// raster order, so its west neighbour is background. Tracing stops when the
/// walk leaves `start` towards the same pixel as the first step did.
fn trace_outer_boundary(
    labels: &[u32],
    w: usize,
    h: usize,
    label: u32,
    start: (usize, usize),
    area: usize,
) -> Contour {
    let inside = |x: isize, y: isize| {
        x >= 0 && y >= 0 && x < w as isize && y < h as isize && labels[y as usize * w + x as usize] == label
    };
    let start = (start.0 as isize, start.1 as isize);
    let mut points = vec![Point2::new(start.0 as f32, start.1 as f32)];
    let mut p = start;
    let mut back = WEST;
    let mut first_step: Option<(isize, isize)> = None;

    for _ in 0..4 * area + 8 {
        let next = (1..=8).find_map(|k| {
            let d = (back + k) % 8;
            let q = (p.0 + NEIGHBOURS[d].0, p.1 + NEIGHBOURS[d].1);
            inside(q.0, q.1).then_some((d, q))
        });
        let Some((d, q)) = next else {
            break; // isolated pixel
        };
        if p == start {
            match first_step {
                Some(first) if first == q => break,
                Some(_) => {}
                None => first_step = Some(q),
            }
        }
        // The neighbour scanned just before `q` is background; it becomes the
        // backtrack pixel, expressed relative to `q`.
        let prev = (d + 7) % 8;
        let b = (p.0 + NEIGHBOURS[prev].0, p.1 + NEIGHBOURS[prev].1);
        back = direction_of(b.0 - q.0, b.1 - q.1);
        p = q;
        points.push(Point2::new(q.0 as f32, q.1 as f32));
    }

    if points.len() > 1 && points.last() == points.first() {
        points.pop();
    }
    Contour { points }
}

impl Components {
    /// Rasterise the pixels of every region accepted by `keep`.
    pub fn paint(&self, keep: impl FnMut(&Region) -> bool) -> Mask {
        let accepted = self.accepted_labels(keep);
        Mask {
            w: self.w,
            h: self.h,
            data: self.labels.iter().map(|&l| accepted[l as usize]).collect(),
        }
    }

    /// Rasterise every accepted region as a solid shape: the region and all
    /// background it encloses.
    pub fn paint_filled(&self, mut keep: impl FnMut(&Region) -> bool) -> Mask {
        let mut out = Mask::new(self.w, self.h);
        let mut reached = Vec::new();
        let mut stack = Vec::new();
        for region in self.regions.iter().filter(|r| keep(r)) {
            self.fill_region(region, &mut out, &mut reached, &mut stack);
        }
        out
    }

    fn accepted_labels(&self, mut keep: impl FnMut(&Region) -> bool) -> Vec<bool> {
        let mut accepted = vec![false; self.regions.len() + 1];
        for region in &self.regions {
            accepted[region.label as usize] = keep(region);
        }
        accepted
    }

    /// Pixels covered by the solid shape of `region`: its own pixels plus the
    /// background it encloses. This is what [`Components::paint_filled`]
    /// paints for it.
    pub fn enclosed_area(&self, region: &Region) -> usize {
        let mut reached = Vec::new();
        let mut stack = Vec::new();
        self.flood_outside(region, &mut reached, &mut stack);
        reached.iter().filter(|&&r| !r).count()
    }

    fn fill_region(
        &self,
        region: &Region,
        out: &mut Mask,
        reached: &mut Vec<bool>,
        stack: &mut Vec<(usize, usize)>,
    ) {
        let window = self.flood_outside(region, reached, stack);
        for y in window.y0..=window.y1 {
            for x in window.x0..=window.x1 {
                if !reached[window.index(x, y)] {
                    out.set(x, y, true);
                }
            }
        }
    }

    /// Flood the background from the border of the region's bounding box
    /// (grown by one pixel and clipped to the grid); whatever stays unreached
    /// is region or hole.
    fn flood_outside(
        &self,
        region: &Region,
        reached: &mut Vec<bool>,
        stack: &mut Vec<(usize, usize)>,
    ) -> FloodWindow {
        let window = FloodWindow {
            x0: region.bbox.x0.saturating_sub(1),
            y0: region.bbox.y0.saturating_sub(1),
            x1: (region.bbox.x1 + 1).min(self.w - 1),
            y1: (region.bbox.y1 + 1).min(self.h - 1),
        };
        let (x0, y0, x1, y1) = (window.x0, window.y0, window.x1, window.y1);
        reached.clear();
        reached.resize(window.width() * (y1 - y0 + 1), false);
        stack.clear();

        let is_region = |x: usize, y: usize| self.labels[y * self.w + x] == region.label;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let on_border = x == x0 || x == x1 || y == y0 || y == y1;
                if on_border && !is_region(x, y) {
                    reached[window.index(x, y)] = true;
                    stack.push((x, y));
                }
            }
        }
        while let Some((x, y)) = stack.pop() {
            for (dx, dy) in [(1isize, 0isize), (-1, 0), (0, 1), (0, -1)] {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < x0 as isize || ny < y0 as isize || nx > x1 as isize || ny > y1 as isize {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                let li = window.index(nx, ny);
                if !reached[li] && !is_region(nx, ny) {
                    reached[li] = true;
                    stack.push((nx, ny));
                }
            }
        }
        window
    }
}

/// Inclusive grid window scanned by the hole flood.
struct FloodWindow {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl FloodWindow {
    fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y - self.y0) * self.width() + (x - self.x0)
    }
}
