//! Row access shared by every grid in the pipeline.
//!
//! Driver frames may be padded (`stride > width`), so stages walk rows
//! instead of assuming one contiguous buffer.

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Samples between the starts of consecutive rows.
    fn stride(&self) -> usize;

    /// The `width()` samples of row `y`.
    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }
}

/// Iterator over the rows of an [`ImageView`], top to bottom.
pub struct Rows<'a, I: ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        self.y += 1;
        Some(self.image.row(self.y - 1))
    }
}
