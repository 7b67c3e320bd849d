//! Summed-area table over a boolean mask, answering "how many true cells are
//! inside this square window" in constant time.

use super::{Cell, Grid};

pub struct WindowCounter {
    width: usize,
    height: usize,
    // (height + 1) x (width + 1), first row and column are zero
    sums: Vec<u32>,
}

impl WindowCounter {
    pub fn new(mask: &Grid<bool>) -> Self {
        let height = mask.height();
        let width = mask.width();
        let stride = width + 1;
        let mut sums = vec![0u32; (height + 1) * stride];

        for y in 0..height {
            let mut row_sum = 0u32;
            for x in 0..width {
                row_sum += u32::from(mask[Cell::new(y, x)]);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
            }
        }

        Self {
            width,
            height,
            sums,
        }
    }

    /// Number of true cells within Chebyshev distance `radius` of `center`,
    /// with the window clipped at the grid borders
    pub fn count(&self, center: Cell, radius: usize) -> u32 {
        let y0 = center.y.saturating_sub(radius);
        let x0 = center.x.saturating_sub(radius);
        let y1 = (center.y + radius + 1).min(self.height);
        let x1 = (center.x + radius + 1).min(self.width);
        self.rect_sum(y0, x0, y1, x1)
    }

    /// Number of cells the clipped window around `center` covers
    pub fn window_area(&self, center: Cell, radius: usize) -> u32 {
        let y0 = center.y.saturating_sub(radius);
        let x0 = center.x.saturating_sub(radius);
        let y1 = (center.y + radius + 1).min(self.height);
        let x1 = (center.x + radius + 1).min(self.width);
        ((y1 - y0) * (x1 - x0)) as u32
    }

    // Half-open rectangle [y0, y1) x [x0, x1)
    fn rect_sum(&self, y0: usize, x0: usize, y1: usize, x1: usize) -> u32 {
        let stride = self.width + 1;
        let a = self.sums[y1 * stride + x1];
        let b = self.sums[y0 * stride + x1];
        let c = self.sums[y1 * stride + x0];
        let d = self.sums[y0 * stride + x0];
        a + d - b - c
    }
}
