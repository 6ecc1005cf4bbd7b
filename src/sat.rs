use serde::{Deserialize, Serialize};

use crate::CanvasMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Occupied cells of the canvas, backed by a summed-area table so that any
/// rectangle can be tested in constant time.
///
/// https://blog.demofox.org/2018/04/16/prefix-sums-and-summed-area-tables/
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
    /// `(width + 1) * (height + 1)` entries; `table[y][x]` sums cells in `[0, x) x [0, y)`.
    table: Vec<u32>,
}

impl OccupancyGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let cells = vec![false; width as usize * height as usize];
        Self::with_cells(width, height, cells)
    }

    /// Cells the mask forbids start out occupied.
    pub fn from_mask(mask: &CanvasMask) -> Self {
        let mut cells = Vec::with_capacity(mask.width() as usize * mask.height() as usize);
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                cells.push(!mask.is_allowed(x, y));
            }
        }
        Self::with_cells(mask.width(), mask.height(), cells)
    }

    fn with_cells(width: u32, height: u32, cells: Vec<bool>) -> Self {
        let table_len = (width as usize + 1) * (height as usize + 1);
        let mut grid = OccupancyGrid {
            width,
            height,
            cells,
            table: vec![0; table_len],
        };
        grid.rebuild_from(0);
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        x < self.width
            && y < self.height
            && self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Number of occupied cells inside `rect`, clipped to the canvas.
    pub fn occupied_in(&self, rect: &Rect) -> u32 {
        let x0 = rect.x.min(self.width) as usize;
        let y0 = rect.y.min(self.height) as usize;
        let x1 = rect.right().min(self.width) as usize;
        let y1 = rect.bottom().min(self.height) as usize;

        let tl = self.table_at(x0, y0) as i64;
        let tr = self.table_at(x1, y0) as i64;
        let bl = self.table_at(x0, y1) as i64;
        let br = self.table_at(x1, y1) as i64;

        (br - tr - bl + tl) as u32
    }

    /// True when `rect` lies inside the canvas and touches no occupied cell.
    pub fn region_is_empty(&self, rect: &Rect) -> bool {
        self.bounds().contains(rect) && self.occupied_in(rect) == 0
    }

    pub fn free_cells(&self) -> usize {
        let total = self.table_at(self.width as usize, self.height as usize) as usize;
        self.cells.len() - total
    }

    /// Marks every cell of `rect` occupied. Cells never go back to free.
    pub fn occupy(&mut self, rect: &Rect) {
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        if rect.x >= x1 || rect.y >= y1 {
            return;
        }

        for y in rect.y..y1 {
            let row = y as usize * self.width as usize;
            self.cells[row + rect.x as usize..row + x1 as usize].fill(true);
        }

        // rows above the rect keep their sums
        self.rebuild_from(rect.y as usize);
    }

    fn table_at(&self, x: usize, y: usize) -> u32 {
        self.table[y * (self.width as usize + 1) + x]
    }

    fn rebuild_from(&mut self, start_row: usize) {
        let width = self.width as usize;
        let stride = width + 1;

        for y in start_row..self.height as usize {
            let mut sum = 0;
            for x in 0..width {
                sum += self.cells[y * width + x] as u32;
                self.table[(y + 1) * stride + x + 1] = self.table[y * stride + x + 1] + sum;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OccupancyGrid, Rect};
    use crate::CanvasMask;

    fn rect(x: u32, y: u32, width: u32, height: u32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn table_matches_brute_force() {
        let mut grid = OccupancyGrid::new(12, 9);
        grid.occupy(&rect(2, 3, 4, 2));
        grid.occupy(&rect(7, 0, 3, 8));
        grid.occupy(&rect(0, 8, 12, 1));

        for probe in [
            rect(0, 0, 12, 9),
            rect(1, 1, 5, 5),
            rect(6, 2, 3, 3),
            rect(10, 0, 2, 8),
            rect(3, 4, 1, 1),
        ] {
            let mut expected = 0;
            for y in probe.y..probe.bottom() {
                for x in probe.x..probe.right() {
                    expected += grid.is_occupied(x, y) as u32;
                }
            }
            assert_eq!(grid.occupied_in(&probe), expected, "{probe:?}");
        }
    }

    #[test]
    fn occupy_then_query() {
        let mut grid = OccupancyGrid::new(10, 10);
        assert_eq!(grid.free_cells(), 100);

        grid.occupy(&rect(4, 4, 2, 2));
        assert_eq!(grid.free_cells(), 96);
        assert!(!grid.region_is_empty(&rect(5, 5, 3, 3)));
        assert!(grid.region_is_empty(&rect(6, 4, 4, 6)));
        assert!(grid.region_is_empty(&rect(0, 0, 4, 10)));

        // occupying twice is a no-op
        grid.occupy(&rect(4, 4, 2, 2));
        assert_eq!(grid.free_cells(), 96);
    }

    #[test]
    fn outside_canvas_is_never_empty() {
        let grid = OccupancyGrid::new(10, 10);
        assert!(!grid.region_is_empty(&rect(8, 0, 3, 1)));
        assert!(!grid.region_is_empty(&rect(0, 9, 1, 2)));
        assert!(grid.region_is_empty(&rect(0, 0, 10, 10)));
        assert!(!grid.region_is_empty(&rect(5, 5, u32::MAX, u32::MAX)));
    }

    #[test]
    fn forbidden_mask_cells_start_occupied() {
        let grid_values: Vec<u8> = (0..16).map(|i| if i % 4 == 3 { 255 } else { 0 }).collect();
        let mask = CanvasMask::from_brightness(4, 4, &grid_values, 128).unwrap();
        let grid = OccupancyGrid::from_mask(&mask);

        assert_eq!(grid.free_cells(), 12);
        assert!(grid.is_occupied(3, 2));
        assert!(grid.region_is_empty(&rect(0, 0, 3, 4)));
        assert!(!grid.region_is_empty(&rect(2, 0, 2, 1)));
    }

    #[test]
    fn rect_intersection() {
        assert!(rect(0, 0, 4, 4).intersects(&rect(3, 3, 2, 2)));
        assert!(!rect(0, 0, 4, 4).intersects(&rect(4, 0, 2, 2)));
        assert!(rect(0, 0, 4, 4).contains(&rect(1, 1, 3, 3)));
    }
}
