use crate::RenderError;

/// Integer pixel rectangle on the output canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Overlapping part of two rectangles, if any
    pub fn intersection(&self, other: &PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x0 < x1 && y0 < y1 {
            Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }
}

/// Pixel layout of one render: module pitch, quiet zone and leftover margins.
///
/// The pitch is derived from the canvas size, never the other way round, so the
/// canvas always has exactly the requested size. Whatever the integer division
/// leaves over is split between the two edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Canvas side in pixels
    pub canvas: u32,
    /// Module side in pixels
    pub pitch: u32,
    /// Matrix side in modules
    pub dimension: usize,
    /// Quiet zone in modules
    pub border: u32,
    /// Leftover pixels before the quiet zone (top / left)
    pub margin_start: u32,
    /// Leftover pixels after the quiet zone (bottom / right)
    pub margin_end: u32,
}

impl Geometry {
    /// Plan the pixel grid for a `dimension`-module matrix with a `border`-module
    /// quiet zone on a `size`-pixel canvas.
    pub fn plan(size: u32, border: u32, dimension: usize) -> Result<Self, RenderError> {
        let span = dimension as u32 + 2 * border;
        let pitch = size / span;
        if pitch < 1 {
            return Err(RenderError::InvalidGeometry {
                size,
                border,
                dimension,
            });
        }

        let remainder = size - pitch * span;
        let margin_start = remainder / 2;
        Ok(Self {
            canvas: size,
            pitch,
            dimension,
            border,
            margin_start,
            margin_end: remainder - margin_start,
        })
    }

    /// Smallest canvas that still yields a one-pixel pitch
    pub fn min_canvas(border: u32, dimension: usize) -> u32 {
        dimension as u32 + 2 * border
    }

    /// Pixel offset of module (0, 0) on both axes
    pub fn origin(&self) -> u32 {
        self.margin_start + self.border * self.pitch
    }

    /// Matrix side in pixels, quiet zone excluded
    pub fn matrix_extent(&self) -> u32 {
        self.dimension as u32 * self.pitch
    }

    pub fn matrix_rect(&self) -> PixelRect {
        let origin = self.origin();
        let extent = self.matrix_extent();
        PixelRect::new(origin, origin, extent, extent)
    }

    /// Pixel cell of module (`row`, `col`)
    pub fn cell(&self, row: usize, col: usize) -> PixelRect {
        let origin = self.origin();
        PixelRect::new(
            origin + col as u32 * self.pitch,
            origin + row as u32 * self.pitch,
            self.pitch,
            self.pitch,
        )
    }

    /// Range of module indices whose cells overlap the pixel span `[start, end)`
    pub fn module_span(&self, start: u32, end: u32) -> std::ops::Range<usize> {
        let origin = self.origin();
        let extent_end = origin + self.matrix_extent();
        let start = start.max(origin);
        let end = end.min(extent_end);
        if start >= end {
            return 0..0;
        }
        let first = ((start - origin) / self.pitch) as usize;
        let last = ((end - 1 - origin) / self.pitch) as usize;
        first..last + 1
    }
}
