/// Render surface dimensions.
///
/// `width`/`height` are logical pixels; `pixel_ratio` is the device scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Built from a physical size as reported by winit.
    pub fn from_physical(width: u32, height: u32, pixel_ratio: f64) -> Self {
        let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        Self::new(width as f64 / ratio, height as f64 / ratio, ratio)
    }

    /// `None` while the surface has no area (minimized window).
    pub fn aspect(&self) -> Option<f32> {
        if self.width > 0.0 && self.height > 0.0 {
            Some((self.width / self.height) as f32)
        } else {
            None
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn physical_size(&self) -> [u32; 2] {
        [
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        ]
    }
}
