//! Fit-to-width page geometry.

/// Unscaled page size in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// Geometry of one page rendered at a target width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub scale: f64,
    /// Displayed size in CSS pixels.
    pub css_width: f64,
    pub css_height: f64,
    /// Backing canvas size in device pixels.
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl PageLayout {
    /// Scales `page` so its width matches `target_width`.
    ///
    /// Returns `None` for degenerate input (non-positive or non-finite sizes,
    /// widths or pixel ratios).
    pub fn fit_width(page: PageSize, target_width: f64, device_pixel_ratio: f64) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(page.width)
            || !usable(page.height)
            || !usable(target_width)
            || !usable(device_pixel_ratio)
        {
            return None;
        }

        let scale = target_width / page.width;
        let css_width = page.width * scale;
        let css_height = page.height * scale;
        Some(Self {
            scale,
            css_width,
            css_height,
            canvas_width: (css_width * device_pixel_ratio).floor() as u32,
            canvas_height: (css_height * device_pixel_ratio).floor() as u32,
        })
    }
}
