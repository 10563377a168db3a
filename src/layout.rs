use crate::config::PANEL_MARGIN;
use crate::simulation::{Epicenter, Viewport};

/// Axis-aligned rectangle in window pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f64, self.height as f64)
    }
}

/// Seismograph on the left, epicenter map on the right
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelLayout {
    pub seismograph: Rect,
    pub map: Rect,
}

impl PanelLayout {
    pub fn for_window(width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        let panel_width = ((w - PANEL_MARGIN * 3.0) / 2.0).max(1.0);
        let panel_height = (h - PANEL_MARGIN * 2.0).max(1.0);

        Self {
            seismograph: Rect {
                x: PANEL_MARGIN,
                y: PANEL_MARGIN,
                width: panel_width,
                height: panel_height,
            },
            map: Rect {
                x: PANEL_MARGIN * 2.0 + panel_width,
                y: PANEL_MARGIN,
                width: panel_width,
                height: panel_height,
            },
        }
    }

    /// Epicenter under the pointer, as a percentage of the map panel.
    /// `None` when the pointer is outside the map.
    pub fn epicenter_at(&self, px: f32, py: f32) -> Option<Epicenter> {
        if !self.map.contains(px, py) {
            return None;
        }
        let rel_x = (px - self.map.x) / self.map.width * 100.0;
        let rel_y = (py - self.map.y) / self.map.height * 100.0;
        Some(Epicenter::new(rel_x as f64, rel_y as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panels_side_by_side() {
        let layout = PanelLayout::for_window(1248, 432);
        assert_eq!(layout.seismograph.as_array(), [16.0, 16.0, 600.0, 400.0]);
        assert_eq!(layout.map.as_array(), [632.0, 16.0, 600.0, 400.0]);
        assert!(!layout.seismograph.contains(632.0, 100.0));
    }

    #[test]
    fn test_click_maps_to_relative_epicenter() {
        let layout = PanelLayout::for_window(1248, 432);
        let e = layout.epicenter_at(632.0 + 150.0, 16.0 + 300.0).unwrap();
        assert_eq!(e, Epicenter { x: 25.0, y: 75.0 });
    }

    #[test]
    fn test_click_outside_map_is_ignored() {
        let layout = PanelLayout::for_window(1248, 432);
        assert_eq!(layout.epicenter_at(100.0, 100.0), None);
        assert_eq!(layout.epicenter_at(1240.0, 100.0), None);
    }

    #[test]
    fn test_tiny_window_keeps_positive_panels() {
        let layout = PanelLayout::for_window(10, 10);
        assert!(layout.map.width > 0.0);
        assert!(layout.map.height > 0.0);
    }
}
