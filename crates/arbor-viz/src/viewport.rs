//! Pan/zoom state for the rendered group.
//!
//! The transform is purely presentational: layout coordinates are never
//! affected, only how the group is drawn. Scale is bounded to a 0.1–4.0
//! extent; double-click zoom is deliberately absent so node clicks stay
//! unambiguous.

use serde::Serialize;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 4.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

impl Viewport {
    /// Continuous drag: shift the translation by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.tx += dx;
        self.ty += dy;
    }

    /// Scroll zoom anchored at screen point `(cx, cy)`: the layout point
    /// under the cursor stays under the cursor. `factor` multiplies the
    /// current scale and the result clamps to the allowed extent.
    pub fn zoom_at(&mut self, factor: f64, cx: f64, cy: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if new_scale == self.scale {
            return;
        }
        let ratio = new_scale / self.scale;
        self.tx = cx - (cx - self.tx) * ratio;
        self.ty = cy - (cy - self.ty) * ratio;
        self.scale = new_scale;
    }

    /// Screen position of a layout point under this transform.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.tx, y * self.scale + self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_accumulates() {
        let mut vp = Viewport::default();
        vp.pan(10.0, -5.0);
        vp.pan(2.0, 3.0);
        assert_eq!((vp.tx, vp.ty), (12.0, -2.0));
    }

    #[test]
    fn zoom_clamps_to_scale_extent() {
        let mut vp = Viewport::default();
        for _ in 0..20 {
            vp.zoom_at(2.0, 0.0, 0.0);
        }
        assert_eq!(vp.scale, MAX_SCALE);
        for _ in 0..40 {
            vp.zoom_at(0.5, 0.0, 0.0);
        }
        assert_eq!(vp.scale, MIN_SCALE);
    }

    #[test]
    fn zoom_keeps_the_anchor_point_fixed() {
        let mut vp = Viewport::default();
        vp.pan(30.0, 40.0);
        // Layout point currently under the anchor.
        let anchor = (100.0, 80.0);
        let layout_x = (anchor.0 - vp.tx) / vp.scale;
        let layout_y = (anchor.1 - vp.ty) / vp.scale;
        vp.zoom_at(1.5, anchor.0, anchor.1);
        let after = vp.apply(layout_x, layout_y);
        assert!((after.0 - anchor.0).abs() < 1e-9);
        assert!((after.1 - anchor.1).abs() < 1e-9);
    }

    #[test]
    fn zoom_at_bound_leaves_translation_alone() {
        let mut vp = Viewport {
            scale: MAX_SCALE,
            tx: 7.0,
            ty: 9.0,
        };
        vp.zoom_at(2.0, 50.0, 50.0);
        assert_eq!((vp.scale, vp.tx, vp.ty), (MAX_SCALE, 7.0, 9.0));
    }
}
