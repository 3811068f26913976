//! Board layout
//!
//! Picks a column/row grid and per-card box size for the container width and
//! viewport height, then lets the surface re-measure until the width settles.

use serde::{Deserialize, Serialize};

use crate::config::{CardSize, Margins};

/// Upper bound on layout passes when the surface keeps changing width
pub const MAX_REFLOW_PASSES: u32 = 10;

/// Inputs to [`compute`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Usable container width in pixels
    pub width: u32,
    /// Usable height in pixels (viewport height)
    pub max_height: u32,
    /// Number of physical cards, two per definition
    pub card_count: usize,
    pub card_size: CardSize,
    pub margins: Margins,
    pub preferred_aspect_ratio: f64,
}

/// Width given to the inner board element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "px", rename_all = "camelCase")]
pub enum InnerWidth {
    /// Stretch to the container
    Full,
    /// Fixed pixel width, the exact bound of the grid
    Fixed(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub columns: u32,
    pub rows: u32,
    /// Card box width including margins
    pub outer_width: u32,
    /// Card box height including margins
    pub outer_height: u32,
    pub inner_width: InnerWidth,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            columns: 0,
            rows: 0,
            outer_width: 0,
            outer_height: 0,
            inner_width: InnerWidth::Full,
        }
    }
}

impl Layout {
    /// Top-left corner of the box at physical `position`
    pub fn position(&self, position: usize) -> (u32, u32) {
        if self.columns == 0 {
            return (0, 0);
        }
        let position = position as u32;
        (
            (position % self.columns).saturating_mul(self.outer_width),
            (position / self.columns).saturating_mul(self.outer_height),
        )
    }

    pub fn bound_width(&self) -> u32 {
        self.outer_width.saturating_mul(self.columns)
    }

    pub fn bound_height(&self) -> u32 {
        self.outer_height.saturating_mul(self.rows)
    }
}

/// Measurement and sizing hooks of the rendering surface
pub trait Surface {
    /// Current width of the game container in pixels
    fn container_width(&self) -> u32;

    /// Maximum usable height in pixels
    fn viewport_height(&self) -> u32;

    /// Size the inner board to the layout's bound; card boxes are placed
    /// by the renderer from the board view
    fn apply(&mut self, layout: &Layout);
}

/// Surface with fixed dimensions, for headless hosts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSurface {
    pub width: u32,
    pub height: u32,
    pub applied: Option<Layout>,
}

impl StaticSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            applied: None,
        }
    }
}

impl Surface for StaticSurface {
    fn container_width(&self) -> u32 {
        self.width
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }

    fn apply(&mut self, layout: &Layout) {
        self.applied = Some(*layout);
    }
}

fn div_ceil(a: u32, b: u32) -> u32 {
    if b == 0 {
        0
    } else {
        a.div_ceil(b)
    }
}

/// Compute the grid for `params`. Pure and deterministic.
pub fn compute(params: &LayoutParams) -> Layout {
    let CardSize {
        width: cw,
        height: ch,
    } = params.card_size;
    let slot_w = cw.saturating_add(params.margins.min.saturating_mul(2));
    let slot_h = ch.saturating_add(params.margins.min.saturating_mul(2));
    let n = params.card_count as u32;
    let w = params.width;
    let h = params.max_height;

    if n == 0 || slot_w == 0 || slot_h == 0 {
        return Layout {
            columns: 0,
            rows: 0,
            outer_width: slot_w,
            outer_height: slot_h,
            inner_width: InnerWidth::Full,
        };
    }

    // Full width at minimum margin, at least one column.
    let mut columns = (w / slot_w).min(n).max(1);
    let mut rows = div_ceil(n, columns);

    let ratio = params.preferred_aspect_ratio;
    if ratio > 0.0 && rows.saturating_mul(slot_h) < h {
        let square_columns = ((n as f64 * ratio).sqrt().ceil() as u32).max(1);
        if square_columns < columns {
            let square_rows = div_ceil(n, square_columns);
            if square_rows.saturating_mul(slot_h) <= h {
                columns = square_columns;
                rows = square_rows;
            } else {
                rows = (h / slot_h).max(1);
                columns = div_ceil(n, rows);
            }
        }
    }

    let max_w = cw.saturating_add(params.margins.max.saturating_mul(2)).max(slot_w);
    let outer_width = (w / columns).clamp(slot_w, max_w);
    let mut outer_height = ch.saturating_add(outer_width - cw);
    if outer_height.saturating_mul(rows) > h {
        outer_height = (h / rows).max(slot_h);
    }

    let bound = outer_width.saturating_mul(columns);
    let inner_width = if (w as i64 - bound as i64) * 2 > outer_width as i64 {
        InnerWidth::Fixed(bound)
    } else {
        InnerWidth::Full
    };

    Layout {
        columns,
        rows,
        outer_width,
        outer_height,
        inner_width,
    }
}

/// Lay out on `surface`, re-measuring until its width stops changing.
///
/// `params.width` and `params.max_height` are overwritten from the surface.
pub fn reflow<S: Surface + ?Sized>(surface: &mut S, params: LayoutParams) -> (Layout, u32) {
    let mut passes = 0;
    loop {
        // One pixel of slack against sub-pixel rounding in the container.
        let width = surface.container_width().saturating_sub(1);
        let layout = compute(&LayoutParams {
            width,
            max_height: surface.viewport_height(),
            ..params
        });
        surface.apply(&layout);
        passes += 1;

        let measured = surface.container_width().saturating_sub(1);
        if measured == width || passes >= MAX_REFLOW_PASSES {
            return (layout, passes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: u32, max_height: u32, card_count: usize, ratio: f64) -> LayoutParams {
        LayoutParams {
            width,
            max_height,
            card_count,
            card_size: CardSize::new(130, 140),
            margins: Margins { min: 10, max: 25 },
            preferred_aspect_ratio: ratio,
        }
    }

    #[test]
    fn test_reference_board() {
        let layout = compute(&params(1000, 800, 20, 1.0));
        assert_eq!(
            layout,
            Layout {
                columns: 5,
                rows: 4,
                outer_width: 180,
                outer_height: 190,
                inner_width: InnerWidth::Fixed(900),
            }
        );
        assert_eq!(compute(&params(1000, 800, 20, 1.0)), layout);
    }

    #[test]
    fn test_without_aspect_ratio_fills_width() {
        let layout = compute(&params(1000, 800, 20, 0.0));
        assert_eq!(layout.columns, 6);
        assert_eq!(layout.rows, 4);
        assert_eq!(layout.outer_width, 166);
        assert_eq!(layout.outer_height, 176);
        assert_eq!(layout.inner_width, InnerWidth::Full);
    }

    #[test]
    fn test_height_clamped_to_viewport() {
        let layout = compute(&params(1000, 700, 20, 1.0));
        assert_eq!((layout.columns, layout.rows), (5, 4));
        assert_eq!(layout.outer_height, 175);
    }

    #[test]
    fn test_square_layout_too_tall_falls_back_to_max_rows() {
        // 12 columns by width -> 1 row; square: 4 columns x 3 rows = 480px > 330
        let layout = compute(&params(2000, 330, 12, 1.0));
        assert_eq!(layout.rows, 2);
        assert_eq!(layout.columns, 6);
    }

    #[test]
    fn test_narrow_container_keeps_one_column() {
        let layout = compute(&params(100, 10_000, 4, 1.0));
        assert_eq!(layout.columns, 1);
        assert_eq!(layout.rows, 4);
        assert_eq!(layout.outer_width, 150);
    }

    #[test]
    fn test_huge_card_saturates_instead_of_overflowing() {
        let layout = compute(&LayoutParams {
            card_size: CardSize::new(130, 2_500_000_000),
            ..params(200, 800, 4, 1.0)
        });
        assert_eq!(layout.columns, 1);
        assert_eq!(layout.rows, 4);
        assert_eq!(layout.outer_width, 180);
        assert_eq!(layout.outer_height, 2_500_000_020);
        assert_eq!(layout.bound_height(), u32::MAX);
        assert_eq!(layout.position(3).1, u32::MAX);
    }

    #[test]
    fn test_empty_board() {
        let layout = compute(&params(1000, 800, 0, 1.0));
        assert_eq!(layout.columns, 0);
        assert_eq!(layout.rows, 0);
        assert_eq!(layout.position(3), (0, 0));
    }

    #[test]
    fn test_positions_follow_grid() {
        let layout = compute(&params(1000, 800, 20, 1.0));
        assert_eq!(layout.position(0), (0, 0));
        assert_eq!(layout.position(4), (720, 0));
        assert_eq!(layout.position(5), (0, 190));
        assert_eq!(layout.position(19), (720, 570));
    }

    struct ScrollbarSurface {
        base_width: u32,
        height: u32,
        scrolled: bool,
        passes: u32,
    }

    impl Surface for ScrollbarSurface {
        fn container_width(&self) -> u32 {
            if self.scrolled {
                self.base_width - 15
            } else {
                self.base_width
            }
        }

        fn viewport_height(&self) -> u32 {
            self.height
        }

        fn apply(&mut self, layout: &Layout) {
            self.passes += 1;
            self.scrolled = layout.bound_height() > self.height;
        }
    }

    #[test]
    fn test_reflow_settles_after_scrollbar_appears() {
        let mut surface = ScrollbarSurface {
            base_width: 1001,
            height: 600,
            scrolled: false,
            passes: 0,
        };
        let (layout, passes) = reflow(&mut surface, params(0, 0, 20, 0.0));
        assert_eq!(passes, 2);
        assert_eq!(surface.passes, 2);
        assert_eq!(layout.columns, 6);
        assert_eq!(layout.outer_width, 164);
        assert_eq!(layout.outer_height, 160);
    }

    struct FlappingSurface {
        wide: bool,
        passes: u32,
    }

    impl Surface for FlappingSurface {
        fn container_width(&self) -> u32 {
            if self.wide {
                1000
            } else {
                900
            }
        }

        fn viewport_height(&self) -> u32 {
            800
        }

        fn apply(&mut self, _layout: &Layout) {
            self.passes += 1;
            self.wide = !self.wide;
        }
    }

    #[test]
    fn test_reflow_is_bounded() {
        let mut surface = FlappingSurface {
            wide: true,
            passes: 0,
        };
        let (_, passes) = reflow(&mut surface, params(0, 0, 20, 1.0));
        assert_eq!(passes, MAX_REFLOW_PASSES);
        assert_eq!(surface.passes, MAX_REFLOW_PASSES);
    }

    #[test]
    fn test_static_surface_records_layout() {
        let mut surface = StaticSurface::new(1001, 800);
        let (layout, passes) = reflow(&mut surface, params(0, 0, 20, 1.0));
        assert_eq!(passes, 1);
        assert_eq!(surface.applied, Some(layout));
        assert_eq!(layout.columns, 5);
    }
}
