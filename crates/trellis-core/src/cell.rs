//! A cell is one placed unit of content: its grid coordinates, sizing
//! metadata, current box, and the bookkeeping used to notify content only
//! when a pass actually moved it.

use slotmap::new_key_type;
use trellis_geom::{Rect, Size};

use crate::content::{Content, Measurable, Placeable, SpanAware, Spans};

new_key_type! {
    /// Opaque identifier for a cell stored in the registry arena.
    pub struct CellId;
}

/// Alignment of content within its cell, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Align to the left/top edge.
    #[default]
    Start,
    /// Align to the right/bottom edge.
    End,
    /// Center within the cell.
    Center,
    /// Fill the cell.
    Stretch,
}

/// Column sizing policy: intrinsic size or a relative stretch weight used
/// to distribute leftover space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Size the column from its content.
    Auto,
    /// Distribute leftover space by this non-negative weight.
    Stretch(f64),
}

impl Sizing {
    /// The stretch weight, zero for `Auto`.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Auto => 0.0,
            Self::Stretch(w) => *w,
        }
    }

    /// True if this policy carries a positive stretch weight.
    pub fn is_stretch(&self) -> bool {
        self.weight() > 0.0
    }
}

/// Placement metadata supplied when adding a cell.
#[derive(Debug, Clone, Copy)]
pub struct CellProps {
    /// Horizontal alignment of content within the cell.
    pub h_align: Align,
    /// Vertical alignment of content within the cell.
    pub v_align: Align,
    /// Explicit span override; content's own [`SpanAware::spans`] wins when
    /// it declares more than a single slot.
    pub spans: Option<Spans>,
    /// Pack tightly into a shared column track rather than free-flowing.
    pub fit_to_grid: bool,
    /// Occupy every row of the column. Fixed at creation; at most one per
    /// column, exclusive of any other cell in that column.
    pub span_all_rows: bool,
    /// Relative weight for leftover-space distribution; zero means none.
    pub stretch_factor: f64,
    /// Whether the cell participates in measurement.
    pub visible: bool,
}

impl Default for CellProps {
    fn default() -> Self {
        Self {
            h_align: Align::Start,
            v_align: Align::Start,
            spans: None,
            fit_to_grid: false,
            span_all_rows: false,
            stretch_factor: 0.0,
            visible: true,
        }
    }
}

impl CellProps {
    /// Props for a fit-to-grid cell, the common case for label/value pairs.
    pub fn fitted() -> Self {
        Self {
            fit_to_grid: true,
            ..Self::default()
        }
    }

    /// Props for a stretched cell with the given weight.
    pub fn stretched(weight: f64) -> Self {
        Self {
            stretch_factor: weight,
            ..Self::default()
        }
    }
}

/// One placed unit: owns its content and its current geometry. Cells are
/// created by the owning grid's placement calls and destroyed only by
/// explicit removal; the grid exclusively owns every cell in its registry.
pub struct Cell {
    pub(crate) row: usize,
    pub(crate) column: usize,
    pub(crate) spans: Spans,
    pub(crate) list_index: usize,
    pub(crate) fit_to_grid: bool,
    pub(crate) span_all_rows: bool,
    pub(crate) stretch_factor: f64,
    pub(crate) visible: bool,
    pub(crate) h_align: Align,
    pub(crate) v_align: Align,
    /// Spacer cells take part in arrangement but are skipped by
    /// manipulation bookkeeping and post-processing.
    pub(crate) virtual_cell: bool,
    content: Box<dyn Content>,
    rect: Rect,
    preferred: Option<Size>,
    manipulating: u32,
    left_adjusted: bool,
    top_adjusted: bool,
    width_adjusted: bool,
    height_adjusted: bool,
}

impl Cell {
    pub(crate) fn new(content: Box<dyn Content>, props: CellProps) -> Self {
        let inherent = content.spans();
        let spans = if inherent != Spans::single() {
            inherent
        } else {
            props.spans.unwrap_or_default()
        };
        Self {
            row: 0,
            column: 0,
            spans,
            list_index: 0,
            fit_to_grid: props.fit_to_grid,
            span_all_rows: props.span_all_rows,
            stretch_factor: props.stretch_factor.max(0.0),
            visible: props.visible,
            h_align: props.h_align,
            v_align: props.v_align,
            virtual_cell: false,
            content,
            rect: Rect::zero(),
            preferred: None,
            manipulating: 0,
            left_adjusted: false,
            top_adjusted: false,
            width_adjusted: false,
            height_adjusted: false,
        }
    }

    /// The row this cell is registered at.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The column this cell is registered at.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The slots this cell covers.
    pub fn spans(&self) -> Spans {
        self.spans
    }

    /// The cell's current box, valid after a completed pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the cell participates in measurement.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the cell packs into a shared column track.
    pub fn fit_to_grid(&self) -> bool {
        self.fit_to_grid
    }

    /// Whether the cell occupies every row of its column.
    pub fn span_all_rows(&self) -> bool {
        self.span_all_rows
    }

    /// The cell's stretch weight, zero when unstretched.
    pub fn stretch_factor(&self) -> f64 {
        self.stretch_factor
    }

    /// Content alignment within the cell, `(horizontal, vertical)`.
    pub fn alignment(&self) -> (Align, Align) {
        (self.h_align, self.v_align)
    }

    /// Borrow the cell's content.
    pub fn content(&self) -> &dyn Content {
        self.content.as_ref()
    }

    /// Mutably borrow the cell's content.
    pub fn content_mut(&mut self) -> &mut dyn Content {
        self.content.as_mut()
    }

    /// The child grid embedded in this cell, if any.
    pub fn child_grid(&self) -> Option<&crate::grid::Grid> {
        self.content.child_grid()
    }

    /// Mutable form of [`Cell::child_grid`].
    pub fn child_grid_mut(&mut self) -> Option<&mut crate::grid::Grid> {
        self.content.child_grid_mut()
    }

    /// The content's preferred size, measured lazily and cached until the
    /// content reports a change.
    pub fn preferred_size(&mut self) -> Size {
        if let Some(sz) = self.preferred {
            sz
        } else {
            let sz = self.content.preferred_size();
            self.preferred = Some(sz);
            sz
        }
    }

    /// The cached preferred size without re-measuring; zero before the
    /// first measurement.
    pub fn preferred_cached(&self) -> Size {
        self.preferred.unwrap_or_default()
    }

    /// Drop the cached preferred size so the next measure pass re-queries
    /// the content.
    pub fn invalidate_preferred(&mut self) {
        self.preferred = None;
    }

    pub(crate) fn left(&self) -> f64 {
        self.rect.left()
    }

    pub(crate) fn top(&self) -> f64 {
        self.rect.top()
    }

    pub(crate) fn right(&self) -> f64 {
        self.rect.right()
    }

    pub(crate) fn bottom(&self) -> f64 {
        self.rect.bottom()
    }

    pub(crate) fn actual_width(&self) -> f64 {
        self.rect.w
    }

    pub(crate) fn actual_height(&self) -> f64 {
        self.rect.h
    }

    /// How far this cell's rendered width can shrink before clipping its
    /// content's preferred width.
    pub(crate) fn adjustable_width(&self) -> f64 {
        (self.actual_width() - self.preferred_cached().w).max(0.0)
    }

    pub(crate) fn adjust_left(&mut self, left: f64) {
        if self.rect.tl.x != left {
            self.rect.tl.x = left;
            self.left_adjusted = true;
        }
    }

    pub(crate) fn adjust_width(&mut self, width: f64) {
        if self.rect.w != width {
            self.rect.w = width;
            self.width_adjusted = true;
        }
    }

    pub(crate) fn adjust_height(&mut self, height: f64) {
        if self.rect.h != height {
            self.rect.h = height;
            self.height_adjusted = true;
        }
    }

    pub(crate) fn adjust_horizontally(&mut self, left: f64, width: f64) {
        self.adjust_left(left);
        self.adjust_width(width);
    }

    pub(crate) fn adjust_vertically(&mut self, top: f64, height: f64) {
        if self.rect.tl.y != top {
            self.rect.tl.y = top;
            self.top_adjusted = true;
        }
        self.adjust_height(height);
    }

    pub(crate) fn adjust(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.adjust_horizontally(left, width);
        self.adjust_vertically(top, height);
    }

    /// Begin a manipulation scope. Nested scopes are counted; only the
    /// outermost clears the adjusted flags.
    pub(crate) fn begin_manipulation(&mut self) {
        self.manipulating += 1;
        if self.manipulating > 1 {
            return;
        }
        self.left_adjusted = false;
        self.top_adjusted = false;
        self.width_adjusted = false;
        self.height_adjusted = false;
    }

    /// End a manipulation scope. On the outermost close, if any geometry
    /// changed, notify the content of its new box and report the change.
    pub(crate) fn end_manipulation(&mut self) -> Option<Size> {
        if self.manipulating == 0 {
            return None;
        }
        self.manipulating -= 1;
        if self.manipulating > 0 {
            return None;
        }
        let changed = self.left_adjusted
            || self.top_adjusted
            || self.width_adjusted
            || self.height_adjusted;
        if !changed {
            return None;
        }
        let sz = self.content_box().size();
        self.content.content_size_changed(sz);
        Some(sz)
    }

    /// Drop a manipulation scope without notifying anyone. Used when a
    /// pass aborts on error.
    pub(crate) fn abort_manipulation(&mut self) {
        self.manipulating = self.manipulating.saturating_sub(1);
    }

    /// The box the content occupies within the cell, resolved from the
    /// per-axis alignment and the content's preferred size.
    pub fn content_box(&self) -> Rect {
        let pref = self.preferred_cached();
        let (x, w) = match self.h_align {
            Align::Stretch => (self.rect.left(), self.rect.w),
            Align::Start => (self.rect.left(), pref.w),
            Align::End => (self.rect.right() - pref.w, pref.w),
            Align::Center => (self.rect.left() + (self.rect.w - pref.w) / 2.0, pref.w),
        };
        let (y, h) = match self.v_align {
            Align::Stretch => (self.rect.top(), self.rect.h),
            Align::Start => (self.rect.top(), pref.h),
            Align::End => (self.rect.bottom() - pref.h, pref.h),
            Align::Center => (self.rect.top() + (self.rect.h - pref.h) / 2.0, pref.h),
        };
        Rect::new(x, y, w, h)
    }
}

/// Fixed-size blank content used to reserve space in a grid.
#[derive(Debug, Clone, Copy)]
pub struct Spacer {
    size: Size,
}

impl Spacer {
    /// A spacer with the given dimensions.
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

impl Measurable for Spacer {
    fn preferred_size(&mut self) -> Size {
        self.size
    }
}

impl SpanAware for Spacer {}
impl Placeable for Spacer {}
impl Content for Spacer {}
