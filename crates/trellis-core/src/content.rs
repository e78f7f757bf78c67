//! Capability traits implemented by anything placed in a grid cell.
//!
//! The grid depends on its content structurally, through these small
//! interfaces, and makes no other assumption about collaborator internals.
//! Widgets implement `Measurable` (mandatory) plus whichever of the
//! remaining capabilities apply; [`Grid`] implements all of them, which is
//! what lets grids nest.

use trellis_geom::Size;

use crate::grid::Grid;

/// How many grid slots a piece of content inherently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spans {
    /// Rows covered, at least 1.
    pub rows: usize,
    /// Columns covered, at least 1.
    pub columns: usize,
}

impl Spans {
    /// A single-slot span.
    pub fn single() -> Self {
        Self { rows: 1, columns: 1 }
    }

    /// Construct a span; zero values are raised to 1.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows: rows.max(1),
            columns: columns.max(1),
        }
    }
}

impl Default for Spans {
    fn default() -> Self {
        Self::single()
    }
}

/// Content that can report the size it would like to occupy.
///
/// Takes `&mut self` so implementations can cache the answer and recompute
/// it lazily.
pub trait Measurable {
    /// The size this content wants, in logical pixels.
    fn preferred_size(&mut self) -> Size;
}

/// Content that inherently occupies more than one cell, e.g. a composite
/// control spanning two columns.
pub trait SpanAware {
    /// The slots this content covers. Defaults to a single cell.
    fn spans(&self) -> Spans {
        Spans::single()
    }
}

/// Content that reacts to being given a new box by the layout pipeline.
pub trait Placeable {
    /// Called synchronously at the end of an arrange/post-process pass,
    /// exactly when the pass changed this content's box. This is the sole
    /// channel by which placed content learns it must re-render at a new
    /// size.
    fn content_size_changed(&mut self, _new_size: Size) {}
}

/// The full contract for cell content.
pub trait Content: Measurable + SpanAware + Placeable {
    /// If this content is itself a grid, expose it so the pipeline can
    /// recurse bottom-up. Leaf content keeps the default.
    fn child_grid(&self) -> Option<&Grid> {
        None
    }

    /// Mutable form of [`Content::child_grid`].
    fn child_grid_mut(&mut self) -> Option<&mut Grid> {
        None
    }
}
