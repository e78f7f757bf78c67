//! An incremental grid layout engine.
//!
//! Content is placed into cells of a two-dimensional [`Grid`]; rows and
//! columns size themselves from content, leftover space is distributed by
//! per-column stretch weighting, and structural mutations (insert/remove
//! rows, show/hide cells, resize) recompute only what changed. Grids nest
//! arbitrarily deep, and a suspend/resume scheduler batches bursts of
//! mutations into a single recomputation.
//!
//! The three-phase pipeline lives on [`Grid`]: measure (bottom-up through
//! nested grids), arrange (assign every cell its box) and post-process
//! (stretch distribution and neighbor displacement).

mod cell;
mod content;
mod error;
mod grid;
mod registry;
mod scheduler;

pub mod dump;
pub mod scrollbar;
pub mod tutils;

pub use cell::{Align, Cell, CellId, CellProps, Sizing, Spacer};
pub use content::{Content, Measurable, Placeable, SpanAware, Spans};
pub use error::{Error, Result};
pub use grid::Grid;
pub use registry::CellRegistry;
pub use scheduler::ResizeKind;

pub use trellis_geom as geom;
pub use trellis_geom::{Direction, Point, Rect, Size};
