//! Test helpers: canned cell content and a size-change journal.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_geom::Size;

use crate::content::{Content, Measurable, Placeable, SpanAware, Spans};
use crate::error::Result;
use crate::grid::Grid;

/// A shared journal of the sizes a piece of content was given, in
/// notification order.
#[derive(Debug, Clone, Default)]
pub struct SizeLog(Rc<RefCell<Vec<Size>>>);

impl SizeLog {
    /// An empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// All sizes recorded so far.
    pub fn entries(&self) -> Vec<Size> {
        self.0.borrow().clone()
    }

    /// The most recent size, if any.
    pub fn last(&self) -> Option<Size> {
        self.0.borrow().last().copied()
    }

    /// Number of notifications recorded.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn push(&self, size: Size) {
        self.0.borrow_mut().push(size);
    }
}

/// Fixed-size content for exercising the layout pipeline.
pub struct Fixed {
    size: Size,
    spans: Spans,
    log: Option<SizeLog>,
    /// Counts how many times the pipeline asked for a fresh measurement.
    pub measured: usize,
}

impl Fixed {
    /// Content with the given preferred width and height.
    pub fn new(w: f64, h: f64) -> Self {
        Self {
            size: Size::new(w, h),
            spans: Spans::single(),
            log: None,
            measured: 0,
        }
    }

    /// Content that inherently covers multiple slots.
    pub fn spanning(w: f64, h: f64, spans: Spans) -> Self {
        Self {
            spans,
            ..Self::new(w, h)
        }
    }

    /// Attach a journal recording every size notification.
    pub fn logged(mut self, log: &SizeLog) -> Self {
        self.log = Some(log.clone());
        self
    }
}

impl Measurable for Fixed {
    fn preferred_size(&mut self) -> Size {
        self.measured += 1;
        self.size
    }
}

impl SpanAware for Fixed {
    fn spans(&self) -> Spans {
        self.spans
    }
}

impl Placeable for Fixed {
    fn content_size_changed(&mut self, new_size: Size) {
        if let Some(log) = &self.log {
            log.push(new_size);
        }
    }
}

impl Content for Fixed {}

/// Run any pass the grid deferred while content was added. Tests call
/// this after a batch of placements, standing in for the host's tick.
pub fn settle(grid: &mut Grid) -> Result<()> {
    while grid.needs_tick() {
        grid.tick()?;
    }
    Ok(())
}
