//! The grid layout container.
//!
//! A grid owns a [`CellRegistry`] and runs the three-phase pipeline over
//! it: **measure** computes row/column tracks from content preferred sizes
//! (nested grids measure first, bottom-up), **arrange** assigns each cell
//! its box and accumulates per-row stretch accounting, and **post-process**
//! distributes leftover space to stretched cells and pushes displaced
//! neighbors rightward until no overlap remains.
//!
//! Grids nest: a grid implements [`Content`], so it can be placed as a
//! cell of a parent grid.

use std::collections::VecDeque;

use tracing::{debug, trace};
use trellis_geom::{Direction, Point, Size};

use crate::cell::{Cell, CellId, CellProps, Sizing, Spacer};
use crate::content::{Content, Measurable, Placeable, SpanAware};
use crate::error::{Error, Result};
use crate::registry::CellRegistry;
use crate::scheduler::{next_token, Action, ResizeKind, Scheduler};
use crate::scrollbar;

/// Resolved vertical extent of one row.
#[derive(Debug, Clone, Copy, Default)]
struct RowTrack {
    top: f64,
    height: f64,
}

/// Resolved horizontal extent of one column. Only tight columns share
/// their track across rows; free-flow cells ignore it.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnTrack {
    left: f64,
    width: f64,
    tight: bool,
}

/// Per-row stretch accounting: total flex weight vs. fixed pixels consumed.
#[derive(Debug, Clone, Copy, Default)]
struct RowStretch {
    flex: f64,
    fixed: f64,
}

/// A two-dimensional layout container with incremental recomputation.
#[derive(Default)]
pub struct Grid {
    registry: CellRegistry,
    scheduler: Scheduler,
    /// Per-column sizing policy, applied to cells placed without an
    /// explicit stretch factor.
    column_factors: Vec<Sizing>,
    row_tracks: Vec<RowTrack>,
    column_tracks: Vec<ColumnTrack>,
    row_stretch: Vec<RowStretch>,
    post_queue: Vec<CellId>,
    requires_post: bool,
    /// Tallest span-all-rows cell seen by the last measure pass; feeds
    /// auto-height so a spanner never overflows its grid.
    max_spanner_height: f64,
    preferred: Size,
    content_size: Size,
    /// The outer box last committed, either by our own size update or by a
    /// parent placing us.
    known: Size,
    known_v_space: bool,
    known_h_space: bool,
    sizes_inited: bool,
    auto_size_width: bool,
    auto_size_height: bool,
    stretch_end_cells: bool,
    allocate_scrollbar_space: bool,
    has_vscroll: bool,
    has_hscroll: bool,
    editable: bool,
}

impl Grid {
    /// An empty grid. Auto-sizes on both axes until given a fixed size.
    pub fn new() -> Self {
        Self {
            auto_size_width: true,
            auto_size_height: true,
            stretch_end_cells: true,
            allocate_scrollbar_space: true,
            ..Self::default()
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.registry.row_count()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.registry.column_count()
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Cell ids in insertion order.
    pub fn ids(&self) -> &[CellId] {
        self.registry.ids()
    }

    /// Borrow a cell by id.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.registry.cell(id)
    }

    /// The cell at `(column, row)`, if any. A span-all-rows cell answers
    /// for every row of its column.
    pub fn get_cell(&self, column: usize, row: usize) -> Option<&Cell> {
        self.registry.get(column, row)
    }

    /// The id at `(column, row)`, if any.
    pub fn cell_id_at(&self, column: usize, row: usize) -> Option<CellId> {
        self.registry.id_at(column, row)
    }

    /// Ids of the cells in a row, left to right. Empty for an
    /// out-of-range row.
    pub fn row_ids(&self, row: usize) -> Vec<CellId> {
        self.registry.row_ids(row)
    }

    /// The nearest occupied neighbor of `id` in the given direction.
    pub fn neighbor(&self, id: CellId, dir: Direction, visible_only: bool) -> Option<CellId> {
        self.registry.neighbor(id, dir, visible_only)
    }

    /// The visible cell whose rendered box contains the point, valid
    /// after a completed pass.
    pub fn cell_at(&self, p: Point) -> Option<CellId> {
        self.registry
            .ids()
            .iter()
            .copied()
            .find(|&id| match self.registry.cell(id) {
                Some(c) => c.is_visible() && c.rect().contains_point(p),
                None => false,
            })
    }

    /// The grid's preferred size after the last pass. An empty grid
    /// prefers zero.
    pub fn preferred_grid_size(&self) -> Size {
        self.preferred
    }

    /// The extent of the placed content after the last pass.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// The outer box last committed for this grid.
    pub fn outer_size(&self) -> Size {
        self.known
    }

    /// Place content at `(column, row)`.
    pub fn add_cell(
        &mut self,
        column: usize,
        row: usize,
        content: impl Content + 'static,
        props: CellProps,
    ) -> Result<CellId> {
        self.add_boxed(column, row, Box::new(content), props, false)
    }

    /// Embed a child grid as a cell at `(column, row)`.
    pub fn add_layout(
        &mut self,
        column: usize,
        row: usize,
        fit_to_grid: bool,
        child: Self,
    ) -> Result<CellId> {
        let props = CellProps {
            fit_to_grid,
            ..CellProps::default()
        };
        self.add_boxed(column, row, Box::new(child), props, false)
    }

    /// Reserve fixed blank space at `(column, row)`. Spacers take part in
    /// arrangement but are skipped by post-processing and notification.
    pub fn add_spacer(
        &mut self,
        column: usize,
        row: usize,
        fit_to_grid: bool,
        size: Size,
    ) -> Result<CellId> {
        let props = CellProps {
            fit_to_grid,
            ..CellProps::default()
        };
        self.add_boxed(column, row, Box::new(Spacer::new(size)), props, true)
    }

    fn add_boxed(
        &mut self,
        column: usize,
        row: usize,
        content: Box<dyn Content>,
        mut props: CellProps,
        virtual_cell: bool,
    ) -> Result<CellId> {
        if props.stretch_factor <= 0.0 {
            props.stretch_factor = self
                .column_factors
                .get(column)
                .map(Sizing::weight)
                .unwrap_or(0.0);
        }
        let mut cell = Cell::new(content, props);
        cell.virtual_cell = virtual_cell;
        let span_columns = cell.spans().columns;
        let id = self.registry.place(row, column, cell)?;
        if self.column_factors.len() < column + span_columns {
            self.column_factors.resize(column + span_columns, Sizing::Auto);
        }
        self.scheduler.note_new_content();
        self.invalidate(ResizeKind::Both)?;
        Ok(id)
    }

    /// Remove a cell, returning its content's cell record.
    pub fn remove_cell(&mut self, id: CellId) -> Result<Cell> {
        let cell = self
            .registry
            .remove(id)
            .ok_or_else(|| Error::OutOfRange("no such cell".into()))?;
        self.invalidate(ResizeKind::Both)?;
        Ok(cell)
    }

    /// Insert `count` empty rows before `index`, shifting later cells
    /// down.
    pub fn insert_rows(&mut self, index: usize, count: usize) -> Result<()> {
        self.registry.insert_rows(index, count)?;
        self.invalidate(ResizeKind::Both)
    }

    /// Remove `count` rows starting at `index`, destroying their cells.
    /// Runs under a suspension so the whole removal costs one pass.
    pub fn remove_rows(&mut self, index: usize, count: usize) -> Result<()> {
        self.suspend_layout();
        let res = self.registry.remove_rows(index, count);
        if res.is_ok() {
            // Parked behind the suspension, released by the resume below.
            self.invalidate(ResizeKind::Both)?;
        }
        self.resume_layout()?;
        res?;
        Ok(())
    }

    /// Show or hide a cell. A hidden cell stays registered but is
    /// excluded from measurement and arrangement.
    pub fn set_visibility(&mut self, id: CellId, visible: bool) -> Result<()> {
        let cell = self
            .registry
            .cell_mut(id)
            .ok_or_else(|| Error::OutOfRange("no such cell".into()))?;
        if cell.visible == visible {
            return Ok(());
        }
        cell.visible = visible;
        self.invalidate(ResizeKind::Both)
    }

    /// Set a column's sizing policy. Applies to cells already in the
    /// column and to future placements that carry no explicit factor.
    pub fn set_stretch_factor(&mut self, column: usize, sizing: Sizing) -> Result<()> {
        if self.column_factors.len() <= column {
            self.column_factors.resize(column + 1, Sizing::Auto);
        }
        self.column_factors[column] = sizing;
        let ids: Vec<CellId> = self.registry.ids().to_vec();
        for id in ids {
            if let Some(cell) = self.registry.cell_mut(id)
                && cell.column == column
                && !cell.virtual_cell
            {
                cell.stretch_factor = sizing.weight();
            }
        }
        self.invalidate(ResizeKind::Width)
    }

    /// Pin the grid's width; it no longer tracks content width.
    pub fn set_fixed_width(&mut self, width: f64) -> Result<()> {
        self.preferred.w = width;
        self.auto_size_width = false;
        self.invalidate(ResizeKind::Width)
    }

    /// Pin the grid's height; it no longer tracks content height.
    pub fn set_fixed_height(&mut self, height: f64) -> Result<()> {
        self.preferred.h = height;
        self.auto_size_height = false;
        self.invalidate(ResizeKind::Height)
    }

    /// Return to sizing the grid from its content on both axes.
    pub fn set_auto_size(&mut self) -> Result<()> {
        self.auto_size_width = true;
        self.auto_size_height = true;
        self.invalidate(ResizeKind::Both)
    }

    /// Whether scrollbar space is reserved whenever an axis is fixed,
    /// rather than only on actual overflow.
    pub fn set_allocate_scrollbar_space(&mut self, allocate: bool) {
        self.allocate_scrollbar_space = allocate;
    }

    /// Whether a last-row cell grows to fill a gap below it.
    pub fn set_stretch_end_cells(&mut self, stretch: bool) {
        self.stretch_end_cells = stretch;
    }

    /// Editable mode renders borders on empty insertion gaps. Cosmetic;
    /// geometry is unaffected.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Whether editable mode is on.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Suspend layout recomputation. Must be paired with
    /// [`Grid::resume_layout`]; suspensions nest.
    pub fn suspend_layout(&mut self) {
        self.scheduler.suspend();
    }

    /// Release one suspension level. Releasing the last level runs a
    /// single pass covering everything requested while suspended. An
    /// unmatched resume is a no-op.
    pub fn resume_layout(&mut self) -> Result<()> {
        if let Some(kind) = self.scheduler.resume() {
            self.invalidate(kind)?;
        }
        Ok(())
    }

    /// Mark the layout stale and recompute, unless suspended or waiting
    /// on freshly added content.
    pub fn invalidate(&mut self, kind: ResizeKind) -> Result<()> {
        match self.scheduler.invalidate(kind) {
            Action::Run(kind) => self.run_pass(kind),
            Action::Deferred => {
                trace!(?kind, "layout deferred until tick");
                Ok(())
            }
            Action::Parked => {
                trace!(?kind, "layout request parked while suspended");
                Ok(())
            }
        }
    }

    /// True if freshly added content is waiting for a [`Grid::tick`].
    pub fn needs_tick(&self) -> bool {
        self.scheduler.needs_tick()
    }

    /// Run the pass deferred by content additions, if one is waiting. A
    /// burst of additions costs a single pass here.
    pub fn tick(&mut self) -> Result<()> {
        match self.scheduler.take_tick() {
            Some(kind) => self.run_pass(kind),
            None => Ok(()),
        }
    }

    /// True if the last completed pass is still valid.
    pub fn layout_valid(&self) -> bool {
        self.scheduler.layout_valid()
    }

    fn run_pass(&mut self, kind: ResizeKind) -> Result<()> {
        let token = next_token();
        debug!(?kind, token, "layout pass");
        self.process_cells(kind, token)?;
        if self.requires_post {
            self.post_process_cells()?;
        }
        Ok(())
    }

    /// Measure and arrange, bottom-up through nested grids. Returns true
    /// if this grid's committed outer size changed, which tells a parent
    /// to re-measure the cell holding it.
    fn process_cells(&mut self, kind: ResizeKind, token: u64) -> Result<bool> {
        if !self.scheduler.begin_pass(token) {
            return Ok(false);
        }
        if self.scheduler.is_suspended() {
            self.scheduler.merge(kind);
            return Ok(false);
        }

        let ids: Vec<CellId> = self.registry.ids().to_vec();
        for id in ids {
            let Some(cell) = self.registry.cell_mut(id) else {
                continue;
            };
            let mut child_resized = false;
            if let Some(child) = cell.child_grid_mut()
                && !child.layout_valid()
            {
                child_resized = child.process_cells(kind, token)?;
            }
            if child_resized {
                cell.invalidate_preferred();
            }
        }

        self.begin_cell_manipulation();
        self.requires_post = true;

        self.measure();
        if let Err(e) = self.arrange(kind) {
            self.abort_cell_manipulation();
            self.requires_post = false;
            return Err(e);
        }

        self.scheduler.absorb_pass();
        Ok(self.update_size())
    }

    /// Measure pass: resolve row and column tracks from preferred sizes.
    ///
    /// Tight (fit-to-grid) columns share a track across rows; free-flow
    /// cells only advance the cursor. A trailing reconciliation sweep
    /// keeps tight tracks from overlapping when per-row cursors disagreed.
    fn measure(&mut self) {
        let rows = self.registry.row_count();
        let cols = self.registry.column_count();
        self.row_tracks.clear();
        self.column_tracks.clear();
        self.column_tracks.resize(cols, ColumnTrack::default());
        self.max_spanner_height = 0.0;

        let mut top = 0.0;
        for r in 0..rows {
            let mut left = 0.0;
            let mut track = RowTrack { top, height: 0.0 };
            for c in 0..cols {
                let Some(id) = self.registry.id_at(c, r) else {
                    continue;
                };
                let Some(cell) = self.registry.cell_mut(id) else {
                    continue;
                };
                if !cell.visible {
                    continue;
                }
                let pref = cell.preferred_size();
                let fit = cell.fit_to_grid;
                let span_all = cell.span_all_rows;

                if fit {
                    let col = &mut self.column_tracks[c];
                    col.tight = true;
                    if col.left < left {
                        col.left = left;
                    }
                    if col.width < pref.w {
                        col.width = pref.w;
                    }
                }
                if !span_all || rows == 1 {
                    if track.height < pref.h {
                        track.height = pref.h;
                    }
                } else if self.max_spanner_height < pref.h {
                    self.max_spanner_height = pref.h;
                }
                left += pref.w;
            }
            top += track.height;
            self.row_tracks.push(track);
        }

        // Tight columns never overlap: grow a column whose right edge the
        // next track already cleared, push the next track otherwise.
        for i in 0..cols.saturating_sub(1) {
            let cur = self.column_tracks[i];
            if !cur.tight {
                continue;
            }
            let right = cur.left + cur.width;
            if self.column_tracks[i + 1].left < right {
                self.column_tracks[i + 1].left = right;
            } else {
                self.column_tracks[i].width = self.column_tracks[i + 1].left - cur.left;
            }
        }
    }

    /// Arrange pass: commit boxes from the resolved tracks, accumulate
    /// per-row stretch accounting, and queue cells for post-processing.
    fn arrange(&mut self, kind: ResizeKind) -> Result<()> {
        let rows = self.registry.row_count();
        let cols = self.registry.column_count();
        self.row_stretch = vec![RowStretch::default(); rows];
        self.post_queue.clear();
        let mut content_w: f64 = 0.0;
        let mut content_h: f64 = 0.0;

        for r in 0..rows {
            self.check_row_config(r)?;

            let RowTrack { top, height } = self.row_tracks[r];
            let mut left = 0.0;
            for c in 0..cols {
                let Some(id) = self.registry.id_at(c, r) else {
                    continue;
                };
                let Some(cell) = self.registry.cell_mut(id) else {
                    continue;
                };
                if !cell.visible {
                    continue;
                }

                let track = self.column_tracks[c];
                let x = if cell.fit_to_grid { track.left } else { left };
                let width = if cell.fit_to_grid {
                    track.width
                } else {
                    cell.preferred_cached().w
                };

                // Spanners are committed once, on their home row.
                if !cell.span_all_rows || r == 0 {
                    match kind {
                        ResizeKind::Height => cell.adjust_vertically(top, height),
                        ResizeKind::Width => cell.adjust_horizontally(x, width),
                        ResizeKind::Both => cell.adjust(x, top, width, height),
                    }
                }
                left = x + width;

                let stretch = cell.stretch_factor;
                let span_all = cell.span_all_rows;
                let home = cell.row;
                let virtual_cell = cell.virtual_cell;

                let rs = &mut self.row_stretch[r];
                if stretch > 0.0 {
                    rs.flex += stretch;
                } else {
                    rs.fixed += width;
                }
                if content_w < left {
                    content_w = left;
                }

                if r == home && !virtual_cell {
                    if kind.covers_height() && (home == rows - 1 || span_all) {
                        self.post_queue.push(id);
                    } else if kind.covers_width() && stretch > 0.0 {
                        self.post_queue.push(id);
                    }
                }
            }
            content_h = top + height;
        }

        if kind.covers_width() {
            if self.auto_size_width {
                self.preferred.w = content_w;
            }
            self.content_size.w = content_w;
        }
        if kind.covers_height() {
            if self.auto_size_height {
                self.preferred.h = content_h;
            }
            self.content_size.h = content_h;
        }
        Ok(())
    }

    /// Reject stretch/fit combinations that cannot coexist, regardless of
    /// the order cells appear in the row.
    fn check_row_config(&self, row: usize) -> Result<()> {
        let mut has_fit = false;
        let mut has_row_stretch = false;
        for c in 0..self.registry.column_count() {
            let Some(cell) = self
                .registry
                .id_at(c, row)
                .and_then(|id| self.registry.cell(id))
            else {
                continue;
            };
            if !cell.visible {
                continue;
            }
            if cell.fit_to_grid && cell.stretch_factor > 0.0 {
                return Err(Error::Configuration(format!(
                    "cell at column {c}, row {row} cannot stretch and fit to grid"
                )));
            }
            if cell.fit_to_grid {
                has_fit = true;
            }
            if cell.stretch_factor > 0.0 && !cell.span_all_rows {
                has_row_stretch = true;
            }
        }
        if has_fit && has_row_stretch {
            return Err(Error::Configuration(format!(
                "row {row} mixes a stretched cell with fitted cells"
            )));
        }
        Ok(())
    }

    /// Commit the grid's own outer size from the pass results. Returns
    /// true when the committed size (or reserved scrollbar space)
    /// changed.
    fn update_size(&mut self) -> bool {
        // Auto axes track the content extent arrange just committed; fixed
        // axes were pinned into `preferred` by the setters.
        let width = self.preferred.w;
        let height = self.preferred.h.max(self.max_spanner_height);

        self.has_hscroll = !self.auto_size_width
            && (self.allocate_scrollbar_space || self.content_size.w > width);
        self.has_vscroll = !self.auto_size_height
            && (self.allocate_scrollbar_space || self.content_size.h > height);

        // Scrollbar space on a fixed axis comes out of the box; on an
        // auto axis it is added outside it.
        let v_space = self.has_vscroll && self.auto_size_width;
        let h_space = self.has_hscroll && self.auto_size_height;

        let width_changed = self.known.w != width || self.known_v_space != v_space;
        let height_changed = self.known.h != height || self.known_h_space != h_space;
        if !self.sizes_inited || width_changed || height_changed {
            self.known = Size::new(width, height);
            self.known_v_space = v_space;
            self.known_h_space = h_space;
        }
        let report = self.sizes_inited && (width_changed || height_changed);
        self.sizes_inited = true;
        report
    }

    /// Post-process pass: fill the gap under the last row, stretch
    /// spanners to full height, distribute leftover width by stretch
    /// weight, and push displaced neighbors.
    fn post_process_cells(&mut self) -> Result<()> {
        if !self.requires_post {
            return Ok(());
        }
        let queue = std::mem::take(&mut self.post_queue);
        if !queue.is_empty() {
            trace!(cells = queue.len(), "post-process");
            let v_space = if self.has_vscroll && !self.auto_size_width {
                scrollbar::extent().w
            } else {
                0.0
            };
            let h_space = if self.has_hscroll && !self.auto_size_height {
                scrollbar::extent().h
            } else {
                0.0
            };
            let grid_w = self.known.w - v_space;
            let grid_h = self.known.h - h_space;
            let rows = self.registry.row_count();
            let mut max_flex_row: Option<usize> = None;

            for &id in &queue {
                let Some(cell) = self.registry.cell_mut(id) else {
                    continue;
                };
                if cell.virtual_cell {
                    continue;
                }
                let home = cell.row;
                let span_all = cell.span_all_rows;
                let stretch = cell.stretch_factor;

                if home == rows - 1 && self.stretch_end_cells {
                    let bottom = cell.bottom();
                    if grid_h > bottom {
                        let fill = cell.actual_height() + (grid_h - bottom);
                        cell.adjust_height(fill);
                    }
                }
                if span_all {
                    cell.adjust_vertically(0.0, grid_h);
                }
                if stretch > 0.0 {
                    let flex_row = if span_all {
                        *max_flex_row.get_or_insert_with(|| {
                            let mut best = (0, 0.0);
                            for (r, rs) in self.row_stretch.iter().enumerate() {
                                if rs.flex > best.1 {
                                    best = (r, rs.flex);
                                }
                            }
                            best.0
                        })
                    } else {
                        home
                    };
                    let rs = self.row_stretch[flex_row];
                    if rs.flex > 0.0 {
                        let new_w = ((grid_w - rs.fixed) * (stretch / rs.flex)).max(0.0);
                        if let Some(cell) = self.registry.cell_mut(id) {
                            cell.adjust_width(new_w);
                        }
                        if span_all {
                            // The spanner has spent its share in every row.
                            for rs in &mut self.row_stretch {
                                rs.fixed += new_w;
                                rs.flex -= stretch;
                            }
                        }
                        self.propagate_right_edge(id);
                    }
                }
            }
        }

        self.end_cell_manipulation();
        self.requires_post = false;

        let ids: Vec<CellId> = self.registry.ids().to_vec();
        for id in ids {
            if let Some(cell) = self.registry.cell_mut(id)
                && let Some(child) = cell.child_grid_mut()
                && child.requires_post
            {
                child.post_process_cells()?;
            }
        }
        Ok(())
    }

    /// Push cells out of the way of a right edge that moved outward,
    /// absorbing overlap in neighbor slack and carrying any remainder
    /// further right until it is gone or the grid edge is reached.
    fn propagate_right_edge(&mut self, start: CellId) {
        let mut work: VecDeque<CellId> = VecDeque::new();
        work.push_back(start);
        while let Some(id) = work.pop_front() {
            for (boundary, target) in self.overlap_targets(id) {
                if self.resolve_overlap(boundary, target) {
                    work.push_back(target);
                }
            }
        }
    }

    /// The cells a moved right edge may displace, paired with the
    /// boundary each must clear.
    ///
    /// Free-flow cells displace their same-row right neighbor. A
    /// span-all-rows cell displaces the first cell to its right in every
    /// row. A fitted cell keeps its column aligned across all rows: cells
    /// in the same column follow its left edge, cells in the next column
    /// follow its right edge.
    fn overlap_targets(&self, id: CellId) -> Vec<(f64, CellId)> {
        let Some(cell) = self.registry.cell(id) else {
            return Vec::new();
        };
        let boundary = cell.right();
        let rows = self.registry.row_count();
        let cols = self.registry.column_count();
        let right = self.registry.neighbor(id, Direction::Right, false);
        let mut out = Vec::new();

        if !cell.span_all_rows && !cell.fit_to_grid {
            if let Some(rc) = right {
                out.push((boundary, rc));
            }
        } else if cell.span_all_rows {
            'rows: for r in 0..rows {
                let mut c = cell.column;
                while c + 1 < cols {
                    c += 1;
                    if let Some(m) = self.registry.id_at(c, r) {
                        if m == id {
                            continue;
                        }
                        out.push((boundary, m));
                        if self
                            .registry
                            .cell(m)
                            .is_some_and(|mc| mc.span_all_rows)
                        {
                            break 'rows;
                        }
                        break;
                    }
                }
            }
        } else {
            for r in 0..rows {
                if r == cell.row {
                    if let Some(rc) = right {
                        out.push((boundary, rc));
                    }
                    continue;
                }
                let (edge, found) = match self.registry.id_at(cell.column, r) {
                    Some(m) => (cell.left(), Some(m)),
                    None => (boundary, self.registry.id_at(cell.column + 1, r)),
                };
                if let Some(m) = found
                    && m != id
                    && self.registry.cell(m).is_some_and(|mc| mc.fit_to_grid)
                {
                    out.push((edge, m));
                }
            }
        }
        out
    }

    /// Move a cell clear of `boundary`, shrinking it into its slack
    /// first. Returns true if its own right edge moved, i.e. overlap
    /// remains to be carried further.
    fn resolve_overlap(&mut self, boundary: f64, id: CellId) -> bool {
        let Some(cell) = self.registry.cell_mut(id) else {
            return false;
        };
        if cell.left() >= boundary {
            return false;
        }
        let diff = boundary - cell.left();
        let room = cell.adjustable_width();
        if room == 0.0 {
            cell.adjust_left(boundary);
            true
        } else if room >= diff {
            let width = cell.actual_width() - diff;
            cell.adjust_horizontally(boundary, width);
            false
        } else {
            let width = cell.preferred_cached().w;
            cell.adjust_horizontally(boundary, width);
            true
        }
    }

    fn begin_cell_manipulation(&mut self) {
        let ids: Vec<CellId> = self.registry.ids().to_vec();
        for id in ids {
            if let Some(cell) = self.registry.cell_mut(id)
                && !cell.virtual_cell
            {
                cell.begin_manipulation();
            }
        }
    }

    /// Close every manipulation scope, notifying contents whose box
    /// changed during the pass.
    fn end_cell_manipulation(&mut self) {
        let ids: Vec<CellId> = self.registry.ids().to_vec();
        for id in ids {
            if let Some(cell) = self.registry.cell_mut(id)
                && !cell.virtual_cell
            {
                cell.end_manipulation();
            }
        }
    }

    /// Unwind manipulation scopes without notification after a failed
    /// arrange.
    fn abort_cell_manipulation(&mut self) {
        let ids: Vec<CellId> = self.registry.ids().to_vec();
        for id in ids {
            if let Some(cell) = self.registry.cell_mut(id)
                && !cell.virtual_cell
            {
                cell.abort_manipulation();
            }
        }
    }

    /// Record the outer box a parent has given this grid.
    fn set_outer_size(&mut self, size: Size) {
        if self.known != size {
            self.known = size;
            self.scheduler.mark_stale();
        }
        self.sizes_inited = true;
    }
}

impl Measurable for Grid {
    /// The box this grid asks its parent for: the committed size plus any
    /// scrollbar space carried outside it.
    fn preferred_size(&mut self) -> Size {
        let extent = scrollbar::extent();
        let w = self.known.w + if self.known_v_space { extent.w } else { 0.0 };
        let h = self.known.h + if self.known_h_space { extent.h } else { 0.0 };
        Size::new(w, h)
    }
}

impl SpanAware for Grid {}

impl Placeable for Grid {
    fn content_size_changed(&mut self, new_size: Size) {
        self.set_outer_size(new_size);
    }
}

impl Content for Grid {
    fn child_grid(&self) -> Option<&Grid> {
        Some(self)
    }

    fn child_grid_mut(&mut self) -> Option<&mut Grid> {
        Some(self)
    }
}
