//! Sparse cell storage with dual coordinate maps.
//!
//! Cells live in a slotmap arena; two parallel sparse maps index them
//! row-major and column-major, and an insertion-ordered list preserves the
//! sequence the layout pipeline walks. The three views are kept consistent
//! by every mutation, and a failed placement leaves all of them untouched.

use slotmap::SlotMap;
use trellis_geom::Direction;

use crate::cell::{Cell, CellId};
use crate::error::{Error, Result};

/// Sparse cell store indexed by id, by (row, column), and by insertion
/// order.
#[derive(Default)]
pub struct CellRegistry {
    cells: SlotMap<CellId, Cell>,
    /// Insertion order, the order passes walk cells in.
    order: Vec<CellId>,
    /// Row-major map: `rows[row][column]`.
    rows: Vec<Vec<Option<CellId>>>,
    /// Column-major map: `columns[column][row]`.
    columns: Vec<Vec<Option<CellId>>>,
    row_count: usize,
    column_count: usize,
}

impl CellRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows, one past the highest occupied row index.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns, one past the highest occupied column index.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no cells are registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cell ids in insertion order.
    pub fn ids(&self) -> &[CellId] {
        &self.order
    }

    /// Borrow a cell by id.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Mutably borrow a cell by id.
    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id)
    }

    /// The id occupying `(column, row)`. A column owned by a span-all-rows
    /// cell answers with that cell for every row.
    pub fn id_at(&self, column: usize, row: usize) -> Option<CellId> {
        if let Some(id) = self
            .rows
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .flatten()
        {
            return Some(id);
        }
        // Spanners are stored at row 0 and cover the whole column.
        let id = self.rows.first()?.get(column).copied().flatten()?;
        if self.cells[id].span_all_rows {
            Some(id)
        } else {
            None
        }
    }

    /// Borrow the cell at `(column, row)`.
    pub fn get(&self, column: usize, row: usize) -> Option<&Cell> {
        self.id_at(column, row).map(|id| &self.cells[id])
    }

    /// Mutably borrow the cell at `(column, row)`.
    pub fn get_mut(&mut self, column: usize, row: usize) -> Option<&mut Cell> {
        let id = self.id_at(column, row)?;
        Some(&mut self.cells[id])
    }

    /// Place a cell at `(row, column)`. Fails with [`Error::DuplicateCell`]
    /// if the slot is occupied, or [`Error::SpanConflict`] if the placement
    /// would let a span-all-rows cell share a column with another cell. All
    /// checks run before any mutation.
    pub fn place(&mut self, row: usize, column: usize, cell: Cell) -> Result<CellId> {
        let row = if cell.span_all_rows { 0 } else { row };

        if cell.span_all_rows {
            if let Some(col) = self.columns.get(column)
                && col.iter().any(Option::is_some)
            {
                return Err(Error::SpanConflict(format!(
                    "column {column} is occupied and cannot take a row spanner"
                )));
            }
        } else if let Some(spanner) = self
            .rows
            .first()
            .and_then(|r| r.get(column))
            .copied()
            .flatten()
            && self.cells[spanner].span_all_rows
        {
            return Err(Error::SpanConflict(format!(
                "column {column} is owned by a row spanner"
            )));
        }

        if self.id_at(column, row).is_some() {
            return Err(Error::DuplicateCell { column, row });
        }

        let last_column = column + cell.spans.columns - 1;
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        if self.columns.len() <= last_column {
            self.columns.resize_with(last_column + 1, Vec::new);
        }
        if self.rows[row].len() <= column {
            self.rows[row].resize(column + 1, None);
        }
        if self.columns[column].len() <= row {
            self.columns[column].resize(row + 1, None);
        }

        let list_index = self.order.len();
        let id = self.cells.insert(cell);
        let c = &mut self.cells[id];
        c.row = row;
        c.column = column;
        c.list_index = list_index;
        let row_span = if c.span_all_rows { 1 } else { c.spans.rows };
        let covered_rows = row + row_span;

        self.rows[row][column] = Some(id);
        self.columns[column][row] = Some(id);
        self.order.push(id);
        self.row_count = self.row_count.max(covered_rows);
        self.column_count = self.column_count.max(last_column + 1);
        Ok(id)
    }

    /// Remove a cell, returning it. Later cells' list indexes shift down.
    pub fn remove(&mut self, id: CellId) -> Option<Cell> {
        let cell = self.cells.remove(id)?;
        self.rows[cell.row][cell.column] = None;
        self.columns[cell.column][cell.row] = None;
        let idx = cell.list_index;
        self.order.remove(idx);
        for &later in &self.order[idx..] {
            self.cells[later].list_index -= 1;
        }
        Some(cell)
    }

    /// Insert `count` empty rows before `index`, shifting existing cells
    /// down. `index` may equal the row count to append.
    pub fn insert_rows(&mut self, index: usize, count: usize) -> Result<()> {
        if index > self.row_count {
            return Err(Error::OutOfRange(format!(
                "insert at row {index} beyond {} rows",
                self.row_count
            )));
        }
        if count == 0 {
            return Ok(());
        }
        for cell in self.cells.values_mut() {
            if cell.row >= index && !cell.span_all_rows {
                cell.row += count;
            }
        }
        if self.rows.len() >= index {
            for _ in 0..count {
                self.rows.insert(index, Vec::new());
            }
        }
        for col in &mut self.columns {
            if col.len() >= index {
                for _ in 0..count {
                    col.insert(index, None);
                }
            }
        }
        self.row_count += count;
        self.repin_spanners();
        Ok(())
    }

    /// Remove `count` rows starting at `index`, destroying the cells they
    /// contain and shifting later cells up.
    pub fn remove_rows(&mut self, index: usize, count: usize) -> Result<Vec<Cell>> {
        if index + count > self.row_count {
            return Err(Error::OutOfRange(format!(
                "remove rows {index}..{} beyond {} rows",
                index + count,
                self.row_count
            )));
        }
        let doomed: Vec<CellId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| {
                let c = &self.cells[id];
                !c.span_all_rows && c.row >= index && c.row < index + count
            })
            .collect();
        let mut removed = Vec::with_capacity(doomed.len());
        for id in doomed {
            if let Some(c) = self.remove(id) {
                removed.push(c);
            }
        }
        for cell in self.cells.values_mut() {
            if cell.row >= index + count && !cell.span_all_rows {
                cell.row -= count;
            }
        }
        for _ in 0..count {
            if self.rows.len() > index {
                self.rows.remove(index);
            }
        }
        for col in &mut self.columns {
            for _ in 0..count {
                if col.len() > index {
                    col.remove(index);
                }
            }
        }
        self.row_count -= count;
        self.repin_spanners();
        Ok(removed)
    }

    /// Span-all-rows cells keep `cell.row == 0`, but a row splice moves or
    /// destroys their row-0 slot in the coordinate maps. Scrub any stale
    /// slot and pin the cell back at row 0 of both maps.
    fn repin_spanners(&mut self) {
        let spanners: Vec<(CellId, usize)> = self
            .cells
            .iter()
            .filter(|(_, c)| c.span_all_rows)
            .map(|(id, c)| (id, c.column))
            .collect();
        for (id, column) in spanners {
            for row in &mut self.rows {
                if row.get(column).copied().flatten() == Some(id) {
                    row[column] = None;
                }
            }
            for slot in &mut self.columns[column] {
                if *slot == Some(id) {
                    *slot = None;
                }
            }
            if self.rows.is_empty() {
                self.rows.push(Vec::new());
            }
            if self.rows[0].len() <= column {
                self.rows[0].resize(column + 1, None);
            }
            self.rows[0][column] = Some(id);
            let col = &mut self.columns[column];
            if col.is_empty() {
                col.push(None);
            }
            col[0] = Some(id);
        }
    }

    /// The nearest occupied cell from `id` in the given direction, scanning
    /// outward over empty slots. With `visible_only`, invisible cells are
    /// skipped too.
    pub fn neighbor(&self, id: CellId, dir: Direction, visible_only: bool) -> Option<CellId> {
        let cell = self.cells.get(id)?;
        let (mut column, mut row) = (cell.column as isize, cell.row as isize);
        let (dc, dr) = match dir {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        };
        loop {
            column += dc;
            row += dr;
            if column < 0
                || row < 0
                || column as usize >= self.column_count
                || row as usize >= self.row_count
            {
                return None;
            }
            if let Some(found) = self.id_at(column as usize, row as usize) {
                if found == id {
                    continue;
                }
                if visible_only && !self.cells[found].visible {
                    continue;
                }
                return Some(found);
            }
        }
    }

    /// Ids of the cells in a row, left to right. Spanner columns contribute
    /// for every row. An out-of-range row is empty.
    pub fn row_ids(&self, row: usize) -> Vec<CellId> {
        if row >= self.row_count {
            return Vec::new();
        }
        (0..self.column_count)
            .filter_map(|c| self.id_at(c, row))
            .collect()
    }
}
