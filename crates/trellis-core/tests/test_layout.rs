//! Tests for the grid layout pipeline: placement, measurement, stretch
//! distribution, edge propagation and the invalidation scheduler.

#[cfg(test)]
mod tests {
    use trellis_core::{
        Align, CellProps, Error, Grid, Rect, ResizeKind, Result, Size,
        tutils::{Fixed, SizeLog, settle},
    };

    fn rect_of(grid: &Grid, column: usize, row: usize) -> Rect {
        grid.get_cell(column, row)
            .map(|c| c.rect())
            .unwrap_or_default()
    }

    #[test]
    fn empty_grid_is_a_no_op() -> Result<()> {
        let mut g = Grid::new();
        g.invalidate(ResizeKind::Both)?;
        assert_eq!(g.preferred_grid_size(), Size::zero());
        assert_eq!(g.row_count(), 0);
        Ok(())
    }

    #[test]
    fn fitted_cells_pack_tightly() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::fitted())?;
        g.add_cell(1, 0, Fixed::new(60.0, 20.0), CellProps::fitted())?;
        settle(&mut g)?;

        assert_eq!(rect_of(&g, 0, 0), Rect::new(0.0, 0.0, 40.0, 20.0));
        assert_eq!(rect_of(&g, 1, 0), Rect::new(40.0, 0.0, 60.0, 20.0));
        assert_eq!(g.preferred_grid_size(), Size::new(100.0, 20.0));
        Ok(())
    }

    #[test]
    fn tight_columns_share_tracks_across_rows() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::fitted())?;
        g.add_cell(1, 0, Fixed::new(60.0, 20.0), CellProps::fitted())?;
        g.add_cell(0, 1, Fixed::new(100.0, 20.0), CellProps::fitted())?;
        g.add_cell(1, 1, Fixed::new(30.0, 20.0), CellProps::fitted())?;
        settle(&mut g)?;

        // Column 0 widens to its widest occupant, column 1 starts past it
        // in every row.
        assert_eq!(rect_of(&g, 0, 0).w, 100.0);
        assert_eq!(rect_of(&g, 0, 1).w, 100.0);
        assert_eq!(rect_of(&g, 1, 0).left(), 100.0);
        assert_eq!(rect_of(&g, 1, 1).left(), 100.0);
        Ok(())
    }

    #[test]
    fn stretch_cell_takes_the_remainder() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(100.0, 20.0), CellProps::default())?;
        g.add_cell(1, 0, Fixed::new(10.0, 20.0), CellProps::stretched(3.0))?;
        g.set_fixed_width(300.0)?;
        settle(&mut g)?;

        assert_eq!(rect_of(&g, 0, 0), Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(rect_of(&g, 1, 0).left(), 100.0);
        assert_eq!(rect_of(&g, 1, 0).w, 200.0);
        Ok(())
    }

    #[test]
    fn stretch_splits_by_weight() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(100.0, 20.0), CellProps::default())?;
        g.add_cell(1, 0, Fixed::new(10.0, 20.0), CellProps::stretched(1.0))?;
        g.add_cell(2, 0, Fixed::new(10.0, 20.0), CellProps::stretched(3.0))?;
        g.set_fixed_width(500.0)?;
        settle(&mut g)?;

        // 400 leftover split 1:3.
        assert_eq!(rect_of(&g, 1, 0).w, 100.0);
        assert_eq!(rect_of(&g, 2, 0).w, 300.0);
        Ok(())
    }

    #[test]
    fn widened_cell_pushes_neighbors_right() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(50.0, 20.0), CellProps::stretched(1.0))?;
        g.add_cell(1, 0, Fixed::new(50.0, 20.0), CellProps::default())?;
        g.add_cell(2, 0, Fixed::new(80.0, 20.0), CellProps::default())?;
        g.set_fixed_width(300.0)?;
        settle(&mut g)?;

        // The stretched cell grows to 170 and displaces both neighbors,
        // which have no slack.
        assert_eq!(rect_of(&g, 0, 0).w, 170.0);
        assert_eq!(rect_of(&g, 1, 0).left(), 170.0);
        assert_eq!(rect_of(&g, 2, 0).left(), 220.0);
        Ok(())
    }

    #[test]
    fn last_row_fills_fixed_height() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        g.add_cell(0, 1, Fixed::new(40.0, 20.0), CellProps::default())?;
        g.set_fixed_height(100.0)?;
        settle(&mut g)?;

        assert_eq!(rect_of(&g, 0, 1).top(), 20.0);
        assert_eq!(rect_of(&g, 0, 1).h, 80.0);
        Ok(())
    }

    #[test]
    fn end_stretching_can_be_disabled() -> Result<()> {
        let mut g = Grid::new();
        g.set_stretch_end_cells(false);
        g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        g.set_fixed_height(100.0)?;
        settle(&mut g)?;

        assert_eq!(rect_of(&g, 0, 0).h, 20.0);
        Ok(())
    }

    #[test]
    fn hidden_cells_are_skipped() -> Result<()> {
        let mut g = Grid::new();
        let a = g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::fitted())?;
        g.add_cell(1, 0, Fixed::new(60.0, 20.0), CellProps::fitted())?;
        settle(&mut g)?;
        assert_eq!(rect_of(&g, 1, 0).left(), 40.0);

        g.set_visibility(a, false)?;
        assert_eq!(rect_of(&g, 1, 0).left(), 0.0);
        assert_eq!(g.preferred_grid_size().w, 60.0);

        g.set_visibility(a, true)?;
        assert_eq!(rect_of(&g, 1, 0).left(), 40.0);
        Ok(())
    }

    #[test]
    fn insert_rows_shifts_cells_down() -> Result<()> {
        let mut g = Grid::new();
        let r0 = g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        let r1 = g.add_cell(0, 1, Fixed::new(40.0, 20.0), CellProps::default())?;
        let r2 = g.add_cell(0, 2, Fixed::new(40.0, 20.0), CellProps::default())?;
        settle(&mut g)?;

        g.insert_rows(1, 2)?;
        assert_eq!(g.cell(r0).map(|c| c.row()), Some(0));
        assert_eq!(g.cell(r1).map(|c| c.row()), Some(3));
        assert_eq!(g.cell(r2).map(|c| c.row()), Some(4));
        assert_eq!(g.row_count(), 5);
        Ok(())
    }

    #[test]
    fn remove_rows_costs_one_pass() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        g.add_cell(0, 1, Fixed::new(40.0, 30.0), CellProps::default())?;
        let bottom = g.add_cell(0, 2, Fixed::new(40.0, 20.0), CellProps::default())?;
        settle(&mut g)?;

        g.remove_rows(1, 1)?;
        settle(&mut g)?;
        assert_eq!(g.len(), 2);
        assert_eq!(g.cell(bottom).map(|c| c.row()), Some(1));
        assert_eq!(rect_of(&g, 0, 1).top(), 20.0);
        assert_eq!(g.preferred_grid_size().h, 40.0);
        Ok(())
    }

    #[test]
    fn span_conflict_leaves_registry_unchanged() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(
            0,
            0,
            Fixed::new(30.0, 20.0),
            CellProps {
                span_all_rows: true,
                ..CellProps::default()
            },
        )?;
        g.add_cell(1, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        g.add_cell(1, 1, Fixed::new(40.0, 20.0), CellProps::default())?;
        settle(&mut g)?;
        let before: Vec<Rect> = g.ids().iter().map(|&id| g.cell(id).unwrap().rect()).collect();

        let err = g
            .add_cell(0, 1, Fixed::new(10.0, 10.0), CellProps::default())
            .unwrap_err();
        assert!(matches!(err, Error::SpanConflict(_)));

        settle(&mut g)?;
        let after: Vec<Rect> = g.ids().iter().map(|&id| g.cell(id).unwrap().rect()).collect();
        assert_eq!(g.len(), 3);
        assert_eq!(before, after);
        Ok(())
    }

    #[test]
    fn duplicate_cell_is_rejected() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(10.0, 10.0), CellProps::default())?;
        let err = g
            .add_cell(0, 0, Fixed::new(10.0, 10.0), CellProps::default())
            .unwrap_err();
        assert_eq!(err, Error::DuplicateCell { column: 0, row: 0 });
        Ok(())
    }

    #[test]
    fn fit_and_stretch_cannot_combine() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(
            0,
            0,
            Fixed::new(10.0, 10.0),
            CellProps {
                fit_to_grid: true,
                stretch_factor: 1.0,
                ..CellProps::default()
            },
        )?;
        assert!(matches!(
            settle(&mut g),
            Err(Error::Configuration(_))
        ));
        Ok(())
    }

    #[test]
    fn stretch_and_fitted_cells_cannot_share_a_row() -> Result<()> {
        let mut g = Grid::new();
        // Declaration order must not matter: the stretched cell comes
        // first here.
        g.add_cell(0, 0, Fixed::new(10.0, 10.0), CellProps::stretched(1.0))?;
        g.add_cell(1, 0, Fixed::new(10.0, 10.0), CellProps::fitted())?;
        assert!(matches!(
            settle(&mut g),
            Err(Error::Configuration(_))
        ));
        Ok(())
    }

    #[test]
    fn suspension_batches_mutations() -> Result<()> {
        let mut g = Grid::new();
        let a = g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::fitted())?;
        g.add_cell(1, 0, Fixed::new(60.0, 20.0), CellProps::fitted())?;
        settle(&mut g)?;

        g.suspend_layout();
        g.suspend_layout();
        g.set_visibility(a, false)?;
        // Still suspended: nothing recomputed yet.
        assert_eq!(rect_of(&g, 1, 0).left(), 40.0);
        g.resume_layout()?;
        assert_eq!(rect_of(&g, 1, 0).left(), 40.0);
        g.resume_layout()?;
        assert_eq!(rect_of(&g, 1, 0).left(), 0.0);

        // An unmatched resume is a no-op.
        g.resume_layout()?;
        Ok(())
    }

    #[test]
    fn suspended_resume_matches_direct_invalidation() -> Result<()> {
        let build = || -> Result<Grid> {
            let mut g = Grid::new();
            g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::fitted())?;
            g.add_cell(1, 0, Fixed::new(60.0, 30.0), CellProps::fitted())?;
            g.add_cell(0, 1, Fixed::new(80.0, 20.0), CellProps::fitted())?;
            settle(&mut g)?;
            Ok(g)
        };

        let mut direct = build()?;
        direct.invalidate(ResizeKind::Both)?;

        let mut batched = build()?;
        batched.suspend_layout();
        batched.suspend_layout();
        batched.invalidate(ResizeKind::Width)?;
        batched.invalidate(ResizeKind::Height)?;
        batched.resume_layout()?;
        batched.resume_layout()?;

        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(rect_of(&direct, col, row), rect_of(&batched, col, row));
            }
        }
        Ok(())
    }

    #[test]
    fn content_is_notified_once_per_change() -> Result<()> {
        let log = SizeLog::new();
        let mut g = Grid::new();
        g.add_cell(
            0,
            0,
            Fixed::new(40.0, 20.0).logged(&log),
            CellProps {
                h_align: Align::Stretch,
                v_align: Align::Stretch,
                ..CellProps::default()
            },
        )?;
        settle(&mut g)?;
        assert_eq!(log.entries(), vec![Size::new(40.0, 20.0)]);

        // An identical pass moves nothing and stays quiet.
        g.invalidate(ResizeKind::Both)?;
        assert_eq!(log.len(), 1);
        Ok(())
    }

    #[test]
    fn spacers_reserve_space_silently() -> Result<()> {
        let mut g = Grid::new();
        g.add_spacer(0, 0, false, Size::new(25.0, 10.0))?;
        g.add_cell(1, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        settle(&mut g)?;

        assert_eq!(rect_of(&g, 1, 0).left(), 25.0);
        assert_eq!(g.preferred_grid_size(), Size::new(65.0, 20.0));
        Ok(())
    }

    #[test]
    fn span_all_rows_covers_grid_height() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(
            0,
            0,
            Fixed::new(30.0, 25.0),
            CellProps {
                span_all_rows: true,
                ..CellProps::default()
            },
        )?;
        g.add_cell(1, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        g.add_cell(1, 1, Fixed::new(40.0, 20.0), CellProps::default())?;
        settle(&mut g)?;

        let spanner = rect_of(&g, 0, 0);
        assert_eq!(spanner.top(), 0.0);
        assert_eq!(spanner.h, 40.0);
        // The same cell answers for every row of its column.
        assert_eq!(rect_of(&g, 0, 1), spanner);
        Ok(())
    }

    #[test]
    fn nested_grid_measures_bottom_up() -> Result<()> {
        let mut child = Grid::new();
        child.add_cell(0, 0, Fixed::new(30.0, 15.0), CellProps::fitted())?;
        child.add_cell(1, 0, Fixed::new(20.0, 15.0), CellProps::fitted())?;

        let mut parent = Grid::new();
        parent.add_layout(0, 0, false, child)?;
        parent.add_cell(1, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        settle(&mut parent)?;

        // The child grid measured 50x15; its cell gets the full row-track
        // height set by the taller sibling, and the sibling sits past it.
        assert_eq!(rect_of(&parent, 0, 0).size(), Size::new(50.0, 20.0));
        assert_eq!(rect_of(&parent, 1, 0).left(), 50.0);

        let child = parent
            .get_cell(0, 0)
            .and_then(|c| c.child_grid())
            .expect("embedded grid");
        assert_eq!(child.outer_size(), Size::new(50.0, 15.0));
        assert_eq!(child.get_cell(1, 0).map(|c| c.rect().left()), Some(30.0));
        Ok(())
    }

    #[test]
    fn row_edits_keep_spanners_reachable() -> Result<()> {
        let mut g = Grid::new();
        let s = g.add_cell(
            0,
            0,
            Fixed::new(30.0, 25.0),
            CellProps {
                span_all_rows: true,
                ..CellProps::default()
            },
        )?;
        g.add_cell(1, 0, Fixed::new(40.0, 20.0), CellProps::default())?;
        g.add_cell(1, 1, Fixed::new(40.0, 20.0), CellProps::default())?;
        settle(&mut g)?;

        g.insert_rows(0, 2)?;
        assert_eq!(g.cell_id_at(0, 0), Some(s));
        assert_eq!(g.cell_id_at(0, 3), Some(s));
        assert_eq!(g.row_count(), 4);

        g.remove_rows(0, 2)?;
        assert_eq!(g.cell_id_at(0, 0), Some(s));
        assert_eq!(g.cell_id_at(0, 1), Some(s));
        assert_eq!(g.row_count(), 2);
        Ok(())
    }

    #[test]
    fn fixed_width_applies_after_a_completed_pass() -> Result<()> {
        let mut g = Grid::new();
        g.add_cell(0, 0, Fixed::new(100.0, 20.0), CellProps::default())?;
        settle(&mut g)?;

        g.add_cell(1, 0, Fixed::new(10.0, 20.0), CellProps::stretched(1.0))?;
        g.set_fixed_width(300.0)?;
        settle(&mut g)?;

        assert_eq!(g.outer_size().w, 300.0);
        assert_eq!(rect_of(&g, 1, 0).w, 200.0);
        Ok(())
    }

    #[test]
    fn queries_after_layout() -> Result<()> {
        let mut g = Grid::new();
        let a = g.add_cell(0, 0, Fixed::new(40.0, 20.0), CellProps::fitted())?;
        let b = g.add_cell(2, 0, Fixed::new(60.0, 20.0), CellProps::fitted())?;
        settle(&mut g)?;

        assert_eq!(g.neighbor(a, trellis_core::Direction::Right, true), Some(b));
        assert_eq!(g.cell_at(trellis_core::Point::new(50.0, 10.0)), Some(b));
        assert_eq!(g.cell_at(trellis_core::Point::new(500.0, 10.0)), None);
        assert_eq!(g.row_ids(0), vec![a, b]);
        assert!(g.row_ids(7).is_empty());
        Ok(())
    }

    #[test]
    fn column_factor_applies_to_later_placements() -> Result<()> {
        let mut g = Grid::new();
        g.set_stretch_factor(1, trellis_core::Sizing::Stretch(2.0))?;
        g.add_cell(0, 0, Fixed::new(100.0, 20.0), CellProps::default())?;
        g.add_cell(1, 0, Fixed::new(10.0, 20.0), CellProps::default())?;
        g.set_fixed_width(300.0)?;
        settle(&mut g)?;

        assert_eq!(rect_of(&g, 1, 0).w, 200.0);
        Ok(())
    }
}
