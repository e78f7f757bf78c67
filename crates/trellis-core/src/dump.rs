//! Colored debug dump of a grid tree.

use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::grid::Grid;
use crate::{Cell, Result};

/// Walks a grid tree and returns a string showing each grid's committed
/// size and every cell's placement and box. This is a debug function.
pub fn dump(root: &Grid) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_grid(&mut buffer, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Helper to write an indented, colored label followed by a value
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) {
    write!(buffer, "{indent}  ").unwrap();
    buffer
        .set_color(ColorSpec::new().set_fg(Some(Color::Green)))
        .unwrap();
    write!(buffer, "{label}").unwrap();
    buffer.reset().unwrap();
    writeln!(buffer, " {value}").unwrap();
}

fn cell_flags(cell: &Cell) -> String {
    let mut flags = Vec::new();
    if cell.fit_to_grid() {
        flags.push("fit".to_string());
    }
    if cell.span_all_rows() {
        flags.push("span-all".to_string());
    }
    if cell.stretch_factor() > 0.0 {
        flags.push(format!("stretch {}", cell.stretch_factor()));
    }
    flags.join(", ")
}

fn dump_grid(buffer: &mut Buffer, grid: &Grid, level: usize) -> Result<()> {
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}").unwrap();
    buffer
        .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))
        .unwrap();
    write!(
        buffer,
        "grid {}\u{d7}{}",
        grid.column_count(),
        grid.row_count()
    )
    .unwrap();
    buffer.reset().unwrap();
    writeln!(buffer).unwrap();

    let outer = grid.outer_size();
    write_field(buffer, &indent, "outer:", &format!("{} \u{d7} {}", outer.w, outer.h));
    let pref = grid.preferred_grid_size();
    write_field(
        buffer,
        &indent,
        "preferred:",
        &format!("{} \u{d7} {}", pref.w, pref.h),
    );

    for &id in grid.ids() {
        let Some(cell) = grid.cell(id) else { continue };
        write!(buffer, "{indent}  ").unwrap();
        buffer
            .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))
            .unwrap();
        write!(buffer, "cell ({}, {})", cell.column(), cell.row()).unwrap();
        buffer.reset().unwrap();
        if !cell.is_visible() {
            buffer
                .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))
                .unwrap();
            write!(buffer, " (hidden)").unwrap();
            buffer.reset().unwrap();
        }
        writeln!(buffer).unwrap();

        let r = cell.rect();
        write_field(
            buffer,
            &format!("{indent}  "),
            "box:",
            &format!("x: {}, y: {}, w: {}, h: {}", r.tl.x, r.tl.y, r.w, r.h),
        );
        let flags = cell_flags(cell);
        if !flags.is_empty() {
            write_field(buffer, &format!("{indent}  "), "flags:", &flags);
        }
        if let Some(child) = cell.child_grid() {
            dump_grid(buffer, child, level + 1)?;
        }
    }
    Ok(())
}
