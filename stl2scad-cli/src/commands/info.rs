use std::iter;

use failure::{Error, ResultExt};
use term_painter::{Color, ToStyle};
use stl2scad::{io::scad::ModuleNames, read_solids, ConvertOptions, Solid};

use crate::{
    args::{GlobalArgs, InfoArgs},
    commands::load_source,
    ui,
};


pub fn run(_global_args: &GlobalArgs, args: &InfoArgs) -> Result<(), Error> {
    let data = load_source(&args.source)?;

    // Listing an empty file is fine, so no solid is required here.
    let options = ConvertOptions {
        require_solid: false,
        ..args.source.options()
    };
    let solids = progress!(["Reading '{}'", args.source.source] => {
        read_solids(&data, &options).context("could not read source file")?
    });

    if solids.is_empty() {
        warn!("The file does not contain any solid");
        return Ok(());
    }

    println!();
    print_solids(&solids, &options.default_solid_name);

    Ok(())
}

/// Defines the characters to draw a table.
#[derive(Copy, Clone)]
struct TableStyle {
    horizontal: char,
    vertical: char,
    cross: char,
    vertical_double: char,
    cross_vertical_double: char,
}

/// A nice unicode table.
const UNICODE_TABLE: TableStyle = TableStyle {
    horizontal: '─',
    vertical: '│',
    cross: '┼',
    vertical_double: '║',
    cross_vertical_double: '╫',
};

/// Pretty prints a table with one row per solid. The module column shows the
/// name used in the OpenSCAD script.
pub(crate) fn print_solids(solids: &[Solid], default_name: &str) {
    let style = UNICODE_TABLE;
    let mut names = ModuleNames::new(default_name);
    let header = ["#", "module", "triangles", "points", "size (x × y × z)"];

    let rows = solids.iter()
        .enumerate()
        .map(|(i, solid)| {
            let size = match solid.mesh.bounding_box() {
                Ok(bb) => {
                    let s = bb.size();
                    format!("{} × {} × {}", s.x, s.y, s.z)
                }
                Err(_) => "-".to_string(),
            };

            vec![
                i.to_string(),
                names.next(&solid.name),
                ui::fmt_with_thousand_sep(solid.mesh.faces.len() as u64),
                ui::fmt_with_thousand_sep(solid.mesh.points.len() as u64),
                size,
            ]
        })
        .collect::<Vec<_>>();

    let col_widths = (0..header.len()).map(|col| {
        rows.iter()
            .map(|row| row[col].chars().count())
            .chain(iter::once(header[col].chars().count()))
            .max()
            .unwrap_or(0)
    }).collect::<Vec<_>>();


    // ----- Print header ----------------------------------------------------
    for (col, cell) in header.iter().enumerate() {
        print!(" {: ^1$} ", cell, col_widths[col]);
        if col != header.len() - 1 {
            print!("{}", separator(&style, col, false));
        }
    }
    println!();


    // ----- Print separator -------------------------------------------------
    for col in 0..header.len() {
        let line = iter::repeat(style.horizontal)
            .take(col_widths[col] + 2)
            .collect::<String>();
        print!("{}", line);
        if col != header.len() - 1 {
            print!("{}", separator(&style, col, true));
        }
    }
    println!();


    // ----- Print table body ------------------------------------------------
    let label_style = Color::White.bold();
    let count_style = Color::Green.bold();
    let size_style = Color::BrightBlue.bold();

    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            let cell_style = match col {
                0 | 1 => label_style,
                2 | 3 => count_style,
                _ => size_style,
            };

            // Names are left aligned, numbers right aligned.
            let padded = if col == 1 {
                format!("{: <1$}", cell, col_widths[col])
            } else {
                format!("{: >1$}", cell, col_widths[col])
            };
            print!(" {} ", cell_style.paint(padded));
            if col != row.len() - 1 {
                print!("{}", separator(&style, col, false));
            }
        }
        println!();
    }
}

/// The character after column `col`. The first two columns (index and name)
/// are separated from the data by a double line.
fn separator(style: &TableStyle, col: usize, is_rule: bool) -> char {
    match (col, is_rule) {
        (0, false) => style.vertical,
        (0, true) => style.cross,
        (1, false) => style.vertical_double,
        (1, true) => style.cross_vertical_double,
        (_, false) => style.vertical,
        (_, true) => style.cross,
    }
}
