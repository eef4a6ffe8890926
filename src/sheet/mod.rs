//! Sprite sheet slicing.
//!
//! A sheet is cut into `rows x columns` equal cells. Cells are produced
//! row-major (every column of row 0, then row 1, ...), which is also the
//! order the registry reports for the sheet.

mod rect;

pub use rect::{FRect, Rect};

use atlas_meta::{Coord, Settings, SheetSettings};

use crate::error::GeometryError;

/// One sheet cell: its address, source region and effective settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<'a> {
    pub coord: Coord,
    pub region: Rect,
    pub settings: &'a Settings,
}

/// Slice a `width x height` image according to `sheet`.
///
/// The layout check compares rows against the width and columns against
/// the height. Cells that end up outside the image after padding collapse
/// to a 1x1 region at the origin.
pub fn slice<'a>(
    name: &str,
    width: u32,
    height: u32,
    sheet: &'a SheetSettings,
    settings: &'a Settings,
) -> Result<Vec<Cell<'a>>, GeometryError> {
    if sheet.rows > width || sheet.columns > height {
        return Err(GeometryError {
            sheet: name.to_string(),
            rows: sheet.rows,
            columns: sheet.columns,
            width,
            height,
        });
    }

    let cell_width = (width / sheet.columns) as i64;
    let cell_height = (height / sheet.rows) as i64;
    let padding = sheet.padding as i64;
    let bounds = Rect::sized(width, height);

    let mut cells = Vec::with_capacity(sheet.cell_count());
    for row in 0..sheet.rows {
        for column in 0..sheet.columns {
            let x = column as i64 * cell_width + padding * column as i64;
            let y = row as i64 * cell_height + padding * cell_height;
            let region = Rect::new(
                saturate(x),
                saturate(y),
                cell_width as u32,
                cell_height as u32,
            )
            .clip(&bounds);
            let region = if region.is_empty() {
                Rect::sized(1, 1)
            } else {
                region
            };

            let coord = (column, row);
            cells.push(Cell {
                coord,
                region,
                settings: sheet.coordinate_overrides.get(&coord).unwrap_or(settings),
            });
        }
    }
    Ok(cells)
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rows: i64, columns: i64, padding: i64) -> SheetSettings {
        SheetSettings::new(rows, columns, padding).unwrap()
    }

    #[test]
    fn test_two_by_two() {
        let sheet = layout(2, 2, 0);
        let settings = Settings::base();
        let cells = slice("s", 100, 100, &sheet, &settings).unwrap();

        let got: Vec<_> = cells.iter().map(|c| (c.coord, c.region)).collect();
        assert_eq!(
            got,
            vec![
                ((0, 0), Rect::new(0, 0, 50, 50)),
                ((1, 0), Rect::new(50, 0, 50, 50)),
                ((0, 1), Rect::new(0, 50, 50, 50)),
                ((1, 1), Rect::new(50, 50, 50, 50)),
            ]
        );
    }

    #[test]
    fn test_uneven_division_floors() {
        let sheet = layout(1, 3, 0);
        let settings = Settings::default();
        let cells = slice("s", 10, 4, &sheet, &settings).unwrap();
        assert_eq!(cells.len(), 3);
        assert!(cells.iter().all(|c| c.region.width == 3 && c.region.height == 4));
        assert_eq!(cells[2].region.x, 6);
    }

    #[test]
    fn test_padding_offsets() {
        // x grows by padding per column; y by padding * cell height.
        let sheet = layout(2, 2, 1);
        let settings = Settings::default();
        let cells = slice("s", 40, 40, &sheet, &settings).unwrap();
        assert_eq!(cells[1].region, Rect::new(21, 20, 19, 20));
        assert_eq!(cells[0].region, Rect::new(0, 20, 20, 20));
    }

    #[test]
    fn test_cell_outside_bounds_degenerates() {
        // With one row any padding pushes every cell below the image.
        let sheet = layout(1, 2, 10);
        let settings = Settings::default();
        let cells = slice("s", 10, 10, &sheet, &settings).unwrap();
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.region == Rect::sized(1, 1)));

        let unpadded = layout(1, 2, 0);
        let cells = slice("s", 10, 10, &unpadded, &settings).unwrap();
        assert_eq!(cells[1].region, Rect::new(5, 0, 5, 10));
    }

    #[test]
    fn test_layout_bounds_check_uses_crossed_axes() {
        let sheet = layout(5, 1, 0);
        let settings = Settings::default();
        // 5 rows against a width of 4 fails even though the height is 100.
        let err = slice("ui/bar", 4, 100, &sheet, &settings).unwrap_err();
        assert_eq!(err.sheet, "ui/bar");
        assert_eq!((err.rows, err.columns), (5, 1));

        // 5 rows fit a 100-wide, 4-tall image; the cells degenerate.
        let cells = slice("ui/bar", 100, 4, &sheet, &settings).unwrap();
        assert_eq!(cells.len(), 5);
        assert!(cells.iter().all(|c| c.region == Rect::sized(1, 1)));
    }

    #[test]
    fn test_coordinate_overrides() {
        let special = Settings {
            global_alpha: Some(7),
            ..Default::default()
        };
        let sheet = layout(1, 2, 0).with_override((1, 0), special.clone());
        let settings = Settings::base();
        let cells = slice("s", 8, 8, &sheet, &settings).unwrap();
        assert_eq!(cells[0].settings, &settings);
        assert_eq!(cells[1].settings, &special);
    }
}
