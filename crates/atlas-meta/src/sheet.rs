//! Sprite sheet layout settings.

use std::collections::BTreeMap;

use crate::{MetaError, Settings};

/// A sheet cell address, `(column, row)`.
pub type Coord = (u32, u32);

/// Grid layout for an asset that is sliced into cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSettings {
    pub rows: u32,
    pub columns: u32,
    pub padding: u32,
    /// Per-cell settings that replace the sheet's own settings for that cell.
    pub coordinate_overrides: BTreeMap<Coord, Settings>,
}

impl SheetSettings {
    /// Build a layout, rejecting grids with fewer than one row or column.
    pub fn new(rows: i64, columns: i64, padding: i64) -> Result<Self, MetaError> {
        if rows < 1 || columns < 1 {
            return Err(MetaError::InvalidSheetLayout { rows, columns });
        }
        if padding < 0 {
            return Err(MetaError::InvalidPadding(padding));
        }
        let layout = || MetaError::InvalidSheetLayout { rows, columns };
        Ok(Self {
            rows: u32::try_from(rows).map_err(|_| layout())?,
            columns: u32::try_from(columns).map_err(|_| layout())?,
            padding: u32::try_from(padding).map_err(|_| MetaError::InvalidPadding(padding))?,
            coordinate_overrides: BTreeMap::new(),
        })
    }

    pub fn with_override(mut self, coord: Coord, settings: Settings) -> Self {
        self.coordinate_overrides.insert(coord, settings);
        self
    }

    /// Fill every coordinate override from the sheet's resolved settings.
    pub fn resolve_overrides(&mut self, sheet: &Settings) {
        let overrides = std::mem::take(&mut self.coordinate_overrides);
        self.coordinate_overrides = overrides
            .into_iter()
            .map(|(coord, s)| (coord, s.merge_default(sheet)))
            .collect();
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Override coordinates that fall outside the grid and never apply.
    pub fn outside_grid(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coordinate_overrides
            .keys()
            .copied()
            .filter(|&(column, row)| column >= self.columns || row >= self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_grid() {
        assert_eq!(
            SheetSettings::new(0, 3, 0),
            Err(MetaError::InvalidSheetLayout { rows: 0, columns: 3 })
        );
        assert!(SheetSettings::new(2, 0, 0).is_err());
        assert_eq!(SheetSettings::new(1, 1, -1), Err(MetaError::InvalidPadding(-1)));
    }

    #[test]
    fn test_resolve_overrides() {
        let mut sheet = SheetSettings::new(2, 2, 0).unwrap().with_override(
            (1, 0),
            Settings {
                global_alpha: Some(10),
                ..Default::default()
            },
        );
        let resolved = Settings {
            size: Some((4, 4)),
            ..Settings::base()
        };
        sheet.resolve_overrides(&resolved);

        let cell = &sheet.coordinate_overrides[&(1, 0)];
        assert_eq!(cell.global_alpha, Some(10));
        assert_eq!(cell.size, Some((4, 4)));
        assert_eq!(cell.alpha, Some(true));
        assert_eq!(sheet.cell_count(), 4);
    }

    #[test]
    fn test_outside_grid() {
        let sheet = SheetSettings::new(2, 3, 0)
            .unwrap()
            .with_override((2, 1), Settings::default())
            .with_override((3, 0), Settings::default())
            .with_override((0, 2), Settings::default());

        let outside: Vec<_> = sheet.outside_grid().collect();
        assert_eq!(outside, vec![(0, 2), (3, 0)]);
    }
}
