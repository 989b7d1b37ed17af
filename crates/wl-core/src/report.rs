//! Output shapes for the timesheet grid and the worklog merge.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::aggregate::{AggregatedDay, DisplayValue, MonthTotals};

/// Token placed in grid slots past the end of the month.
pub const FILLER: &str = "-";

/// Number of day slots in the fixed timesheet layout.
pub const GRID_SLOTS: u32 = 31;

/// Content of one grid slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Value(DisplayValue),
    Filler,
}

impl Cell {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(value) => value.as_str(),
            Self::Filler => FILLER,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Day-of-month → value mapping with all 31 slots populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Slot for `day` (1-based); `None` outside 1..=31.
    pub fn get(&self, day: u32) -> Option<&Cell> {
        let index = usize::try_from(day.checked_sub(1)?).ok()?;
        self.cells.get(index)
    }

    /// Iterates `(day, cell)` pairs in day order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Cell)> {
        (1..=GRID_SLOTS).zip(self.cells.iter())
    }
}

impl Serialize for CellGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (day, cell) in self.iter() {
            map.serialize_entry(&day.to_string(), cell)?;
        }
        map.end()
    }
}

/// One repeating row of the worklog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub day_of_month: u32,
    pub display_value: DisplayValue,
    pub description: String,
}

/// Everything a renderer needs for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assembly {
    pub grid: CellGrid,
    pub line_items: Vec<LineItem>,
    pub totals: MonthTotals,
}

/// Builds the grid and line items from aggregated days.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn assemble(aggregated: &[AggregatedDay], totals: MonthTotals) -> Assembly {
        let month_length = aggregated
            .iter()
            .map(|day| day.day_of_month)
            .max()
            .unwrap_or(0);

        let cells = (1..=GRID_SLOTS)
            .map(|slot| {
                if slot > month_length {
                    return Cell::Filler;
                }
                aggregated
                    .iter()
                    .find(|day| day.day_of_month == slot)
                    .map_or(Cell::Value(DisplayValue::Blank), |day| {
                        Cell::Value(day.display_value.clone())
                    })
            })
            .collect();

        let line_items = aggregated
            .iter()
            .filter(|day| !day.display_value.is_blank() || !day.description.is_empty())
            .map(|day| LineItem {
                day_of_month: day.day_of_month,
                display_value: day.display_value.clone(),
                description: day.description.clone(),
            })
            .collect();

        Assembly {
            grid: CellGrid { cells },
            line_items,
            totals,
        }
    }
}
