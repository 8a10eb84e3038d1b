//! Month calendar geometry and day bucketing.
//!
//! # Responsibility
//! - Compute 7-column grid layout for a month (Sunday-first weeks).
//! - Track the displayed month and step between months.
//! - Bucket items into day cells.
//!
//! # Invariants
//! - Month indices are 0-based; out-of-range indices roll into adjacent years.
//! - Day counts come from calendar arithmetic, never a fixed table.

use crate::model::item::Item;
use crate::view::projection::{items_on_date, TypeFilter};
use chrono::{Datelike, Months, NaiveDate};

/// Column headers for a Sunday-first week.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Layout of one month on a 7-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    /// Normalized year after month rollover.
    pub year: i32,
    /// Normalized 0-based month.
    pub month: u32,
    pub days_in_month: u32,
    /// Weekday of day 1, 0 = Sunday.
    pub leading_blank_cells: u32,
}

impl MonthGrid {
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    /// Blank plus day cells.
    pub fn cell_count(&self) -> u32 {
        self.leading_blank_cells + self.days_in_month
    }

    /// Number of week rows the grid occupies.
    pub fn week_rows(&self) -> u32 {
        self.cell_count().div_ceil(7)
    }
}

/// Computes grid geometry for a 0-based `month` of `year`.
///
/// Returns `None` only when the normalized year is outside the supported
/// calendar range.
pub fn month_grid(year: i32, month: i32) -> Option<MonthGrid> {
    let year = year.checked_add(month.div_euclid(12))?;
    let month = month.rem_euclid(12) as u32;

    let first = NaiveDate::from_ymd_opt(year, month + 1, 1)?;
    let next_first = first.checked_add_months(Months::new(1))?;
    let days_in_month = next_first.signed_duration_since(first).num_days() as u32;

    Some(MonthGrid {
        year,
        month,
        days_in_month,
        leading_blank_cells: first.weekday().num_days_from_sunday(),
    })
}

/// Month currently displayed by a calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// Builds a cursor, normalizing month rollover.
    pub fn new(year: i32, month: i32) -> Option<Self> {
        let grid = month_grid(year, month)?;
        Some(Self {
            year: grid.year,
            month: grid.month,
        })
    }

    /// Cursor on the month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 0-based month.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(&self) -> Option<Self> {
        Self::new(self.year, self.month as i32 - 1)
    }

    pub fn next(&self) -> Option<Self> {
        Self::new(self.year, self.month as i32 + 1)
    }

    pub fn grid(&self) -> Option<MonthGrid> {
        month_grid(self.year, self.month as i32)
    }

    /// Long Spanish month label, e.g. `noviembre de 2025`.
    pub fn label(&self) -> String {
        format!("{} de {}", MONTH_NAMES[self.month as usize % 12], self.year)
    }
}

/// One day cell with the items due on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    pub items: Vec<&'a Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCell<'a> {
    /// Leading filler before day 1.
    Blank,
    Day(CalendarDay<'a>),
}

/// Lays out the cursor month as grid cells in row-major order.
pub fn calendar_cells<'a>(
    items: &'a [Item],
    cursor: MonthCursor,
    filter: TypeFilter,
    today: NaiveDate,
) -> Vec<CalendarCell<'a>> {
    let Some(grid) = cursor.grid() else {
        return Vec::new();
    };
    let Some(first) = grid.first_day() else {
        return Vec::new();
    };

    let mut cells = Vec::with_capacity(grid.cell_count() as usize);
    cells.extend((0..grid.leading_blank_cells).map(|_| CalendarCell::Blank));
    cells.extend(
        first
            .iter_days()
            .take(grid.days_in_month as usize)
            .map(|date| {
                CalendarCell::Day(CalendarDay {
                    date,
                    is_today: date == today,
                    items: items_on_date(items, date, filter),
                })
            }),
    );
    cells
}
