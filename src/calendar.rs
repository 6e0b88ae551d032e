use chrono::{Datelike, Days, Local, Month, NaiveDate};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{Error, ErrorKind, Result};

pub const DAYS_PER_WEEK: usize = 7;

/// One row of a [`MonthMatrix`], Monday first.
pub type Week = [CalendarCell; DAYS_PER_WEEK];

pub fn days_of_month(month: &Month, year: i32) -> Result<u32> {
    MonthIndex::new(*month, year).num_days()
}

fn out_of_range(index: &MonthIndex) -> Error {
    Error::new(
        ErrorKind::DateOutOfRange,
        &format!("{} cannot be represented", index),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    index: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(index: Month, year: i32) -> Self {
        MonthIndex { index, year }
    }

    /// Month given as 0 (January) to 11 (December).
    pub fn from_zero_based(year: i32, month0: i32) -> Result<Self> {
        u32::try_from(month0)
            .ok()
            .filter(|m| *m < 12)
            .and_then(|m| Month::from_u32(m + 1))
            .map(|index| MonthIndex::new(index, year))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidMonthIndex,
                    &format!("{} is not in 0..=11", month0),
                )
            })
    }

    /// Month given as 1 (January) to 12 (December).
    pub fn from_number(year: i32, month: i32) -> Result<Self> {
        u32::try_from(month)
            .ok()
            .and_then(Month::from_u32)
            .map(|index| MonthIndex::new(index, year))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidMonthIndex,
                    &format!("{} is not in 1..=12", month),
                )
            })
    }

    pub fn month(&self) -> Month {
        self.index
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn number(&self) -> u32 {
        self.index.number_from_month()
    }

    pub fn zero_based(&self) -> u32 {
        self.number() - 1
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.number(), 1).ok_or_else(|| out_of_range(self))
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.number(), day))
            .ok_or_else(|| out_of_range(self))
    }

    pub fn num_days(&self) -> Result<u32> {
        self.last_day().map(|last| last.day())
    }

    pub fn contains<T: Datelike>(&self, date: &T) -> bool {
        date.year() == self.year && date.month() == self.number()
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    /// Moves by `months`, saturating at January of `i32::MIN` and
    /// December of `i32::MAX`.
    fn shift(self, months: i64) -> Self {
        let total = (i64::from(self.year) * 12 + i64::from(self.zero_based()))
            .saturating_add(months)
            .clamp(i64::from(i32::MIN) * 12, i64::from(i32::MAX) * 12 + 11);
        let month0 = total.rem_euclid(12) as u32;

        MonthIndex {
            index: Month::from_u32(month0 + 1).unwrap_or(Month::January),
            year: total.div_euclid(12) as i32,
        }
    }
}

impl Default for MonthIndex {
    fn default() -> Self {
        MonthIndex::from(Local::now())
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex::new(
            Month::from_u32(m.month()).unwrap_or(Month::January),
            m.year(),
        )
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        self.shift(i64::from(rhs))
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        self.shift(-i64::from(rhs))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.number().cmp(&other.number()))
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.index.name(), self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarCell {
    date: NaiveDate,
    in_current_month: bool,
}

impl CalendarCell {
    pub fn new(date: NaiveDate, in_current_month: bool) -> Self {
        CalendarCell {
            date,
            in_current_month,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Day of month. Only meaningful for cells of the current month.
    pub fn day_number(&self) -> u32 {
        self.date.day()
    }

    pub fn in_current_month(&self) -> bool {
        self.in_current_month
    }
}

/// Monday-first grid of whole weeks covering one month.
///
/// Days of the previous and next month fill up the first and last week;
/// those cells report `in_current_month() == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthMatrix {
    month: MonthIndex,
    rows: Vec<Week>,
}

impl MonthMatrix {
    pub fn build(month: MonthIndex) -> Result<Self> {
        let first = month.first_day()?;
        let last = month.last_day()?;

        let grid_start = first
            .checked_sub_days(Days::new(u64::from(
                first.weekday().num_days_from_monday(),
            )))
            .ok_or_else(|| out_of_range(&month))?;
        let grid_end = last
            .checked_add_days(Days::new(u64::from(
                6 - last.weekday().num_days_from_monday(),
            )))
            .ok_or_else(|| out_of_range(&month))?;

        let num_cells = grid_end.signed_duration_since(grid_start).num_days() as usize + 1;

        let cells: Vec<CalendarCell> = grid_start
            .iter_days()
            .take(num_cells)
            .map(|date| CalendarCell::new(date, first <= date && date <= last))
            .collect();

        if cells.len() != num_cells {
            return Err(out_of_range(&month));
        }

        let rows = cells
            .chunks_exact(DAYS_PER_WEEK)
            .map(Week::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| out_of_range(&month))?;

        log::debug!(
            "Built grid for {}: {} to {} ({} weeks)",
            month,
            grid_start,
            grid_end,
            rows.len()
        );

        Ok(MonthMatrix { month, rows })
    }

    pub fn month(&self) -> MonthIndex {
        self.month
    }

    pub fn rows(&self) -> &[Week] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> + '_ {
        self.rows.iter().flat_map(|week| week.iter())
    }
}

/// Builds the grid for `month0` (0 = January) of `year`.
pub fn build(year: i32, month0: i32) -> Result<MonthMatrix> {
    MonthMatrix::build(MonthIndex::from_zero_based(year, month0)?)
}
