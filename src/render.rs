use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::{self, Display, Write};

use crate::highlight::{AnnotatedCell, AnnotatedMonth};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub today_char: char,
    pub run_open: char,
    pub run_close: char,
    pub show_filler: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            today_char: '*',
            run_open: '(',
            run_close: ')',
            show_filler: true,
        }
    }
}

struct DayCell<'a> {
    cell: &'a AnnotatedCell,
    is_today: bool,
    theme: &'a Theme,
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day_num = self.cell.cell.day_number();

        if !self.cell.cell.in_current_month() {
            return if self.theme.show_filler {
                write!(f, "  {:>2} ", day_num)
            } else {
                write!(f, "{:width$}", "", width = MonthPane::CELL_WIDTH)
            };
        }

        let arg_today = if self.is_today {
            self.theme.today_char
        } else {
            ' '
        };

        let (open, close) = match self.cell.annotation {
            Some(run) => (
                if run.is_run_start {
                    self.theme.run_open
                } else {
                    ' '
                },
                if run.is_run_end {
                    self.theme.run_close
                } else {
                    ' '
                },
            ),
            None => (' ', ' '),
        };

        write!(f, "{}{}{:>2}{}", arg_today, open, day_num, close)
    }
}

/// Plain text view of an annotated month, one line per week.
pub struct MonthPane<'a> {
    month: &'a AnnotatedMonth,
    theme: &'a Theme,
    today: Option<NaiveDate>,
}

impl<'a> MonthPane<'a> {
    const CELL_WIDTH: usize = 5;

    const HEADER: &'static [&'static str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    pub fn new(month: &'a AnnotatedMonth, theme: &'a Theme) -> Self {
        MonthPane {
            month,
            theme,
            today: None,
        }
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

impl Display for MonthPane<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = Self::HEADER.len() * Self::CELL_WIDTH;
        let title = format!("{:^width$}", self.month.month().to_string(), width = width);
        writeln!(f, "{}", title.trim_end())?;

        for &head in Self::HEADER {
            write!(f, "{:>width$}", head, width = Self::CELL_WIDTH)?;
        }
        writeln!(f)?;

        let mut line = String::with_capacity(width);
        for week in self.month.rows() {
            line.clear();
            for cell in week.iter() {
                let day_cell = DayCell {
                    cell,
                    is_today: self.today == Some(cell.cell.date()),
                    theme: self.theme,
                };
                write!(&mut line, "{}", day_cell)?;
            }
            writeln!(f, "{}", line.trim_end())?;
        }

        Ok(())
    }
}
