use chrono::Datelike;
use derive_more::Constructor;
use itertools::Itertools;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::iter::FromIterator;

use crate::calendar::{CalendarCell, MonthIndex, MonthMatrix, DAYS_PER_WEEK};

/// Day numbers (1-based) flagged within one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet(BTreeSet<u32>);

impl HighlightSet {
    pub fn new() -> Self {
        HighlightSet::default()
    }

    /// Collects the day numbers of all `dates` that fall into `month`.
    pub fn from_dates<'a, T, I>(dates: I, month: &MonthIndex) -> Self
    where
        T: Datelike + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        dates
            .into_iter()
            .filter(|date| month.contains(*date))
            .map(|date| date.day())
            .collect()
    }

    pub fn insert(&mut self, day: u32) -> bool {
        self.0.insert(day)
    }

    pub fn contains(&self, day: u32) -> bool {
        self.0.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for HighlightSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        HighlightSet(iter.into_iter().collect())
    }
}

impl Extend<u32> for HighlightSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for HighlightSet {
    type Item = u32;
    type IntoIter = btree_set::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<BTreeSet<u32>> for HighlightSet {
    fn from(days: BTreeSet<u32>) -> Self {
        HighlightSet(days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunShape {
    Isolated,
    Start,
    End,
    Middle,
}

/// Position of a highlighted day inside its run of consecutive days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Constructor)]
pub struct RunAnnotation {
    pub is_run_start: bool,
    pub is_run_end: bool,
}

impl RunAnnotation {
    pub fn shape(&self) -> RunShape {
        match (self.is_run_start, self.is_run_end) {
            (true, true) => RunShape::Isolated,
            (true, false) => RunShape::Start,
            (false, true) => RunShape::End,
            (false, false) => RunShape::Middle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct AnnotatedCell {
    pub cell: CalendarCell,
    pub annotation: Option<RunAnnotation>,
}

impl AnnotatedCell {
    pub fn is_highlighted(&self) -> bool {
        self.annotation.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedMonth {
    month: MonthIndex,
    rows: Vec<[AnnotatedCell; DAYS_PER_WEEK]>,
}

impl AnnotatedMonth {
    pub fn month(&self) -> MonthIndex {
        self.month
    }

    pub fn rows(&self) -> &[[AnnotatedCell; DAYS_PER_WEEK]] {
        &self.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = &AnnotatedCell> + '_ {
        self.rows.iter().flat_map(|week| week.iter())
    }

    pub fn highlighted_days(&self) -> HighlightSet {
        self.cells()
            .filter(|c| c.is_highlighted())
            .map(|c| c.cell.day_number())
            .collect()
    }

    /// Maximal runs of highlighted days as inclusive `(start, end)` pairs.
    pub fn runs(&self) -> Vec<(u32, u32)> {
        self.highlighted_days()
            .iter()
            .map(|day| (day, day))
            .coalesce(|(start, end), (next_start, next_end)| {
                if end + 1 == next_start {
                    Ok((start, next_end))
                } else {
                    Err(((start, end), (next_start, next_end)))
                }
            })
            .collect()
    }
}

/// Annotates every in-month cell whose day number is in `highlighted`.
///
/// Day numbers that do not exist in the matrix's month are ignored.
pub fn annotate(matrix: &MonthMatrix, highlighted: &HighlightSet) -> AnnotatedMonth {
    annotate_with(matrix, |cell| highlighted.contains(cell.day_number()))
}

/// Like [`annotate`], but highlighting is decided by `is_highlighted`.
///
/// Run adjacency only looks at neighbouring days of the same month, so a
/// run never continues across a month boundary.
pub fn annotate_with<F>(matrix: &MonthMatrix, is_highlighted: F) -> AnnotatedMonth
where
    F: Fn(&CalendarCell) -> bool,
{
    // Indexed by day number, with a `false` sentinel on both ends.
    let mut marks = vec![false];
    marks.extend(
        matrix
            .cells()
            .filter(|cell| cell.in_current_month())
            .map(|cell| is_highlighted(cell)),
    );
    marks.push(false);

    let annotate_cell = |cell: &CalendarCell| {
        let day = cell.day_number() as usize;
        let annotation = if cell.in_current_month() && marks[day] {
            Some(RunAnnotation::new(!marks[day - 1], !marks[day + 1]))
        } else {
            None
        };
        AnnotatedCell::new(*cell, annotation)
    };

    let rows = matrix
        .rows()
        .iter()
        .map(|week| week.map(|cell| annotate_cell(&cell)))
        .collect();

    AnnotatedMonth {
        month: matrix.month(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::build;
    use chrono::NaiveDate;

    fn annotation_of(month: &AnnotatedMonth, day: u32) -> Option<RunAnnotation> {
        month
            .cells()
            .find(|c| c.cell.in_current_month() && c.cell.day_number() == day)
            .and_then(|c| c.annotation)
    }

    #[test]
    fn runs_in_september_2025() {
        let matrix = build(2025, 8).unwrap();
        let highlighted: HighlightSet = vec![1, 2, 4, 13, 14, 15, 16, 17].into_iter().collect();
        let annotated = annotate(&matrix, &highlighted);

        let shape = |day| annotation_of(&annotated, day).map(|a| a.shape());

        assert_eq!(shape(1), Some(RunShape::Start));
        assert_eq!(shape(2), Some(RunShape::End));
        assert_eq!(shape(3), None);
        assert_eq!(shape(4), Some(RunShape::Isolated));
        assert_eq!(shape(13), Some(RunShape::Start));
        for day in 14..=16 {
            assert_eq!(shape(day), Some(RunShape::Middle));
        }
        assert_eq!(shape(17), Some(RunShape::End));
        assert_eq!(shape(18), None);

        assert_eq!(annotated.runs(), vec![(1, 2), (4, 4), (13, 17)]);
        assert_eq!(annotated.highlighted_days(), highlighted);
    }

    #[test]
    fn filler_cells_are_never_highlighted() {
        // August 2021 shows July 26..31 and September 1..5 as filler.
        let matrix = build(2021, 7).unwrap();
        let highlighted: HighlightSet = (1..=31).collect();
        let annotated = annotate(&matrix, &highlighted);

        for cell in annotated.cells() {
            assert_eq!(cell.is_highlighted(), cell.cell.in_current_month());
        }
        assert_eq!(annotated.runs(), vec![(1, 31)]);
        assert_eq!(annotation_of(&annotated, 1).unwrap().shape(), RunShape::Start);
        assert_eq!(annotation_of(&annotated, 31).unwrap().shape(), RunShape::End);
    }

    #[test]
    fn month_edges_close_runs() {
        let matrix = build(2025, 8).unwrap();
        let annotated = annotate(&matrix, &vec![1, 30].into_iter().collect::<HighlightSet>());

        assert_eq!(annotation_of(&annotated, 1).unwrap().shape(), RunShape::Isolated);
        assert_eq!(annotation_of(&annotated, 30).unwrap().shape(), RunShape::Isolated);
    }

    #[test]
    fn out_of_range_days_are_ignored() {
        let matrix = build(2025, 8).unwrap();
        let annotated = annotate(&matrix, &vec![0, 30, 31, 45].into_iter().collect::<HighlightSet>());

        assert_eq!(annotated.highlighted_days().iter().collect::<Vec<_>>(), vec![30]);
        assert_eq!(annotation_of(&annotated, 30).unwrap().shape(), RunShape::Isolated);
    }

    #[test]
    fn empty_set_highlights_nothing() {
        let matrix = build(2025, 8).unwrap();
        let annotated = annotate(&matrix, &HighlightSet::new());

        assert!(annotated.cells().all(|c| !c.is_highlighted()));
        assert!(annotated.runs().is_empty());
        assert_eq!(annotated.rows().len(), matrix.num_rows());
    }

    #[test]
    fn annotation_leaves_matrix_cells_untouched() {
        let matrix = build(2024, 1).unwrap();
        let annotated = annotate(&matrix, &vec![5, 6].into_iter().collect::<HighlightSet>());

        let original: Vec<_> = matrix.cells().copied().collect();
        let carried: Vec<_> = annotated.cells().map(|c| c.cell).collect();
        assert_eq!(original, carried);
    }

    #[test]
    fn predicate_highlighting_uses_same_adjacency() {
        let matrix = build(2025, 8).unwrap();
        let weekends = annotate_with(&matrix, |cell| cell.date().weekday().number_from_monday() > 5);

        assert_eq!(weekends.runs(), vec![(6, 7), (13, 14), (20, 21), (27, 28)]);
    }

    #[test]
    fn from_dates_keeps_only_the_month() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2025, 9, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 5).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 28).unwrap(),
        ];
        let month = MonthIndex::from_zero_based(2025, 8).unwrap();
        let set = HighlightSet::from_dates(&dates, &month);

        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 28]);
    }
}
