//! Row-major placement of selected charts into a grid of panel slots.

use crate::models::{ChartKind, Selection, SelectionError};

/// Deterministic slot assignment for a selection: `ceil(N/C)` rows, each
/// holding up to C charts, filled row-major in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    rows: Vec<Vec<ChartKind>>,
    columns: usize,
}

impl LayoutPlan {
    /// Plan the grid for a selection. An empty selection is the
    /// nothing-selected condition, not a plannable layout.
    pub fn new(selection: &Selection) -> Result<Self, SelectionError> {
        selection.ensure_non_empty()?;
        let columns = selection.columns();
        let rows = selection
            .charts()
            .chunks(columns)
            .map(|chunk| chunk.to_vec())
            .collect();
        Ok(Self { rows, columns })
    }

    pub fn rows(&self) -> &[Vec<ChartKind>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Columns-per-row the grid was planned with (the last row may hold fewer).
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Charts in slot order together with their `(row, column)` position.
    pub fn slots(&self) -> impl Iterator<Item = (ChartKind, usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, kind)| (*kind, r, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection_of(n: usize, columns: usize) -> Selection {
        Selection::new(ChartKind::ALL.into_iter().take(n), columns).unwrap()
    }

    #[test]
    fn seven_charts_three_columns_gives_3_3_1() {
        let plan = LayoutPlan::new(&selection_of(7, 3)).unwrap();
        let counts: Vec<usize> = plan.rows().iter().map(|r| r.len()).collect();
        assert_eq!(counts, vec![3, 3, 1]);
        // Row-major fill preserves selection order.
        let order: Vec<u8> = plan.slots().map(|(k, _, _)| k.id()).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn single_column_stacks_everything() {
        let plan = LayoutPlan::new(&selection_of(4, 1)).unwrap();
        assert_eq!(plan.row_count(), 4);
        assert!(plan.rows().iter().all(|r| r.len() == 1));
    }

    #[test]
    fn identical_inputs_yield_identical_plans() {
        let a = LayoutPlan::new(&selection_of(15, 4)).unwrap();
        let b = LayoutPlan::new(&selection_of(15, 4)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn slot_positions_are_row_major() {
        let plan = LayoutPlan::new(&selection_of(5, 2)).unwrap();
        let positions: Vec<(usize, usize)> = plan.slots().map(|(_, r, c)| (r, c)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
    }

    #[test]
    fn empty_selection_refuses_layout() {
        let sel = Selection::new(std::iter::empty::<ChartKind>(), 3).unwrap();
        assert_eq!(LayoutPlan::new(&sel), Err(SelectionError::Empty));
    }
}
