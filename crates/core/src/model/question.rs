use serde::{Deserialize, Serialize};

/// Number of cells in the dot-grid hint (a 5×5 grid).
pub const HINT_GRID_CELLS: usize = 25;

/// A single multiplication question.
///
/// Operands are bounded by the difficulty level (each in `[1, 2·level]`),
/// so `u8` comfortably covers the full range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub num1: u8,
    pub num2: u8,
}

impl Question {
    #[must_use]
    pub fn new(num1: u8, num2: u8) -> Self {
        Self { num1, num2 }
    }

    /// The expected answer, `num1 × num2`.
    #[must_use]
    pub fn answer(&self) -> u32 {
        u32::from(self.num1) * u32::from(self.num2)
    }

    /// Render for presentation, e.g. `3 × 7 = ?`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} × {} = ?", self.num1, self.num2)
    }

    /// Dot-grid hint model: the first `min(answer, 25)` cells are filled.
    ///
    /// The grid is capped at 25 cells, so large products saturate the grid
    /// rather than growing it.
    #[must_use]
    pub fn hint_cells(&self) -> [bool; HINT_GRID_CELLS] {
        let filled = (self.answer() as usize).min(HINT_GRID_CELLS);
        let mut cells = [false; HINT_GRID_CELLS];
        for cell in &mut cells[..filled] {
            *cell = true;
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_is_product() {
        assert_eq!(Question::new(3, 7).answer(), 21);
        assert_eq!(Question::new(20, 20).answer(), 400);
    }

    #[test]
    fn display_shows_operands() {
        assert_eq!(Question::new(4, 5).display(), "4 × 5 = ?");
    }

    #[test]
    fn hint_fills_answer_cells() {
        let cells = Question::new(2, 3).hint_cells();
        assert_eq!(cells.iter().filter(|c| **c).count(), 6);
        assert!(cells[5]);
        assert!(!cells[6]);
    }

    #[test]
    fn hint_saturates_at_grid_size() {
        let cells = Question::new(10, 10).hint_cells();
        assert!(cells.iter().all(|c| *c));
    }
}
