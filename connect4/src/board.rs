use std::fmt;

use once_cell::sync::Lazy;

use crate::{GameError, Token};

pub const ROWS: usize = 6;
pub const COLUMNS: usize = 7;
/// Run length that wins the game.
pub const TO_ALIGN: usize = 4;

const CELLS: usize = ROWS * COLUMNS;

/// Every line a run can lie on, built once.
static SCAN_LINES: Lazy<Vec<ScanLine>> = Lazy::new(generate_scan_lines);

/// Orientation of a scan line. Row 0 is the top of the grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Left to right along one row.
    Row,
    /// Top to bottom along one column.
    Column,
    /// Cells `(i + k, j + k)`.
    DownRight,
    /// Cells `(i + k, j - k)`.
    DownLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Row,
        Direction::Column,
        Direction::DownRight,
        Direction::DownLeft,
    ];
}

struct ScanLine {
    direction: Direction,
    cells: Vec<(usize, usize)>,
}

/// The 6x7 grid. Tokens settle at the lowest empty row of their column, so
/// the empty cells of every column always form a run starting at row 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Token; CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Token::Empty; CELLS],
        }
    }

    /// Removes every token from the grid.
    pub fn clear(&mut self) {
        self.cells.fill(Token::Empty);
    }

    /// Drops `token` into `column` and returns the row it landed on.
    ///
    /// `Ok(None)` means the column is full; the board is left untouched.
    pub fn drop(&mut self, token: Token, column: usize) -> Result<Option<usize>, GameError> {
        check_column(column)?;
        if !token.is_player() {
            return Err(GameError::EmptyToken);
        }
        for row in (0..ROWS).rev() {
            let cell = &mut self.cells[index(row, column)];
            if *cell == Token::Empty {
                *cell = token;
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    pub fn get(&self, row: usize, column: usize) -> Result<Token, GameError> {
        if row >= ROWS || column >= COLUMNS {
            return Err(GameError::CellOutOfBounds { row, column });
        }
        Ok(self.cells[index(row, column)])
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&token| token != Token::Empty)
    }

    /// A column is full once its top cell is taken.
    pub fn is_column_full(&self, column: usize) -> Result<bool, GameError> {
        check_column(column)?;
        Ok(self.cells[index(0, column)] != Token::Empty)
    }

    /// Returns the player holding a run of at least [`TO_ALIGN`] tokens.
    ///
    /// Red is checked first. Both players can only qualify at once on a board
    /// that was never reached through normal play.
    pub fn find_four_in_a_row(&self) -> Option<Token> {
        [Token::Red, Token::Yellow]
            .into_iter()
            .find(|&token| self.longest_run(token) >= TO_ALIGN)
    }

    /// Longest run of consecutive `token` cells along any row, column or diagonal.
    pub fn longest_run(&self, token: Token) -> usize {
        Direction::ALL
            .iter()
            .map(|&direction| self.longest_run_in(direction, token))
            .max()
            .unwrap_or(0)
    }

    /// Same as [`Board::longest_run`], restricted to lines of one orientation.
    pub fn longest_run_in(&self, direction: Direction, token: Token) -> usize {
        SCAN_LINES
            .iter()
            .filter(|line| line.direction == direction)
            .map(|line| self.run_on(line, token))
            .max()
            .unwrap_or(0)
    }

    fn run_on(&self, line: &ScanLine, token: Token) -> usize {
        let mut best = 0;
        let mut run = 0;
        for &(row, column) in &line.cells {
            if self.cells[index(row, column)] == token {
                run += 1;
            } else {
                best = best.max(run);
                run = 0;
            }
        }
        // the run may reach the edge of the grid
        best.max(run)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for column in 0..COLUMNS {
                write!(f, "{}", self.cells[index(row, column)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn index(row: usize, column: usize) -> usize {
    row * COLUMNS + column
}

fn check_column(column: usize) -> Result<(), GameError> {
    if column >= COLUMNS {
        return Err(GameError::ColumnOutOfBounds { column });
    }
    Ok(())
}

fn generate_scan_lines() -> Vec<ScanLine> {
    let mut lines = Vec::new();
    for row in 0..ROWS {
        lines.push(walk(Direction::Row, (row, 0), (0, 1)));
    }
    for column in 0..COLUMNS {
        lines.push(walk(Direction::Column, (0, column), (1, 0)));
    }
    // Diagonals start on the top row or on the side they move away from.
    let down_right = (0..COLUMNS)
        .map(|column| (0, column))
        .chain((1..ROWS).map(|row| (row, 0)));
    for start in down_right {
        lines.push(walk(Direction::DownRight, start, (1, 1)));
    }
    let down_left = (0..COLUMNS)
        .map(|column| (0, column))
        .chain((1..ROWS).map(|row| (row, COLUMNS - 1)));
    for start in down_left {
        lines.push(walk(Direction::DownLeft, start, (1, -1)));
    }
    // shorter diagonals can never hold a winning run
    lines.retain(|line| line.cells.len() >= TO_ALIGN);
    lines
}

fn walk(direction: Direction, start: (usize, usize), step: (isize, isize)) -> ScanLine {
    let mut cells = Vec::new();
    let (mut row, mut column) = (start.0 as isize, start.1 as isize);
    while (0..ROWS as isize).contains(&row) && (0..COLUMNS as isize).contains(&column) {
        cells.push((row as usize, column as usize));
        row += step.0;
        column += step.1;
    }
    ScanLine { direction, cells }
}
