//! Connect 4 rules engine.
//! A [`Board`] holds the 6x7 grid, applies gravity to dropped tokens and
//! detects runs of four in every direction. [`Game`] drives one board through
//! a match: turn alternation, win and draw detection, and a snapshot for
//! rendering.
use thiserror::Error;

mod board;
mod game;
mod token;

pub use board::{Board, Direction, COLUMNS, ROWS, TO_ALIGN};
pub use game::{Game, GameStatus, GameView, MoveOutcome};
pub use token::Token;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("column {column} is out of bounds")]
    ColumnOutOfBounds { column: usize },
    #[error("cell ({row}, {column}) is out of bounds")]
    CellOutOfBounds { row: usize, column: usize },
    #[error("column {column} is full")]
    ColumnFull { column: usize },
    #[error("an empty token cannot be played")]
    EmptyToken,
    #[error("the game is over")]
    GameOver,
}
