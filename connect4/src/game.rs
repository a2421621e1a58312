use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Board, GameError, Token, COLUMNS, ROWS};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won(Token),
    Draw,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Result of a single accepted move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub player: Token,
    pub row: usize,
    pub column: usize,
    pub status: GameStatus,
}

/// Everything a front-end needs to redraw the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// `cells[row][column]`, row 0 at the top.
    pub cells: Vec<Vec<Token>>,
    pub status: GameStatus,
    /// `None` once the game is over.
    pub to_move: Option<Token>,
    /// Columns that still accept a token; empty once the game is over.
    pub playable_columns: Vec<usize>,
}

/// One game: a board, the token that moved last, and the derived status.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    current: Token,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            // alternated before every drop, so Red opens
            current: Token::Yellow,
            status: GameStatus::InProgress,
        }
    }

    /// Starts a new game on the same board.
    pub fn reset(&mut self) {
        self.board.clear();
        self.current = Token::Yellow;
        self.status = GameStatus::InProgress;
        debug!("game reset");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn to_move(&self) -> Option<Token> {
        if self.status.is_terminal() {
            None
        } else {
            Some(self.current.next())
        }
    }

    /// Plays the next token into `column`.
    ///
    /// A full column is rejected and the same player keeps the turn.
    pub fn play(&mut self, column: usize) -> Result<MoveOutcome, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver);
        }
        let player = self.current.next();
        let row = self
            .board
            .drop(player, column)?
            .ok_or(GameError::ColumnFull { column })?;
        self.current = player;

        self.status = match self.board.find_four_in_a_row() {
            Some(winner) => GameStatus::Won(winner),
            None if self.board.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        };
        debug!(?player, row, column, status = ?self.status, "move played");

        Ok(MoveOutcome {
            player,
            row,
            column,
            status: self.status,
        })
    }

    pub fn view(&self) -> Result<GameView, GameError> {
        let cells = (0..ROWS)
            .map(|row| {
                (0..COLUMNS)
                    .map(|column| self.board.get(row, column))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GameView {
            cells,
            status: self.status,
            to_move: self.to_move(),
            playable_columns: self.playable_columns()?,
        })
    }

    pub fn playable_columns(&self) -> Result<Vec<usize>, GameError> {
        if self.status.is_terminal() {
            return Ok(Vec::new());
        }
        let mut columns = Vec::with_capacity(COLUMNS);
        for column in 0..COLUMNS {
            if !self.board.is_column_full(column)? {
                columns.push(column);
            }
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_all(game: &mut Game, columns: &[usize]) -> MoveOutcome {
        let mut last = None;
        for &column in columns {
            last = Some(game.play(column).unwrap());
        }
        last.unwrap()
    }

    #[test]
    fn red_opens_and_turns_alternate() {
        let mut game = Game::new();
        assert_eq!(game.to_move(), Some(Token::Red));
        let first = game.play(3).unwrap();
        assert_eq!(first.player, Token::Red);
        assert_eq!(first.row, ROWS - 1);
        let second = game.play(3).unwrap();
        assert_eq!(second.player, Token::Yellow);
        assert_eq!(second.row, ROWS - 2);
        assert_eq!(game.to_move(), Some(Token::Red));
    }

    #[test]
    fn vertical_win_ends_game() {
        let mut game = Game::new();
        let last = play_all(&mut game, &[0, 6, 0, 6, 0, 6, 0]);
        assert_eq!(last.player, Token::Red);
        assert_eq!(last.status, GameStatus::Won(Token::Red));
        assert_eq!(game.status(), GameStatus::Won(Token::Red));
        assert_eq!(game.to_move(), None);
        assert!(matches!(game.play(1), Err(GameError::GameOver)));
    }

    #[test]
    fn yellow_can_win() {
        let mut game = Game::new();
        let last = play_all(&mut game, &[0, 1, 0, 1, 0, 1, 6, 1]);
        assert_eq!(last.status, GameStatus::Won(Token::Yellow));
    }

    #[test]
    fn full_column_keeps_the_turn() {
        let mut game = Game::new();
        play_all(&mut game, &[2, 2, 2, 2, 2, 2]);
        assert_eq!(game.to_move(), Some(Token::Red));
        assert!(matches!(
            game.play(2),
            Err(GameError::ColumnFull { column: 2 })
        ));
        assert_eq!(game.to_move(), Some(Token::Red));
        assert_eq!(game.play(3).unwrap().player, Token::Red);
    }

    #[test]
    fn out_of_bounds_column_is_rejected() {
        let mut game = Game::new();
        assert!(matches!(
            game.play(COLUMNS),
            Err(GameError::ColumnOutOfBounds { column: 7 })
        ));
        assert_eq!(game.to_move(), Some(Token::Red));
    }

    #[test]
    fn reset_starts_over() {
        let mut game = Game::new();
        play_all(&mut game, &[0, 6, 0, 6, 0, 6, 0]);
        game.reset();
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.to_move(), Some(Token::Red));
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.play(4).unwrap().player, Token::Red);
    }

    #[test]
    fn view_reflects_board() {
        let mut game = Game::new();
        play_all(&mut game, &[1, 5]);
        let view = game.view().unwrap();
        assert_eq!(view.cells.len(), ROWS);
        assert!(view.cells.iter().all(|row| row.len() == COLUMNS));
        assert_eq!(view.cells[ROWS - 1][1], Token::Red);
        assert_eq!(view.cells[ROWS - 1][5], Token::Yellow);
        assert_eq!(view.cells[0][1], Token::Empty);
        assert_eq!(view.to_move, Some(Token::Red));
    }

    #[test]
    fn full_board_without_four_is_a_draw() {
        let mut game = Game::new();
        let columns = [
            2, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 6, 4, 4, 4, 4,
            4, 4, 5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6,
        ];
        assert_eq!(columns.len(), ROWS * COLUMNS);
        let (last, earlier) = columns.split_last().unwrap();
        for &column in earlier {
            assert_eq!(game.play(column).unwrap().status, GameStatus::InProgress);
        }
        let outcome = game.play(*last).unwrap();
        assert_eq!(outcome.status, GameStatus::Draw);
        assert_eq!(game.status(), GameStatus::Draw);
        assert_eq!(game.to_move(), None);
        assert!(game.board().is_full());
        assert!(matches!(game.play(0), Err(GameError::GameOver)));
    }

    #[test]
    fn four_on_the_last_cell_is_a_win() {
        let mut game = Game::new();
        let columns = [
            4, 5, 6, 4, 4, 4, 3, 4, 1, 2, 3, 2, 5, 3, 0, 6, 1, 1, 4, 6, 0, 2, 2, 3, 0, 5, 6, 0, 3,
            1, 1, 0, 0, 5, 3, 6, 1, 2, 6, 2, 5, 5,
        ];
        let (last, earlier) = columns.split_last().unwrap();
        for &column in earlier {
            assert_eq!(game.play(column).unwrap().status, GameStatus::InProgress);
        }
        let outcome = game.play(*last).unwrap();
        assert_eq!(outcome.player, Token::Yellow);
        assert!(game.board().is_full());
        assert_eq!(game.status(), GameStatus::Won(Token::Yellow));
        assert_eq!(game.to_move(), None);
    }

    #[test]
    fn playable_columns_skip_full_ones() {
        let mut game = Game::new();
        assert_eq!(game.playable_columns().unwrap(), (0..COLUMNS).collect::<Vec<_>>());
        play_all(&mut game, &[4, 4, 4, 4, 4, 4]);
        let view = game.view().unwrap();
        assert_eq!(view.playable_columns, vec![0, 1, 2, 3, 5, 6]);

        play_all(&mut game, &[0, 6, 0, 6, 0, 6, 0]);
        assert!(game.view().unwrap().playable_columns.is_empty());
    }

    #[test]
    fn status_wire_shape() {
        let won = serde_json::to_value(GameStatus::Won(Token::Yellow)).unwrap();
        assert_eq!(won, serde_json::json!({"state": "won", "winner": "yellow"}));
        let draw = serde_json::to_value(GameStatus::Draw).unwrap();
        assert_eq!(draw, serde_json::json!({"state": "draw"}));
    }
}
