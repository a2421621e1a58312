use std::fmt;

use serde::{Deserialize, Serialize};

/// Content of a single grid cell. `Red` always opens a game.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    #[default]
    Empty,
    Red,
    Yellow,
}

impl Token {
    /// Token of the player who moves after `self`. `Empty` maps to itself.
    pub fn next(self) -> Token {
        match self {
            Token::Empty => Token::Empty,
            Token::Red => Token::Yellow,
            Token::Yellow => Token::Red,
        }
    }

    pub fn is_player(self) -> bool {
        self != Token::Empty
    }

    fn glyph(self) -> char {
        match self {
            Token::Empty => '.',
            Token::Red => 'R',
            Token::Yellow => 'Y',
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_between_players() {
        assert_eq!(Token::Red.next(), Token::Yellow);
        assert_eq!(Token::Yellow.next(), Token::Red);
        assert_eq!(Token::Red.next().next().next(), Token::Yellow);
        assert_eq!(Token::Yellow.next().next(), Token::Yellow);
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(Token::Empty.next(), Token::Empty);
        assert!(!Token::Empty.is_player());
        assert!(Token::Red.is_player());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Token::Yellow).unwrap(), "\"yellow\"");
        let parsed: Token = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(parsed, Token::Red);
    }
}
