//! 坐标记谱法解析和生成
//!
//! 格子记作线位加横排，如 `e2`；着法记作起点加终点，如 `e2e4`，
//! 升变着法附加小写子力后缀，如 `e7e8q`。

use crate::error::ChessError;
use crate::moves::Move;
use crate::piece::{PieceType, Square};

/// 坐标记谱法处理
pub struct Notation;

impl Notation {
    /// 解析格子记谱，如 `e2`
    pub fn parse_square(input: &str) -> Result<Square, ChessError> {
        let chars: Vec<char> = input.chars().collect();
        if chars.len() != 2 {
            return Err(ChessError::InvalidNotation {
                input: input.to_string(),
            });
        }

        Self::square_from_chars(chars[0], chars[1]).ok_or_else(|| ChessError::InvalidNotation {
            input: input.to_string(),
        })
    }

    /// 生成格子记谱
    pub fn square_to_string(square: Square) -> String {
        square.to_string()
    }

    /// 解析着法记谱，如 `e2e4` 或 `e7e8q`
    ///
    /// 返回起点、终点和可选的升变子力。
    pub fn parse_move(input: &str) -> Result<(Square, Square, Option<PieceType>), ChessError> {
        let invalid = || ChessError::InvalidNotation {
            input: input.to_string(),
        };

        let chars: Vec<char> = input.chars().collect();
        if chars.len() != 4 && chars.len() != 5 {
            return Err(invalid());
        }

        let from = Self::square_from_chars(chars[0], chars[1]).ok_or_else(invalid)?;
        let to = Self::square_from_chars(chars[2], chars[3]).ok_or_else(invalid)?;

        let promotion = if chars.len() == 5 {
            Some(PieceType::from_promotion_char(chars[4]).ok_or_else(invalid)?)
        } else {
            None
        };

        Ok((from, to, promotion))
    }

    /// 生成着法记谱
    pub fn move_to_string(mv: &Move) -> String {
        mv.to_string()
    }

    /// 从线位和横排字符构造格子
    fn square_from_chars(file: char, rank: char) -> Option<Square> {
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        let col = (file as u8) - b'a';
        let row = 8 - ((rank as u8) - b'0');
        Square::new(row, col)
    }
}
