//! FEN 格式解析和生成
//!
//! 完整的六段格式：
//! `<棋盘> <走子方> <易位权利> <过路兵目标> <半回合钟> <回合数>`
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1`
//!
//! 本引擎不跟踪半回合钟，导出时恒为 0。

use crate::board::Board;
use crate::castling::CastlingRights;
use crate::error::ChessError;
use crate::game::GameState;
use crate::notation::Notation;
use crate::piece::{Piece, Side, Square};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为对局状态
    ///
    /// 缺失的尾部字段取保守默认值（白方走子、无易位权利、无过路兵）；
    /// 出现但格式错误的字段返回 `InvalidFen`。
    pub fn parse(fen: &str) -> Result<GameState, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ChessError::InvalidFen {
                reason: "Empty FEN string".to_string(),
            });
        }

        // 解析棋盘
        let board = Self::parse_board(parts[0])?;

        // 解析走子方
        let side_to_move = if parts.len() > 1 {
            Side::from_fen_char(parts[1].chars().next().unwrap_or('w')).ok_or_else(|| {
                ChessError::InvalidFen {
                    reason: format!("Invalid active color: {}", parts[1]),
                }
            })?
        } else {
            Side::White
        };

        // 解析易位权利
        let castling = if parts.len() > 2 {
            CastlingRights::from_fen_field(parts[2]).ok_or_else(|| ChessError::InvalidFen {
                reason: format!("Invalid castling field: {}", parts[2]),
            })?
        } else {
            CastlingRights::none()
        };

        // 解析过路兵目标
        let en_passant = if parts.len() > 3 && parts[3] != "-" {
            let sq = Notation::parse_square(parts[3]).map_err(|_| ChessError::InvalidFen {
                reason: format!("Invalid en passant square: {}", parts[3]),
            })?;
            Some(sq)
        } else {
            None
        };

        // 半回合钟被忽略（parts[4]），回合数默认 1
        let fullmove_number = if parts.len() > 5 {
            parts[5].parse().unwrap_or(1)
        } else {
            1
        };

        GameState::from_board(board, side_to_move, castling, en_passant, fullmove_number).ok_or(
            ChessError::InvalidFen {
                reason: "Both kings must be on the board".to_string(),
            },
        )
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board, ChessError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != 8 {
            return Err(ChessError::InvalidFen {
                reason: format!("Expected 8 rows, got {}", rows.len()),
            });
        }

        // FEN 从第 8 横排到第 1 横排，即 row 0 到 row 7
        for (row_idx, row_str) in rows.iter().enumerate() {
            let row = row_idx as u8;
            let mut col = 0u8;

            for c in row_str.chars() {
                if col >= 8 {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Row {} has too many columns", row_idx),
                    });
                }

                if c.is_ascii_digit() {
                    let empty_count = c.to_digit(10).unwrap_or(0) as u8;
                    col += empty_count;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Square::new_unchecked(row, col), Some(piece));
                    col += 1;
                } else {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if col != 8 {
                return Err(ChessError::InvalidFen {
                    reason: format!("Row {} has {} columns, expected 8", row_idx, col),
                });
            }
        }

        Ok(board)
    }

    /// 将对局状态转换为 FEN 字符串
    pub fn to_string(state: &GameState) -> String {
        let board_str = Self::board_to_string(state.board());
        let en_passant = match state.en_passant_target() {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };
        format!(
            "{} {} {} {} 0 {}",
            board_str,
            state.side_to_move().to_fen_char(),
            state.castling_rights().to_fen_field(),
            en_passant,
            state.fullmove_number()
        )
    }

    /// 将棋盘转换为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(8);

        for row in 0..8 {
            let mut row_str = String::new();
            let mut empty_count = 0;

            for col in 0..8 {
                if let Some(piece) = board.get(Square::new_unchecked(row, col)) {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row_str.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row_str.push_str(&empty_count.to_string());
            }

            rows.push(row_str);
        }

        rows.join("/")
    }

    /// 解析初始局面
    pub fn initial() -> GameState {
        Self::parse(INITIAL_FEN).expect("Initial FEN should be valid")
    }
}
