//! 国际象棋核心规则库
//!
//! 提供棋盘表示、着法生成、对局状态管理以及 FEN 和坐标记谱的解析与生成。
//! 所有走子规则（兵的双步与过路兵、升变、王车易位、将军判定）都在这里实现，
//! 供 AI 引擎和对局会话复用。

pub mod board;
pub mod castling;
pub mod constants;
pub mod error;
pub mod fen;
pub mod game;
pub mod moves;
pub mod notation;
pub mod piece;

pub use board::Board;
pub use castling::CastlingRights;
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use game::GameState;
pub use moves::{Move, MoveGenerator};
pub use notation::Notation;
pub use piece::{Piece, PieceType, Side, Square};
