//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{
    BLACK_BACK_ROW, BLACK_PAWN_ROW, BOARD_SIZE, SQUARE_COUNT, WHITE_BACK_ROW, WHITE_PAWN_ROW,
};
use crate::piece::{Piece, PieceType, Side, Square};

/// 底线棋子从 a 线到 h 线的排布
const BACK_ROW: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，索引为 row * 8 + col，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for (col, &piece_type) in BACK_ROW.iter().enumerate() {
            let col = col as u8;
            board.set(
                Square::new_unchecked(BLACK_BACK_ROW, col),
                Some(Piece::new(piece_type, Side::Black)),
            );
            board.set(
                Square::new_unchecked(WHITE_BACK_ROW, col),
                Some(Piece::new(piece_type, Side::White)),
            );
            board.set(
                Square::new_unchecked(BLACK_PAWN_ROW, col),
                Some(Piece::new(PieceType::Pawn, Side::Black)),
            );
            board.set(
                Square::new_unchecked(WHITE_PAWN_ROW, col),
                Some(Piece::new(PieceType::Pawn, Side::White)),
            );
        }

        board
    }

    /// 获取指定坐标的棋子
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if sq.is_valid() {
            self.squares[sq.to_index()]
        } else {
            None
        }
    }

    /// 设置指定坐标的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if sq.is_valid() {
            self.squares[sq.to_index()] = piece;
        }
    }

    /// 移动棋子（不检查规则），返回被吃的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 查找指定阵营的王
    pub fn find_king(&self, side: Side) -> Option<Square> {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let sq = Square::new_unchecked(row as u8, col as u8);
                if let Some(piece) = self.get(sq) {
                    if piece.piece_type == PieceType::King && piece.side == side {
                        return Some(sq);
                    }
                }
            }
        }
        None
    }

    /// 获取指定阵营的所有棋子
    pub fn pieces(&self, side: Side) -> Vec<(Square, Piece)> {
        let mut result = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let sq = Square::new_unchecked(row as u8, col as u8);
                if let Some(piece) = self.get(sq) {
                    if piece.side == side {
                        result.push((sq, piece));
                    }
                }
            }
        }
        result
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        let mut result = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let sq = Square::new_unchecked(row as u8, col as u8);
                if let Some(piece) = self.get(sq) {
                    result.push((sq, piece));
                }
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        // 白方王在 e1
        let king = board.get(Square::new_unchecked(7, 4));
        assert_eq!(king, Some(Piece::new(PieceType::King, Side::White)));

        // 黑方王在 e8
        let king = board.get(Square::new_unchecked(0, 4));
        assert_eq!(king, Some(Piece::new(PieceType::King, Side::Black)));

        // 白方后在 d1
        let queen = board.get(Square::new_unchecked(7, 3));
        assert_eq!(queen, Some(Piece::new(PieceType::Queen, Side::White)));

        // 黑方兵在第 7 横排
        let pawn = board.get(Square::new_unchecked(1, 0));
        assert_eq!(pawn, Some(Piece::new(PieceType::Pawn, Side::Black)));

        // 中间四排为空
        for row in 2..6 {
            for col in 0..8 {
                assert!(board.get(Square::new_unchecked(row, col)).is_none());
            }
        }
    }

    #[test]
    fn test_move_piece() {
        let mut board = Board::initial();

        // e2 兵推进到 e4
        let from = Square::new_unchecked(6, 4);
        let to = Square::new_unchecked(4, 4);

        let captured = board.move_piece(from, to);
        assert!(captured.is_none());

        assert!(board.get(from).is_none());
        assert_eq!(board.get(to), Some(Piece::new(PieceType::Pawn, Side::White)));
    }

    #[test]
    fn test_find_king() {
        let board = Board::initial();

        let white_king = board.find_king(Side::White);
        assert_eq!(white_king, Some(Square::new_unchecked(7, 4)));

        let black_king = board.find_king(Side::Black);
        assert_eq!(black_king, Some(Square::new_unchecked(0, 4)));
    }

    #[test]
    fn test_pieces_by_side() {
        let board = Board::initial();
        assert_eq!(board.pieces(Side::White).len(), 16);
        assert_eq!(board.pieces(Side::Black).len(), 16);
        assert_eq!(board.all_pieces().len(), 32);
    }
}
