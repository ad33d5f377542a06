//! 棋子与坐标定义

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// 王
    King,
    /// 后
    Queen,
    /// 车
    Rook,
    /// 象
    Bishop,
    /// 马
    Knight,
    /// 兵
    Pawn,
}

impl PieceType {
    /// 获取棋子的基础分值（用于 AI 评估，王不计分）
    pub fn value(&self) -> i32 {
        match self {
            PieceType::King => 0,
            PieceType::Queen => 10,
            PieceType::Rook => 5,
            PieceType::Bishop => 3,
            PieceType::Knight => 3,
            PieceType::Pawn => 1,
        }
    }

    /// 获取 FEN 字符（白方大写，黑方小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Rook => 'r',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Pawn => 'p',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceType, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let piece_type = match c.to_ascii_lowercase() {
            'k' => PieceType::King,
            'q' => PieceType::Queen,
            'r' => PieceType::Rook,
            'b' => PieceType::Bishop,
            'n' => PieceType::Knight,
            'p' => PieceType::Pawn,
            _ => return None,
        };
        Some((piece_type, side))
    }

    /// 从升变后缀字符解析（小写 q/r/b/n）
    pub fn from_promotion_char(c: char) -> Option<PieceType> {
        match c {
            'q' => Some(PieceType::Queen),
            'r' => Some(PieceType::Rook),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            _ => None,
        }
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 白方（先手，在棋盘下方，兵向 row 减小的方向前进）
    White,
    /// 黑方（后手，在棋盘上方）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 该方兵的前进方向（行增量）
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'w' | 'W' => Some(Side::White),
            'b' | 'B' => Some(Side::Black),
            _ => None,
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, side: Side) -> Self {
        Self { piece_type, side }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.piece_type.to_fen_char(self.side)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceType::from_fen_char(c).map(|(piece_type, side)| Piece { piece_type, side })
    }

    /// 获取棋子分值
    pub fn value(&self) -> i32 {
        self.piece_type.value()
    }
}

/// 棋盘坐标
///
/// row 0 为第 8 横排（黑方底线，棋盘顶端），row 7 为第 1 横排；
/// col 0 为 a 线，col 7 为 h 线。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    /// 行 (0-7)，自顶向下
    pub row: u8,
    /// 列 (0-7)，自 a 线向 h 线
    pub col: u8,
}

impl Square {
    /// 创建新坐标
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新坐标（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查坐标是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// 获取偏移后的坐标
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let new_row = self.row as i8 + dr;
        let new_col = self.col as i8 + dc;
        if new_row >= 0
            && (new_row as usize) < BOARD_SIZE
            && new_col >= 0
            && (new_col as usize) < BOARD_SIZE
        {
            Some(Square {
                row: new_row as u8,
                col: new_col as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Square {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 线位字符（'a'-'h'）
    pub fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }

    /// 横排字符（'1'-'8'）
    pub fn rank_char(&self) -> char {
        (b'0' + (8 - self.row)) as char
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_fen_char() {
        let white_king = Piece::new(PieceType::King, Side::White);
        assert_eq!(white_king.to_fen_char(), 'K');

        let black_king = Piece::new(PieceType::King, Side::Black);
        assert_eq!(black_king.to_fen_char(), 'k');

        assert_eq!(
            Piece::from_fen_char('R'),
            Some(Piece::new(PieceType::Rook, Side::White))
        );
        assert_eq!(
            Piece::from_fen_char('n'),
            Some(Piece::new(PieceType::Knight, Side::Black))
        );
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn test_piece_value() {
        assert_eq!(PieceType::King.value(), 0);
        assert_eq!(PieceType::Queen.value(), 10);
        assert_eq!(PieceType::Rook.value(), 5);
        assert_eq!(PieceType::Bishop.value(), 3);
        assert_eq!(PieceType::Knight.value(), 3);
        assert_eq!(PieceType::Pawn.value(), 1);
    }

    #[test]
    fn test_square_valid() {
        assert!(Square::new(0, 0).is_some());
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
    }

    #[test]
    fn test_square_offset() {
        let sq = Square::new_unchecked(4, 4);
        assert_eq!(sq.offset(-1, 1), Some(Square::new_unchecked(3, 5)));
        assert_eq!(Square::new_unchecked(0, 0).offset(-1, 0), None);
        assert_eq!(Square::new_unchecked(7, 7).offset(0, 1), None);
    }

    #[test]
    fn test_square_index_roundtrip() {
        for index in 0..64 {
            let sq = Square::from_index(index).unwrap();
            assert_eq!(sq.to_index(), index);
        }
        assert!(Square::from_index(64).is_none());
    }

    #[test]
    fn test_square_display() {
        // row 0 = 第 8 横排，col 0 = a 线
        assert_eq!(Square::new_unchecked(0, 0).to_string(), "a8");
        assert_eq!(Square::new_unchecked(7, 7).to_string(), "h1");
        assert_eq!(Square::new_unchecked(6, 4).to_string(), "e2");
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::White.opponent(), Side::Black);
        assert_eq!(Side::Black.opponent(), Side::White);
    }

    #[test]
    fn test_pawn_direction() {
        assert_eq!(Side::White.pawn_direction(), -1);
        assert_eq!(Side::Black.pawn_direction(), 1);
    }
}
