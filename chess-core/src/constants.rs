//! 核心常量定义

/// 棋盘边长（行数 = 列数 = 8）
pub const BOARD_SIZE: usize = 8;

/// 格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 白方兵的起始行（row 6 = 第 2 横排）
pub const WHITE_PAWN_ROW: u8 = 6;

/// 黑方兵的起始行（row 1 = 第 7 横排）
pub const BLACK_PAWN_ROW: u8 = 1;

/// 白方底线行（王、车的初始行）
pub const WHITE_BACK_ROW: u8 = 7;

/// 黑方底线行
pub const BLACK_BACK_ROW: u8 = 0;
