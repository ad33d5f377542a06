//! 易位权利

use serde::{Deserialize, Serialize};

use crate::piece::Side;

/// 四项易位权利
///
/// 权利只在王或对应的车第一次移动（或车被吃）时失去，不会恢复。
/// 走子历史中的每一步都会先压入权利快照，悔棋时弹出还原。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    /// 白方短易位（王翼）
    pub white_kingside: bool,
    /// 白方长易位（后翼）
    pub white_queenside: bool,
    /// 黑方短易位
    pub black_kingside: bool,
    /// 黑方长易位
    pub black_queenside: bool,
}

impl CastlingRights {
    /// 四项权利齐全（初始局面）
    pub fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    /// 四项权利全部失去
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    /// 指定阵营的短易位权利
    pub fn kingside(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_kingside,
            Side::Black => self.black_kingside,
        }
    }

    /// 指定阵营的长易位权利
    pub fn queenside(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_queenside,
            Side::Black => self.black_queenside,
        }
    }

    /// 取消指定阵营的全部权利（王移动后）
    pub fn clear_side(&mut self, side: Side) {
        match side {
            Side::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Side::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// 取消指定阵营的短易位权利
    pub fn clear_kingside(&mut self, side: Side) {
        match side {
            Side::White => self.white_kingside = false,
            Side::Black => self.black_kingside = false,
        }
    }

    /// 取消指定阵营的长易位权利
    pub fn clear_queenside(&mut self, side: Side) {
        match side {
            Side::White => self.white_queenside = false,
            Side::Black => self.black_queenside = false,
        }
    }

    /// 获取 FEN 片段（"KQkq" 的子集，全部失去时为 "-"）
    pub fn to_fen_field(&self) -> String {
        let mut field = String::new();
        if self.white_kingside {
            field.push('K');
        }
        if self.white_queenside {
            field.push('Q');
        }
        if self.black_kingside {
            field.push('k');
        }
        if self.black_queenside {
            field.push('q');
        }
        if field.is_empty() {
            field.push('-');
        }
        field
    }

    /// 从 FEN 片段解析，遇到非法字符返回 None
    pub fn from_fen_field(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(Self::none());
        }
        let mut rights = Self::none();
        for c in field.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                _ => return None,
            }
        }
        Some(rights)
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}
