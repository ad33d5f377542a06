//! 错误类型定义

use thiserror::Error;

/// 象棋规则错误
///
/// 非法走法不在此列：不在合法走法列表中的走子请求按约定被静默忽略，
/// 空历史上的悔棋也是安全的空操作，两者都不构成错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 无效的坐标记谱（合法形式如 "e2e4"，可带升变后缀 "e7e8q"）
    #[error("Invalid move notation: {input:?}")]
    InvalidNotation { input: String },

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },
}

/// 核心操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
