//! 国际象棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数（子力、位置、王的安全、机动性、中心控制）
//! - 随机 / Minimax / NegaMax / Alpha-Beta 四档搜索
//! - 外部 UCI 引擎接入
//! - 对局会话（输入处理与 AI 调度）

mod evaluate;
mod search;
mod session;
mod uci;

pub use evaluate::{Evaluator, CHECKMATE_SCORE, STALEMATE_SCORE};
pub use search::{AiConfig, AiEngine, Difficulty};
pub use session::{ClickOutcome, GameSession};
pub use uci::{UciClient, UciConfig, UciEngine};
