//! UCI AI 引擎
//!
//! 把 UCI 引擎返回的记谱核对成本方生成的合法走法，失败时重试。

use anyhow::{bail, Result};
use chess_core::{Fen, GameState, Move, Notation};
use tracing::{debug, info, warn};

use super::{UciClient, UciConfig};

/// UCI AI 引擎
pub struct UciEngine {
    client: UciClient,
    /// 最大重试次数
    max_retries: u32,
}

impl UciEngine {
    /// 启动引擎
    pub fn new(config: UciConfig) -> Result<Self> {
        let client = UciClient::new(config)?;
        Ok(Self {
            client,
            max_retries: 3,
        })
    }

    /// 使用默认配置启动
    pub fn with_defaults() -> Result<Self> {
        Self::new(UciConfig::default())
    }

    /// 设置最大重试次数
    pub fn set_max_retries(&mut self, retries: u32) {
        self.max_retries = retries;
    }

    /// 请求当前局面的最佳走法
    ///
    /// 引擎返回的记谱必须对应一个本方合法走法，否则视为失败并重试。
    pub fn best_move(&mut self, state: &mut GameState) -> Result<Move> {
        let fen = Fen::to_string(state);
        let legal = state.legal_moves();
        if legal.is_empty() {
            bail!("No legal moves in position {}", fen);
        }

        for attempt in 1..=self.max_retries {
            debug!("UCI move request attempt {}/{}", attempt, self.max_retries);

            match self.client.best_move_for_fen(&fen) {
                Ok(notation) => match Self::match_legal(&notation, &legal) {
                    Some(mv) => {
                        info!("UCI engine move: {}", mv);
                        return Ok(mv);
                    }
                    None => {
                        warn!(
                            "UCI engine returned illegal move {} (attempt {})",
                            notation, attempt
                        );
                    }
                },
                Err(e) => {
                    warn!("UCI request failed (attempt {}): {}", attempt, e);
                }
            }
        }

        bail!(
            "UCI engine failed to produce a legal move after {} attempts",
            self.max_retries
        )
    }

    /// 将引擎记谱与合法走法列表匹配
    ///
    /// 按起点和终点匹配；引擎指定了升变子力时以引擎为准。
    fn match_legal(notation: &str, legal: &[Move]) -> Option<Move> {
        let (from, to, promotion) = Notation::parse_move(notation).ok()?;
        let mv = legal.iter().copied().find(|m| m.from == from && m.to == to)?;
        match promotion {
            Some(kind) if mv.promotion.is_some() => Some(mv.with_promotion_choice(kind)),
            _ => Some(mv),
        }
    }
}
