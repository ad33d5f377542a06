//! 搜索引擎
//!
//! 四档算法：随机走子、基于子力的 Minimax、NegaMax，
//! 以及 NegaMax + Alpha-Beta 剪枝 + 静态搜索。

use std::time::{Duration, Instant};

use chess_core::{GameState, Move, Side};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::evaluate::{Evaluator, CHECKMATE_SCORE, STALEMATE_SCORE};

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 随机走子
    Random,
    /// 基于子力的 Minimax
    Easy,
    /// Alpha-Beta 剪枝
    Medium,
    /// 外部引擎（由对局会话接入，本地退化为 Alpha-Beta）
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub depth: u8,
    pub time_limit_ms: u64,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            depth: 2,
            time_limit_ms: 15_000,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
    deadline: Instant,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        let deadline = Instant::now() + Duration::from_millis(config.time_limit_ms);
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
            nodes_searched: 0,
            deadline,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 创建使用固定随机种子的引擎（可复现对局）
    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        let deadline = Instant::now() + Duration::from_millis(config.time_limit_ms);
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            nodes_searched: 0,
            deadline,
        }
    }

    /// 获取上次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 按配置难度搜索最佳走法
    ///
    /// 对应算法没有找到严格更优的走法时退回随机走子；
    /// 无合法走法（对局已结束）时返回 `None`。
    /// 搜索过程中的试走都会被撤销，返回时局面不变。
    pub fn search(&mut self, state: &mut GameState) -> Option<Move> {
        self.nodes_searched = 0;
        self.deadline = Instant::now() + Duration::from_millis(self.config.time_limit_ms);

        let moves = state.legal_moves();
        if moves.is_empty() {
            return None;
        }

        let best = match self.config.difficulty {
            Difficulty::Random => None,
            Difficulty::Easy => self.find_minimax_move(state, moves.clone()),
            Difficulty::Medium | Difficulty::Hard => {
                self.find_alpha_beta_move(state, moves.clone())
            }
        };

        best.or_else(|| self.find_random_move(&moves))
    }

    /// 随机选择一个走法
    pub fn find_random_move(&mut self, moves: &[Move]) -> Option<Move> {
        moves.choose(&mut self.rng).copied()
    }

    /// Minimax 搜索入口（叶节点只看子力差）
    pub fn find_minimax_move(
        &mut self,
        state: &mut GameState,
        mut moves: Vec<Move>,
    ) -> Option<Move> {
        moves.shuffle(&mut self.rng);
        let depth = self.config.depth.max(1);
        let maximizing = state.side_to_move() == Side::White;

        let mut best_move = None;
        let mut best_score = if maximizing {
            -CHECKMATE_SCORE
        } else {
            CHECKMATE_SCORE
        };

        for mv in moves {
            state.make_move(mv);
            let next_moves = state.legal_moves();
            let score = self.minimax(state, next_moves, depth - 1, !maximizing);
            state.undo_move();

            let improved = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if improved {
                best_score = score;
                best_move = Some(mv);
            }
        }

        best_move
    }

    /// NegaMax 搜索入口（无剪枝，主要用于校验 Alpha-Beta 的等价性）
    pub fn find_negamax_move(
        &mut self,
        state: &mut GameState,
        mut moves: Vec<Move>,
    ) -> Option<Move> {
        moves.shuffle(&mut self.rng);
        let depth = self.config.depth.max(1);

        let mut best_move = None;
        let mut best_score = -CHECKMATE_SCORE;

        for mv in moves {
            state.make_move(mv);
            let next_moves = state.legal_moves();
            let score = -self.negamax(state, next_moves, depth - 1);
            state.undo_move();

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
        }

        best_move
    }

    /// Alpha-Beta 搜索入口
    pub fn find_alpha_beta_move(
        &mut self,
        state: &mut GameState,
        mut moves: Vec<Move>,
    ) -> Option<Move> {
        moves.shuffle(&mut self.rng);
        let depth = self.config.depth.max(1);

        let mut alpha = -CHECKMATE_SCORE;
        let beta = CHECKMATE_SCORE;
        let mut best_move = None;
        let mut best_score = -CHECKMATE_SCORE;

        for mv in moves {
            state.make_move(mv);
            let next_moves = state.legal_moves();
            let score = -self.negamax_alpha_beta(state, next_moves, depth - 1, -beta, -alpha);
            state.undo_move();

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if best_score > alpha {
                alpha = best_score;
            }
            if alpha >= beta {
                break;
            }
        }

        best_move
    }

    /// Minimax 递归（白方取最大值，黑方取最小值）
    fn minimax(
        &mut self,
        state: &mut GameState,
        moves: Vec<Move>,
        depth: u8,
        maximizing: bool,
    ) -> i32 {
        self.nodes_searched += 1;

        if moves.is_empty() {
            if state.checkmate() {
                // 走子方被将死
                return if maximizing {
                    -CHECKMATE_SCORE
                } else {
                    CHECKMATE_SCORE
                };
            }
            return STALEMATE_SCORE;
        }
        if depth == 0 {
            return Evaluator::evaluate_material(state.board());
        }

        if maximizing {
            let mut max_score = -CHECKMATE_SCORE;
            for mv in moves {
                state.make_move(mv);
                let next_moves = state.legal_moves();
                let score = self.minimax(state, next_moves, depth - 1, false);
                state.undo_move();
                if score > max_score {
                    max_score = score;
                }
            }
            max_score
        } else {
            let mut min_score = CHECKMATE_SCORE;
            for mv in moves {
                state.make_move(mv);
                let next_moves = state.legal_moves();
                let score = self.minimax(state, next_moves, depth - 1, true);
                state.undo_move();
                if score < min_score {
                    min_score = score;
                }
            }
            min_score
        }
    }

    /// NegaMax 递归，叶节点进入全窗口静态搜索
    fn negamax(&mut self, state: &mut GameState, moves: Vec<Move>, depth: u8) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 || moves.is_empty() {
            return self.quiescence(state, -CHECKMATE_SCORE, CHECKMATE_SCORE);
        }

        let mut max_score = -CHECKMATE_SCORE;
        for mv in moves {
            state.make_move(mv);
            let next_moves = state.legal_moves();
            let score = -self.negamax(state, next_moves, depth - 1);
            state.undo_move();
            if score > max_score {
                max_score = score;
            }
        }
        max_score
    }

    /// NegaMax + Alpha-Beta 剪枝递归
    fn negamax_alpha_beta(
        &mut self,
        state: &mut GameState,
        moves: Vec<Move>,
        depth: u8,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 || moves.is_empty() {
            return self.quiescence(state, alpha, beta);
        }

        // 超时后放弃加深，返回静态评估值
        if Instant::now() >= self.deadline {
            return Self::signed_evaluate(state);
        }

        let mut max_score = -CHECKMATE_SCORE;
        for mv in moves {
            state.make_move(mv);
            let next_moves = state.legal_moves();
            let score = -self.negamax_alpha_beta(state, next_moves, depth - 1, -beta, -alpha);
            state.undo_move();

            if score > max_score {
                max_score = score;
            }
            if max_score > alpha {
                alpha = max_score;
            }
            if alpha >= beta {
                break;
            }
        }
        max_score
    }

    /// 静态搜索（只展开吃子走法，消除水平线效应）
    fn quiescence(&mut self, state: &mut GameState, mut alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;

        let stand_pat = Self::signed_evaluate(state);
        if stand_pat >= beta {
            return beta;
        }
        if alpha < stand_pat {
            alpha = stand_pat;
        }

        if Instant::now() >= self.deadline {
            return alpha;
        }

        let moves = state.legal_moves();
        for mv in moves {
            if mv.captured.is_none() {
                continue;
            }
            state.make_move(mv);
            let score = -self.quiescence(state, -beta, -alpha);
            state.undo_move();

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    /// 以走子方视角评估局面
    fn signed_evaluate(state: &mut GameState) -> i32 {
        let score = Evaluator::evaluate(state);
        match state.side_to_move() {
            Side::White => score,
            Side::Black => -score,
        }
    }
}
