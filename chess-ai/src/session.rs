//! 对局会话
//!
//! 连接玩家输入、规则状态和 AI 引擎。界面层只需要把格子点击
//! 转给会话，并在轮到 AI 时调用 `ai_reply`，不关心规则细节。

use chess_core::{Board, Fen, GameState, Move, Side, Square};
use tracing::{info, warn};

use crate::search::{AiEngine, Difficulty};
use crate::uci::{UciConfig, UciEngine};

/// 点击处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// 选中了己方棋子
    Selected,
    /// 取消了选择
    Deselected,
    /// 完成了一步走法
    Moved,
    /// 点击被忽略（对局结束或不在玩家回合）
    Ignored,
}

/// 对局会话
pub struct GameSession {
    state: GameState,
    /// 当前局面的合法走法缓存
    legal_moves: Vec<Move>,
    /// 玩家选中的格子
    selected: Option<Square>,
    human_side: Side,
    difficulty: Difficulty,
    engine: AiEngine,
    uci: Option<UciEngine>,
}

impl GameSession {
    /// 创建新对局，玩家执指定一方
    pub fn new(human_side: Side, difficulty: Difficulty) -> Self {
        Self::from_state(GameState::new(), human_side, difficulty)
    }

    /// 从已有局面创建对局（读取保存的 FEN 等场景）
    pub fn from_state(mut state: GameState, human_side: Side, difficulty: Difficulty) -> Self {
        let legal_moves = state.legal_moves();
        Self {
            state,
            legal_moves,
            selected: None,
            human_side,
            difficulty,
            engine: AiEngine::from_difficulty(difficulty),
            uci: None,
        }
    }

    /// 为最高难度接入外部 UCI 引擎
    ///
    /// 引擎启动失败只记录警告，之后该难度退回本地搜索。
    pub fn with_uci_engine(mut self, config: UciConfig) -> Self {
        match UciEngine::new(config) {
            Ok(engine) => self.uci = Some(engine),
            Err(e) => warn!("Failed to start UCI engine: {}", e),
        }
        self
    }

    /// 处理一次棋盘格点击
    ///
    /// 第一次点击选中己方棋子，第二次点击尝试走子。
    /// 不构成合法走法的点击会转为重新选择或取消选择，不产生错误。
    pub fn click_square(&mut self, square: Square) -> ClickOutcome {
        if self.state.is_game_over() || !self.is_human_turn() {
            return ClickOutcome::Ignored;
        }

        // 点击已选中的格子取消选择
        if self.selected == Some(square) {
            self.selected = None;
            return ClickOutcome::Deselected;
        }

        if let Some(from) = self.selected {
            if let Some(probe) = Move::from_squares(self.state.board(), from, square) {
                if let Some(mv) = self.legal_moves.iter().copied().find(|m| *m == probe) {
                    self.apply_move(mv);
                    self.selected = None;
                    return ClickOutcome::Moved;
                }
            }
        }

        // 不构成走法时，点到己方棋子就重新选择
        if let Some(piece) = self.state.board().get(square) {
            if piece.side == self.human_side {
                self.selected = Some(square);
                return ClickOutcome::Selected;
            }
        }

        self.selected = None;
        ClickOutcome::Deselected
    }

    /// 让 AI 走一步
    ///
    /// 最高难度优先询问外部引擎，失败时回退到随机走法；
    /// 对局已结束时返回 `None`。
    pub fn ai_reply(&mut self) -> Option<Move> {
        if self.state.is_game_over() {
            return None;
        }

        let best = match (self.difficulty, self.uci.as_mut()) {
            (Difficulty::Hard, Some(uci)) => match uci.best_move(&mut self.state) {
                Ok(mv) => Some(mv),
                Err(e) => {
                    warn!("UCI engine failed, falling back to random: {}", e);
                    None
                }
            },
            _ => self.engine.search(&mut self.state),
        };

        let mv = best.or_else(|| {
            let moves = self.legal_moves.clone();
            self.engine.find_random_move(&moves)
        })?;

        self.apply_move(mv);
        Some(mv)
    }

    /// 悔一步棋（撤销半回合）
    pub fn undo_move(&mut self) -> Option<Move> {
        let undone = self.state.undo_move()?;
        self.legal_moves = self.state.legal_moves();
        self.selected = None;
        Some(undone)
    }

    /// 重新开始对局
    pub fn reset(&mut self) {
        self.state = GameState::new();
        self.legal_moves = self.state.legal_moves();
        self.selected = None;
    }

    /// 执行走法并刷新缓存
    fn apply_move(&mut self, mv: Move) {
        info!("{:?} plays {}", self.state.side_to_move(), mv);
        self.state.make_move(mv);
        self.legal_moves = self.state.legal_moves();

        if self.state.checkmate() {
            info!("Checkmate, {:?} wins", self.state.side_to_move().opponent());
        } else if self.state.stalemate() {
            info!("Stalemate");
        }
    }

    /// 是否轮到玩家走棋
    pub fn is_human_turn(&self) -> bool {
        self.state.side_to_move() == self.human_side
    }

    /// 当前选中棋子的所有合法落点（用于高亮）
    pub fn targets_from(&self, from: Square) -> Vec<Square> {
        self.legal_moves
            .iter()
            .filter(|m| m.from == from)
            .map(|m| m.to)
            .collect()
    }

    /// 当前局面 FEN（用于保存和外部引擎）
    pub fn fen(&self) -> String {
        Fen::to_string(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn human_side(&self) -> Side {
        self.human_side
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.state.last_move()
    }
}
