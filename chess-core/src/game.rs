//! 对局状态与走子/悔棋

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::castling::CastlingRights;
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Piece, PieceType, Side, Square};

/// 完整的对局状态
///
/// 走子和悔棋在同一个状态上原地进行：`make_move` 先压入易位权利与
/// 过路兵目标的走子前快照，`undo_move` 逆序回放棋盘增量并弹出快照。
/// 任意 make/undo 对都把状态逐位还原。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 棋盘
    board: Board,
    /// 当前走子方
    side_to_move: Side,
    /// 走子历史
    move_log: Vec<Move>,
    /// 当前易位权利
    castling: CastlingRights,
    /// 每步走子前的权利快照，与走子历史平行
    castling_stack: Vec<CastlingRights>,
    /// 当前过路兵目标格
    en_passant: Option<Square>,
    /// 每步走子前的过路兵快照，与走子历史平行
    en_passant_stack: Vec<Option<Square>>,
    /// 白王坐标（随走子增量维护）
    white_king: Square,
    /// 黑王坐标
    black_king: Square,
    /// 将死标记，由每次合法走法查询刷新
    checkmate: bool,
    /// 逼和标记
    stalemate: bool,
    /// 完整回合数（黑方走完后 +1）
    fullmove_number: u32,
}

impl GameState {
    /// 创建初始对局
    pub fn new() -> Self {
        Self {
            board: Board::initial(),
            side_to_move: Side::White,
            move_log: Vec::new(),
            castling: CastlingRights::all(),
            castling_stack: Vec::new(),
            en_passant: None,
            en_passant_stack: Vec::new(),
            white_king: Square::new_unchecked(7, 4),
            black_king: Square::new_unchecked(0, 4),
            checkmate: false,
            stalemate: false,
            fullmove_number: 1,
        }
    }

    /// 从已摆好的棋盘创建对局状态
    ///
    /// 任一方缺少王时返回 None。
    pub fn from_board(
        board: Board,
        side_to_move: Side,
        castling: CastlingRights,
        en_passant: Option<Square>,
        fullmove_number: u32,
    ) -> Option<Self> {
        let white_king = board.find_king(Side::White)?;
        let black_king = board.find_king(Side::Black)?;
        Some(Self {
            board,
            side_to_move,
            move_log: Vec::new(),
            castling,
            castling_stack: Vec::new(),
            en_passant,
            en_passant_stack: Vec::new(),
            white_king,
            black_king,
            checkmate: false,
            stalemate: false,
            fullmove_number,
        })
    }

    /// 棋盘（只读快照）
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 当前走子方
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// 当前易位权利
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// 当前过路兵目标格
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    /// 指定阵营的王的坐标
    pub fn king_square(&self, side: Side) -> Square {
        match side {
            Side::White => self.white_king,
            Side::Black => self.black_king,
        }
    }

    /// 走子历史
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    /// 最近一步走法
    pub fn last_move(&self) -> Option<Move> {
        self.move_log.last().copied()
    }

    /// 完整回合数
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// 将死标记（以最近一次合法走法查询为准）
    pub fn checkmate(&self) -> bool {
        self.checkmate
    }

    /// 逼和标记
    pub fn stalemate(&self) -> bool {
        self.stalemate
    }

    /// 对局是否结束
    pub fn is_game_over(&self) -> bool {
        self.checkmate || self.stalemate
    }

    /// 当前走子方是否被将军
    pub fn in_check(&self) -> bool {
        let king_sq = self.king_square(self.side_to_move);
        MoveGenerator::square_attacked(&self.board, king_sq, self.side_to_move.opponent())
    }

    /// 指定坐标是否被指定阵营攻击
    pub fn square_attacked(&self, sq: Square, by: Side) -> bool {
        MoveGenerator::square_attacked(&self.board, sq, by)
    }

    /// 生成当前走子方的所有合法走法，并刷新将死/逼和标记
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let moves = MoveGenerator::generate_legal(self);
        if moves.is_empty() {
            if self.in_check() {
                self.checkmate = true;
                self.stalemate = false;
            } else {
                self.checkmate = false;
                self.stalemate = true;
            }
        } else {
            self.checkmate = false;
            self.stalemate = false;
        }
        moves
    }

    /// 执行走法
    ///
    /// 调用方保证走法来自合法走法列表（或试走流程）。
    pub fn make_move(&mut self, mv: Move) {
        self.castling_stack.push(self.castling);
        self.en_passant_stack.push(self.en_passant);

        let side = mv.piece_moved.side;

        self.board.set(mv.from, None);
        if mv.is_en_passant {
            // 被吃的兵不在目标格，而在起点行、目标列
            self.board.set(Square::new_unchecked(mv.from.row, mv.to.col), None);
        }
        let placed = match mv.promotion {
            Some(kind) => Piece::new(kind, side),
            None => mv.piece_moved,
        };
        self.board.set(mv.to, Some(placed));

        if mv.is_castle {
            let row = mv.from.row;
            if mv.to.col > mv.from.col {
                // 短易位：车从 h 线跳到 f 线
                self.board
                    .move_piece(Square::new_unchecked(row, 7), Square::new_unchecked(row, 5));
            } else {
                // 长易位：车从 a 线跳到 d 线
                self.board
                    .move_piece(Square::new_unchecked(row, 0), Square::new_unchecked(row, 3));
            }
        }

        if mv.piece_moved.piece_type == PieceType::King {
            self.set_king_square(side, mv.to);
            self.castling.clear_side(side);
        }
        if mv.piece_moved.piece_type == PieceType::Rook {
            self.clear_rook_rights(side, mv.from);
        }
        if let Some(captured) = mv.captured {
            // 角上的车被吃时对方永久失去该翼的权利
            if captured.piece_type == PieceType::Rook && !mv.is_en_passant {
                self.clear_rook_rights(captured.side, mv.to);
            }
        }

        self.en_passant = if mv.piece_moved.piece_type == PieceType::Pawn
            && (mv.from.row as i8 - mv.to.row as i8).abs() == 2
        {
            Some(Square::new_unchecked((mv.from.row + mv.to.row) / 2, mv.from.col))
        } else {
            None
        };

        self.move_log.push(mv);
        if side == Side::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = side.opponent();
    }

    /// 撤销最近一步走法
    ///
    /// 历史为空时是安全的空操作，返回 None。
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.move_log.pop()?;
        let side = mv.piece_moved.side;

        // 起点放回原棋子（升变时自动还原为兵）
        self.board.set(mv.from, Some(mv.piece_moved));
        if mv.is_en_passant {
            self.board.set(mv.to, None);
            self.board
                .set(Square::new_unchecked(mv.from.row, mv.to.col), mv.captured);
        } else {
            self.board.set(mv.to, mv.captured);
        }

        if mv.is_castle {
            let row = mv.from.row;
            if mv.to.col > mv.from.col {
                self.board
                    .move_piece(Square::new_unchecked(row, 5), Square::new_unchecked(row, 7));
            } else {
                self.board
                    .move_piece(Square::new_unchecked(row, 3), Square::new_unchecked(row, 0));
            }
        }

        if mv.piece_moved.piece_type == PieceType::King {
            self.set_king_square(side, mv.from);
        }

        if let Some(rights) = self.castling_stack.pop() {
            self.castling = rights;
        }
        if let Some(target) = self.en_passant_stack.pop() {
            self.en_passant = target;
        }

        if side == Side::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = side;
        self.checkmate = false;
        self.stalemate = false;
        Some(mv)
    }

    fn set_king_square(&mut self, side: Side, sq: Square) {
        match side {
            Side::White => self.white_king = sq,
            Side::Black => self.black_king = sq,
        }
    }

    /// 车离开（或被吃于）角上的格子时取消对应翼的权利
    fn clear_rook_rights(&mut self, side: Side, sq: Square) {
        let home_row = match side {
            Side::White => 7u8,
            Side::Black => 0u8,
        };
        if sq.row != home_row {
            return;
        }
        if sq.col == 0 {
            self.castling.clear_queenside(side);
        } else if sq.col == 7 {
            self.castling.clear_kingside(side);
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    /// 在状态上为走子方查找指定走法，找不到则 panic
    fn find_move(state: &mut GameState, from: Square, to: Square) -> Move {
        state
            .legal_moves()
            .into_iter()
            .find(|m| m.from == from && m.to == to)
            .expect("move should be legal")
    }

    #[test]
    fn test_make_undo_quiet_move() {
        let mut state = GameState::new();
        state.legal_moves();
        let before = state.clone();

        let mv = find_move(&mut state, Square::new_unchecked(6, 4), Square::new_unchecked(4, 4));
        state.make_move(mv);
        assert_eq!(state.side_to_move(), Side::Black);
        assert_ne!(state, before);

        state.undo_move();
        assert_eq!(state, before);
    }

    #[test]
    fn test_make_undo_capture() {
        // e4 白兵吃 d5 黑兵
        let mut state = Fen::parse("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        state.legal_moves();
        let before = state.clone();

        let mv = find_move(&mut state, Square::new_unchecked(4, 4), Square::new_unchecked(3, 3));
        assert!(mv.is_capture());
        state.make_move(mv);
        assert!(state.board().get(Square::new_unchecked(3, 3)).is_some());

        state.undo_move();
        assert_eq!(state, before);
        assert_eq!(
            state.board().get(Square::new_unchecked(3, 3)),
            Some(Piece::new(PieceType::Pawn, Side::Black))
        );
    }

    #[test]
    fn test_make_undo_kingside_castle() {
        let mut state = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        state.legal_moves();
        let before = state.clone();

        let mv = find_move(&mut state, Square::new_unchecked(7, 4), Square::new_unchecked(7, 6));
        assert!(mv.is_castle);
        state.make_move(mv);

        // 王到 g1，车到 f1
        assert_eq!(
            state.board().get(Square::new_unchecked(7, 6)),
            Some(Piece::new(PieceType::King, Side::White))
        );
        assert_eq!(
            state.board().get(Square::new_unchecked(7, 5)),
            Some(Piece::new(PieceType::Rook, Side::White))
        );
        assert!(state.board().get(Square::new_unchecked(7, 7)).is_none());
        assert_eq!(state.king_square(Side::White), Square::new_unchecked(7, 6));
        assert!(!state.castling_rights().kingside(Side::White));
        assert!(!state.castling_rights().queenside(Side::White));

        state.undo_move();
        assert_eq!(state, before);
    }

    #[test]
    fn test_make_undo_queenside_castle() {
        let mut state = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        state.legal_moves();
        let before = state.clone();

        let mv = find_move(&mut state, Square::new_unchecked(0, 4), Square::new_unchecked(0, 2));
        assert!(mv.is_castle);
        state.make_move(mv);

        // 黑王到 c8，车到 d8
        assert_eq!(
            state.board().get(Square::new_unchecked(0, 2)),
            Some(Piece::new(PieceType::King, Side::Black))
        );
        assert_eq!(
            state.board().get(Square::new_unchecked(0, 3)),
            Some(Piece::new(PieceType::Rook, Side::Black))
        );
        assert!(state.board().get(Square::new_unchecked(0, 0)).is_none());

        state.undo_move();
        assert_eq!(state, before);
    }

    #[test]
    fn test_make_undo_en_passant() {
        let mut state =
            Fen::parse("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        state.legal_moves();
        let before = state.clone();

        let mv = find_move(&mut state, Square::new_unchecked(3, 4), Square::new_unchecked(2, 3));
        assert!(mv.is_en_passant);
        state.make_move(mv);

        // 吃子兵落在 d6，被吃的黑兵从 d5 消失
        assert_eq!(
            state.board().get(Square::new_unchecked(2, 3)),
            Some(Piece::new(PieceType::Pawn, Side::White))
        );
        assert!(state.board().get(Square::new_unchecked(3, 3)).is_none());

        state.undo_move();
        assert_eq!(state, before);
        assert_eq!(
            state.board().get(Square::new_unchecked(3, 3)),
            Some(Piece::new(PieceType::Pawn, Side::Black))
        );
    }

    #[test]
    fn test_make_undo_promotion() {
        let mut state = Fen::parse("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        state.legal_moves();
        let before = state.clone();

        let mv = find_move(&mut state, Square::new_unchecked(1, 0), Square::new_unchecked(0, 0));
        assert_eq!(mv.promotion, Some(PieceType::Queen));
        state.make_move(mv);

        assert_eq!(
            state.board().get(Square::new_unchecked(0, 0)),
            Some(Piece::new(PieceType::Queen, Side::White))
        );

        state.undo_move();
        assert_eq!(state, before);
        assert_eq!(
            state.board().get(Square::new_unchecked(1, 0)),
            Some(Piece::new(PieceType::Pawn, Side::White))
        );
    }

    #[test]
    fn test_underpromotion_honored() {
        let mut state = Fen::parse("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let before = state.clone();

        let mv = find_move(&mut state, Square::new_unchecked(1, 0), Square::new_unchecked(0, 0))
            .with_promotion_choice(PieceType::Knight);
        state.make_move(mv);

        assert_eq!(
            state.board().get(Square::new_unchecked(0, 0)),
            Some(Piece::new(PieceType::Knight, Side::White))
        );

        state.undo_move();
        assert_eq!(state, before);
        assert_eq!(
            state.board().get(Square::new_unchecked(1, 0)),
            Some(Piece::new(PieceType::Pawn, Side::White))
        );
    }

    #[test]
    fn test_undo_empty_history_is_noop() {
        let mut state = GameState::new();
        let before = state.clone();

        assert!(state.undo_move().is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_make_undo_sequence_restores_start() {
        let mut state = GameState::new();
        state.legal_moves();
        let before = state.clone();

        // 连走四步再全部撤销
        let e4 = find_move(&mut state, Square::new_unchecked(6, 4), Square::new_unchecked(4, 4));
        state.make_move(e4);
        let e5 = find_move(&mut state, Square::new_unchecked(1, 4), Square::new_unchecked(3, 4));
        state.make_move(e5);
        let nf3 = find_move(&mut state, Square::new_unchecked(7, 6), Square::new_unchecked(5, 5));
        state.make_move(nf3);
        let nc6 = find_move(&mut state, Square::new_unchecked(0, 1), Square::new_unchecked(2, 2));
        state.make_move(nc6);

        assert_eq!(state.move_log().len(), 4);
        assert_eq!(state.fullmove_number(), 3);

        while state.undo_move().is_some() {}
        assert_eq!(state, before);
        assert_eq!(state.fullmove_number(), 1);
    }

    #[test]
    fn test_king_move_clears_castling_rights() {
        let mut state = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

        let mv = find_move(&mut state, Square::new_unchecked(7, 4), Square::new_unchecked(6, 4));
        state.make_move(mv);
        assert!(!state.castling_rights().kingside(Side::White));
        assert!(!state.castling_rights().queenside(Side::White));
        assert!(state.castling_rights().kingside(Side::Black));

        state.undo_move();
        assert!(state.castling_rights().kingside(Side::White));
        assert!(state.castling_rights().queenside(Side::White));
    }

    #[test]
    fn test_rook_move_clears_one_wing() {
        let mut state = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

        let mv = find_move(&mut state, Square::new_unchecked(7, 7), Square::new_unchecked(7, 6));
        state.make_move(mv);
        assert!(!state.castling_rights().kingside(Side::White));
        assert!(state.castling_rights().queenside(Side::White));

        state.undo_move();
        assert!(state.castling_rights().kingside(Side::White));
    }

    #[test]
    fn test_captured_rook_clears_opponent_rights() {
        // 白车沿 h 线吃掉 h8 黑车
        let mut state = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

        let mv = find_move(&mut state, Square::new_unchecked(7, 7), Square::new_unchecked(0, 7));
        assert!(mv.is_capture());
        state.make_move(mv);

        assert!(!state.castling_rights().kingside(Side::Black));
        assert!(state.castling_rights().queenside(Side::Black));
        // 白方自己的王翼车也离开了角
        assert!(!state.castling_rights().kingside(Side::White));

        state.undo_move();
        assert!(state.castling_rights().kingside(Side::Black));
        assert!(state.castling_rights().kingside(Side::White));
    }

    #[test]
    fn test_en_passant_target_set_and_cleared() {
        let mut state = GameState::new();

        let e4 = find_move(&mut state, Square::new_unchecked(6, 4), Square::new_unchecked(4, 4));
        state.make_move(e4);
        // 双步后目标格是跳过的 e3
        assert_eq!(state.en_passant_target(), Some(Square::new_unchecked(5, 4)));

        let nc6 = find_move(&mut state, Square::new_unchecked(0, 1), Square::new_unchecked(2, 2));
        state.make_move(nc6);
        assert_eq!(state.en_passant_target(), None);

        state.undo_move();
        assert_eq!(state.en_passant_target(), Some(Square::new_unchecked(5, 4)));
        state.undo_move();
        assert_eq!(state.en_passant_target(), None);
    }

    #[test]
    fn test_fullmove_number_follows_history() {
        let mut state = GameState::new();
        assert_eq!(state.fullmove_number(), 1);

        let e4 = find_move(&mut state, Square::new_unchecked(6, 4), Square::new_unchecked(4, 4));
        state.make_move(e4);
        assert_eq!(state.fullmove_number(), 1);

        let e5 = find_move(&mut state, Square::new_unchecked(1, 4), Square::new_unchecked(3, 4));
        state.make_move(e5);
        assert_eq!(state.fullmove_number(), 2);
        // 与历史长度的关系：len/2 + 1
        assert_eq!(
            state.fullmove_number(),
            state.move_log().len() as u32 / 2 + 1
        );
    }

    #[test]
    fn test_from_board_requires_kings() {
        let board = Board::empty();
        let state = GameState::from_board(board, Side::White, CastlingRights::none(), None, 1);
        assert!(state.is_none());
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
