//! 走法生成和验证

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::game::GameState;
use crate::piece::{Piece, PieceType, Side, Square};

/// 马的 8 个跳跃偏移
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// 直线方向（车）
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 斜线方向（象）
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 王的 8 个相邻方向
const KING_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 走法
///
/// 相等性和哈希只比较起点、终点和升变选择，因此由用户点击或
/// 外部引擎文本构造的走法能与生成器产出的完整走法匹配。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Move {
    /// 起始坐标
    pub from: Square,
    /// 目标坐标
    pub to: Square,
    /// 移动的棋子
    pub piece_moved: Piece,
    /// 被吃的棋子（过路兵记录的是实际被吃的兵）
    pub captured: Option<Piece>,
    /// 升变选择（兵到达底线时默认为后）
    pub promotion: Option<PieceType>,
    /// 是否为过路兵吃子
    pub is_en_passant: bool,
    /// 是否为易位
    pub is_castle: bool,
}

impl Move {
    /// 创建普通走法
    pub fn new(from: Square, to: Square, piece_moved: Piece) -> Self {
        Self {
            from,
            to,
            piece_moved,
            captured: None,
            promotion: None,
            is_en_passant: false,
            is_castle: false,
        }
    }

    /// 创建吃子走法
    pub fn with_capture(from: Square, to: Square, piece_moved: Piece, captured: Piece) -> Self {
        Self {
            from,
            to,
            piece_moved,
            captured: Some(captured),
            promotion: None,
            is_en_passant: false,
            is_castle: false,
        }
    }

    /// 创建升变走法（可带吃子）
    pub fn with_promotion(
        from: Square,
        to: Square,
        piece_moved: Piece,
        captured: Option<Piece>,
        promotion: PieceType,
    ) -> Self {
        Self {
            from,
            to,
            piece_moved,
            captured,
            promotion: Some(promotion),
            is_en_passant: false,
            is_castle: false,
        }
    }

    /// 创建过路兵吃子走法
    pub fn en_passant(from: Square, to: Square, piece_moved: Piece, captured: Piece) -> Self {
        Self {
            from,
            to,
            piece_moved,
            captured: Some(captured),
            promotion: None,
            is_en_passant: true,
            is_castle: false,
        }
    }

    /// 创建易位走法
    pub fn castle(from: Square, to: Square, piece_moved: Piece) -> Self {
        Self {
            from,
            to,
            piece_moved,
            captured: None,
            promotion: None,
            is_en_passant: false,
            is_castle: true,
        }
    }

    /// 从一对坐标构造走法探针，用于与合法走法列表做相等匹配
    ///
    /// 起点为空时返回 None。兵走到底线时自动补上默认升变（后），
    /// 与生成器的产出保持可匹配。
    pub fn from_squares(board: &Board, from: Square, to: Square) -> Option<Move> {
        let piece_moved = board.get(from)?;
        let captured = board.get(to);
        let promotion = if piece_moved.piece_type == PieceType::Pawn
            && (to.row == 0 || to.row == 7)
        {
            Some(PieceType::Queen)
        } else {
            None
        };
        Some(Self {
            from,
            to,
            piece_moved,
            captured,
            promotion,
            is_en_passant: false,
            is_castle: false,
        })
    }

    /// 替换升变选择（记谱带后缀时使用）
    pub fn with_promotion_choice(mut self, promotion: PieceType) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// 是否为吃子走法
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

impl Eq for Move {}

impl std::hash::Hash for Move {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.promotion.hash(state);
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            let c = match promotion {
                PieceType::Queen => 'q',
                PieceType::Rook => 'r',
                PieceType::Bishop => 'b',
                PieceType::Knight => 'n',
                _ => return Ok(()),
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成走子方的所有伪合法走法（不考虑王的安全）
    pub fn generate_pseudo_legal(state: &GameState) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        let side = state.side_to_move();
        let board = state.board();

        for (sq, piece) in board.pieces(side) {
            match piece.piece_type {
                PieceType::Pawn => Self::generate_pawn_moves(state, sq, side, &mut moves),
                PieceType::Knight => Self::generate_knight_moves(board, sq, side, &mut moves),
                PieceType::Bishop => {
                    Self::generate_sliding_moves(board, sq, side, &BISHOP_DIRECTIONS, &mut moves)
                }
                PieceType::Rook => {
                    Self::generate_sliding_moves(board, sq, side, &ROOK_DIRECTIONS, &mut moves)
                }
                PieceType::Queen => {
                    Self::generate_sliding_moves(board, sq, side, &ROOK_DIRECTIONS, &mut moves);
                    Self::generate_sliding_moves(board, sq, side, &BISHOP_DIRECTIONS, &mut moves);
                }
                PieceType::King => Self::generate_king_moves(state, sq, side, &mut moves),
            }
        }

        moves
    }

    /// 生成走子方的所有合法走法（过滤掉留王于被攻击状态的走法）
    ///
    /// 在共享状态上试走、检查、悔棋，不克隆棋盘。
    pub fn generate_legal(state: &mut GameState) -> Vec<Move> {
        let pseudo_legal = Self::generate_pseudo_legal(state);
        let mut legal = Vec::with_capacity(pseudo_legal.len());
        let mover = state.side_to_move();

        for mv in pseudo_legal {
            state.make_move(mv);
            let king_sq = state.king_square(mover);
            let safe = !Self::square_attacked(state.board(), king_sq, mover.opponent());
            state.undo_move();
            if safe {
                legal.push(mv);
            }
        }

        legal
    }

    /// 生成兵的走法（推进、双步、斜吃、过路兵、升变）
    fn generate_pawn_moves(state: &GameState, from: Square, side: Side, moves: &mut Vec<Move>) {
        let board = state.board();
        let piece = Piece::new(PieceType::Pawn, side);
        let forward = side.pawn_direction();
        let start_row = match side {
            Side::White => 6,
            Side::Black => 1,
        };
        let promotion_row = match side {
            Side::White => 0,
            Side::Black => 7,
        };

        // 单步推进
        if let Some(one) = from.offset(forward, 0) {
            if board.get(one).is_none() {
                if one.row == promotion_row {
                    moves.push(Move::with_promotion(from, one, piece, None, PieceType::Queen));
                } else {
                    moves.push(Move::new(from, one, piece));
                }

                // 起始行可双步推进
                if from.row == start_row {
                    if let Some(two) = from.offset(forward * 2, 0) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(from, two, piece));
                        }
                    }
                }
            }
        }

        // 斜吃与过路兵
        for dc in [-1i8, 1i8] {
            let Some(diag) = from.offset(forward, dc) else {
                continue;
            };
            if let Some(target) = board.get(diag) {
                if target.side != side {
                    if diag.row == promotion_row {
                        moves.push(Move::with_promotion(
                            from,
                            diag,
                            piece,
                            Some(target),
                            PieceType::Queen,
                        ));
                    } else {
                        moves.push(Move::with_capture(from, diag, piece, target));
                    }
                }
            } else if state.en_passant_target() == Some(diag) {
                // 被吃的兵在起点行、目标列
                let victim_sq = Square::new_unchecked(from.row, diag.col);
                if let Some(victim) = board.get(victim_sq) {
                    if victim.side != side && victim.piece_type == PieceType::Pawn {
                        moves.push(Move::en_passant(from, diag, piece, victim));
                    }
                }
            }
        }
    }

    /// 生成马的走法
    fn generate_knight_moves(board: &Board, from: Square, side: Side, moves: &mut Vec<Move>) {
        let piece = Piece::new(PieceType::Knight, side);
        for (dr, dc) in KNIGHT_OFFSETS {
            if let Some(to) = from.offset(dr, dc) {
                Self::try_add_move(board, from, to, piece, moves);
            }
        }
    }

    /// 生成滑行棋子（象、车、后）沿给定方向的走法
    fn generate_sliding_moves(
        board: &Board,
        from: Square,
        side: Side,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        let piece = match board.get(from) {
            Some(p) => p,
            None => return,
        };

        for &(dr, dc) in directions {
            let mut current = from;
            while let Some(to) = current.offset(dr, dc) {
                if let Some(target) = board.get(to) {
                    if target.side != side {
                        moves.push(Move::with_capture(from, to, piece, target));
                    }
                    break;
                }
                moves.push(Move::new(from, to, piece));
                current = to;
            }
        }
    }

    /// 生成王的走法（相邻八格加易位）
    fn generate_king_moves(state: &GameState, from: Square, side: Side, moves: &mut Vec<Move>) {
        let board = state.board();
        let piece = Piece::new(PieceType::King, side);

        for (dr, dc) in KING_DIRECTIONS {
            if let Some(to) = from.offset(dr, dc) {
                Self::try_add_move(board, from, to, piece, moves);
            }
        }

        Self::generate_castle_moves(state, from, side, moves);
    }

    /// 生成易位走法
    ///
    /// 要求：对应权利仍在、车仍在角上、王车之间为空、王当前未被攻击、
    /// 王经过和到达的格子未被攻击。从 FEN 载入的局面权利可能失真，
    /// 因此额外校验王和车的实际位置。
    fn generate_castle_moves(state: &GameState, from: Square, side: Side, moves: &mut Vec<Move>) {
        let board = state.board();
        let row = match side {
            Side::White => 7u8,
            Side::Black => 0u8,
        };
        if from != Square::new_unchecked(row, 4) {
            return;
        }

        let enemy = side.opponent();
        if Self::square_attacked(board, from, enemy) {
            return;
        }

        let piece = Piece::new(PieceType::King, side);
        let rook = Piece::new(PieceType::Rook, side);
        let rights = state.castling_rights();

        // 短易位：f、g 线为空且不被攻击，车在 h 线
        if rights.kingside(side)
            && board.get(Square::new_unchecked(row, 7)) == Some(rook)
            && board.get(Square::new_unchecked(row, 5)).is_none()
            && board.get(Square::new_unchecked(row, 6)).is_none()
            && !Self::square_attacked(board, Square::new_unchecked(row, 5), enemy)
            && !Self::square_attacked(board, Square::new_unchecked(row, 6), enemy)
        {
            moves.push(Move::castle(from, Square::new_unchecked(row, 6), piece));
        }

        // 长易位：b、c、d 线为空，c、d 线不被攻击，车在 a 线
        if rights.queenside(side)
            && board.get(Square::new_unchecked(row, 0)) == Some(rook)
            && board.get(Square::new_unchecked(row, 1)).is_none()
            && board.get(Square::new_unchecked(row, 2)).is_none()
            && board.get(Square::new_unchecked(row, 3)).is_none()
            && !Self::square_attacked(board, Square::new_unchecked(row, 2), enemy)
            && !Self::square_attacked(board, Square::new_unchecked(row, 3), enemy)
        {
            moves.push(Move::castle(from, Square::new_unchecked(row, 2), piece));
        }
    }

    /// 尝试添加走法（目标为空或为敌方棋子）
    fn try_add_move(board: &Board, from: Square, to: Square, piece: Piece, moves: &mut Vec<Move>) {
        if let Some(target) = board.get(to) {
            if target.side != piece.side {
                moves.push(Move::with_capture(from, to, piece, target));
            }
        } else {
            moves.push(Move::new(from, to, piece));
        }
    }

    /// 检查指定坐标是否被指定阵营攻击
    ///
    /// 从该格向外做射线和偏移扫描，按第一个阻挡者的种类判定，
    /// 不考虑攻击方自己的王是否因此暴露。
    pub fn square_attacked(board: &Board, sq: Square, by: Side) -> bool {
        // 马的跳跃攻击
        for (dr, dc) in KNIGHT_OFFSETS {
            if let Some(from) = sq.offset(dr, dc) {
                if board.get(from) == Some(Piece::new(PieceType::Knight, by)) {
                    return true;
                }
            }
        }

        // 直线射线：车、后，以及距离 1 的王
        for (dr, dc) in ROOK_DIRECTIONS {
            let mut current = sq;
            let mut distance = 0;
            while let Some(next) = current.offset(dr, dc) {
                distance += 1;
                if let Some(piece) = board.get(next) {
                    if piece.side == by {
                        match piece.piece_type {
                            PieceType::Rook | PieceType::Queen => return true,
                            PieceType::King if distance == 1 => return true,
                            _ => {}
                        }
                    }
                    break;
                }
                current = next;
            }
        }

        // 斜线射线：象、后，距离 1 的王和方向正确的兵
        for (dr, dc) in BISHOP_DIRECTIONS {
            let mut current = sq;
            let mut distance = 0;
            while let Some(next) = current.offset(dr, dc) {
                distance += 1;
                if let Some(piece) = board.get(next) {
                    if piece.side == by {
                        match piece.piece_type {
                            PieceType::Bishop | PieceType::Queen => return true,
                            PieceType::King if distance == 1 => return true,
                            // 兵斜向攻击：兵位于目标格沿其后退方向的斜格
                            PieceType::Pawn
                                if distance == 1 && dr == -by.pawn_direction() =>
                            {
                                return true
                            }
                            _ => {}
                        }
                    }
                    break;
                }
                current = next;
            }
        }

        false
    }
}
