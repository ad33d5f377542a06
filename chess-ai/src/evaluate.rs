//! 棋局评估函数
//!
//! 评估维度：子力、位置分值表、王的安全、机动性和中心控制。
//! 正值对白方有利，负值对黑方有利。

use chess_core::{Board, GameState, Piece, PieceType, Side, Square};

/// 将死分值
pub const CHECKMATE_SCORE: i32 = 9999;

/// 逼和分值
pub const STALEMATE_SCORE: i32 = 0;

/// 评估器
pub struct Evaluator;

/// 棋子位置分值表（白方视角，兵需要为黑方镜像）
/// 索引为 row * 8 + col
mod position_tables {
    /// 马的位置分值
    pub const KNIGHT: [i32; 64] = [
        1, 1, 1, 1, 1, 1, 1, 1,
        1, 2, 2, 2, 2, 2, 2, 1,
        1, 2, 3, 3, 3, 3, 2, 1,
        1, 2, 3, 4, 4, 3, 2, 1,
        1, 2, 3, 4, 4, 3, 2, 1,
        1, 2, 3, 3, 3, 3, 2, 1,
        1, 2, 2, 2, 2, 2, 2, 1,
        1, 1, 1, 1, 1, 1, 1, 1,
    ];

    /// 象的位置分值
    pub const BISHOP: [i32; 64] = [
        4, 3, 2, 1, 1, 2, 3, 4,
        3, 4, 3, 2, 2, 3, 4, 3,
        2, 3, 4, 3, 3, 4, 3, 2,
        1, 2, 3, 4, 4, 3, 2, 1,
        1, 2, 3, 4, 4, 3, 2, 1,
        2, 3, 4, 3, 3, 4, 3, 2,
        3, 4, 3, 2, 2, 3, 4, 3,
        4, 3, 2, 1, 1, 2, 3, 4,
    ];

    /// 车的位置分值
    pub const ROOK: [i32; 64] = [
        4, 3, 4, 4, 4, 4, 3, 4,
        4, 4, 4, 4, 4, 4, 4, 4,
        1, 1, 2, 3, 3, 2, 1, 1,
        1, 2, 3, 4, 4, 3, 2, 1,
        1, 2, 3, 4, 4, 3, 2, 1,
        1, 1, 2, 3, 3, 2, 1, 1,
        4, 4, 4, 4, 4, 4, 4, 4,
        4, 3, 4, 4, 4, 4, 3, 4,
    ];

    /// 后的位置分值
    pub const QUEEN: [i32; 64] = [
        1, 1, 1, 3, 1, 1, 1, 1,
        1, 2, 3, 3, 3, 1, 1, 1,
        1, 4, 3, 3, 3, 4, 2, 1,
        1, 2, 3, 3, 3, 2, 2, 1,
        1, 2, 3, 3, 3, 2, 2, 1,
        1, 4, 3, 3, 3, 4, 2, 1,
        1, 2, 3, 3, 3, 1, 1, 1,
        1, 1, 1, 3, 1, 1, 1, 1,
    ];

    /// 兵的位置分值（白方视角，越接近升变排分值越高）
    pub const PAWN: [i32; 64] = [
        8, 8, 8, 8, 8, 8, 8, 8,
        8, 8, 8, 8, 8, 8, 8, 8,
        5, 6, 6, 7, 7, 6, 6, 5,
        2, 3, 3, 5, 5, 3, 3, 2,
        1, 2, 3, 4, 4, 3, 2, 1,
        1, 1, 2, 3, 3, 2, 1, 1,
        1, 1, 1, 0, 0, 1, 1, 1,
        0, 0, 0, 0, 0, 0, 0, 0,
    ];
}

/// 兵盾权重
const PAWN_SHIELD_WEIGHT: i32 = 5;

/// 受攻击线路权重
const RAY_ATTACK_WEIGHT: i32 = 2;

/// 王身边八个方向
const RAY_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

impl Evaluator {
    /// 评估棋局（白方视角，正值对白方有利）
    ///
    /// 会先刷新走子方的合法着法，既得到机动性计数也更新终局标志。
    pub fn evaluate(state: &mut GameState) -> i32 {
        let move_count = state.legal_moves().len() as i32;

        if state.checkmate() {
            // 走子方被将死
            return match state.side_to_move() {
                Side::White => -CHECKMATE_SCORE,
                Side::Black => CHECKMATE_SCORE,
            };
        }
        if state.stalemate() {
            return STALEMATE_SCORE;
        }

        let mut score = 0;

        for (square, piece) in state.board().all_pieces() {
            let piece_score = Self::evaluate_piece(square, piece);
            match piece.side {
                Side::White => score += piece_score,
                Side::Black => score -= piece_score,
            }
        }

        score += Self::king_safety(state, Side::White) - Self::king_safety(state, Side::Black);
        score += match state.side_to_move() {
            Side::White => move_count,
            Side::Black => -move_count,
        };
        score += Self::center_control(state.board());

        score
    }

    /// 评估单个棋子的价值（包括位置分）
    fn evaluate_piece(square: Square, piece: Piece) -> i32 {
        piece.value() + Self::position_bonus(square, piece)
    }

    /// 获取位置加成分
    fn position_bonus(square: Square, piece: Piece) -> i32 {
        let index = square.to_index();

        match piece.piece_type {
            PieceType::Knight => position_tables::KNIGHT[index],
            PieceType::Bishop => position_tables::BISHOP[index],
            PieceType::Rook => position_tables::ROOK[index],
            PieceType::Queen => position_tables::QUEEN[index],
            PieceType::Pawn => {
                // 黑方兵需要镜像（row 翻转）
                let index = match piece.side {
                    Side::White => index,
                    Side::Black => (7 - square.row as usize) * 8 + square.col as usize,
                };
                position_tables::PAWN[index]
            }
            // 王不加位置分
            PieceType::King => 0,
        }
    }

    /// 评估一方王的安全度
    ///
    /// 兵盾每个兵加 5 分，指向王的受攻击线路每条减 2 分。
    fn king_safety(state: &GameState, side: Side) -> i32 {
        let king = state.king_square(side);
        let shield = Self::pawn_shield(state.board(), king, side);
        let attacks = Self::ray_attackers(state.board(), king, side);
        shield * PAWN_SHIELD_WEIGHT - attacks * RAY_ATTACK_WEIGHT
    }

    /// 统计王前方三格的己方兵数
    fn pawn_shield(board: &Board, king: Square, side: Side) -> i32 {
        let mut count = 0;
        for dc in -1..=1 {
            if let Some(square) = king.offset(side.pawn_direction(), dc) {
                if let Some(piece) = board.get(square) {
                    if piece.piece_type == PieceType::Pawn && piece.side == side {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// 统计八个方向上第一个可见棋子为敌方的线路数
    fn ray_attackers(board: &Board, king: Square, side: Side) -> i32 {
        let mut count = 0;
        for (dr, dc) in RAY_DIRECTIONS {
            for step in 1..8 {
                let Some(square) = king.offset(dr * step, dc * step) else {
                    break;
                };
                if let Some(piece) = board.get(square) {
                    if piece.side != side {
                        count += 1;
                    }
                    break;
                }
            }
        }
        count
    }

    /// 统计中心四格（d4、e4、d5、e5）的占领情况
    fn center_control(board: &Board) -> i32 {
        let mut score = 0;
        for row in 3..=4 {
            for col in 3..=4 {
                if let Some(piece) = board.get(Square::new_unchecked(row, col)) {
                    match piece.side {
                        Side::White => score += 1,
                        Side::Black => score -= 1,
                    }
                }
            }
        }
        score
    }

    /// 快速评估（仅计算子力差）
    pub fn evaluate_material(board: &Board) -> i32 {
        let mut score = 0;
        for (_, piece) in board.all_pieces() {
            match piece.side {
                Side::White => score += piece.value(),
                Side::Black => score -= piece.value(),
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Fen;

    #[test]
    fn test_initial_evaluation() {
        let mut state = GameState::new();
        // 初始局面子力、位置分和王的安全都对称，只剩白方 20 步机动性
        assert_eq!(Evaluator::evaluate(&mut state), 20);
    }

    #[test]
    fn test_material_evaluation() {
        let board = Board::initial();
        assert_eq!(Evaluator::evaluate_material(&board), 0);
    }

    #[test]
    fn test_piece_values() {
        assert_eq!(PieceType::King.value(), 0);
        assert_eq!(PieceType::Queen.value(), 10);
        assert_eq!(PieceType::Rook.value(), 5);
        assert_eq!(PieceType::Bishop.value(), 3);
        assert_eq!(PieceType::Knight.value(), 3);
        assert_eq!(PieceType::Pawn.value(), 1);
    }

    #[test]
    fn test_material_advantage() {
        // 白方缺一个车
        let state = Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/1NBQKBNR w Kkq - 0 1").unwrap();
        assert_eq!(Evaluator::evaluate_material(state.board()), -5);

        // 黑方缺后
        let state = Fen::parse("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(Evaluator::evaluate_material(state.board()), 10);
    }

    #[test]
    fn test_checkmate_score() {
        // 愚人杀，白方被将死
        let mut state =
            Fen::parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 3").unwrap();
        assert_eq!(Evaluator::evaluate(&mut state), -CHECKMATE_SCORE);

        // 底线杀，黑方被将死
        let mut state = Fen::parse("4R1k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(Evaluator::evaluate(&mut state), CHECKMATE_SCORE);
    }

    #[test]
    fn test_stalemate_score() {
        let mut state = Fen::parse("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(Evaluator::evaluate(&mut state), STALEMATE_SCORE);
    }

    #[test]
    fn test_pawn_shield() {
        // 王前有完整兵盾
        let mut shielded = Fen::parse("4k3/8/8/8/8/8/3PPP2/4K3 w - - 0 1").unwrap();
        // 兵盾推进远离王
        let mut exposed = Fen::parse("4k3/8/8/8/3PPP2/8/8/4K3 w - - 0 1").unwrap();

        let shielded_score = Evaluator::evaluate(&mut shielded);
        let exposed_score = Evaluator::evaluate(&mut exposed);
        assert!(
            shielded_score > exposed_score,
            "兵盾完整应该更安全: {} vs {}",
            shielded_score,
            exposed_score
        );
    }

    #[test]
    fn test_center_control() {
        // 兵在中心 e4
        let mut center = Fen::parse("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1").unwrap();
        // 兵在 e3
        let mut off_center = Fen::parse("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1").unwrap();

        let center_score = Evaluator::evaluate(&mut center);
        let off_center_score = Evaluator::evaluate(&mut off_center);
        assert!(
            center_score > off_center_score,
            "占领中心应该分数更高: {} vs {}",
            center_score,
            off_center_score
        );
    }

    #[test]
    fn test_pawn_table_mirror() {
        // 完全镜像的局面，换边评估应该得到相反分数
        let mut white_to_move = Fen::parse("4k3/8/4p3/8/8/4P3/8/4K3 w - - 0 1").unwrap();
        let mut black_to_move = Fen::parse("4k3/8/4p3/8/8/4P3/8/4K3 b - - 0 1").unwrap();

        let white_score = Evaluator::evaluate(&mut white_to_move);
        let black_score = Evaluator::evaluate(&mut black_to_move);
        assert_eq!(white_score, -black_score);
    }

    #[test]
    fn test_position_bonus_knight() {
        // 中心的马比边角的马价值高
        let mut center = Fen::parse("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").unwrap();
        let mut corner = Fen::parse("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();

        let center_score = Evaluator::evaluate(&mut center);
        let corner_score = Evaluator::evaluate(&mut corner);
        assert!(
            center_score > corner_score,
            "中心马应该比边角马价值高: {} vs {}",
            center_score,
            corner_score
        );
    }
}
