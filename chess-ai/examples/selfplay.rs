//! AI 自对弈演示
//!
//! 运行方式:
//! ```bash
//! cargo run -p chess-ai --example selfplay
//! ```

use std::time::Instant;

use chess_ai::{AiConfig, AiEngine, Difficulty, CHECKMATE_SCORE};
use chess_core::{Fen, GameState, Side};

/// 演示对局的最大回合数
const MAX_PLIES: usize = 80;

fn main() {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== AI 自对弈演示 ===\n");

    // 1. Medium (Alpha-Beta) 对 Easy (Minimax)
    println!("1. Medium 执白 对 Easy 执黑...");
    let mut state = GameState::new();
    let mut white = AiEngine::from_difficulty(Difficulty::Medium);
    let mut black = AiEngine::from_difficulty(Difficulty::Easy);

    let start = Instant::now();
    for ply in 0..MAX_PLIES {
        let engine = match state.side_to_move() {
            Side::White => &mut white,
            Side::Black => &mut black,
        };
        let Some(mv) = engine.search(&mut state) else {
            break;
        };
        if ply % 2 == 0 {
            print!("   {}. {}", ply / 2 + 1, mv);
        } else {
            println!("  {}", mv);
        }
        state.make_move(mv);
    }
    println!("\n   用时: {:?}", start.elapsed());

    state.legal_moves();
    if state.checkmate() {
        println!("   将死，{:?} 获胜\n", state.side_to_move().opponent());
    } else if state.stalemate() {
        println!("   逼和\n");
    } else {
        println!("   达到演示回合上限\n");
    }
    println!("   终局 FEN: {}\n", Fen::to_string(&state));

    // 2. 同一局面下的剪枝效果对比
    println!("2. NegaMax 与 Alpha-Beta 的节点数对比...");
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 3";
    println!("   局面: {}", fen);

    let mut state = Fen::parse(fen).expect("demo FEN should be valid");
    let moves = state.legal_moves();
    let mut engine = AiEngine::with_seed(AiConfig::default(), 1);
    let start = Instant::now();
    let nega_move = engine.find_negamax_move(&mut state, moves.clone());
    println!(
        "   NegaMax:    {} 节点, 用时 {:?}, 选着 {:?}",
        engine.nodes_searched(),
        start.elapsed(),
        nega_move.map(|m| m.to_string())
    );

    let mut engine = AiEngine::with_seed(AiConfig::default(), 1);
    let start = Instant::now();
    let ab_move = engine.find_alpha_beta_move(&mut state, moves);
    println!(
        "   Alpha-Beta: {} 节点, 用时 {:?}, 选着 {:?}",
        engine.nodes_searched(),
        start.elapsed(),
        ab_move.map(|m| m.to_string())
    );
    println!("   分值窗口: [-{}, {}]", CHECKMATE_SCORE, CHECKMATE_SCORE);

    println!("\n=== 演示完成 ===");
}
