//! UCI 引擎集成模块
//!
//! 通过子进程运行 Stockfish 等支持 UCI 协议的引擎，作为最高难度的后端。

mod client;
mod engine;

pub use client::{UciClient, UciConfig};
pub use engine::UciEngine;
