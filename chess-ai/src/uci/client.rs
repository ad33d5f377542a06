//! UCI 协议客户端
//!
//! 启动引擎子进程，通过标准输入输出交换 UCI 命令。
//! 引擎输出由独立线程读取，主线程带超时等待。

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// UCI 引擎配置
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UciConfig {
    /// 引擎可执行文件路径
    pub engine_path: String,
    /// 请求的搜索深度
    pub depth: u8,
    /// 等待引擎响应的超时（秒）
    pub timeout_secs: u64,
}

impl Default for UciConfig {
    fn default() -> Self {
        Self {
            engine_path: "stockfish".to_string(),
            depth: 15,
            timeout_secs: 10,
        }
    }
}

/// UCI 客户端
pub struct UciClient {
    config: UciConfig,
    process: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
}

impl UciClient {
    /// 启动引擎子进程并完成 UCI 握手
    pub fn new(config: UciConfig) -> Result<Self> {
        let mut process = Command::new(&config.engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start UCI engine: {}", config.engine_path))?;

        let stdin = process
            .stdin
            .take()
            .context("Failed to open engine stdin")?;
        let stdout = process
            .stdout
            .take()
            .context("Failed to open engine stdout")?;

        // 读取线程在引擎关闭输出或客户端销毁后自行退出
        let (sender, lines) = mpsc::channel();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let Ok(line) = line else {
                    break;
                };
                if sender.send(line).is_err() {
                    break;
                }
            }
        });

        let mut client = Self {
            config,
            process,
            stdin,
            lines,
        };
        client.handshake()?;
        Ok(client)
    }

    /// 使用默认配置启动
    pub fn with_defaults() -> Result<Self> {
        Self::new(UciConfig::default())
    }

    /// UCI 握手：`uci` 等待 `uciok`，`isready` 等待 `readyok`
    fn handshake(&mut self) -> Result<()> {
        self.send("uci")?;
        self.read_until("uciok")?;
        self.send("isready")?;
        self.read_until("readyok")?;
        info!("UCI engine ready: {}", self.config.engine_path);
        Ok(())
    }

    /// 请求指定局面的最佳走法，返回坐标记谱（如 `e2e4`）
    pub fn best_move_for_fen(&mut self, fen: &str) -> Result<String> {
        self.send(&format!("position fen {}", fen))?;
        self.send(&format!("go depth {}", self.config.depth))?;
        let line = self.read_until("bestmove")?;
        Self::parse_bestmove_line(&line)
            .with_context(|| format!("Engine returned no usable move: {}", line))
    }

    /// 获取当前配置
    pub fn config(&self) -> &UciConfig {
        &self.config
    }

    fn send(&mut self, command: &str) -> Result<()> {
        debug!("uci -> {}", command);
        writeln!(self.stdin, "{}", command).context("Failed to write to engine stdin")?;
        self.stdin.flush().context("Failed to flush engine stdin")?;
        Ok(())
    }

    /// 逐行读取引擎输出，直到出现以指定前缀开头的行
    fn read_until(&mut self, prefix: &str) -> Result<String> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        loop {
            let line = match self.lines.recv_timeout(timeout) {
                Ok(line) => line,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    bail!("UCI engine did not answer within {:?}", timeout)
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    bail!("UCI engine closed its output stream")
                }
            };
            let line = line.trim();
            debug!("uci <- {}", line);
            if line.starts_with(prefix) {
                return Ok(line.to_string());
            }
        }
    }

    /// 从 `bestmove e2e4 ponder e7e5` 形式的行中取出走法记谱
    pub fn parse_bestmove_line(line: &str) -> Option<String> {
        let mut parts = line.split_whitespace();
        if parts.next()? != "bestmove" {
            return None;
        }
        let notation = parts.next()?;
        if notation == "(none)" {
            return None;
        }
        Some(notation.to_string())
    }
}

impl Drop for UciClient {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
