//! 调研进度

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// 进度快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
}

impl ProgressState {
    /// 进度比例 [0, 1]，总数为 0 时视为完成
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

/// 进度计数器
///
/// 每个供应商完成（成功或兜底）时调用一次 [`ProgressTracker::complete_one`]。
/// 计数与发送在同一把锁内，订阅方收到的 completed 单调不减。
#[derive(Debug)]
pub struct ProgressTracker {
    completed: Mutex<usize>,
    total: usize,
    sink: Option<mpsc::UnboundedSender<ProgressState>>,
}

impl ProgressTracker {
    pub fn new(total: usize, sink: Option<mpsc::UnboundedSender<ProgressState>>) -> Self {
        Self {
            completed: Mutex::new(0),
            total,
            sink,
        }
    }

    /// 创建计数器和对应的订阅端
    pub fn channel(total: usize) -> (Self, mpsc::UnboundedReceiver<ProgressState>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(total, Some(tx)), rx)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// 发送初始进度 (0, total)
    pub async fn start(&self) {
        let completed = self.completed.lock().await;
        self.emit(ProgressState {
            completed: *completed,
            total: self.total,
        });
    }

    /// 记录一个完成项，返回最新进度
    pub async fn complete_one(&self) -> ProgressState {
        let mut completed = self.completed.lock().await;
        if *completed < self.total {
            *completed += 1;
        }
        let state = ProgressState {
            completed: *completed,
            total: self.total,
        };
        self.emit(state);
        state
    }

    pub async fn snapshot(&self) -> ProgressState {
        ProgressState {
            completed: *self.completed.lock().await,
            total: self.total,
        }
    }

    fn emit(&self, state: ProgressState) {
        if let Some(sink) = &self.sink {
            // 订阅端已关闭时忽略
            if sink.send(state).is_err() {
                debug!("进度订阅端已关闭");
            }
        }
    }
}
