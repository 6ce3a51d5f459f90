//! 監視フォルダのポーリング
//!
//! `process_once` が1サイクル分（最新ファイルの検出 → 一括処理 → 元ファイル削除）を行い、
//! `run` が `Ticker` に従ってそれを繰り返す。テストでは待機しない Ticker を渡す。

use crate::batch::{BatchProcessor, BatchReport};
use crate::error::{ItemThumbError, Result};
use crate::scanner::{newest_eligible, scan_watch_dir};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 1サイクルの結果
#[derive(Debug)]
pub enum Outcome {
    /// 処理対象なし
    Idle,
    /// 処理完了（元ファイルは削除済み。削除に失敗した場合は次回再処理される）
    Processed {
        source: PathBuf,
        report: BatchReport,
        source_removed: bool,
    },
    /// 処理失敗（元ファイルは残し、次回ポーリングで再試行）
    Failed {
        source: PathBuf,
        code: String,
        error: ItemThumbError,
    },
}

/// サイクル間の待機
pub trait Ticker {
    /// 次のサイクルまで待つ。`false` で終了
    fn tick(&mut self) -> bool;
}

/// 一定間隔で待機する（最大サイクル数を指定可能）
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    interval: Duration,
    remaining: Option<usize>,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            remaining: None,
        }
    }

    pub fn with_max_cycles(mut self, cycles: usize) -> Self {
        self.remaining = Some(cycles.max(1));
        self
    }
}

impl Ticker for IntervalTicker {
    fn tick(&mut self) -> bool {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                return false;
            }
        }
        std::thread::sleep(self.interval);
        true
    }
}

/// 実行結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub processed: usize,
    pub failed: usize,
    pub idle: usize,
}

pub struct Watcher {
    watch_dir: PathBuf,
    processor: BatchProcessor,
}

impl Watcher {
    pub fn new(watch_dir: impl Into<PathBuf>, processor: BatchProcessor) -> Self {
        Self {
            watch_dir: watch_dir.into(),
            processor,
        }
    }

    pub fn watch_dir(&self) -> &Path {
        &self.watch_dir
    }

    /// 最新の対象ファイルを1件処理する
    ///
    /// 監視フォルダが読めない場合のみ `Err`。バッチの失敗は `Outcome::Failed`。
    pub fn process_once(&self) -> Result<Outcome> {
        let files = scan_watch_dir(&self.watch_dir)?;

        let Some((source, code)) = newest_eligible(&files) else {
            return Ok(Outcome::Idle);
        };

        tracing::info!(file = %source.file_name, code, "処理開始");

        match self.processor.process(&source.path, code) {
            Ok(report) => {
                let source_removed = match std::fs::remove_file(&source.path) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(file = %source.file_name, error = %e, "元ファイルを削除できません");
                        false
                    }
                };
                Ok(Outcome::Processed {
                    source: source.path.clone(),
                    report,
                    source_removed,
                })
            }
            Err(error) => {
                tracing::error!(file = %source.file_name, code, error = %error, "処理失敗（次回再試行）");
                Ok(Outcome::Failed {
                    source: source.path.clone(),
                    code: code.to_string(),
                    error,
                })
            }
        }
    }

    /// Ticker が終了を返すまでポーリングを繰り返す
    pub fn run<T: Ticker>(&self, ticker: &mut T) -> RunSummary {
        let mut summary = RunSummary::default();

        loop {
            summary.cycles += 1;

            match self.process_once() {
                Ok(Outcome::Idle) => summary.idle += 1,
                Ok(Outcome::Processed { .. }) => summary.processed += 1,
                Ok(Outcome::Failed { .. }) => summary.failed += 1,
                Err(e) => {
                    tracing::error!(dir = %self.watch_dir.display(), error = %e, "監視フォルダを読めません");
                    summary.failed += 1;
                }
            }

            if !ticker.tick() {
                break;
            }
        }

        summary
    }
}
