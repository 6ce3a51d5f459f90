//! ジョブコード単位の一括処理
//!
//! 1. 出力フォルダ作成（`<output>/<code>/Department/`）
//! 2. 在庫表の読み込み・正規化・xlsx保存
//! 3. 部門ごとのサムネイル
//! 4. 行ごとのサムネイル（商品名で検索し、商品コードで保存）
//!
//! 1〜2 の失敗はバッチ全体を中断する。3〜4 の失敗は記録して続行する。

use crate::config::Config;
use crate::error::Result;
use crate::export::excel::write_record_set;
use crate::export::processed_data_path;
use crate::loader::RecordLoader;
use crate::search::{HttpImageFetch, ImageSearch, NoSearch, WebImageSearch};
use crate::thumbnail::{ThumbnailPipeline, ThumbnailResult};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// 部門サムネイルのサブフォルダ名
pub const DEPARTMENT_FOLDER: &str = "Department";

/// サムネイルの集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageTally {
    pub real: usize,
    pub placeholder: usize,
    /// 空ラベル・書き込み失敗でスキップした数
    pub failed: usize,
}

impl ImageTally {
    fn record(&mut self, label: &str, result: Result<ThumbnailResult>) {
        match result {
            Ok(r) if r.was_placeholder => self.placeholder += 1,
            Ok(_) => self.real += 1,
            Err(e) => {
                tracing::warn!(label, error = %e, "サムネイルを作成できませんでした（スキップ）");
                self.failed += 1;
            }
        }
    }

    pub fn total(&self) -> usize {
        self.real + self.placeholder + self.failed
    }
}

/// 処理結果
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub code: String,
    /// 正規化後のレコード数
    pub records: usize,
    pub departments: usize,
    pub spreadsheet: PathBuf,
    pub department_images: ImageTally,
    pub item_images: ImageTally,
    pub finished_at: DateTime<Local>,
}

pub struct BatchProcessor {
    output_root: PathBuf,
    loader: RecordLoader,
    pipeline: ThumbnailPipeline,
}

impl BatchProcessor {
    pub fn new(output_root: impl Into<PathBuf>, loader: RecordLoader, pipeline: ThumbnailPipeline) -> Self {
        Self {
            output_root: output_root.into(),
            loader,
            pipeline,
        }
    }

    /// 設定からWeb検索付きの処理系を組み立てる（`offline` なら検索しない）
    pub fn from_config(config: &Config, offline: bool) -> Result<Self> {
        let search: Box<dyn ImageSearch> = if offline {
            Box::new(NoSearch)
        } else {
            Box::new(WebImageSearch::new(&config.user_agent, config.search_timeout())?)
        };
        let fetch = Box::new(HttpImageFetch::new(&config.user_agent)?);
        let pipeline = ThumbnailPipeline::new(search, fetch, config.thumbnail_options());

        Ok(Self::new(
            config.output_root.clone(),
            RecordLoader::with_sheet(config.sheet_index),
            pipeline,
        ))
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// `<output>/<code>/`
    pub fn code_folder(&self, code: &str) -> PathBuf {
        self.output_root.join(code)
    }

    /// `<output>/<code>/Department/`
    pub fn department_folder(&self, code: &str) -> PathBuf {
        self.code_folder(code).join(DEPARTMENT_FOLDER)
    }

    /// 在庫表1ファイルを処理する
    pub fn process(&self, path: &Path, code: &str) -> Result<BatchReport> {
        let _span = tracing::info_span!("batch", code).entered();

        let code_folder = self.code_folder(code);
        let department_folder = self.department_folder(code);
        std::fs::create_dir_all(&department_folder)?;

        let records = self.loader.load(path, code)?;
        let spreadsheet = processed_data_path(&code_folder, code);
        write_record_set(&records, &spreadsheet)?;
        tracing::info!(
            path = %spreadsheet.display(),
            records = records.len(),
            "正規化済みスプレッドシートを保存"
        );

        let departments = records.departments();
        let mut department_images = ImageTally::default();
        for department in &departments {
            let result = self.pipeline.ensure_thumbnail(department, &department_folder);
            department_images.record(department, result);
        }

        let mut item_images = ImageTally::default();
        for record in &records.records {
            let result = self.pipeline.ensure_thumbnail_with_query(
                &record.item_name,
                &record.item_code,
                &code_folder,
            );
            item_images.record(&record.item_code, result);
        }

        let report = BatchReport {
            code: code.to_string(),
            records: records.len(),
            departments: departments.len(),
            spreadsheet,
            department_images,
            item_images,
            finished_at: Local::now(),
        };

        tracing::info!(
            records = report.records,
            departments = report.departments,
            real = report.department_images.real + report.item_images.real,
            placeholder = report.department_images.placeholder + report.item_images.placeholder,
            failed = report.department_images.failed + report.item_images.failed,
            "バッチ処理完了"
        );

        Ok(report)
    }
}
