use crate::config::Config;
use crate::thumbnail::ThumbnailFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "item-thumb")]
#[command(about = "在庫表ウォッチャー・商品サムネイル生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 監視フォルダをポーリングして在庫表を処理
    Watch {
        #[command(flatten)]
        run: RunOptions,

        /// ポーリング間隔（秒）
        #[arg(short, long)]
        interval: Option<u64>,

        /// 最大サイクル数（省略時は無限）
        #[arg(long)]
        max_cycles: Option<usize>,
    },

    /// 監視フォルダを1回だけ処理
    Once {
        #[command(flatten)]
        run: RunOptions,
    },

    /// 指定した在庫表を処理（元ファイルは削除しない）
    Process {
        /// 在庫表ファイル
        #[arg(required = true)]
        file: PathBuf,

        /// ジョブコード（省略時はファイル名から抽出）
        #[arg(short, long)]
        code: Option<String>,

        #[command(flatten)]
        run: RunOptions,
    },

    /// 商品名の正規化結果を表示
    Normalize {
        /// 商品名
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 監視フォルダを設定
        #[arg(long)]
        set_watch_dir: Option<PathBuf>,

        /// 出力ルートを設定
        #[arg(long)]
        set_output_root: Option<PathBuf>,

        /// サイズ上限（KB）を設定
        #[arg(long)]
        set_budget_kb: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 処理系サブコマンド共通のオプション（設定ファイルの値を上書き）
#[derive(Args, Clone, Debug, Default)]
pub struct RunOptions {
    /// 監視フォルダ
    #[arg(short, long)]
    pub watch_dir: Option<PathBuf>,

    /// 出力ルート
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 実画像サムネイルのサイズ上限（KB）
    #[arg(short, long)]
    pub budget_kb: Option<u64>,

    /// 画像形式 (webp/jpeg)
    #[arg(short, long)]
    pub format: Option<ThumbnailFormat>,

    /// 画像検索を行わずプレースホルダのみ作成
    #[arg(long)]
    pub offline: bool,
}

impl RunOptions {
    /// 設定にオプションを上書きした設定を返す
    pub fn apply(&self, config: &Config) -> Config {
        let mut merged = config.clone();
        if let Some(dir) = &self.watch_dir {
            merged.watch_dir = dir.clone();
        }
        if let Some(output) = &self.output {
            merged.output_root = output.clone();
        }
        if let Some(budget) = self.budget_kb {
            merged.size_budget_kb = budget;
        }
        if let Some(format) = self.format {
            merged.thumbnail_format = format;
        }
        merged
    }
}
