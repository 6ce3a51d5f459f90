use thiserror::Error;

#[derive(Error, Debug)]
pub enum ItemThumbError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("ジョブコードを抽出できません: {0}")]
    InvalidJobCode(String),

    #[error("ワークブック読み込みエラー: {0}")]
    Workbook(String),

    #[error("ラベルが空のためサムネイルを作成できません")]
    InvalidLabel,

    #[error("画像デコードエラー: {0}")]
    ImageDecode(String),

    #[error("画像エンコードエラー: {0}")]
    ImageEncode(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("ネットワークエラー: {0}")]
    Network(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] item_thumb_common::Error),
}

impl ItemThumbError {
    /// 必須列の欠落（ソースを残して次回ポーリングで再試行）
    pub fn is_schema(&self) -> bool {
        matches!(self, ItemThumbError::Common(item_thumb_common::Error::Schema { .. }))
    }
}

pub type Result<T> = std::result::Result<T, ItemThumbError>;
