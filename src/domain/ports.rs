use crate::domain::model::{BillInput, BillOutput};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 列出目錄下 (不含子目錄) 指定副檔名的檔案，依路徑排序
    fn list_files(
        &self,
        dir: &str,
        extension: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    fn is_directory(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
    Csv,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["json", "text", "csv"];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "text" => Some(OutputFormat::Text),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn concurrency(&self) -> usize;
    fn print_to_stdout(&self) -> bool;
}

/// 一張帳單的處理流程：讀取並驗證 → 分攤 → 輸出
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, source: &str) -> Result<BillInput>;
    async fn transform(&self, input: BillInput) -> Result<BillOutput>;
    async fn load(&self, source: &str, output: BillOutput) -> Result<String>;
}
