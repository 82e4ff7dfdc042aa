use crate::core::bill_reader::parse_bill_bytes;
use crate::core::formatter::render;
use crate::core::{BillInput, BillOutput, ConfigProvider, Pipeline, Storage};
use crate::domain::services::allocate;
use crate::utils::error::Result;
use std::path::Path;

pub const STDOUT_TARGET: &str = "<stdout>";

pub struct BillPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BillPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// `dinner.json` -> `<output_path>/dinner.result.json`
    pub fn output_file_for(&self, source: &str) -> String {
        let stem = Path::new(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("bill");
        let file_name = format!(
            "{}.result.{}",
            stem,
            self.config.output_format().extension()
        );
        Path::new(self.config.output_path())
            .join(file_name)
            .display()
            .to_string()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BillPipeline<S, C> {
    async fn extract(&self, source: &str) -> Result<BillInput> {
        tracing::debug!("Reading bill from: {}", source);
        let data = self.storage.read_file(source).await?;
        tracing::debug!("Read {} bytes from {}", data.len(), source);

        parse_bill_bytes(&data)
    }

    async fn transform(&self, input: BillInput) -> Result<BillOutput> {
        Ok(allocate(&input))
    }

    async fn load(&self, source: &str, output: BillOutput) -> Result<String> {
        let rendered = render(&output, self.config.output_format())?;

        if self.config.print_to_stdout() {
            // 一次寫出整份結果，批次模式下各帳單不會互相穿插
            println!("{}", rendered.trim_end());
            return Ok(STDOUT_TARGET.to_string());
        }

        let output_file = self.output_file_for(source);
        tracing::debug!(
            "Writing {} bytes ({:?}) to {}",
            rendered.len(),
            self.config.output_format(),
            output_file
        );
        self.storage
            .write_file(&output_file, rendered.as_bytes())
            .await?;

        Ok(output_file)
    }
}
