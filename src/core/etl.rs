use crate::core::{Pipeline, Storage};
use crate::utils::error::{BillError, ErrorSeverity, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub const BILL_EXTENSION: &str = "json";

pub struct BillEngine<P: Pipeline> {
    pipeline: Arc<P>,
    concurrency: usize,
}

/// 批次中單一帳單的處理結果
#[derive(Debug)]
pub struct FileOutcome {
    pub source: String,
    pub result: Result<String>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &BillError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.source.as_str(), e)))
    }

    /// 最嚴重的失敗；全部成功時為 None
    pub fn worst_severity(&self) -> Option<ErrorSeverity> {
        self.failures().map(|(_, e)| e.severity()).max()
    }
}

impl<P: Pipeline + 'static> BillEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::with_concurrency(pipeline, 1)
    }

    pub fn with_concurrency(pipeline: P, concurrency: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            concurrency: concurrency.max(1),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self, source: &str) -> Result<String> {
        process_one(&*self.pipeline, source).await
    }

    /// 並行處理多張帳單，同時最多 `concurrency` 張；結果保持輸入順序
    pub async fn run_batch(&self, sources: Vec<String>) -> BatchReport {
        tracing::info!(
            "Processing {} bills with concurrency {}",
            sources.len(),
            self.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(sources.len());

        for source in sources {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&semaphore);
            let task_source = source.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| BillError::IoError(std::io::Error::other(e)))?;
                process_one(&*pipeline, &task_source).await
            });
            handles.push((source, handle));
        }

        let mut report = BatchReport::default();
        for (source, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(BillError::IoError(std::io::Error::other(format!(
                    "bill task aborted: {}",
                    join_error
                )))),
            };

            if let Err(e) = &result {
                tracing::warn!(
                    "❌ {} failed: {} (kind: {}, severity: {:?})",
                    source,
                    e,
                    e.kind(),
                    e.severity()
                );
            }
            report.outcomes.push(FileOutcome { source, result });
        }

        tracing::info!(
            "Batch finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }
}

async fn process_one<P: Pipeline>(pipeline: &P, source: &str) -> Result<String> {
    tracing::info!("Splitting bill: {}", source);

    let input = pipeline.extract(source).await?;
    tracing::debug!("Validated {} items from {}", input.items.len(), source);

    let output = pipeline.transform(input).await?;
    tracing::debug!(
        "Allocated {} across {} participants",
        output.total_amount,
        output.items.len()
    );

    let target = pipeline.load(source, output).await?;
    tracing::info!("Result for {} saved to: {}", source, target);

    Ok(target)
}

/// 單一檔案直接回傳；目錄則列出其中的 `.json` 帳單
pub async fn collect_sources<S: Storage>(storage: &S, input: &str) -> Result<Vec<String>> {
    if !storage.is_directory(input).await {
        return Ok(vec![input.to_string()]);
    }

    let files = storage.list_files(input, BILL_EXTENSION).await?;
    if files.is_empty() {
        return Err(BillError::NoInputFilesError {
            path: input.to_string(),
        });
    }

    tracing::debug!("Found {} bill files in {}", files.len(), input);
    Ok(files)
}
