use anyhow::Context;
use clap::Parser;
use split_bill::core::{ConfigProvider, Storage};
use split_bill::utils::error::BillError;
use split_bill::utils::{logger, validation::Validate};
use split_bill::{collect_sources, BatchReport, BillEngine, BillPipeline, CliConfig, LocalStorage};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 設定檔要先讀，日誌等級可能由它決定
    let file_config = match config.load_config_file() {
        Ok(file_config) => file_config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    };
    let level_override = file_config.as_ref().and_then(|f| f.log_level());
    if let Some(file_config) = &file_config {
        config.merge_file(file_config);
    }

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose, level_override);
    } else {
        logger::init_cli_logger(config.verbose, level_override);
    }

    tracing::info!("Starting split-bill");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let storage = LocalStorage::default();
    let batch_mode = storage.is_directory(&config.input).await;
    let sources = match collect_sources(&storage, &config.input).await {
        Ok(sources) => sources,
        Err(e) => fail(&e),
    };

    let concurrency = config.concurrency();
    let pipeline = BillPipeline::new(storage, config);
    let engine = BillEngine::with_concurrency(pipeline, concurrency);

    if !batch_mode {
        match engine.run(&sources[0]).await {
            Ok(target) => {
                tracing::info!("✅ Bill split successfully");
                if !engine.pipeline().config().print_to_stdout() {
                    println!("✅ Result saved to: {}", target);
                }
            }
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    let report = engine.run_batch(sources).await;
    print_summary(&report).context("failed to print batch summary")?;

    if let Some(severity) = report.worst_severity() {
        let exit_code = severity.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn fail(e: &BillError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ split-bill failed: {} (Kind: {}, Category: {:?}, Severity: {:?})",
        e,
        e.kind(),
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.severity().exit_code());
}

fn print_summary(report: &BatchReport) -> std::io::Result<()> {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();

    writeln!(
        out,
        "📋 {} bills: {} succeeded, {} failed",
        report.outcomes.len(),
        report.succeeded(),
        report.failed()
    )?;
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(target) => writeln!(out, "  ✅ {} -> {}", outcome.source, target)?,
            Err(e) => writeln!(
                out,
                "  ❌ {} [{}]: {}",
                outcome.source,
                e.kind(),
                e.user_friendly_message()
            )?,
        }
    }
    out.flush()
}
