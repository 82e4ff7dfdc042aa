use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "split_bill=info";
const VERBOSE_DIRECTIVE: &str = "split_bill=debug,info";

/// 決定過濾規則：RUST_LOG 優先，其次是 --verbose，再來是設定檔的 level，最後才是預設值
fn filter_directive(verbose: bool, level_override: Option<&str>) -> String {
    if verbose {
        return VERBOSE_DIRECTIVE.to_string();
    }
    match level_override {
        Some(level) => format!("split_bill={}", level),
        None => DEFAULT_DIRECTIVE.to_string(),
    }
}

fn build_filter(verbose: bool, level_override: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, level_override)))
}

pub fn init_cli_logger(verbose: bool, level_override: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level_override))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, level_override: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level_override))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .json(), // 給日誌收集系統用的結構化輸出
        )
        .init();
}
