/// 將 `YYYY-MM-DD` 轉成 `2024年3月21日` 的日文格式 (月、日不補零)。
///
/// 這裡不檢查日期是否存在，格式驗證由 `core::bill_reader` 負責；
/// 無法解析的片段會原樣保留。
pub fn format_date(iso_date: &str) -> String {
    let mut parts = iso_date.trim().splitn(3, '-').map(strip_leading_zeros);

    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day)) => format!("{}年{}月{}日", year, month, day),
        _ => iso_date.to_string(),
    }
}

fn strip_leading_zeros(part: &str) -> String {
    part.parse::<u32>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| part.to_string())
}
