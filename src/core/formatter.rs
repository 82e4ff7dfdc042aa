use crate::domain::model::BillOutput;
use crate::domain::ports::OutputFormat;
use crate::utils::error::{BillError, Result};

const REPORT_WIDTH: usize = 30;

pub fn render(output: &BillOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(output),
        OutputFormat::Text => Ok(render_text(output)),
        OutputFormat::Csv => render_csv(output),
    }
}

pub fn render_json(output: &BillOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// 固定版面的文字報表
pub fn render_text(output: &BillOutput) -> String {
    let heavy = "=".repeat(REPORT_WIDTH);
    let light = "-".repeat(REPORT_WIDTH);

    let mut lines = vec![
        heavy.clone(),
        format!("日付: {}", output.date),
        format!("場所: {}", output.location),
        light.clone(),
        format!("小計: {:.2}", output.sub_total),
        format!("チップ: {:.1}", output.tip),
        format!("合計: {:.2}", output.total_amount),
        light,
    ];

    for person in &output.items {
        lines.push(format!("{}: {:.1}", person.name, person.amount));
    }
    lines.push(heavy);

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

pub fn render_csv(output: &BillOutput) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["name", "amount"])?;

    for person in &output.items {
        let amount = format!("{:.1}", person.amount);
        writer.write_record([person.name.as_str(), amount.as_str()])?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| BillError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
