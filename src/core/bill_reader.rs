//! 輸入邊界：把 JSON 帳單轉成已驗證的 [`BillInput`]。
//!
//! 先解析成 `serde_json::Value` 再逐欄檢查，這樣才能回報是哪一個欄位
//! 缺少、型別錯誤或超出範圍，而不是只有一個籠統的反序列化錯誤。

use crate::domain::model::{BillInput, BillItem, Money};
use crate::utils::error::{BillError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::LazyLock;

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// 單張帳單（含小費）允許的最大金額；在此之下分攤運算不會溢位
pub const MAX_BILL_AMOUNT: Money = Money::from_parts(0xA4C6_8000, 0x3_8D7E, 0, false, 0); // 10^15

pub fn parse_bill_bytes(data: &[u8]) -> Result<BillInput> {
    let value: Value = serde_json::from_slice(data)?;
    parse_bill_value(&value)
}

pub fn parse_bill_str(content: &str) -> Result<BillInput> {
    let value: Value = serde_json::from_str(content)?;
    parse_bill_value(&value)
}

pub fn parse_bill_value(value: &Value) -> Result<BillInput> {
    let Some(root) = value.as_object() else {
        return Err(BillError::MalformedDataError(serde::de::Error::custom(
            "the bill must be a JSON object",
        )));
    };

    let date = read_date(root)?;

    let location = required_str(root, "location", "location")?;
    validate_non_empty_string("location", location)?;

    let tip_percentage = required_money(root, "tipPercentage", "tipPercentage")?;
    validate_range("tipPercentage", tip_percentage, Money::ZERO, Money::ONE_HUNDRED)?;

    let items = match required(root, "items", "items")? {
        Value::Array(entries) => entries,
        other => return Err(BillError::type_mismatch("items", "an array", other)),
    };
    if items.is_empty() {
        return Err(BillError::out_of_range(
            "items",
            "[]",
            "A bill needs at least one item",
        ));
    }

    let items = items
        .iter()
        .enumerate()
        .map(|(index, entry)| read_item(index, entry))
        .collect::<Result<Vec<_>>>()?;
    check_bill_amount(&items, tip_percentage)?;

    tracing::debug!("Validated bill for {} with {} items", location, items.len());

    Ok(BillInput {
        date: date.to_string(),
        location: location.to_string(),
        tip_percentage,
        items,
    })
}

fn read_date(root: &Map<String, Value>) -> Result<&str> {
    let date = required_str(root, "date", "date")?;

    if !DATE_SHAPE.is_match(date) {
        return Err(BillError::invalid_date("date", date, "expected YYYY-MM-DD"));
    }
    if let Err(e) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Err(BillError::invalid_date(
            "date",
            date,
            format!("not a calendar date: {}", e),
        ));
    }

    Ok(date)
}

fn read_item(index: usize, entry: &Value) -> Result<BillItem> {
    let path = format!("items[{}]", index);
    let Some(item) = entry.as_object() else {
        return Err(BillError::type_mismatch(path, "an object", entry));
    };

    let name_path = format!("{}.name", path);
    let name = required_str(item, "name", &name_path)?;
    validate_non_empty_string(&name_path, name)?;

    let price_path = format!("{}.price", path);
    let price = required_money(item, "price", &price_path)?;
    if price < Money::ZERO {
        return Err(BillError::out_of_range(
            price_path,
            price,
            "Price cannot be negative",
        ));
    }

    let shared_path = format!("{}.isShared", path);
    let is_shared = match optional(item, "isShared") {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => return Err(BillError::type_mismatch(shared_path, "a boolean", other)),
    };

    let person_path = format!("{}.person", path);
    let person = optional(item, "person");

    if is_shared {
        if let Some(person) = person {
            return Err(BillError::type_mismatch(
                person_path,
                "no person on a shared item",
                person,
            ));
        }
        return Ok(BillItem::shared(name, price));
    }

    let person = match person {
        None => return Err(BillError::missing_field(person_path)),
        Some(Value::String(person)) => person.trim(),
        Some(other) => return Err(BillError::type_mismatch(person_path, "a string", other)),
    };
    validate_non_empty_string(&person_path, person)?;

    Ok(BillItem::personal(name, price, person))
}

/// 小計與含小費的總額都必須落在 MAX_BILL_AMOUNT 之內
fn check_bill_amount(items: &[BillItem], tip_percentage: Money) -> Result<()> {
    let too_large = |value: String| {
        BillError::out_of_range(
            "items",
            value,
            format!("The bill total cannot exceed {}", MAX_BILL_AMOUNT),
        )
    };

    let sub_total = items
        .iter()
        .try_fold(Money::ZERO, |sum, item| sum.checked_add(item.price))
        .ok_or_else(|| too_large("subtotal overflow".to_string()))?;

    let grand_total = (Money::ONE + tip_percentage / Money::ONE_HUNDRED)
        .checked_mul(sub_total)
        .ok_or_else(|| too_large(sub_total.to_string()))?;
    if grand_total > MAX_BILL_AMOUNT {
        return Err(too_large(grand_total.to_string()));
    }

    Ok(())
}

/// null 視同未填
fn optional<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn required<'a>(object: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value> {
    optional(object, key).ok_or_else(|| BillError::missing_field(path))
}

fn required_str<'a>(object: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a str> {
    let value = required(object, key, path)?;
    value
        .as_str()
        .ok_or_else(|| BillError::type_mismatch(path, "a string", value))
}

fn required_money(object: &Map<String, Value>, key: &str, path: &str) -> Result<Money> {
    let value = required(object, key, path)?;
    let Value::Number(number) = value else {
        return Err(BillError::type_mismatch(path, "a number", value));
    };
    number_to_money(number).ok_or_else(|| BillError::out_of_range(path, number, "Not a representable amount"))
}

/// 經由 JSON 的十進位字串轉換，`12.3` 會得到精確的 12.3 而不是二進位近似值
fn number_to_money(number: &serde_json::Number) -> Option<Money> {
    let text = number.to_string();
    Money::from_str(&text)
        .or_else(|_| Money::from_scientific(&text))
        .ok()
}
