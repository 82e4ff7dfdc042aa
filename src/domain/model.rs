use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 金額一律以十進位表示，避免浮點誤差
pub type Money = Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemShare {
    /// 所有參與者平分
    Shared,
    /// 記在單一參與者名下
    Personal { person: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillItem {
    pub name: String,
    pub price: Money,
    pub share: ItemShare,
}

impl BillItem {
    pub fn shared(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
            share: ItemShare::Shared,
        }
    }

    pub fn personal(name: impl Into<String>, price: Money, person: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            share: ItemShare::Personal {
                person: person.into(),
            },
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self.share, ItemShare::Shared)
    }

    /// Personal 項目的付款人；Shared 項目回傳 None
    pub fn person(&self) -> Option<&str> {
        match &self.share {
            ItemShare::Shared => None,
            ItemShare::Personal { person } => Some(person.as_str()),
        }
    }
}

/// 已通過驗證的帳單
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillInput {
    pub date: String,
    pub location: String,
    pub tip_percentage: Money,
    pub items: Vec<BillItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAmount {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOutput {
    pub date: String,
    pub location: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sub_total: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub tip: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Money,
    pub items: Vec<PersonAmount>,
}

impl BillOutput {
    pub fn allocated_sum(&self) -> Money {
        self.items.iter().map(|p| p.amount).sum()
    }
}
