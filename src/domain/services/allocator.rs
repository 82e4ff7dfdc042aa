//! 帳單分攤核心：小計、小費、共用項目均分，以及最後的捨入校正。
//!
//! 這一層是純計算，不做任何輸入驗證或 I/O；呼叫端必須先經過
//! `core::bill_reader` 的驗證，金額上限 `MAX_BILL_AMOUNT` 保證這裡的加乘不會溢位。

use crate::domain::model::{BillInput, BillItem, BillOutput, Money, PersonAmount};
use crate::domain::services::date_format::format_date;
use crate::domain::services::money::round_money;
use crate::domain::services::participants::resolve_participants;
use crate::domain::services::reconciliation::reconcile;

const HUNDRED: Money = Money::ONE_HUNDRED;

/// Sum of every item price, unrounded.
pub fn subtotal(items: &[BillItem]) -> Money {
    items.iter().map(|item| item.price).sum()
}

/// Tip on the whole bill, rounded to 0.1.
pub fn tip(subtotal: Money, tip_percentage: Money) -> Money {
    round_money(subtotal * tip_percentage / HUNDRED)
}

pub fn shared_total(items: &[BillItem]) -> Money {
    items
        .iter()
        .filter(|item| item.is_shared())
        .map(|item| item.price)
        .sum()
}

pub fn personal_total(items: &[BillItem], person: &str) -> Money {
    items
        .iter()
        .filter(|item| item.person() == Some(person))
        .map(|item| item.price)
        .sum()
}

/// 個人項目加上均分後的共用金額 (尚未含小費、尚未捨入)
pub fn raw_share(items: &[BillItem], person: &str, shared_per_person: Money) -> Money {
    personal_total(items, person) + shared_per_person
}

/// 每人各自以自己的份額計算小費後捨入，不是按比例分配總小費
pub fn amount_with_tip(raw_share: Money, tip_percentage: Money) -> Money {
    round_money(raw_share * (Money::ONE + tip_percentage / HUNDRED))
}

pub fn allocate(input: &BillInput) -> BillOutput {
    let sub_total = subtotal(&input.items);
    let tip = tip(sub_total, input.tip_percentage);
    let total_amount = sub_total + tip;

    let participants = resolve_participants(&input.items);
    let shared_per_person = if participants.is_empty() {
        Money::ZERO
    } else {
        shared_total(&input.items) / Money::from(participants.len())
    };

    let mut amounts: Vec<PersonAmount> = participants
        .names()
        .iter()
        .map(|name| PersonAmount {
            name: name.clone(),
            amount: amount_with_tip(
                raw_share(&input.items, name, shared_per_person),
                input.tip_percentage,
            ),
        })
        .collect();

    let residual = reconcile(&mut amounts, total_amount);

    tracing::debug!(
        participants = amounts.len(),
        fallback = participants.is_fallback(),
        residual = ?residual,
        "Allocated bill at {}: subtotal {}, tip {}, total {}",
        input.location,
        sub_total,
        tip,
        total_amount
    );

    BillOutput {
        date: format_date(&input.date),
        location: input.location.clone(),
        sub_total,
        tip,
        total_amount,
        items: amounts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(value: &str) -> Money {
        Money::from_str(value).expect("valid decimal")
    }

    fn bill(tip_percentage: &str, items: Vec<BillItem>) -> BillInput {
        BillInput {
            date: "2024-03-21".to_string(),
            location: "Test Diner".to_string(),
            tip_percentage: d(tip_percentage),
            items,
        }
    }

    #[test]
    fn test_subtotal_is_exact() {
        let items = vec![
            BillItem::shared("Bread", d("3.25")),
            BillItem::personal("Tea", d("2.10"), "Alice"),
        ];
        assert_eq!(subtotal(&items), d("5.35"));
    }

    #[test]
    fn test_tip_rounds_to_tenth() {
        assert_eq!(tip(d("30"), d("10")), d("3.0"));
        assert_eq!(tip(d("12.34"), d("15")), d("1.9"));
        assert_eq!(tip(d("0.5"), d("10")), d("0.1"));
        assert_eq!(tip(d("42"), d("0")), d("0"));
    }

    #[test]
    fn test_shared_only_pizza_scenario() {
        let input = bill("10", vec![BillItem::shared("Pizza", d("30"))]);

        let output = allocate(&input);

        assert_eq!(output.sub_total, d("30"));
        assert_eq!(output.tip, d("3.0"));
        assert_eq!(output.total_amount, d("33"));
        assert_eq!(output.items.len(), 2);
        assert_eq!(output.items[0].name, "Person 1");
        assert_eq!(output.items[0].amount, d("16.5"));
        assert_eq!(output.items[1].name, "Person 2");
        assert_eq!(output.items[1].amount, d("16.5"));
        assert_eq!(output.allocated_sum(), d("33"));
    }

    #[test]
    fn test_single_personal_item() {
        let input = bill("20", vec![BillItem::personal("Steak", d("100"), "Alice")]);

        let output = allocate(&input);

        assert_eq!(output.sub_total, d("100"));
        assert_eq!(output.tip, d("20.0"));
        assert_eq!(output.total_amount, d("120"));
        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0].name, "Alice");
        assert_eq!(output.items[0].amount, d("120.0"));
    }

    #[test]
    fn test_zero_tip_total_equals_subtotal() {
        let input = bill(
            "0",
            vec![
                BillItem::personal("Noodles", d("9.9"), "Bob"),
                BillItem::shared("Gyoza", d("6")),
            ],
        );

        let output = allocate(&input);

        assert_eq!(output.tip, d("0"));
        assert_eq!(output.total_amount, output.sub_total);
        assert_eq!(output.allocated_sum(), d("15.9"));
    }

    #[test]
    fn test_mixed_bill_shares_and_reconciles() {
        // 共用 10 / 3 人 = 3.333...，含 10% 小費後每人分別捨入
        let input = bill(
            "10",
            vec![
                BillItem::personal("Curry", d("12"), "Carol"),
                BillItem::personal("Ramen", d("11"), "Alice"),
                BillItem::personal("Udon", d("8"), "Bob"),
                BillItem::shared("Edamame", d("10")),
            ],
        );

        let output = allocate(&input);

        assert_eq!(output.sub_total, d("41"));
        assert_eq!(output.tip, d("4.1"));
        assert_eq!(output.total_amount, d("45.1"));

        let names: Vec<&str> = output.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

        // Alice 15.77 -> 15.8, Bob 12.47 -> 12.5, Carol 16.87 -> 16.9；合計 45.2，差 -0.1 給 Carol
        assert_eq!(output.items[0].amount, d("15.8"));
        assert_eq!(output.items[1].amount, d("12.5"));
        assert_eq!(output.items[2].amount, d("16.8"));
        assert_eq!(output.allocated_sum(), d("45.1"));
    }

    #[test]
    fn test_residual_tie_goes_to_first_in_order() {
        let input = bill("0", vec![BillItem::shared("Cake", d("10"))]);
        let mut three = input.clone();
        three.items.push(BillItem::personal("Coffee", d("0"), "Zed"));
        three.items.push(BillItem::personal("Coffee", d("0"), "Amy"));
        three.items.push(BillItem::personal("Coffee", d("0"), "Max"));

        let output = allocate(&three);

        assert_eq!(output.items[0].name, "Amy");
        assert_eq!(output.items[0].amount, d("3.4"));
        assert_eq!(output.items[1].amount, d("3.3"));
        assert_eq!(output.items[2].amount, d("3.3"));
    }

    #[test]
    fn test_date_is_localized() {
        let output = allocate(&bill("0", vec![BillItem::shared("Tea", d("1"))]));
        assert_eq!(output.date, "2024年3月21日");
        assert_eq!(output.location, "Test Diner");
    }

    #[test]
    fn test_allocation_is_idempotent() {
        let input = bill(
            "17.5",
            vec![
                BillItem::personal("A", d("13.37"), "Eve"),
                BillItem::personal("B", d("7.01"), "Dan"),
                BillItem::shared("C", d("19.99")),
            ],
        );

        assert_eq!(allocate(&input), allocate(&input));
    }

    #[test]
    fn test_empty_items_allocate_zero_to_fallback() {
        let output = allocate(&bill("15", vec![]));

        assert_eq!(output.sub_total, d("0"));
        assert_eq!(output.items.len(), 2);
        assert!(output.items.iter().all(|p| p.amount.is_zero()));
    }
}
