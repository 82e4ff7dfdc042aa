use crate::domain::model::{Money, PersonAmount};
use crate::domain::services::money::round_money;

/// Index of the strictly largest amount. Ties keep the earliest entry.
pub fn largest_amount_index(amounts: &[PersonAmount]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, entry) in amounts.iter().enumerate() {
        match best {
            Some(current) if entry.amount <= amounts[current].amount => {}
            _ => best = Some(index),
        }
    }
    best
}

/// 讓每人金額加總等於四捨五入後的總額。
///
/// 差額只會加到金額最大的那一位 (同額時取順序最前者)，且只調整一次。
/// 回傳實際套用的差額；不需調整或沒有參與者時回傳 `None`。
pub fn reconcile(amounts: &mut [PersonAmount], total_amount: Money) -> Option<Money> {
    let target = round_money(total_amount);
    let allocated: Money = amounts.iter().map(|p| p.amount).sum();
    // Both sides are already multiples of 0.1; rounding only normalizes the scale.
    let difference = round_money(target - allocated);

    if difference.is_zero() {
        return None;
    }

    let index = largest_amount_index(amounts)?;
    let entry = &mut amounts[index];
    tracing::debug!(
        "Assigning rounding residual {} to {} ({} -> {})",
        difference,
        entry.name,
        entry.amount,
        entry.amount + difference
    );
    entry.amount = round_money(entry.amount + difference);

    Some(difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(value: &str) -> Money {
        Money::from_str(value).expect("valid decimal")
    }

    fn person(name: &str, amount: &str) -> PersonAmount {
        PersonAmount {
            name: name.to_string(),
            amount: d(amount),
        }
    }

    #[test]
    fn test_largest_amount_first_max_wins() {
        let amounts = vec![
            person("Alice", "10.0"),
            person("Bob", "12.5"),
            person("Carol", "12.5"),
        ];
        assert_eq!(largest_amount_index(&amounts), Some(1));
    }

    #[test]
    fn test_largest_amount_empty() {
        assert_eq!(largest_amount_index(&[]), None);
    }

    #[test]
    fn test_no_difference_leaves_amounts_alone() {
        let mut amounts = vec![person("Alice", "16.5"), person("Bob", "16.5")];

        assert_eq!(reconcile(&mut amounts, d("33")), None);
        assert_eq!(amounts[0].amount, d("16.5"));
        assert_eq!(amounts[1].amount, d("16.5"));
    }

    #[test]
    fn test_positive_residual_goes_to_largest() {
        // 10 / 3 = 3.333... -> 每人 3.3，合計 9.9，差 0.1
        let mut amounts = vec![
            person("Alice", "3.3"),
            person("Bob", "3.3"),
            person("Carol", "3.3"),
        ];

        let applied = reconcile(&mut amounts, d("10"));

        assert_eq!(applied, Some(d("0.1")));
        assert_eq!(amounts[0].amount, d("3.4"));
        assert_eq!(amounts[1].amount, d("3.3"));
        assert_eq!(amounts[2].amount, d("3.3"));
    }

    #[test]
    fn test_negative_residual_goes_to_largest() {
        let mut amounts = vec![
            person("Alice", "6.7"),
            person("Bob", "6.7"),
            person("Carol", "6.7"),
        ];

        let applied = reconcile(&mut amounts, d("20"));

        assert_eq!(applied, Some(d("-0.1")));
        assert_eq!(amounts[0].amount, d("6.6"));
        assert_eq!(amounts.iter().map(|p| p.amount).sum::<Money>(), d("20.0"));
    }

    #[test]
    fn test_half_hundredth_total_still_balances() {
        // round(10.25) = 10.3，但 round(10.25 - 10.3) 會變成 -0.1
        let mut amounts = vec![person("Alice", "5.2"), person("Bob", "5.1")];

        let applied = reconcile(&mut amounts, d("10.25"));

        assert_eq!(applied, None);
        assert_eq!(amounts.iter().map(|p| p.amount).sum::<Money>(), d("10.3"));
    }

    #[test]
    fn test_empty_amounts_are_left_alone() {
        let mut amounts: Vec<PersonAmount> = vec![];
        assert_eq!(reconcile(&mut amounts, d("5")), None);
    }
}
