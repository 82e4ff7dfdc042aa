use crate::domain::model::Money;
use rust_decimal::RoundingStrategy;

/// 金額四捨五入的小數位數 (0.1 單位)
pub const MONEY_SCALE: u32 = 1;

/// Round half away from zero to the nearest 0.1.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
