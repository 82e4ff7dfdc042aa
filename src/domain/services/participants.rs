use crate::domain::model::BillItem;
use std::collections::BTreeSet;

/// 帳單上沒有任何具名參與者時，用來分攤共用項目的兩位預設參與者
pub const FALLBACK_PARTICIPANTS: [&str; 2] = ["Person 1", "Person 2"];

/// Outcome of participant discovery.
///
/// `Named` carries the distinct `person` values of the personal items in
/// ascending order. `Fallback` fires when no personal item names anyone, and
/// carries [`FALLBACK_PARTICIPANTS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantResolution {
    Named(Vec<String>),
    Fallback(Vec<String>),
}

impl ParticipantResolution {
    pub fn names(&self) -> &[String] {
        match self {
            Self::Named(names) | Self::Fallback(names) => names,
        }
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn into_names(self) -> Vec<String> {
        match self {
            Self::Named(names) | Self::Fallback(names) => names,
        }
    }
}

pub fn resolve_participants(items: &[BillItem]) -> ParticipantResolution {
    let named: BTreeSet<&str> = items.iter().filter_map(BillItem::person).collect();

    if named.is_empty() {
        tracing::debug!(
            "No personal items on the bill, splitting between {:?}",
            FALLBACK_PARTICIPANTS
        );
        return ParticipantResolution::Fallback(
            FALLBACK_PARTICIPANTS.iter().map(|s| s.to_string()).collect(),
        );
    }

    ParticipantResolution::Named(named.into_iter().map(str::to_string).collect())
}
