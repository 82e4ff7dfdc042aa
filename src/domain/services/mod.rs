pub mod allocator;
pub mod date_format;
pub mod money;
pub mod participants;
pub mod reconciliation;

pub use allocator::allocate;
pub use date_format::format_date;
pub use money::round_money;
pub use participants::{resolve_participants, ParticipantResolution, FALLBACK_PARTICIPANTS};
pub use reconciliation::reconcile;
