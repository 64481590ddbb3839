//! Ledger record types and the signal interface types derived from them.

mod account;
mod fill;
mod order;
mod position;
mod signal;

pub use account::{Account, AccountId, CashDelta};
pub use fill::{DeliveryStatus, Fill, FillId};
pub use order::{Order, OrderDirection, OrderId, OrderStatus, OrderType};
pub use position::{Position, PositionId, PositionSide, QtyDelta};
pub use signal::{OrderIntent, SignalFrame, SignalMode};
