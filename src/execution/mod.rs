//! Order execution: request types, pre-flight validation hooks, and the
//! place/preview/modify/cancel surface.

pub mod enums;
pub mod order;
pub mod request;

pub use enums::{OrderClass, OrderDuration, OrderSide, OrderStatus, OrderType};
pub use order::{OrderAck, OrderModification, OrderPreview};
pub use request::{
    ComboOrder, EquityOrder, EquityOrderBuilder, MultilegOrder, OcoOrder, OptionLeg, OptionOrder,
    OptionOrderBuilder, OrderComponent, OrderRequest, OtoOrder, OtocoOrder, SpreadLeg, SpreadOrder,
    SpreadOrderBuilder,
};
