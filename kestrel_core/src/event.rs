// kestrel_core/src/event.rs

use rust_decimal::Decimal;

pub trait Event: std::fmt::Debug + Send + Sync {
    fn event_type(&self) -> &'static str;
    fn get_order_event_params(&self) -> Option<&OrderEvent>;
    fn get_fill_event_params(&self) -> Option<&FillEvent>;
}

/// Side of an order, serialized with the broker wire strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrderAction {
    #[serde(rename = "BOT")]
    Buy,
    #[serde(rename = "SLD")]
    Sell,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Buy => "BOT",
            OrderAction::Sell => "SLD",
        }
    }

}

// MARKET EVENT
#[derive(Debug)]
pub struct MarketEvent;

impl MarketEvent {
    pub fn new() -> Self {
        Self
    }

}

impl Event for MarketEvent {
    fn event_type(&self) -> &'static str {
        "MARKET"
    }

    fn get_order_event_params(&self) -> Option<&OrderEvent> {
        None
    }

    fn get_fill_event_params(&self) -> Option<&FillEvent> {
        None
    }

}

// ORDER EVENT
#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub symbol: String,
    pub action: OrderAction,
    pub quantity: u64,
}

impl OrderEvent {
    pub fn new(
        symbol: String,
        action: OrderAction,
        quantity: u64,
    ) -> Self {
        Self {
            symbol,
            action,
            quantity,
        }
    }

}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        "ORDER"
    }

    fn get_order_event_params(&self) -> Option<&OrderEvent> {
        Some(self)
    }

    fn get_fill_event_params(&self) -> Option<&FillEvent> {
        None
    }

}

// FILL EVENT
#[derive(Debug, Clone, PartialEq)]
pub struct FillEvent {
    /// Time of the most recent observation for the symbol, not the
    /// simulation's wall clock.
    pub timeindex: chrono::DateTime<chrono::Utc>,
    pub symbol: String,
    pub action: OrderAction,
    pub quantity: u64,
    pub exchange: String,
    pub price: Decimal,
    pub commission: Decimal,
}

impl FillEvent {
    pub fn new(
        timeindex: chrono::DateTime<chrono::Utc>,
        symbol: String,
        action: OrderAction,
        quantity: u64,
        exchange: String,
        price: Decimal,
        commission: Decimal,
    ) -> Self {
        Self {
            timeindex,
            symbol,
            action,
            quantity,
            exchange,
            price,
            commission,
        }
    }

}

impl Event for FillEvent {
    fn event_type(&self) -> &'static str {
        "FILL"
    }

    fn get_order_event_params(&self) -> Option<&OrderEvent> {
        None
    }

    fn get_fill_event_params(&self) -> Option<&FillEvent> {
        Some(self)
    }

}
