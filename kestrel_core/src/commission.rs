// kestrel_core/src/commission.rs

//! Commission models applied to simulated fills.
//! The execution handler treats the model as a pluggable capability, so a
//! broker's fee structure can change without touching the execution
//! algorithm itself.

use rust_decimal::Decimal;

/// Computes the commission charged for one transaction.
pub trait CommissionModel {
    fn calculate(&self, quantity: u64, price: Decimal) -> Decimal;
}

/// Flat fee per transaction, independent of lot size, price and venue.
#[derive(Debug, Clone)]
pub struct FlatCommission {
    fee: Decimal,
}

impl FlatCommission {
    pub fn new(fee: Decimal) -> Self {
        Self { fee }
    }

}

impl CommissionModel for FlatCommission {
    fn calculate(&self, _quantity: u64, _price: Decimal) -> Decimal {
        self.fee
    }

}

/// Per-share fee with a minimum charge per transaction.
#[derive(Debug, Clone)]
pub struct PerShareCommission {
    rate: Decimal,
    minimum: Decimal,
}

impl PerShareCommission {
    pub fn new(rate: Decimal, minimum: Decimal) -> Self {
        Self { rate, minimum }
    }

}

impl CommissionModel for PerShareCommission {
    fn calculate(&self, quantity: u64, _price: Decimal) -> Decimal {
        (self.rate * Decimal::from(quantity)).max(self.minimum)
    }

}
