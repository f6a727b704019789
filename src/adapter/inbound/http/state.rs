//! Services shared by every request.

use solana_sdk::pubkey::Pubkey;

use crate::application::{
    AuthService, PayrollService, ProtocolService, QuoteService, TradeOrchestrator,
};

/// Addresses requests fall back on when they do not name one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub payment_token: Pubkey,
    pub gaslite_drop: Pubkey,
    pub protocol_fee: Pubkey,
}

/// Handles to the application services, cloned into each route.
#[derive(Clone)]
pub struct AppState {
    pub quotes: QuoteService,
    pub trades: TradeOrchestrator,
    pub protocol: ProtocolService,
    pub payroll: PayrollService,
    pub auth: AuthService,
    pub defaults: Defaults,
}
