//! Request and response bodies of the HTTP API.
//!
//! Everything is camelCase. Public keys, signatures and `u128` base-unit
//! amounts travel as strings; human quantities travel as decimals in whole
//! tokens (or SOL).

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::application::auth::{AuthUser, Session};
use crate::application::payroll::{EmployeeData, PaymentOutcome, PayrollSnapshot};
use crate::application::protocol::DeployReceipt;
use crate::application::quote::TokenPrice;
use crate::domain::amount::to_decimal;
use crate::domain::curve::{Quote, TradeSide};
use crate::domain::payment::PaymentRecord;
use crate::domain::payroll::PaymentFrequency;
use crate::domain::swap::SwapQuote;
use crate::domain::user::Role;
use crate::domain::DomainError;
use crate::error::Result;
use crate::program::{EmployeeAccount, PayrollAccount};

/// Parse a base58 public key from request field `field`.
///
/// # Errors
/// [`DomainError::InvalidIdentifier`] when `value` is not a public key.
pub fn parse_pubkey(field: &'static str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim()).map_err(|_| {
        DomainError::InvalidIdentifier {
            field,
            reason: format!("{value:?} is not a valid public key"),
        }
        .into()
    })
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
///
/// A bare date means the start of that day, or its last second when
/// `end_of_day` is set.
///
/// # Errors
/// [`DomainError::InvalidIdentifier`] when `value` is neither form.
pub fn parse_date(field: &'static str, value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    let invalid = || DomainError::InvalidIdentifier {
        field,
        reason: format!("{value:?} is not a date"),
    };
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    let time = if end_of_day {
        day.and_hms_opt(23, 59, 59)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    Ok(time.ok_or_else(invalid)?.and_utc())
}

fn tokens(units: u128) -> Option<Decimal> {
    to_decimal(units)
}

// ---------------------------------------------------------------------------
// Attenomics
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMintQuery {
    pub token_mint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub token_mint: String,
    /// Whole tokens.
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteQuery {
    pub source_token_mint: String,
    pub target_token_mint: String,
    /// Whole source tokens.
    pub amount_in: Decimal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeBody {
    pub gaslite_drop_address: Option<String>,
    pub protocol_fee_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAiAgentBody {
    pub agent: String,
    pub allowed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfigBody {
    pub drip_percentage: u8,
    pub drip_interval: i64,
    pub lock_time: i64,
    pub locked_percentage: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorConfigBody {
    /// Whole tokens per drip.
    pub daily_drip_amount: Decimal,
    pub drip_interval: i64,
    pub total_days: u16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployBody {
    pub handle: String,
    pub name: String,
    pub symbol: String,
    pub nft_metadata_uri: String,
    /// Whole tokens.
    pub total_supply: Decimal,
    pub self_percent: u8,
    pub market_percent: u8,
    pub supporter_percent: u8,
    pub ai_agent: String,
    #[serde(default)]
    pub vault_config: Option<VaultConfigBody>,
    #[serde(default)]
    pub distributor_config: Option<DistributorConfigBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyBody {
    pub token_mint: String,
    /// Whole tokens.
    pub amount: Decimal,
    #[serde(default = "default_true")]
    pub use_native_sol: bool,
    /// Upper bound on the total cost, in SOL.
    #[serde(default)]
    pub max_amount_in: Option<Decimal>,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellBody {
    pub token_mint: String,
    /// Whole tokens.
    pub amount: Decimal,
    /// Lower bound on the proceeds, in SOL.
    #[serde(default)]
    pub min_amount_out: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBody {
    pub source_token_mint: String,
    pub target_token_mint: String,
    /// Whole source tokens.
    pub amount_in: Decimal,
    /// Whole target tokens.
    #[serde(default)]
    pub min_amount_out: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPriceResponse {
    pub token_mint: String,
    pub price: Decimal,
    pub price_lamports: String,
    pub unit: &'static str,
    pub supply: Option<Decimal>,
    pub remaining_supply: Option<Decimal>,
    pub buy_fee_bps: u16,
    pub sell_fee_bps: u16,
}

impl From<TokenPrice> for TokenPriceResponse {
    fn from(price: TokenPrice) -> Self {
        Self {
            token_mint: price.mint.to_string(),
            price: price.price_sol,
            price_lamports: price.price_lamports.to_string(),
            unit: "SOL",
            supply: tokens(price.supply),
            remaining_supply: tokens(price.remaining_supply),
            buy_fee_bps: price.buy_fee_bps,
            sell_fee_bps: price.sell_fee_bps,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub token_mint: String,
    pub side: TradeSide,
    pub amount: Option<Decimal>,
    pub amount_base_units: String,
    /// Total cost for a buy, net proceeds for a sell, in lamports.
    pub price_or_proceeds: String,
    pub price_or_proceeds_sol: Option<Decimal>,
    pub fee_base_units: String,
}

impl QuoteResponse {
    #[must_use]
    pub fn new(mint: &Pubkey, quote: &Quote) -> Self {
        Self {
            token_mint: mint.to_string(),
            side: quote.side,
            amount: tokens(quote.amount_base_units),
            amount_base_units: quote.amount_base_units.to_string(),
            price_or_proceeds: quote.price_or_proceeds.to_string(),
            price_or_proceeds_sol: tokens(quote.price_or_proceeds),
            fee_base_units: quote.fee_base_units.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteResponse {
    pub source_token_mint: String,
    pub target_token_mint: String,
    pub amount_in: String,
    /// Lamports released by the source sell.
    pub sol_amount: String,
    pub expected_amount_out: String,
    pub expected_amount_out_tokens: Option<Decimal>,
}

impl SwapQuoteResponse {
    #[must_use]
    pub fn new(source: &Pubkey, target: &Pubkey, quote: &SwapQuote) -> Self {
        Self {
            source_token_mint: source.to_string(),
            target_token_mint: target.to_string(),
            amount_in: quote.amount_in.to_string(),
            sol_amount: quote.intermediate_base_currency_amount.to_string(),
            expected_amount_out: quote.expected_output_amount.to_string(),
            expected_amount_out_tokens: tokens(quote.expected_output_amount),
        }
    }
}

/// Reply to an instruction that only needs a signature back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResponse {
    pub message: String,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub message: String,
    pub signature: String,
    pub quote: QuoteResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub message: String,
    pub signature: String,
    pub quote: SwapQuoteResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub message: &'static str,
    pub token_mint: String,
    pub creator_token_account: String,
    pub nft_account: String,
    pub self_token_vault: String,
    pub bonding_curve: String,
    pub supporter_contract: String,
    pub transaction_signature: String,
    pub mint_signature: String,
    pub metadata: MetadataResponse,
}

impl DeployResponse {
    #[must_use]
    pub fn new(receipt: &DeployReceipt, metadata: MetadataResponse) -> Self {
        Self {
            message: "creator token deployed",
            token_mint: receipt.mint.to_string(),
            creator_token_account: receipt.accounts.creator_token.to_string(),
            nft_account: receipt.accounts.nft.to_string(),
            self_token_vault: receipt.accounts.self_token_vault.to_string(),
            bonding_curve: receipt.accounts.bonding_curve.to_string(),
            supporter_contract: receipt.accounts.supporter_contract.to_string(),
            transaction_signature: receipt.deploy_signature.to_string(),
            mint_signature: receipt.mint_signature.to_string(),
            metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub employee_id: Option<String>,
}

impl From<&AuthUser> for UserResponse {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            employee_id: user.employee_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user: UserResponse::from(&session.user),
        }
    }
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializePayrollBody {
    pub payroll_id: String,
    /// Basis points.
    pub tax_rate: u16,
    /// Defaults to the configured payment token.
    #[serde(default)]
    pub payment_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEmployeeBody {
    pub payroll_id: String,
    pub employee_id: String,
    /// Whole tokens per period.
    pub salary_amount: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
    pub payment_frequency: String,
    /// Owner of the token account that receives the salary.
    pub employee_wallet: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRefBody {
    pub payroll_id: String,
    pub employee_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRefBody {
    pub payroll_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeBody {
    pub payroll_id: String,
    pub employee_id: String,
    #[serde(default)]
    pub salary_amount: Option<Decimal>,
    #[serde(default)]
    pub deductions: Option<Decimal>,
    #[serde(default)]
    pub payment_frequency: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositBody {
    pub payroll_id: String,
    /// Whole tokens.
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollQuery {
    pub payroll_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    pub payroll_id: String,
    #[serde(default)]
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub payroll_id: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Parse a frequency label from a request.
///
/// # Errors
/// [`DomainError::UnknownFrequency`] for anything but weekly, biweekly or monthly.
pub fn parse_frequency(value: &str) -> Result<PaymentFrequency> {
    Ok(value.parse::<PaymentFrequency>()?)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollResponse {
    pub payroll_id: String,
    pub address: String,
    pub authority: String,
    pub payment_token: String,
    pub employee_count: u64,
    pub is_active: bool,
    /// Basis points.
    pub tax_rate: u16,
    pub total_funds: Option<Decimal>,
    pub vault_balance: Option<Decimal>,
}

impl PayrollResponse {
    fn new(address: &Pubkey, account: &PayrollAccount, vault_balance: u64) -> Self {
        Self {
            payroll_id: account.payroll_id.clone(),
            address: address.to_string(),
            authority: account.authority().to_string(),
            payment_token: account.payment_token().to_string(),
            employee_count: account.employee_count,
            is_active: account.is_active,
            tax_rate: account.tax_rate,
            total_funds: tokens(u128::from(account.total_funds)),
            vault_balance: tokens(u128::from(vault_balance)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub employee_id: String,
    pub wallet: String,
    pub salary_amount: Option<Decimal>,
    pub deductions: Option<Decimal>,
    pub payment_frequency: String,
    /// Unix seconds; zero if never paid.
    pub last_payment: i64,
    pub is_active: bool,
}

impl From<&EmployeeAccount> for EmployeeResponse {
    fn from(account: &EmployeeAccount) -> Self {
        Self {
            employee_id: account.employee_id.clone(),
            wallet: account.wallet.to_string(),
            salary_amount: tokens(u128::from(account.salary_amount)),
            deductions: tokens(u128::from(account.deductions)),
            payment_frequency: account.payment_frequency.to_string(),
            last_payment: account.last_payment,
            is_active: account.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollDataResponse {
    pub payroll: PayrollResponse,
    pub employees: Vec<EmployeeResponse>,
}

impl From<&PayrollSnapshot> for PayrollDataResponse {
    fn from(snapshot: &PayrollSnapshot) -> Self {
        Self {
            payroll: PayrollResponse::new(&snapshot.address, &snapshot.account, snapshot.vault_balance),
            employees: snapshot.employees.iter().map(EmployeeResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDataResponse {
    #[serde(flatten)]
    pub employee: EmployeeResponse,
    /// Unix seconds of the next payment; `None` when it is due now.
    pub next_due: Option<i64>,
    pub payments: Vec<PaymentRecord>,
}

impl From<EmployeeData> for EmployeeDataResponse {
    fn from(data: EmployeeData) -> Self {
        Self {
            employee: EmployeeResponse::from(&data.account),
            next_due: data.next_due,
            payments: data.payments,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub message: String,
    pub payment: PaymentRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub message: String,
    pub results: Vec<PaymentOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bad_pubkey_names_the_field() {
        let err = parse_pubkey("tokenMint", "not-a-key").unwrap_err();
        assert!(err.to_string().contains("tokenMint"));
    }

    #[test]
    fn dates_accept_both_forms() {
        assert_eq!(
            parse_date("startDate", "2025-03-01", false).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("endDate", "2025-03-01", true).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 23, 59, 59).unwrap()
        );
        assert_eq!(
            parse_date("startDate", "2025-03-01T10:00:00+02:00", false).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
        );
        assert!(parse_date("startDate", "yesterday", false).is_err());
    }

    #[test]
    fn buy_body_defaults_to_native_sol() {
        let body: BuyBody =
            serde_json::from_str(r#"{"tokenMint":"x","amount":"1.5"}"#).unwrap();
        assert!(body.use_native_sol);
        assert_eq!(body.amount, Decimal::new(15, 1));
        assert!(body.max_amount_in.is_none());
    }

    #[test]
    fn quote_renders_wide_amounts_as_strings() {
        let quote = Quote {
            side: TradeSide::Buy,
            amount_base_units: 1_000_000_000_000,
            price_or_proceeds: 50_006,
            fee_base_units: 0,
        };
        let json = serde_json::to_value(QuoteResponse::new(&Pubkey::default(), &quote)).unwrap();
        assert_eq!(json["amountBaseUnits"], "1000000000000");
        assert_eq!(json["priceOrProceeds"], "50006");
        assert_eq!(json["side"], "buy");
    }
}
