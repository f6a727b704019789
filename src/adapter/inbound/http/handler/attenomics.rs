//! Creator-token endpoints: prices, quotes, trades and protocol setup.

use solana_sdk::pubkey::Pubkey;
use tracing::info;
use warp::reply::Response;
use warp::Rejection;

use super::reply::ok;
use crate::adapter::inbound::http::dto::{
    parse_pubkey, BuyBody, DeployBody, DeployResponse, HealthResponse, InitializeBody,
    MetadataResponse, QuoteQuery, QuoteResponse, SellBody, SetAiAgentBody, SubmittedResponse,
    SwapBody, SwapQuoteQuery, SwapQuoteResponse, SwapResponse, TokenMintQuery, TokenPriceResponse,
    TradeResponse,
};
use crate::adapter::inbound::http::error::reject;
use crate::adapter::inbound::http::state::AppState;
use crate::application::protocol::DeployRequest;
use crate::application::trade::{BuyRequest, SellRequest, SwapRequest};
use crate::domain::amount::{to_base_units, to_positive_base_units};
use crate::error::Result;
use crate::program::attenomics::{DistributorConfig, TokenMetadata, VaultConfig};

pub async fn health() -> std::result::Result<Response, Rejection> {
    Ok(ok(&HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn token_price(query: TokenMintQuery, state: AppState) -> std::result::Result<Response, Rejection> {
    let mint = parse_pubkey("tokenMint", &query.token_mint).map_err(reject)?;
    let price = state.quotes.token_price(&mint).await.map_err(reject)?;
    Ok(ok(&TokenPriceResponse::from(price)))
}

pub async fn quote_buy(query: QuoteQuery, state: AppState) -> std::result::Result<Response, Rejection> {
    let mint = parse_pubkey("tokenMint", &query.token_mint).map_err(reject)?;
    let amount = to_positive_base_units(query.amount).map_err(reject)?;
    let quote = state.quotes.quote_buy(&mint, u128::from(amount)).await.map_err(reject)?;
    Ok(ok(&QuoteResponse::new(&mint, &quote)))
}

pub async fn quote_sell(query: QuoteQuery, state: AppState) -> std::result::Result<Response, Rejection> {
    let mint = parse_pubkey("tokenMint", &query.token_mint).map_err(reject)?;
    let amount = to_positive_base_units(query.amount).map_err(reject)?;
    let quote = state.quotes.quote_sell(&mint, u128::from(amount)).await.map_err(reject)?;
    Ok(ok(&QuoteResponse::new(&mint, &quote)))
}

pub async fn quote_swap(query: SwapQuoteQuery, state: AppState) -> std::result::Result<Response, Rejection> {
    let source = parse_pubkey("sourceTokenMint", &query.source_token_mint).map_err(reject)?;
    let target = parse_pubkey("targetTokenMint", &query.target_token_mint).map_err(reject)?;
    let amount_in = to_positive_base_units(query.amount_in).map_err(reject)?;
    let quote = state
        .quotes
        .quote_swap(&source, &target, u128::from(amount_in))
        .await
        .map_err(reject)?;
    Ok(ok(&SwapQuoteResponse::new(&source, &target, &quote)))
}

fn or_default(field: &'static str, value: Option<&String>, fallback: Pubkey) -> Result<Pubkey> {
    value.map_or(Ok(fallback), |value| parse_pubkey(field, value))
}

pub async fn initialize(body: InitializeBody, state: AppState) -> std::result::Result<Response, Rejection> {
    let gaslite = or_default(
        "gasliteDropAddress",
        body.gaslite_drop_address.as_ref(),
        state.defaults.gaslite_drop,
    )
    .map_err(reject)?;
    let fee = or_default(
        "protocolFeeAddress",
        body.protocol_fee_address.as_ref(),
        state.defaults.protocol_fee,
    )
    .map_err(reject)?;

    let signature = state.protocol.initialize(&gaslite, &fee).await.map_err(reject)?;
    Ok(ok(&SubmittedResponse {
        message: "protocol initialized".into(),
        signature: signature.to_string(),
        address: Some(state.quotes.program().entry_point().to_string()),
    }))
}

pub async fn initialize_swap_router(state: AppState) -> std::result::Result<Response, Rejection> {
    let signature = state.protocol.initialize_swap_router().await.map_err(reject)?;
    Ok(ok(&SubmittedResponse {
        message: "swap router initialized".into(),
        signature: signature.to_string(),
        address: Some(state.quotes.program().swap_router().to_string()),
    }))
}

pub async fn set_ai_agent(body: SetAiAgentBody, state: AppState) -> std::result::Result<Response, Rejection> {
    let agent = parse_pubkey("agent", &body.agent).map_err(reject)?;
    let signature = state
        .protocol
        .set_ai_agent(&agent, body.allowed)
        .await
        .map_err(reject)?;
    Ok(ok(&SubmittedResponse {
        message: format!("ai agent {agent} allowed={}", body.allowed),
        signature: signature.to_string(),
        address: Some(state.quotes.program().ai_agent(&agent).to_string()),
    }))
}

fn deploy_request(body: &DeployBody) -> Result<DeployRequest> {
    let vault = match &body.vault_config {
        Some(v) => VaultConfig {
            drip_percentage: v.drip_percentage,
            drip_interval: v.drip_interval,
            lock_time: v.lock_time,
            locked_percentage: v.locked_percentage,
        },
        None => VaultConfig::default(),
    };
    let distributor = match &body.distributor_config {
        Some(d) => DistributorConfig {
            daily_drip_amount: to_positive_base_units(d.daily_drip_amount)?,
            drip_interval: d.drip_interval,
            total_days: d.total_days,
        },
        None => DistributorConfig::default(),
    };
    Ok(DeployRequest {
        handle: body.handle.clone(),
        metadata: TokenMetadata {
            name: body.name.clone(),
            symbol: body.symbol.clone(),
            uri: body.nft_metadata_uri.clone(),
        },
        total_supply: u128::from(to_base_units(body.total_supply)?),
        self_percent: body.self_percent,
        market_percent: body.market_percent,
        supporter_percent: body.supporter_percent,
        ai_agent: parse_pubkey("aiAgent", &body.ai_agent)?,
        distributor,
        vault,
    })
}

pub async fn deploy_creator_token(body: DeployBody, state: AppState) -> std::result::Result<Response, Rejection> {
    let request = deploy_request(&body).map_err(reject)?;
    let receipt = state
        .protocol
        .deploy_creator_token(&request)
        .await
        .map_err(reject)?;
    let metadata = MetadataResponse {
        name: request.metadata.name,
        symbol: request.metadata.symbol,
        uri: request.metadata.uri,
    };
    Ok(ok(&DeployResponse::new(&receipt, metadata)))
}

pub async fn buy(body: BuyBody, state: AppState) -> std::result::Result<Response, Rejection> {
    let request = BuyRequest {
        mint: parse_pubkey("tokenMint", &body.token_mint).map_err(reject)?,
        amount: to_positive_base_units(body.amount).map_err(reject)?,
        use_native_sol: body.use_native_sol,
        max_amount_in: body
            .max_amount_in
            .map(to_base_units)
            .transpose()
            .map_err(reject)?,
    };
    let receipt = state.trades.buy(&request).await.map_err(reject)?;
    info!(mint = %request.mint, signature = %receipt.signature, "buy request served");
    Ok(ok(&TradeResponse {
        message: format!("bought {} tokens", body.amount),
        signature: receipt.signature.to_string(),
        quote: QuoteResponse::new(&request.mint, &receipt.quote),
    }))
}

pub async fn sell(body: SellBody, state: AppState) -> std::result::Result<Response, Rejection> {
    let request = SellRequest {
        mint: parse_pubkey("tokenMint", &body.token_mint).map_err(reject)?,
        amount: to_positive_base_units(body.amount).map_err(reject)?,
        min_amount_out: body
            .min_amount_out
            .map(to_base_units)
            .transpose()
            .map_err(reject)?,
    };
    let receipt = state.trades.sell(&request).await.map_err(reject)?;
    Ok(ok(&TradeResponse {
        message: format!("sold {} tokens", body.amount),
        signature: receipt.signature.to_string(),
        quote: QuoteResponse::new(&request.mint, &receipt.quote),
    }))
}

pub async fn swap_tokens(body: SwapBody, state: AppState) -> std::result::Result<Response, Rejection> {
    let request = SwapRequest {
        source_mint: parse_pubkey("sourceTokenMint", &body.source_token_mint).map_err(reject)?,
        target_mint: parse_pubkey("targetTokenMint", &body.target_token_mint).map_err(reject)?,
        amount_in: to_positive_base_units(body.amount_in).map_err(reject)?,
        min_amount_out: to_base_units(body.min_amount_out).map_err(reject)?,
    };
    let receipt = state.trades.swap(&request).await.map_err(reject)?;
    Ok(ok(&SwapResponse {
        message: format!("swapped {} source tokens", body.amount_in),
        signature: receipt.signature.to_string(),
        quote: SwapQuoteResponse::new(&request.source_mint, &request.target_mint, &receipt.quote),
    }))
}
