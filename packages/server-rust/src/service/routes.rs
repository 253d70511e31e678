//! The node's route catalog.
//!
//! Every path the RPC surface answers is registered here, once, at startup.
//! The wallet group goes through the capability gate; everything else is
//! always present.

use std::sync::Arc;

use super::capability::{WalletCapability, WalletHandles};
use super::domain::{
    accounts, assets, backup, blocks, feeds, keys, node, tokens, transactions, wallet, NodeServices,
};
use super::error::BuildError;
use super::handler::JsonHandler;
use super::router::{RouteTable, RouteTableBuilder};

/// Route paths.
pub mod paths {
    pub const CREATE_ACCOUNT: &str = "/create-account";
    pub const UPDATE_ACCOUNT_TAGS: &str = "/update-account-tags";
    pub const CREATE_ACCOUNT_RECEIVER: &str = "/create-account-receiver";
    pub const LIST_ACCOUNTS: &str = "/list-accounts";
    pub const LIST_ADDRESSES: &str = "/list-addresses";
    pub const DELETE_ACCOUNT: &str = "/delete-account";
    pub const VALIDATE_ADDRESS: &str = "/validate-address";

    pub const CREATE_ASSET: &str = "/create-asset";
    pub const UPDATE_ASSET_ALIAS: &str = "/update-asset-alias";
    pub const UPDATE_ASSET_TAGS: &str = "/update-asset-tags";
    pub const LIST_ASSETS: &str = "/list-assets";

    pub const CREATE_KEY: &str = "/create-key";
    pub const LIST_KEYS: &str = "/list-keys";
    pub const DELETE_KEY: &str = "/delete-key";
    pub const RESET_KEY_PASSWORD: &str = "/reset-key-password";

    pub const GET_TRANSACTION: &str = "/get-transaction";
    pub const LIST_TRANSACTIONS: &str = "/list-transactions";
    pub const LIST_BALANCES: &str = "/list-balances";

    pub const BUILD_TRANSACTION: &str = "/build-transaction";
    pub const SIGN_TRANSACTION: &str = "/sign-transaction";
    pub const SUBMIT_TRANSACTION: &str = "/submit-transaction";
    pub const SIGN_SUBMIT_TRANSACTION: &str = "/sign-submit-transaction";

    pub const CREATE_TRANSACTION_FEED: &str = "/create-transaction-feed";
    pub const GET_TRANSACTION_FEED: &str = "/get-transaction-feed";
    pub const UPDATE_TRANSACTION_FEED: &str = "/update-transaction-feed";
    pub const DELETE_TRANSACTION_FEED: &str = "/delete-transaction-feed";
    pub const LIST_TRANSACTION_FEEDS: &str = "/list-transaction-feeds";
    pub const LIST_UNSPENT_OUTPUTS: &str = "/list-unspent-outputs";

    pub const INFO: &str = "/info";
    pub const NET_INFO: &str = "/net-info";
    pub const IS_MINING: &str = "/is-mining";
    pub const GAS_RATE: &str = "/gas-rate";
    pub const GET_WORK: &str = "/getwork";
    pub const SUBMIT_WORK: &str = "/submitwork";
    pub const BLOCK_HASH: &str = "/block-hash";

    pub const GET_BLOCK_HEADER_BY_HASH: &str = "/get-block-header-by-hash";
    pub const GET_BLOCK_HEADER_BY_HEIGHT: &str = "/get-block-header-by-height";
    pub const GET_BLOCK: &str = "/get-block";
    pub const GET_BLOCK_COUNT: &str = "/get-block-count";
    pub const GET_BLOCK_TRANSACTIONS_COUNT_BY_HASH: &str = "/get-block-transactions-count-by-hash";
    pub const GET_BLOCK_TRANSACTIONS_COUNT_BY_HEIGHT: &str =
        "/get-block-transactions-count-by-height";

    pub const CREATE_ACCESS_TOKEN: &str = "/create-access-token";
    pub const LIST_ACCESS_TOKENS: &str = "/list-access-tokens";
    pub const DELETE_ACCESS_TOKEN: &str = "/delete-access-token";
    pub const CHECK_ACCESS_TOKEN: &str = "/check-access-token";

    pub const EXPORT_PRIVATE_KEY: &str = "/export-private-key";
    pub const IMPORT_PRIVATE_KEY: &str = "/import-private-key";
    pub const IMPORT_KEY_PROGRESS: &str = "/import-key-progress";
}

use paths::*;

/// Paths registered only when the wallet is available.
pub const WALLET_ROUTES: &[&str] = &[
    CREATE_ACCOUNT,
    UPDATE_ACCOUNT_TAGS,
    CREATE_ACCOUNT_RECEIVER,
    LIST_ACCOUNTS,
    LIST_ADDRESSES,
    DELETE_ACCOUNT,
    VALIDATE_ADDRESS,
    CREATE_ASSET,
    UPDATE_ASSET_ALIAS,
    UPDATE_ASSET_TAGS,
    LIST_ASSETS,
    CREATE_KEY,
    LIST_KEYS,
    DELETE_KEY,
    RESET_KEY_PASSWORD,
    GET_TRANSACTION,
    LIST_TRANSACTIONS,
    LIST_BALANCES,
];

/// Builds the frozen route table for a node.
///
/// # Errors
///
/// Returns [`BuildError`] if a path is malformed or registered twice.
pub fn build_route_table(
    services: &NodeServices,
    wallet: &WalletCapability,
) -> Result<RouteTable, BuildError> {
    let mut table = RouteTable::builder();

    match wallet.resolve() {
        Some(handles) => register_wallet_routes(&mut table, &handles, services)?,
        None => tracing::warn!(
            capability = ?wallet,
            "wallet unavailable, wallet routes are not registered"
        ),
    }
    register_node_routes(&mut table, services)?;

    let table = table.build();
    tracing::debug!(routes = table.len(), "route table built");
    Ok(table)
}

fn register_wallet_routes(
    table: &mut RouteTableBuilder,
    handles: &WalletHandles,
    services: &NodeServices,
) -> Result<(), BuildError> {
    let keystore = &services.keys;

    table
        .route(CREATE_ACCOUNT, JsonHandler::call(handles.clone(), accounts::create_account))?
        .route(UPDATE_ACCOUNT_TAGS, JsonHandler::exec(handles.clone(), accounts::update_account_tags))?
        .route(CREATE_ACCOUNT_RECEIVER, JsonHandler::call(handles.clone(), accounts::create_account_receiver))?
        .route(LIST_ACCOUNTS, JsonHandler::call(handles.clone(), accounts::list_accounts))?
        .route(LIST_ADDRESSES, JsonHandler::call(handles.clone(), accounts::list_addresses))?
        .route(DELETE_ACCOUNT, JsonHandler::exec(handles.clone(), accounts::delete_account))?
        .route(VALIDATE_ADDRESS, JsonHandler::call(handles.clone(), accounts::validate_address))?
        .route(CREATE_ASSET, JsonHandler::call(handles.clone(), assets::create_asset))?
        .route(UPDATE_ASSET_ALIAS, JsonHandler::exec(handles.clone(), assets::update_asset_alias))?
        .route(UPDATE_ASSET_TAGS, JsonHandler::exec(handles.clone(), assets::update_asset_tags))?
        .route(LIST_ASSETS, JsonHandler::call(handles.clone(), assets::list_assets))?
        .route(CREATE_KEY, JsonHandler::call(Arc::clone(keystore), keys::create_key))?
        .route(LIST_KEYS, JsonHandler::query(Arc::clone(keystore), keys::list_keys))?
        .route(DELETE_KEY, JsonHandler::exec(Arc::clone(keystore), keys::delete_key))?
        .route(RESET_KEY_PASSWORD, JsonHandler::call(Arc::clone(keystore), keys::reset_key_password))?
        .route(GET_TRANSACTION, JsonHandler::call(handles.clone(), wallet::get_transaction))?
        .route(LIST_TRANSACTIONS, JsonHandler::call(handles.clone(), wallet::list_transactions))?
        .route(LIST_BALANCES, JsonHandler::query(handles.clone(), wallet::list_balances))?;
    Ok(())
}

fn register_node_routes(table: &mut RouteTableBuilder, s: &NodeServices) -> Result<(), BuildError> {
    table
        .route(BUILD_TRANSACTION, JsonHandler::call(Arc::clone(&s.transactions), transactions::build_transaction))?
        .route(SIGN_TRANSACTION, JsonHandler::call(Arc::clone(&s.transactions), transactions::sign_transaction))?
        .route(SUBMIT_TRANSACTION, JsonHandler::call(Arc::clone(&s.transactions), transactions::submit_transaction))?
        .route(SIGN_SUBMIT_TRANSACTION, JsonHandler::call(Arc::clone(&s.transactions), transactions::sign_submit_transaction))?;

    table
        .route(CREATE_TRANSACTION_FEED, JsonHandler::exec(Arc::clone(&s.feeds), feeds::create_transaction_feed))?
        .route(GET_TRANSACTION_FEED, JsonHandler::call(Arc::clone(&s.feeds), feeds::get_transaction_feed))?
        .route(UPDATE_TRANSACTION_FEED, JsonHandler::exec(Arc::clone(&s.feeds), feeds::update_transaction_feed))?
        .route(DELETE_TRANSACTION_FEED, JsonHandler::exec(Arc::clone(&s.feeds), feeds::delete_transaction_feed))?
        .route(LIST_TRANSACTION_FEEDS, JsonHandler::query(Arc::clone(&s.feeds), feeds::list_transaction_feeds))?
        .route(LIST_UNSPENT_OUTPUTS, JsonHandler::call(Arc::clone(&s.chain), blocks::list_unspent_outputs))?;

    table
        .route(INFO, JsonHandler::query(Arc::clone(&s.node), node::info))?
        .route(NET_INFO, JsonHandler::query(Arc::clone(&s.node), node::net_info))?
        .route(IS_MINING, JsonHandler::query(Arc::clone(&s.miner), node::is_mining))?
        .route(GAS_RATE, JsonHandler::query(Arc::clone(&s.miner), node::gas_rate))?
        .route(GET_WORK, JsonHandler::query(Arc::clone(&s.miner), node::get_work))?
        .route(SUBMIT_WORK, JsonHandler::call(Arc::clone(&s.miner), node::submit_work))?
        .route(BLOCK_HASH, JsonHandler::query(Arc::clone(&s.chain), blocks::block_hash))?;

    table
        .route(GET_BLOCK_HEADER_BY_HASH, JsonHandler::call(Arc::clone(&s.chain), blocks::get_block_header_by_hash))?
        .route(GET_BLOCK_HEADER_BY_HEIGHT, JsonHandler::call(Arc::clone(&s.chain), blocks::get_block_header_by_height))?
        .route(GET_BLOCK, JsonHandler::call(Arc::clone(&s.chain), blocks::get_block))?
        .route(GET_BLOCK_COUNT, JsonHandler::query(Arc::clone(&s.chain), blocks::get_block_count))?
        .route(
            GET_BLOCK_TRANSACTIONS_COUNT_BY_HASH,
            JsonHandler::call(Arc::clone(&s.chain), blocks::get_block_transactions_count_by_hash),
        )?
        .route(
            GET_BLOCK_TRANSACTIONS_COUNT_BY_HEIGHT,
            JsonHandler::call(Arc::clone(&s.chain), blocks::get_block_transactions_count_by_height),
        )?;

    table
        .route(CREATE_ACCESS_TOKEN, JsonHandler::call(Arc::clone(&s.tokens), tokens::create_access_token))?
        .route(LIST_ACCESS_TOKENS, JsonHandler::query(Arc::clone(&s.tokens), tokens::list_access_tokens))?
        .route(DELETE_ACCESS_TOKEN, JsonHandler::exec(Arc::clone(&s.tokens), tokens::delete_access_token))?
        .route(CHECK_ACCESS_TOKEN, JsonHandler::exec(Arc::clone(&s.tokens), tokens::check_access_token))?;

    table
        .route(EXPORT_PRIVATE_KEY, JsonHandler::call(Arc::clone(&s.backup), backup::export_private_key))?
        .route(IMPORT_PRIVATE_KEY, JsonHandler::call(Arc::clone(&s.backup), backup::import_private_key))?
        .route(IMPORT_KEY_PROGRESS, JsonHandler::query(Arc::clone(&s.backup), backup::import_key_progress))?;

    Ok(())
}
