//! Wallet history and balance routes (wallet-gated).

use std::collections::BTreeMap;

use anyhow::anyhow;
use noderpc_core::messages::{
    AccountBalance, AnnotatedTx, GetTransactionRequest, ListTransactionsRequest, TransactionList,
    TxSummary, UnspentOutput,
};
use noderpc_core::ServiceError;

use crate::service::capability::WalletHandles;
use crate::service::operation::OperationContext;

pub async fn get_transaction(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: GetTransactionRequest,
) -> Result<AnnotatedTx, ServiceError> {
    wallet.ledger.get_transaction(&req.tx_id).await
}

/// Lists wallet transactions, optionally narrowed to those touching one
/// account. Without `detail` each transaction is reduced to a summary.
pub async fn list_transactions(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: ListTransactionsRequest,
) -> Result<TransactionList, ServiceError> {
    let mut txs = wallet.ledger.list_transactions(&req.id).await?;
    if !req.account_id.is_empty() {
        txs.retain(|tx| {
            tx.inputs
                .iter()
                .chain(&tx.outputs)
                .any(|entry| entry.touches_account(&req.account_id))
        });
    }

    Ok(if req.detail {
        TransactionList::Detailed(txs)
    } else {
        TransactionList::Summary(txs.into_iter().map(TxSummary::from).collect())
    })
}

pub async fn list_balances(
    wallet: WalletHandles,
    _ctx: OperationContext,
) -> Result<Vec<AccountBalance>, ServiceError> {
    let outputs = wallet.ledger.unspent_outputs().await?;
    aggregate_balances(outputs)
}

/// Sums unspent outputs per `(account_id, asset_id)`, ordered by that key.
fn aggregate_balances(outputs: Vec<UnspentOutput>) -> Result<Vec<AccountBalance>, ServiceError> {
    let mut totals: BTreeMap<(String, String), AccountBalance> = BTreeMap::new();

    for utxo in outputs {
        let key = (utxo.account_id.clone(), utxo.asset_id.clone());
        match totals.get_mut(&key) {
            Some(balance) => {
                balance.amount = balance.amount.checked_add(utxo.amount).ok_or_else(|| {
                    ServiceError::from(anyhow!(
                        "balance overflow for account {} asset {}",
                        utxo.account_id,
                        utxo.asset_id
                    ))
                })?;
            }
            None => {
                totals.insert(
                    key,
                    AccountBalance {
                        account_id: utxo.account_id,
                        account_alias: utxo.account_alias,
                        asset_id: utxo.asset_id,
                        asset_alias: utxo.asset_alias,
                        amount: utxo.amount,
                    },
                );
            }
        }
    }

    Ok(totals.into_values().collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use noderpc_core::messages::AnnotatedEntry;

    use super::*;
    use crate::service::capability::WalletCapability;
    use crate::testing::{annotated_tx, unspent, FakeWallet};

    fn handles(fake: FakeWallet) -> WalletHandles {
        let fake = Arc::new(fake);
        WalletCapability::enabled(fake.clone(), fake.clone(), fake)
            .resolve()
            .unwrap()
    }

    #[test]
    fn balances_are_summed_per_account_and_asset() {
        let balances = aggregate_balances(vec![
            unspent("acc-2", "btm", 5),
            unspent("acc-1", "btm", 10),
            unspent("acc-1", "gold", 1),
            unspent("acc-1", "btm", 32),
        ])
        .unwrap();

        let got: Vec<_> = balances
            .iter()
            .map(|b| (b.account_id.as_str(), b.asset_id.as_str(), b.amount))
            .collect();
        assert_eq!(
            got,
            vec![("acc-1", "btm", 42), ("acc-1", "gold", 1), ("acc-2", "btm", 5)]
        );
    }

    #[test]
    fn balance_overflow_is_internal() {
        let err = aggregate_balances(vec![
            unspent("acc-1", "btm", u64::MAX),
            unspent("acc-1", "btm", 1),
        ])
        .unwrap_err();
        assert!(err.code().is_none());
    }

    #[tokio::test]
    async fn list_transactions_filters_by_account_and_summarizes() {
        let wallet = handles(
            FakeWallet::default()
                .with_transaction(annotated_tx("tx-1", "acc-1"))
                .with_transaction(annotated_tx("tx-2", "acc-2")),
        );
        let req = ListTransactionsRequest {
            id: String::new(),
            account_id: "acc-2".into(),
            detail: false,
        };

        let list = list_transactions(wallet, OperationContext::new("/list-transactions"), req)
            .await
            .unwrap();
        let TransactionList::Summary(summaries) = list else {
            panic!("expected summaries, got {list:?}");
        };
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].tx_id, "tx-2");
        assert!(summaries[0]
            .outputs
            .iter()
            .all(|e: &AnnotatedEntry| e.address.is_none()));
    }

    #[tokio::test]
    async fn list_transactions_with_detail_keeps_everything() {
        let wallet = handles(
            FakeWallet::default()
                .with_transaction(annotated_tx("tx-1", "acc-1"))
                .with_transaction(annotated_tx("tx-2", "acc-2")),
        );
        let req = ListTransactionsRequest {
            detail: true,
            ..ListTransactionsRequest::default()
        };

        let list = list_transactions(wallet, OperationContext::new("/list-transactions"), req)
            .await
            .unwrap();
        assert!(matches!(list, TransactionList::Detailed(txs) if txs.len() == 2));
    }
}
