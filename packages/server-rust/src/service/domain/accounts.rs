//! Account lifecycle routes (wallet-gated).

use noderpc_core::messages::{
    Account, AddressInfo, AddressValidation, CreateAccountRequest, CreateReceiverRequest,
    DeleteAccountRequest, ListAccountsRequest, ListAddressesRequest, Receiver,
    UpdateAccountTagsRequest, ValidateAddressRequest,
};
use noderpc_core::ServiceError;

use crate::service::capability::WalletHandles;
use crate::service::operation::OperationContext;

pub async fn create_account(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: CreateAccountRequest,
) -> Result<Account, ServiceError> {
    let account = wallet.accounts.create(req).await?;
    tracing::info!(id = %account.id, alias = %account.alias, "created account");
    Ok(account)
}

pub async fn update_account_tags(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: UpdateAccountTagsRequest,
) -> Result<(), ServiceError> {
    wallet.accounts.update_tags(&req.account_info, req.tags).await
}

pub async fn create_account_receiver(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: CreateReceiverRequest,
) -> Result<Receiver, ServiceError> {
    wallet
        .accounts
        .create_receiver(&req.account_info, req.expires_at)
        .await
}

pub async fn list_accounts(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: ListAccountsRequest,
) -> Result<Vec<Account>, ServiceError> {
    wallet.accounts.list(&req.id).await
}

/// Lists the addresses of one account, change addresses included.
///
/// `account_alias` wins over `account_id` when both are given. Programs
/// without an address are skipped.
pub async fn list_addresses(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: ListAddressesRequest,
) -> Result<Vec<AddressInfo>, ServiceError> {
    let account = if req.account_alias.is_empty() {
        if req.account_id.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "account_id or account_alias is required".into(),
            ));
        }
        wallet
            .accounts
            .list(&req.account_id)
            .await?
            .into_iter()
            .find(|a| a.id == req.account_id)
            .ok_or_else(|| ServiceError::not_found("account", &req.account_id))?
    } else {
        wallet.accounts.find_by_alias(&req.account_alias).await?
    };

    let programs = wallet.accounts.control_programs(&account.id).await?;
    Ok(programs
        .into_iter()
        .filter(|cp| !cp.address.is_empty() && cp.account_id == account.id)
        .map(|cp| AddressInfo {
            account_alias: account.alias.clone(),
            account_id: cp.account_id,
            address: cp.address,
            change: cp.change,
        })
        .collect())
}

pub async fn delete_account(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: DeleteAccountRequest,
) -> Result<(), ServiceError> {
    wallet.accounts.delete(&req.account_info).await?;
    tracing::info!(account = %req.account_info, "deleted account");
    Ok(())
}

/// Reports whether an address decodes under the node's network and, if so,
/// whether it belongs to this wallet. An undecodable address is an answer,
/// not a failure.
pub async fn validate_address(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: ValidateAddressRequest,
) -> Result<AddressValidation, ServiceError> {
    let Ok(program) = wallet.accounts.decode_address(&req.address) else {
        return Ok(AddressValidation {
            valid: false,
            is_local: false,
        });
    };
    let is_local = wallet.accounts.is_local_program(&program).await?;
    Ok(AddressValidation {
        valid: true,
        is_local,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::service::capability::WalletCapability;
    use crate::testing::{control_program, FakeWallet};

    fn wallet() -> WalletHandles {
        let fake = Arc::new(
            FakeWallet::default()
                .with_account("acc-1", "alice")
                .with_account("acc-2", "bob")
                .with_program(control_program("acc-1", "bm1qalice0", false))
                .with_program(control_program("acc-1", "bm1qalice1", true))
                .with_program(control_program("acc-1", "", false))
                .with_program(control_program("acc-2", "bm1qbob0", false)),
        );
        WalletCapability::enabled(fake.clone(), fake.clone(), fake)
            .resolve()
            .unwrap()
    }

    fn ctx() -> OperationContext {
        OperationContext::new("/list-addresses")
    }

    #[tokio::test]
    async fn list_addresses_resolves_alias_and_skips_empty_addresses() {
        let req = ListAddressesRequest {
            account_id: String::new(),
            account_alias: "alice".into(),
        };
        let addresses = list_addresses(wallet(), ctx(), req).await.unwrap();

        let found: Vec<_> = addresses.iter().map(|a| (a.address.as_str(), a.change)).collect();
        assert_eq!(found, vec![("bm1qalice0", false), ("bm1qalice1", true)]);
        assert!(addresses.iter().all(|a| a.account_alias == "alice"));
    }

    #[tokio::test]
    async fn list_addresses_by_id() {
        let req = ListAddressesRequest {
            account_id: "acc-2".into(),
            account_alias: String::new(),
        };
        let addresses = list_addresses(wallet(), ctx(), req).await.unwrap();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].account_alias, "bob");
    }

    #[tokio::test]
    async fn list_addresses_requires_an_account() {
        let err = list_addresses(wallet(), ctx(), ListAddressesRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let req = ListAddressesRequest {
            account_id: "acc-404".into(),
            account_alias: String::new(),
        };
        let err = list_addresses(wallet(), ctx(), req).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn validate_address_never_fails_on_garbage() {
        let req = ValidateAddressRequest {
            address: "not-an-address".into(),
        };
        let result = validate_address(wallet(), ctx(), req).await.unwrap();
        assert_eq!(
            result,
            AddressValidation {
                valid: false,
                is_local: false
            }
        );
    }

    #[tokio::test]
    async fn validate_address_reports_ownership() {
        let local = ValidateAddressRequest {
            address: "bm1qalice0".into(),
        };
        let foreign = ValidateAddressRequest {
            address: "bm1qcarol".into(),
        };
        assert!(validate_address(wallet(), ctx(), local).await.unwrap().is_local);

        let result = validate_address(wallet(), ctx(), foreign).await.unwrap();
        assert!(result.valid);
        assert!(!result.is_local);
    }
}
