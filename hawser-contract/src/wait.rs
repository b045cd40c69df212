use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use hawser_abi::RevertReason;
use hawser_core::{TransactionReceipt, Transactor, H160, H256};

use crate::{ContractError, ContractResult, TxPollConf};

/// Poll for the receipt of a submitted transaction until it is mined or
/// the configured deadline passes.
pub async fn wait_mined<T: Transactor>(
    backend: &T,
    tx_hash: H256,
    conf: &TxPollConf,
) -> ContractResult<TransactionReceipt> {
    let deadline = Instant::now() + conf.timeout();
    loop {
        match backend
            .transaction_receipt(tx_hash)
            .await
            .map_err(ContractError::from)?
        {
            Some(receipt) => {
                info!(tx = ?tx_hash, block = receipt.block_number, "transaction mined");
                return Ok(receipt);
            }
            None => {
                if Instant::now() >= deadline {
                    warn!(tx = ?tx_hash, "gave up waiting for receipt");
                    return Err(ContractError::TransactionTimeout(tx_hash));
                }
                debug!(tx = ?tx_hash, "receipt not yet available");
                sleep(conf.poll_interval()).await;
            }
        }
    }
}

/// Wait for a deployment to be mined and return the created contract's
/// address. Fails if the create reverted or the receipt names no
/// contract.
pub async fn wait_deployed<T: Transactor>(
    backend: &T,
    tx_hash: H256,
    conf: &TxPollConf,
) -> ContractResult<H160> {
    let receipt = wait_mined(backend, tx_hash, conf).await?;
    if !receipt.status {
        return Err(ContractError::Revert(RevertReason::Empty));
    }
    receipt
        .contract_address
        .ok_or(ContractError::NotADeployment(tx_hash))
}
