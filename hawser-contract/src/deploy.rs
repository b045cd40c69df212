use std::sync::Arc;

use tracing::{info, instrument};

use hawser_abi::util::keccak256;
use hawser_abi::{Abi, Value};
use hawser_core::{Authorizer, Backend, TransactionRequest, H160, H256};

use crate::{BoundContract, ContractError, ContractResult, TransactOpts};

/// Deploy a contract: init calldata is the compiled bytecode concatenated
/// with the tuple-encoded constructor inputs, with no selector.
///
/// Returns the submission hash and a contract bound to the address the
/// create will land at, derived from the authorized sender and nonce.
/// The binding is usable once the deployment is mined; pair with
/// [`crate::wait_deployed`] to block until then.
#[instrument(err, skip_all)]
pub async fn deploy<B: Backend, A: Authorizer>(
    backend: Arc<B>,
    auth: &A,
    abi: Arc<Abi>,
    bytecode: &[u8],
    args: &[Value],
    opts: &TransactOpts,
) -> ContractResult<(H256, BoundContract<B>)> {
    let constructor = abi.constructor.clone().unwrap_or_default();
    let data = constructor.encode_input(bytecode, args)?;

    let req = TransactionRequest::new(None, opts.value, data, opts.gas_limit, opts.gas_price);
    let signed = auth.authorize(req).await.map_err(ContractError::from)?;
    let deployed_at = create_address(signed.sender, signed.nonce);

    let hash = backend
        .send_transaction(&signed)
        .await
        .map_err(ContractError::from)?;
    info!(tx = ?hash, address = ?deployed_at, "dispatched deployment");
    Ok((hash, BoundContract::new(deployed_at, abi, backend)))
}

/// The address a contract created by `sender` at `nonce` lands at:
/// `keccak256(rlp([sender, nonce]))[12..]`.
pub fn create_address(sender: H160, nonce: u64) -> H160 {
    let mut stream = rlp::RlpStream::new_list(2);
    stream.append(&sender.as_bytes().to_vec());
    stream.append(&nonce);
    let hash = keccak256(stream.out().as_ref());
    H160::from_slice(&hash.as_bytes()[12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_addresses_match_the_ledger_rule() {
        // Well-known vectors for CREATE address derivation.
        let sender: H160 = "0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0"
            .parse()
            .unwrap();
        assert_eq!(
            create_address(sender, 0),
            "0xcd234a471b72ba2f1ccf0a70fcaba648a5eecd8d"
                .parse::<H160>()
                .unwrap()
        );
        assert_eq!(
            create_address(sender, 1),
            "0x343c43a37d37dff08ae8c4a11544c718abb4fcf8"
                .parse::<H160>()
                .unwrap()
        );
    }
}
