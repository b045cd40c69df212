//! End-to-end dispatch and streaming tests against a scripted backend.

use std::sync::Arc;

use hawser_abi::{encode, Abi, ParamKind, Value};
use hawser_contract::{
    create_address, deploy, wait_deployed, BoundContract, CallOpts, ContractError, FilterOpts,
    TransactOpts, TxPollConf, WatchOpts,
};
use hawser_core::{
    BackendError, BlockTag, LogMeta, RawLog, TransactionReceipt, H160, H256, U256,
};
use hawser_test::{ScriptedBackend, StaticAuthorizer};

const TEST_ABI: &str = r#"[
    {"type": "function", "name": "f", "stateMutability": "view",
     "inputs": [
        {"name": "amount", "type": "uint256"},
        {"name": "who", "type": "address"}
     ],
     "outputs": [{"name": "", "type": "bool"}]},
    {"type": "function", "name": "g", "stateMutability": "nonpayable",
     "inputs": [{"name": "text", "type": "string"}],
     "outputs": [{"name": "", "type": "string"}]},
    {"type": "event", "name": "Approval", "anonymous": false,
     "inputs": [
        {"name": "owner", "type": "address", "indexed": true},
        {"name": "token", "type": "address", "indexed": true},
        {"name": "spender", "type": "address", "indexed": true},
        {"name": "amount", "type": "uint160", "indexed": false},
        {"name": "expiration", "type": "uint48", "indexed": false}
     ]},
    {"type": "constructor",
     "inputs": [{"name": "price", "type": "uint256"}],
     "stateMutability": "nonpayable"}
]"#;

fn bound() -> (BoundContract<ScriptedBackend>, Arc<ScriptedBackend>) {
    let abi: Abi = TEST_ABI.parse().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let contract = BoundContract::new(addr(0xc0), Arc::new(abi), Arc::clone(&backend));
    (contract, backend)
}

fn addr(byte: u8) -> H160 {
    H160::repeat_byte(byte)
}

fn address_word(address: H160) -> H256 {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    H256::from(word)
}

fn meta(block: u64, log_index: u64, removed: bool) -> LogMeta {
    LogMeta::new(block, 0, log_index, removed)
}

fn approval_log(abi: &Abi, owner: H160, block: u64, removed: bool) -> (RawLog, LogMeta) {
    let event = &abi.event("Approval").unwrap()[0];
    let data = encode(
        &[ParamKind::Uint(160), ParamKind::Uint(48)],
        &[Value::from(1_000u64), Value::from(7u64)],
    )
    .unwrap();
    let raw = RawLog::new(
        addr(0xc0),
        vec![
            event.topic0(),
            address_word(owner),
            address_word(addr(0xb0)),
            address_word(addr(0xb1)),
        ],
        data,
    );
    (raw, meta(block, 0, removed))
}

#[tokio::test]
async fn simple_read_roundtrip() {
    let (contract, backend) = bound();
    let mut reply = vec![0u8; 32];
    reply[31] = 1;
    backend.expect_call(Ok(reply));

    let results = contract
        .call(
            &CallOpts::default(),
            "f",
            &[Value::from(1u64), Value::Address(addr(0x01))],
        )
        .await
        .unwrap();
    assert_eq!(results, vec![Value::Bool(true)]);

    // The backend saw selector-prefixed calldata for the bound address.
    let calls = backend.calls_seen();
    assert_eq!(calls.len(), 1);
    let (req, block) = &calls[0];
    assert_eq!(*block, BlockTag::Latest);
    assert_eq!(req.to, Some(addr(0xc0)));
    let f = contract.abi().function("f").unwrap()[0].clone();
    assert_eq!(req.data[..4], f.selector());
    assert_eq!(req.data.len(), 4 + 64);
    assert_eq!(req.data[35], 1); // uint256 argument, right-aligned
}

#[tokio::test]
async fn dynamic_string_echo() {
    let (contract, backend) = bound();
    let tail = encode(&[ParamKind::String], &[Value::from("hi")]).unwrap();
    backend.expect_call(Ok(tail));

    let results = contract
        .call(&CallOpts::default(), "g", &[Value::from("hi")])
        .await
        .unwrap();
    assert_eq!(results, vec![Value::from("hi")]);
}

#[tokio::test]
async fn reverts_are_classified() {
    let (contract, backend) = bound();
    let mut reply = hawser_abi::ERROR_SELECTOR.to_vec();
    reply.extend(
        encode(
            &[ParamKind::String],
            &[Value::from("Ownable: caller is not the owner")],
        )
        .unwrap(),
    );
    backend.expect_call(Ok(reply));

    let err = contract
        .call(
            &CallOpts::default(),
            "f",
            &[Value::from(1u64), Value::Address(addr(0x01))],
        )
        .await
        .unwrap_err();
    match err {
        ContractError::Revert(reason) => {
            assert_eq!(reason.to_string(), "Ownable: caller is not the owner")
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn cancellation_passes_through_verbatim() {
    let (contract, backend) = bound();
    backend.expect_call(Err(BackendError::Cancelled));
    let err = contract
        .call(
            &CallOpts::default(),
            "f",
            &[Value::from(1u64), Value::Address(addr(0x01))],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::Cancelled));
}

#[tokio::test]
async fn transact_submits_authorized_calldata() {
    let (contract, backend) = bound();
    let auth = StaticAuthorizer::new(addr(0xee));

    let hash = contract
        .transact(&auth, &TransactOpts::default(), "g", &[Value::from("hey")])
        .await
        .unwrap();

    let sent = backend.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].hash, hash);
    assert_eq!(sent[0].sender, addr(0xee));
    let g = contract.abi().function("g").unwrap()[0].clone();
    assert_eq!(sent[0].raw[..4], g.selector());
}

#[tokio::test]
async fn transfer_carries_no_calldata() {
    let (contract, backend) = bound();
    let auth = StaticAuthorizer::new(addr(0xee));

    contract
        .transfer(&auth, &TransactOpts::with_value(U256::from(5u64)))
        .await
        .unwrap();
    assert!(backend.sent()[0].raw.is_empty());
}

#[tokio::test]
async fn indexed_topic_filters_reach_the_backend() {
    let (contract, backend) = bound();
    let abi = contract.abi().clone();
    let owner = addr(0xaa);
    backend.expect_logs(vec![approval_log(&abi, owner, 10, false)]);

    let mut stream = contract
        .filter_logs(
            &FilterOpts {
                from_block: 0,
                to_block: Some(50),
            },
            "Approval",
            &[
                vec![Value::Address(owner)],
                vec![Value::Address(addr(0xb0)), Value::Address(addr(0xb2))],
                vec![],
            ],
        )
        .await
        .unwrap();

    let queries = backend.queries();
    assert_eq!(queries.len(), 1);
    let event = &abi.event("Approval").unwrap()[0];
    assert_eq!(
        queries[0].topics,
        vec![
            Some(vec![event.topic0()]),
            Some(vec![address_word(owner)]),
            Some(vec![address_word(addr(0xb0)), address_word(addr(0xb2))]),
            None,
        ]
    );

    let record = stream.next().await.unwrap();
    assert_eq!(record.event, "Approval");
    assert_eq!(record.param("owner"), Some(&Value::Address(owner)));
    assert_eq!(record.param("amount"), Some(&Value::from(1_000u64)));
    assert!(stream.next().await.is_none());
    assert!(stream.error().is_none());
}

#[tokio::test]
async fn watch_concatenates_history_and_live_tail() {
    let (contract, backend) = bound();
    let abi = contract.abi().clone();
    backend.set_latest_block(100);
    backend.expect_logs(vec![approval_log(&abi, addr(0x01), 60, false)]);
    let feed = backend.expect_subscription();

    let mut stream = contract
        .watch_logs(
            &WatchOpts {
                from_block: Some(50),
            },
            "Approval",
            &[],
        )
        .await
        .unwrap();

    // Boundary: history covered 50..=100, the live tail starts at 101.
    let queries = backend.queries();
    assert_eq!(queries[0].from_block, 50);
    assert_eq!(queries[0].to_block, Some(100));
    assert_eq!(queries[1].from_block, 101);
    assert_eq!(queries[1].to_block, None);

    let (live_log, live_meta) = approval_log(&abi, addr(0x02), 101, false);
    feed.push(live_log, live_meta);
    drop(feed);

    let first = stream.next().await.unwrap();
    assert_eq!(first.meta.block_number, 60);
    let second = stream.next().await.unwrap();
    assert_eq!(second.meta.block_number, 101);
    assert!(stream.next().await.is_none());
    assert!(stream.error().is_none());
}

#[tokio::test]
async fn reorg_retractions_are_delivered_not_suppressed() {
    let (contract, backend) = bound();
    let abi = contract.abi().clone();
    backend.set_latest_block(10);
    let feed = backend.expect_subscription();

    let mut stream = contract
        .watch_logs(&WatchOpts::default(), "Approval", &[])
        .await
        .unwrap();

    let (inserted, inserted_meta) = approval_log(&abi, addr(0x01), 11, false);
    let (retracted, retracted_meta) = approval_log(&abi, addr(0x01), 11, true);
    feed.push(inserted, inserted_meta);
    feed.push(retracted, retracted_meta);
    drop(feed);

    let first = stream.next().await.unwrap();
    assert!(!first.retracted);
    let second = stream.next().await.unwrap();
    assert!(second.retracted);
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn subscription_errors_latch_after_the_buffer_drains() {
    let (contract, backend) = bound();
    let abi = contract.abi().clone();
    backend.set_latest_block(10);
    let feed = backend.expect_subscription();

    let mut stream = contract
        .watch_logs(&WatchOpts::default(), "Approval", &[])
        .await
        .unwrap();

    let (buffered, buffered_meta) = approval_log(&abi, addr(0x03), 11, false);
    feed.push(buffered, buffered_meta);
    feed.fail(BackendError::SubscriptionClosed);

    // The log queued before the failure is still delivered.
    assert!(stream.next().await.is_some());
    assert!(stream.next().await.is_none());
    assert!(matches!(
        stream.error(),
        Some(ContractError::Backend(BackendError::SubscriptionClosed))
    ));
    // A latched failure still releases the cursor exactly once.
    drop(stream);
    assert_eq!(backend.unsubscribe_count(), 1);
}

#[tokio::test]
async fn close_is_idempotent_and_unsubscribes_once() {
    let (contract, backend) = bound();
    backend.set_latest_block(10);
    let _feed = backend.expect_subscription();

    let mut stream = contract
        .watch_logs(&WatchOpts::default(), "Approval", &[])
        .await
        .unwrap();

    stream.close();
    stream.close();
    assert!(stream.next().await.is_none());
    assert!(matches!(stream.error(), Some(ContractError::Closed)));
    drop(stream);
    assert_eq!(backend.unsubscribe_count(), 1);
}

#[tokio::test]
async fn parse_log_matches_by_topic0() {
    let (contract, _backend) = bound();
    let abi = contract.abi().clone();
    let (raw, raw_meta) = approval_log(&abi, addr(0x09), 5, false);

    let record = contract.parse_log(&raw, raw_meta).unwrap();
    assert_eq!(record.event, "Approval");
    assert_eq!(record.param("owner"), Some(&Value::Address(addr(0x09))));

    let unknown = RawLog::new(addr(0xc0), vec![H256::repeat_byte(0x5a)], vec![]);
    assert!(contract.parse_log(&unknown, meta(5, 0, false)).is_err());
}

#[tokio::test(start_paused = true)]
async fn deploy_binds_the_created_address() -> eyre::Result<()> {
    let abi: Abi = TEST_ABI.parse()?;
    let backend = Arc::new(ScriptedBackend::new());
    let auth = StaticAuthorizer::new(addr(0xee));
    let bytecode = [0x60, 0x80, 0x60, 0x40];

    let (tx_hash, contract) = deploy(
        Arc::clone(&backend),
        &auth,
        Arc::new(abi),
        &bytecode,
        &[Value::from(5u64)],
        &TransactOpts::default(),
    )
    .await?;

    // Init calldata is bytecode followed by the encoded constructor input.
    let sent = backend.sent();
    assert_eq!(sent[0].raw[..4], bytecode);
    assert_eq!(sent[0].raw.len(), 4 + 32);
    assert_eq!(contract.address(), create_address(addr(0xee), 0));

    // First poll: still pending; second poll: mined with the address.
    backend.expect_receipt(None);
    backend.expect_receipt(Some(TransactionReceipt::new(
        tx_hash,
        12,
        true,
        U256::from(21_000u64),
        Some(contract.address()),
    )));
    let deployed_at = wait_deployed(backend.as_ref(), tx_hash, &TxPollConf::default()).await?;
    assert_eq!(deployed_at, contract.address());
    Ok(())
}

#[tokio::test]
async fn expectation_style_mocks_cover_the_backend_traits() {
    let mut mock = hawser_test::mocks::MockLedger::new();
    mock.expect__transaction_receipt()
        .returning(|hash| Ok(Some(TransactionReceipt::new(hash, 3, true, U256::zero(), None))));

    let receipt =
        hawser_contract::wait_mined(&mock, H256::repeat_byte(2), &TxPollConf::default())
            .await
            .unwrap();
    assert_eq!(receipt.block_number, 3);
    assert_eq!(receipt.transaction_hash, H256::repeat_byte(2));
}

#[tokio::test(start_paused = true)]
async fn wait_mined_times_out_on_silence() {
    let backend = ScriptedBackend::new();
    let conf = TxPollConf {
        poll_interval_ms: 10,
        timeout_ms: 25,
    };
    let err = hawser_contract::wait_mined(&backend, H256::repeat_byte(1), &conf)
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::TransactionTimeout(_)));
}
