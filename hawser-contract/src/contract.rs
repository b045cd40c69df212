use std::sync::Arc;

use tracing::{debug, info, instrument};

use hawser_abi::{make_topics, Abi, AbiError, DecodedLog, Event, Value};
use hawser_core::utils::fmt_bytes;
use hawser_core::{
    Authorizer, Backend, CallRequest, LogMeta, LogQuery, RawLog, TransactionRequest, H160, H256,
    U256,
};

use crate::dispatch::{decode_reply, resolve};
use crate::stream::EventStream;
use crate::{CallOpts, ContractError, ContractResult, FilterOpts, TransactOpts, WatchOpts};

/// A contract bound to an address and a backend.
///
/// Cheap to clone and safe for concurrent shared use: the schema is
/// immutable and the facade holds no mutable state of its own. All
/// timeouts and cancellation are the backend's concern; every method
/// here simply suspends until the backend answers.
pub struct BoundContract<B> {
    address: H160,
    abi: Arc<Abi>,
    backend: Arc<B>,
}

impl<B> Clone for BoundContract<B> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            abi: Arc::clone(&self.abi),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B> std::fmt::Debug for BoundContract<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundContract")
            .field("address", &self.address)
            .finish()
    }
}

impl<B> BoundContract<B> {
    /// Bind `abi` at `address` on top of `backend`.
    pub fn new(address: H160, abi: Arc<Abi>, backend: Arc<B>) -> Self {
        Self {
            address,
            abi,
            backend,
        }
    }

    /// The bound address.
    pub fn address(&self) -> H160 {
        self.address
    }

    /// The bound schema.
    pub fn abi(&self) -> &Arc<Abi> {
        &self.abi
    }

    /// The bound backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

impl<B: Backend> BoundContract<B> {
    /// Invoke a read-only method and decode its reply.
    ///
    /// The method is resolved by name and argument shape, so overloads
    /// are handled as long as exactly one accepts the supplied values.
    #[instrument(err, skip(self, args), fields(contract = ?self.address))]
    pub async fn call(
        &self,
        opts: &CallOpts,
        method: &str,
        args: &[Value],
    ) -> ContractResult<Vec<Value>> {
        let function = resolve(&self.abi, method, args)?;
        let data = function.encode_input(args)?;
        debug!(calldata = %fmt_bytes(&data), "dispatching call");

        let req = CallRequest::new(opts.from, Some(self.address), U256::zero(), data);
        let reply = self
            .backend
            .call(&req, opts.block)
            .await
            .map_err(ContractError::from)?;
        decode_reply(&self.abi, function, &reply)
    }

    /// Build, authorize and submit a state-changing transaction.
    ///
    /// Returns the transaction hash without waiting for inclusion; pair
    /// with [`crate::wait_mined`] when the receipt matters.
    #[instrument(err, skip(self, auth, args), fields(contract = ?self.address))]
    pub async fn transact<A: Authorizer>(
        &self,
        auth: &A,
        opts: &TransactOpts,
        method: &str,
        args: &[Value],
    ) -> ContractResult<H256> {
        let function = resolve(&self.abi, method, args)?;
        let data = function.encode_input(args)?;
        self.submit(auth, opts, data).await
    }

    /// Submit a raw value transfer carrying no calldata.
    #[instrument(err, skip(self, auth), fields(contract = ?self.address))]
    pub async fn transfer<A: Authorizer>(
        &self,
        auth: &A,
        opts: &TransactOpts,
    ) -> ContractResult<H256> {
        self.submit(auth, opts, Vec::new()).await
    }

    async fn submit<A: Authorizer>(
        &self,
        auth: &A,
        opts: &TransactOpts,
        data: Vec<u8>,
    ) -> ContractResult<H256> {
        let req = TransactionRequest::new(
            Some(self.address),
            opts.value,
            data,
            opts.gas_limit,
            opts.gas_price,
        );
        let signed = auth.authorize(req).await.map_err(ContractError::from)?;
        let hash = self
            .backend
            .send_transaction(&signed)
            .await
            .map_err(ContractError::from)?;
        info!(tx = ?hash, nonce = signed.nonce, "dispatched transaction");
        Ok(hash)
    }

    /// Retrieve a historical range of one event as a stream.
    ///
    /// `filters` holds one list of acceptable values per indexed input,
    /// in declaration order: alternatives within a list, all positions
    /// required to match. Shorter filter lists leave the remaining
    /// positions unconstrained.
    #[instrument(err, skip(self, filters), fields(contract = ?self.address))]
    pub async fn filter_logs(
        &self,
        opts: &FilterOpts,
        event: &str,
        filters: &[Vec<Value>],
    ) -> ContractResult<EventStream> {
        let event = self.event_named(event)?;
        let query = LogQuery::new(
            self.address,
            opts.from_block,
            opts.to_block,
            self.event_topics(event, filters)?,
        );
        let logs = self
            .backend
            .filter_logs(&query)
            .await
            .map_err(ContractError::from)?;
        debug!(event = %event.name, count = logs.len(), "retrieved historical logs");
        Ok(EventStream::historical(event.clone(), logs))
    }

    /// Watch one event: replay the historical range up to the current
    /// tip, then follow the live tail from the next block.
    #[instrument(err, skip(self, filters), fields(contract = ?self.address))]
    pub async fn watch_logs(
        &self,
        opts: &WatchOpts,
        event: &str,
        filters: &[Vec<Value>],
    ) -> ContractResult<EventStream> {
        let event = self.event_named(event)?;
        let topics = self.event_topics(event, filters)?;
        let tip = self
            .backend
            .latest_block_number()
            .await
            .map_err(ContractError::from)?;

        let historical = match opts.from_block {
            Some(from) if from <= tip => self
                .backend
                .filter_logs(&LogQuery::new(self.address, from, Some(tip), topics.clone()))
                .await
                .map_err(ContractError::from)?,
            _ => Vec::new(),
        };

        // The live tail begins exactly where the historical range ended,
        // or at the requested future block when nothing was replayed.
        let live_from = match opts.from_block {
            Some(from) if from > tip => from,
            _ => tip + 1,
        };
        let subscription = self
            .backend
            .subscribe_logs(&LogQuery::new(self.address, live_from, None, topics))
            .await
            .map_err(ContractError::from)?;
        debug!(event = %event.name, replayed = historical.len(), live_from, "watch started");
        Ok(EventStream::live(event.clone(), historical, subscription))
    }

    /// Decode one raw log against the whole schema.
    ///
    /// Non-anonymous events are matched by topic-0. A log matching no
    /// topic-0 is tried against the schema's anonymous event when exactly
    /// one is declared; anything else is unknown.
    pub fn parse_log(&self, raw: &RawLog, meta: LogMeta) -> ContractResult<DecodedLog> {
        let by_topic = raw
            .topics
            .first()
            .and_then(|topic| self.abi.event_by_topic0(*topic));
        let event = match by_topic {
            Some(event) => event,
            None => {
                let mut anonymous = self.abi.anonymous_events();
                match (anonymous.next(), anonymous.next()) {
                    (Some(event), None) => event,
                    _ => {
                        return Err(ContractError::Abi(AbiError::UnknownEvent {
                            topic: raw.topics.first().copied().unwrap_or_default(),
                        }))
                    }
                }
            }
        };
        let params = event.decode_log(raw)?;
        Ok(DecodedLog {
            event: event.name.clone(),
            params,
            retracted: meta.removed,
            meta,
        })
    }

    fn event_named(&self, name: &str) -> ContractResult<&Event> {
        let events = self
            .abi
            .event(name)
            .ok_or_else(|| ContractError::UnknownEventName {
                name: name.to_owned(),
            })?;
        match events {
            [only] => Ok(only),
            many => Err(ContractError::AmbiguousEvent {
                name: name.to_owned(),
                count: many.len(),
            }),
        }
    }

    /// Assemble the wire topic filter: topic-0 pinned to the event's
    /// signature hash (unless anonymous), then one position per indexed
    /// input, wildcarded where the caller left them unconstrained.
    fn event_topics(
        &self,
        event: &Event,
        filters: &[Vec<Value>],
    ) -> ContractResult<Vec<Option<Vec<H256>>>> {
        let indexed = event.indexed_count();
        if filters.len() > indexed {
            return Err(ContractError::Abi(AbiError::TopicMismatch {
                event: event.name.clone(),
                expected: indexed,
                got: filters.len(),
            }));
        }
        let mut topics: Vec<Option<Vec<H256>>> = if event.anonymous {
            Vec::new()
        } else {
            vec![Some(vec![event.topic0()])]
        };
        topics.extend(make_topics(filters)?);
        let width = indexed + usize::from(!event.anonymous);
        topics.resize(width, None);
        Ok(topics)
    }
}
