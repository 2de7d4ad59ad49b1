//! # Call Context Provider Actor
//!
//! One loop owns the provider's state. It takes commands from the mailbox in
//! arrival order and turns each into a store future that it keeps in its own
//! in-flight set; completions come back into the same loop, which then
//! replies and updates its counters. The loop never awaits a single store
//! call, so a slow backend does not stop it from accepting commands.
//!
//! Writes go through a single lane: at most one `set` is outstanding and the
//! rest wait in arrival order. Two registrations for the same resource id
//! therefore reach the store in the order they were received, and a
//! write-after-reply persist can never overtake a later registration.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::collections::VecDeque;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::actors::{CallContextCommandReceiver, ChannelFactory, CommandResponder, ProxyActor};
use crate::constants::CALL_CONTEXT_PROVIDER_NAME;
use crate::error::{ProxyError, ProxyResult};
use crate::health::HealthReport;
use crate::log_call_context;
use crate::store::{StoreResult, StoreService};

use super::commands::CallContextCommand;
use super::handle::CallContextProviderHandle;
use super::persistence::PersistentCache;
use super::types::{
    CallContextProvided, CallContextRegistered, CallContextStats, ProvideCallContext,
    ProviderPolicy, RegisterCallContext,
};

/// Single owner of the resourceId → callContext namespace
#[derive(Debug)]
pub struct CallContextProviderActor<S: StoreService + 'static> {
    cache: PersistentCache<S>,
    command_rx: Option<CallContextCommandReceiver>,
    task_handle: Option<JoinHandle<()>>,
}

impl<S: StoreService + 'static> ProxyActor for CallContextProviderActor<S> {
    fn name(&self) -> &'static str {
        CALL_CONTEXT_PROVIDER_NAME
    }

    fn started(&mut self) -> ProxyResult<()> {
        info!(
            actor = self.name(),
            store = self.cache.provider_name(),
            "Call context provider starting"
        );
        Ok(())
    }

    fn stopped(&mut self) -> ProxyResult<()> {
        info!(actor = self.name(), "Call context provider stopped");
        Ok(())
    }
}

impl<S: StoreService + 'static> CallContextProviderActor<S> {
    /// Create the actor and the handle callers use to reach it
    pub fn new(
        cache: PersistentCache<S>,
        buffer_size: usize,
    ) -> (Self, CallContextProviderHandle) {
        let (command_tx, command_rx) = ChannelFactory::call_context_command_channel(buffer_size);

        let actor = Self {
            cache,
            command_rx: Some(command_rx),
            task_handle: None,
        };

        (actor, CallContextProviderHandle::new(command_tx))
    }

    /// Start the command processing loop
    pub fn start(&mut self) -> ProxyResult<()> {
        let command_rx = self.command_rx.take().ok_or_else(|| {
            ProxyError::Internal("Call context provider already started".to_string())
        })?;
        self.started()?;

        let provider_loop = ProviderLoop::new(self.cache.clone());
        let handle = crate::spawn_named!("call_context_provider", provider_loop.run(command_rx));

        self.task_handle = Some(handle);
        Ok(())
    }

    /// Wait for the loop to exit
    ///
    /// After `Shutdown` the loop stops taking commands but still finishes the
    /// store work already in flight, queued persists included.
    pub async fn join(&mut self) -> ProxyResult<()> {
        if let Some(handle) = self.task_handle.take() {
            handle.await.map_err(|e| {
                ProxyError::Internal(format!("Call context provider task failed: {e}"))
            })?;
        }
        self.stopped()
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Result of one store interaction, delivered back to the loop
enum Completion {
    Registered {
        request: RegisterCallContext,
        resp: CommandResponder<CallContextRegistered>,
        result: StoreResult<()>,
    },
    Queried {
        request: ProvideCallContext,
        resp: CommandResponder<CallContextProvided>,
        result: StoreResult<Option<String>>,
    },
    /// Write-after-reply; nobody is waiting on it
    Persisted {
        resource_id: String,
        call_context: String,
        result: StoreResult<()>,
    },
    HealthReported {
        resp: CommandResponder<HealthReport>,
        report: HealthReport,
    },
}

enum PendingWrite {
    Register {
        request: RegisterCallContext,
        resp: CommandResponder<CallContextRegistered>,
    },
    Persist {
        resource_id: String,
        call_context: String,
    },
}

struct ProviderLoop<S: StoreService + 'static> {
    cache: PersistentCache<S>,
    stats: CallContextStats,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    queued_writes: VecDeque<PendingWrite>,
    write_in_flight: bool,
}

impl<S: StoreService + 'static> ProviderLoop<S> {
    fn new(cache: PersistentCache<S>) -> Self {
        Self {
            cache,
            stats: CallContextStats::default(),
            in_flight: FuturesUnordered::new(),
            queued_writes: VecDeque::new(),
            write_in_flight: false,
        }
    }

    async fn run(mut self, mut command_rx: CallContextCommandReceiver) {
        let mut accepting = true;

        loop {
            tokio::select! {
                biased;

                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.complete(completion);
                }
                command = command_rx.recv(), if accepting => match command {
                    Some(command) => {
                        if !self.dispatch(command) {
                            accepting = false;
                            command_rx.close();
                        }
                    }
                    None => accepting = false,
                },
                else => break,
            }
        }

        debug!(stats = ?self.stats, "Call context provider loop exited");
    }

    /// Handle one command; returns `false` once the loop should stop accepting
    fn dispatch(&mut self, command: CallContextCommand) -> bool {
        debug!(command = command.kind(), "Got command");

        match command {
            CallContextCommand::Register { request, resp } => {
                self.queue_write(PendingWrite::Register { request, resp });
            }
            CallContextCommand::Provide { request, resp } => self.provide(request, resp),
            CallContextCommand::ProvideHealthReport { resp } => {
                let cache = self.cache.clone();
                self.in_flight.push(
                    async move {
                        let report = cache.health_report(CALL_CONTEXT_PROVIDER_NAME).await;
                        Completion::HealthReported { resp, report }
                    }
                    .boxed(),
                );
            }
            CallContextCommand::GetStats { resp } => {
                reply(resp, Ok(self.stats.clone()), "get_stats");
            }
            CallContextCommand::Shutdown { resp } => {
                reply(resp, Ok(()), "shutdown");
                return false;
            }
        }

        true
    }

    fn provide(&mut self, request: ProvideCallContext, resp: CommandResponder<CallContextProvided>) {
        if request.policy == ProviderPolicy::CreateIfMissing {
            if let Some(call_context) = request.call_context_hint.clone() {
                self.stats.hints_accepted += 1;
                reply(
                    resp,
                    Ok(CallContextProvided {
                        call_context: call_context.clone(),
                    }),
                    "provide",
                );
                self.queue_write(PendingWrite::Persist {
                    resource_id: request.resource_id,
                    call_context,
                });
                return;
            }
        }

        let cache = self.cache.clone();
        self.in_flight.push(
            async move {
                let result = cache.query(&request.resource_id).await;
                Completion::Queried {
                    request,
                    resp,
                    result,
                }
            }
            .boxed(),
        );
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Registered {
                request,
                resp,
                result,
            } => {
                self.write_in_flight = false;
                let RegisterCallContext {
                    resource_id,
                    call_context,
                } = request;

                let result = match result {
                    Ok(()) => {
                        self.stats.registrations += 1;
                        log_call_context!(debug, "registered", resource_id: resource_id, call_context: call_context);
                        Ok(CallContextRegistered {
                            resource_id,
                            call_context,
                        })
                    }
                    Err(e) => {
                        self.stats.store_errors += 1;
                        warn!(resource_id = %resource_id, error = %e, "Failed to register call context");
                        Err(e.into())
                    }
                };
                reply(resp, result, "register");
                self.pump_writes();
            }
            Completion::Persisted {
                resource_id,
                call_context,
                result,
            } => {
                self.write_in_flight = false;
                match result {
                    Ok(()) => {
                        log_call_context!(debug, "persisted", resource_id: resource_id, call_context: call_context);
                    }
                    Err(e) => {
                        self.stats.persistence_failures += 1;
                        warn!(
                            resource_id = %resource_id,
                            error = %e,
                            "Failed to persist call context after reply"
                        );
                    }
                }
                self.pump_writes();
            }
            Completion::Queried {
                request,
                resp,
                result,
            } => self.complete_query(request, resp, result),
            Completion::HealthReported { resp, report } => {
                if resp.send(Ok(report)).is_err() {
                    debug!("Health report requester gone before the report was ready");
                }
            }
        }
    }

    fn complete_query(
        &mut self,
        request: ProvideCallContext,
        resp: CommandResponder<CallContextProvided>,
        result: StoreResult<Option<String>>,
    ) {
        match (result, request.policy) {
            (Ok(Some(call_context)), _) => {
                self.stats.lookups_served += 1;
                reply(resp, Ok(CallContextProvided { call_context }), "provide");
            }
            (Ok(None), ProviderPolicy::LookupOnly) => {
                self.stats.lookup_misses += 1;
                log_call_context!(debug, "lookup_miss", resource_id: request.resource_id);
                reply(resp, Err(ProxyError::lookup(request.resource_id)), "provide");
            }
            (Ok(None), ProviderPolicy::CreateIfMissing) => {
                // Read-then-write is not atomic; a concurrent request for the
                // same resource id may generate and persist a different token.
                let generated = Uuid::new_v4().to_string();
                self.stats.contexts_generated += 1;
                log_call_context!(debug, "generated", resource_id: request.resource_id, call_context: generated);
                reply(
                    resp,
                    Ok(CallContextProvided {
                        call_context: generated.clone(),
                    }),
                    "provide",
                );
                self.queue_write(PendingWrite::Persist {
                    resource_id: request.resource_id,
                    call_context: generated,
                });
            }
            (Err(e), _) => {
                self.stats.store_errors += 1;
                warn!(resource_id = %request.resource_id, error = %e, "Call context lookup failed");
                reply(resp, Err(e.into()), "provide");
            }
        }
    }

    fn queue_write(&mut self, write: PendingWrite) {
        self.queued_writes.push_back(write);
        self.pump_writes();
    }

    /// Issue the next queued write unless one is still outstanding
    fn pump_writes(&mut self) {
        if self.write_in_flight {
            return;
        }
        let Some(write) = self.queued_writes.pop_front() else {
            return;
        };

        let cache = self.cache.clone();
        let task = match write {
            PendingWrite::Register { request, resp } => async move {
                let result = cache
                    .update(&request.resource_id, &request.call_context)
                    .await;
                Completion::Registered {
                    request,
                    resp,
                    result,
                }
            }
            .boxed(),
            PendingWrite::Persist {
                resource_id,
                call_context,
            } => async move {
                let result = cache.update(&resource_id, &call_context).await;
                Completion::Persisted {
                    resource_id,
                    call_context,
                    result,
                }
            }
            .boxed(),
        };

        self.write_in_flight = true;
        self.in_flight.push(task);
    }
}

fn reply<T>(resp: CommandResponder<T>, result: ProxyResult<T>, command: &'static str) {
    let was_success = result.is_ok();
    if resp.send(result).is_err() {
        warn!(
            command = command,
            was_success = was_success,
            "Command response channel closed - receiver dropped before response could be sent"
        );
    }
}
