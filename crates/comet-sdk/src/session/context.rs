use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use comet_core::error::{CometError, Result};
use comet_core::protocol::{Inbound, ModalRequest, Outbound, RpcRequest, SessionHello, User};

use crate::config::ProviderConfig;
use crate::dispatch::{EnvelopeListener, ListenerRegistry, Subscription};
use crate::session::rpc::RpcCorrelator;
use crate::session::slot::{CancelFn, Evicted, ModalSlot, ModalTicket};
use crate::transport::{decode, FrameWindow, MessageChannel, MessageEvent, OriginPolicy, PolicyDecision};

const DEFAULT_CONTENT_HEIGHT: f64 = 100.0;

/// Mutable session state. Guarded by one lock; never held across sends.
struct SessionState {
    modal_open: bool,
    iframe_loaded: bool,
    content_height: f64,
    slot: ModalSlot,
    /// RPC calls issued before the frame said hello.
    queued_rpc: VecDeque<RpcRequest>,
}

struct SessionInner {
    cfg: ProviderConfig,
    hello: SessionHello,
    channel: MessageChannel,
    origin: OriginPolicy,
    listeners: Arc<ListenerRegistry>,
    rpc: RpcCorrelator,
    user: watch::Sender<Option<User>>,
    state: Mutex<SessionState>,
}

/// Handle to one embedded-wallet session. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Validate `cfg` and build a session. No envelope is sent until a frame
    /// is mounted and says hello.
    pub fn new(cfg: ProviderConfig) -> Result<Self> {
        cfg.validate()?;

        let target = cfg.outbound_origin()?;
        let origin = if cfg.accept_any_origin {
            OriginPolicy::Any
        } else {
            OriginPolicy::Exact(target.clone())
        };
        let (user, _) = watch::channel(None);

        tracing::debug!(
            chain_type = %cfg.chain_type,
            chain_id = cfg.chain_id,
            target_origin = %target,
            "session created"
        );

        Ok(Self {
            inner: Arc::new(SessionInner {
                hello: cfg.hello(),
                channel: MessageChannel::new(target),
                origin,
                listeners: Arc::new(ListenerRegistry::new()),
                rpc: RpcCorrelator::new(cfg.max_pending_rpc),
                user,
                state: Mutex::new(SessionState {
                    modal_open: false,
                    iframe_loaded: false,
                    content_height: DEFAULT_CONTENT_HEIGHT,
                    slot: ModalSlot::default(),
                    queued_rpc: VecDeque::new(),
                }),
                cfg,
            }),
        })
    }

    pub fn with_frame(cfg: ProviderConfig, frame: Arc<dyn FrameWindow>) -> Result<Self> {
        let session = Self::new(cfg)?;
        session.mount_frame(frame);
        Ok(session)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --------------------
    // Frame lifecycle
    // --------------------

    /// Install the frame. A replaced frame is a new frame lifetime, so
    /// readiness resets until it says hello.
    pub fn mount_frame(&self, frame: Arc<dyn FrameWindow>) {
        if self.inner.channel.mount(frame).is_some() {
            self.state().iframe_loaded = false;
            tracing::info!("frame replaced; waiting for hello");
        }
    }

    pub fn unmount_frame(&self) {
        self.inner.channel.unmount();
        self.state().iframe_loaded = false;
        tracing::info!("frame unmounted");
    }

    // --------------------
    // Read accessors
    // --------------------

    pub fn config(&self) -> &ProviderConfig {
        &self.inner.cfg
    }

    pub fn user(&self) -> Option<User> {
        self.inner.user.borrow().clone()
    }

    /// Observe replacements of the authenticated user.
    pub fn watch_user(&self) -> watch::Receiver<Option<User>> {
        self.inner.user.subscribe()
    }

    pub fn is_modal_open(&self) -> bool {
        self.state().modal_open
    }

    pub fn is_loaded(&self) -> bool {
        self.state().iframe_loaded
    }

    pub fn modal_request(&self) -> Option<ModalRequest> {
        self.state().slot.current().cloned()
    }

    pub fn content_height(&self) -> f64 {
        self.state().content_height
    }

    pub fn pending_rpc(&self) -> usize {
        self.inner.rpc.len()
    }

    // --------------------
    // Outbound
    // --------------------

    fn send(&self, msg: Outbound) {
        self.inner.channel.send(&msg);
    }

    /// Post straight to a request's originating window.
    pub fn reply_to(&self, window: &dyn FrameWindow, msg: &Outbound) {
        self.inner.channel.reply(window, msg);
    }

    pub fn open_modal(&self) {
        let loaded = {
            let mut st = self.state();
            st.modal_open = true;
            st.iframe_loaded
        };
        if loaded {
            self.send(Outbound::ModalOpen(true));
        }
    }

    /// Close the modal and clear the pending request. The request's waiter,
    /// if any, fails with `CometError::Cancelled`.
    pub fn close_modal(&self) {
        let (loaded, evicted) = {
            let mut st = self.state();
            st.modal_open = false;
            (st.iframe_loaded, st.slot.clear())
        };
        if let Some(ev) = evicted {
            ev.run(CometError::Cancelled);
        }
        if loaded {
            self.send(Outbound::ModalOpen(false));
        }
    }

    /// User-initiated close. Refused while a non-closeable request is pending.
    pub fn dismiss_modal(&self) -> bool {
        let closeable = self
            .state()
            .slot
            .current()
            .map_or(true, |r| r.closeable);
        if closeable {
            self.close_modal();
        } else {
            tracing::debug!("dismiss refused: pending request is not closeable");
        }
        closeable
    }

    /// Replace the pending request. Always mirrored to a loaded frame, even
    /// when clearing.
    pub fn set_modal_request(&self, request: Option<ModalRequest>) {
        let (loaded, evicted, err) = {
            let mut st = self.state();
            match request.clone() {
                Some(req) => {
                    let (_, evicted) = st.slot.acquire(req, None);
                    (st.iframe_loaded, evicted, CometError::Superseded)
                }
                None => (st.iframe_loaded, st.slot.clear(), CometError::Cancelled),
            }
        };
        if let Some(ev) = evicted {
            ev.run(err);
        }
        if loaded {
            self.send(Outbound::ModalRequest(request));
        }
    }

    /// Take the modal slot for `request`. The previous holder is rejected
    /// with `CometError::Superseded`; `on_cancel` runs if this one is later
    /// preempted or the modal is closed.
    pub fn acquire_modal(&self, request: ModalRequest, on_cancel: CancelFn) -> ModalTicket {
        let (ticket, loaded, evicted) = {
            let mut st = self.state();
            let (ticket, evicted) = st.slot.acquire(request.clone(), Some(on_cancel));
            (ticket, st.iframe_loaded, evicted)
        };
        tracing::debug!(%ticket, kind = request.kind.as_str(), "modal request acquired");
        if let Some(ev) = evicted {
            ev.run(CometError::Superseded);
        }
        if loaded {
            self.send(Outbound::ModalRequest(Some(request)));
        }
        ticket
    }

    /// Finish the request held by `ticket`: close the modal and clear the
    /// request without cancelling anyone. Stale tickets are ignored.
    pub fn complete_modal(&self, ticket: ModalTicket) -> bool {
        let loaded = {
            let mut st = self.state();
            if !st.slot.release(ticket) {
                tracing::debug!(%ticket, "completion for a request that no longer holds the modal");
                return false;
            }
            st.modal_open = false;
            st.iframe_loaded
        };
        if loaded {
            self.send(Outbound::ModalOpen(false));
            self.send(Outbound::ModalRequest(None));
        }
        true
    }

    /// Generic RPC passthrough, correlated by a fresh random id.
    ///
    /// Calls made before the frame is ready are queued and flushed on hello.
    /// With `rpc_timeout_ms` unset the call waits indefinitely.
    pub async fn send_rpc_request(&self, request: Value) -> Result<Value> {
        let id = Uuid::new_v4().simple().to_string();
        let rx = self.inner.rpc.register(&id)?;
        let guard = PendingRpc {
            session: self,
            id: &id,
        };

        let req = RpcRequest {
            id: id.clone(),
            request,
        };
        let send_now = {
            let mut st = self.state();
            if st.iframe_loaded {
                true
            } else {
                tracing::debug!(rpc_id = %id, "frame not ready; queueing rpc request");
                st.queued_rpc.push_back(req.clone());
                false
            }
        };
        if send_now {
            self.send(Outbound::RpcRequest(req));
        }

        let timeout_ms = self.inner.cfg.rpc_timeout_ms;
        let res = if timeout_ms > 0 {
            match tokio::time::timeout(Duration::from_millis(timeout_ms), rx).await {
                Ok(r) => r,
                Err(_) => {
                    tracing::warn!(rpc_id = %id, timeout_ms, "rpc request timed out");
                    return Err(CometError::Timeout);
                }
            }
        } else {
            rx.await
        };
        drop(guard);

        res.unwrap_or_else(|_| Err(CometError::Closed("rpc waiter dropped".into())))
    }

    fn abandon_rpc(&self, id: &str) {
        self.inner.rpc.forget(id);
        self.state().queued_rpc.retain(|q| q.id != id);
    }

    // --------------------
    // Inbound
    // --------------------

    /// Register a listener for decoded inbound envelopes.
    pub fn subscribe(&self, listener: Arc<dyn EnvelopeListener>) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    /// Entry point for every window `message` event seen by the host.
    pub fn handle_message(&self, event: MessageEvent) {
        if self.inner.origin.check(&event.origin) == PolicyDecision::Drop {
            tracing::warn!(origin = %event.origin, "dropping message from unexpected origin");
            return;
        }

        let decoded = match decode(event) {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring undecodable message");
                return;
            }
        };

        if let Inbound::Unknown(ty) = &decoded.message {
            tracing::debug!(msg_type = %ty, "ignoring unknown envelope type");
            return;
        }

        self.apply(&decoded.message);
        self.inner.listeners.deliver(&decoded);
    }

    fn apply(&self, msg: &Inbound) {
        match msg {
            Inbound::SetUser(user) => {
                tracing::info!(user_id = ?user.as_ref().map(|u| &u.id), "user set");
                self.inner.user.send_replace(user.clone());
            }
            Inbound::ModalOpen(true) => {
                self.state().modal_open = true;
            }
            Inbound::ModalOpen(false) | Inbound::CloseModal => self.remote_close(),
            Inbound::Hello => self.on_hello(),
            Inbound::ContentHeight(h) => {
                self.state().content_height = *h;
            }
            Inbound::RpcResponse(resp) => {
                self.inner.rpc.resolve(resp.clone());
            }
            Inbound::MintState(_)
            | Inbound::OnLogin(_)
            | Inbound::OnLogout(_)
            | Inbound::Navigate(_)
            | Inbound::RequestSignMessage
            | Inbound::FinishSignMessage(_)
            | Inbound::RequestSignTransaction
            | Inbound::FinishSignTransaction(_)
            | Inbound::RequestEcdh
            | Inbound::FinishEcdh(_)
            | Inbound::Unknown(_) => {}
        }
    }

    /// The frame closed itself; nothing is echoed back.
    ///
    /// A closeable request is dropped with the modal; a capability request
    /// stays owned until its finish envelope arrives.
    fn remote_close(&self) {
        let evicted: Option<Evicted> = {
            let mut st = self.state();
            st.modal_open = false;
            if st.slot.current().is_some_and(|r| r.closeable) {
                st.slot.clear()
            } else {
                None
            }
        };
        if let Some(ev) = evicted {
            ev.run(CometError::Cancelled);
        }
    }

    /// NotLoaded -> Loaded. Reply with the session config, then replay the
    /// state the frame missed and flush queued RPC calls.
    fn on_hello(&self) {
        let (first, modal_open, request, queued) = {
            let mut st = self.state();
            let first = !st.iframe_loaded;
            st.iframe_loaded = true;
            let queued: Vec<RpcRequest> = st.queued_rpc.drain(..).collect();
            (first, st.modal_open, st.slot.current().cloned(), queued)
        };

        if first {
            tracing::info!(queued_rpc = queued.len(), "frame ready");
        } else {
            tracing::info!("frame said hello again; replaying state");
        }

        self.send(Outbound::HelloBack(self.inner.hello.clone()));
        if modal_open {
            self.send(Outbound::ModalOpen(true));
        }
        if let Some(req) = request {
            self.send(Outbound::ModalRequest(Some(req)));
        }
        for req in queued {
            self.send(Outbound::RpcRequest(req));
        }
    }
}

/// Removes an RPC waiter whose caller stopped waiting.
struct PendingRpc<'a> {
    session: &'a Session,
    id: &'a str,
}

impl Drop for PendingRpc<'_> {
    fn drop(&mut self) {
        self.session.abandon_rpc(self.id);
    }
}
