use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use comet_core::protocol::mint::{Collection, MintData, MintState};
use comet_core::protocol::{Inbound, ModalRequest};

use crate::dispatch::{EnvelopeListener, Subscription};
use crate::session::Session;
use crate::transport::InboundEvent;

/// Opens the mint flow for one collection and tracks the frame's latest
/// mint snapshot. There is no request/response pairing: the newest
/// `mintState` envelope replaces the previous one.
pub struct MintHook {
    shared: Arc<Shared>,
    _subscription: Subscription,
}

struct Shared {
    session: Session,
    collection_id: String,
    latest: Mutex<Option<MintState>>,
}

impl Shared {
    fn latest(&self) -> MutexGuard<'_, Option<MintState>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MintHook {
    pub fn new(session: &Session, collection_id: impl Into<String>) -> Self {
        let shared = Arc::new(Shared {
            session: session.clone(),
            collection_id: collection_id.into(),
            latest: Mutex::new(None),
        });
        let _subscription = session.subscribe(shared.clone());
        Self {
            shared,
            _subscription,
        }
    }

    pub fn collection_id(&self) -> &str {
        &self.shared.collection_id
    }

    pub fn open_mint(&self) {
        let s = &self.shared;
        s.session
            .acquire_modal(ModalRequest::mint(s.collection_id.clone()), Box::new(|_, _| {}));
        s.session.open_modal();
    }

    pub fn mint_state(&self) -> Option<MintState> {
        self.shared.latest().clone()
    }

    pub fn collection(&self) -> Option<Collection> {
        self.shared.latest().as_ref().and_then(|s| s.collection.clone())
    }

    pub fn mint_data(&self) -> Option<MintData> {
        self.shared.latest().as_ref().and_then(|s| s.mint_data.clone())
    }

    pub fn mint_status(&self) -> Option<String> {
        self.shared
            .latest()
            .as_ref()
            .and_then(|s| s.mint_status().map(str::to_string))
    }
}

impl EnvelopeListener for Shared {
    fn on_inbound(&self, event: &InboundEvent) {
        if let Inbound::MintState(state) = &event.message {
            tracing::debug!(status = ?state.mint_status(), "mint state updated");
            *self.latest() = Some(state.clone());
        }
    }
}
