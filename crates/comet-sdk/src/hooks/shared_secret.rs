use std::sync::Arc;

use bytes::Bytes;

use comet_core::protocol::payload::PublicKeyInput;
use comet_core::protocol::{Inbound, ModalRequest, ModalRequestKind, Outbound};

use crate::deferred::Completion;
use crate::dispatch::{EnvelopeListener, Subscription};
use crate::hooks::capability::CapabilitySlot;
use crate::session::Session;
use crate::transport::InboundEvent;

/// Derives an ECDH shared secret between the user's key and `public_key`.
pub struct SharedSecretHook {
    shared: Arc<Shared>,
    _subscription: Subscription,
}

struct Shared {
    session: Session,
    public_key: String,
    slot: Arc<CapabilitySlot<Bytes>>,
}

impl SharedSecretHook {
    /// Raw key bytes are base58-encoded; strings are forwarded as given.
    pub fn new(session: &Session, public_key: impl Into<PublicKeyInput>) -> Self {
        let shared = Arc::new(Shared {
            session: session.clone(),
            public_key: public_key.into().to_wire(),
            slot: CapabilitySlot::new(),
        });
        let _subscription = session.subscribe(shared.clone());
        Self {
            shared,
            _subscription,
        }
    }

    pub fn get_shared_secret(&self) -> Completion<Bytes> {
        let s = &self.shared;
        let request = ModalRequest::capability(ModalRequestKind::Ecdh, &s.session.config().app_title);
        s.slot.begin(&s.session, request)
    }

    pub fn is_pending(&self) -> bool {
        self.shared.slot.is_pending()
    }
}

impl EnvelopeListener for Shared {
    fn on_inbound(&self, event: &InboundEvent) {
        match &event.message {
            Inbound::RequestEcdh => {
                if !self.slot.is_pending() {
                    return;
                }
                let Some(source) = event.source.as_deref() else {
                    tracing::warn!("requestECDH without a source window");
                    return;
                };
                self.session.reply_to(
                    source,
                    &Outbound::StartEcdh {
                        public_key: self.public_key.clone(),
                        title: self.session.config().app_title.clone(),
                    },
                );
            }
            Inbound::FinishEcdh(fin) => {
                let outcome = fin.clone().into_bytes("shared secret request");
                self.slot.finish(&self.session, outcome);
            }
            _ => {}
        }
    }
}
