use std::sync::Arc;

use bytes::Bytes;

use comet_core::protocol::payload::to_hex;
use comet_core::protocol::{Inbound, ModalRequest, ModalRequestKind, Outbound};

use crate::deferred::Completion;
use crate::dispatch::{EnvelopeListener, Subscription};
use crate::hooks::capability::CapabilitySlot;
use crate::session::Session;
use crate::transport::InboundEvent;

/// Asks the wallet frame to sign a fixed message.
pub struct SignMessageHook {
    shared: Arc<Shared>,
    _subscription: Subscription,
}

struct Shared {
    session: Session,
    message: Bytes,
    slot: Arc<CapabilitySlot<Bytes>>,
}

impl SignMessageHook {
    pub fn new(session: &Session, message: impl Into<Bytes>) -> Self {
        let shared = Arc::new(Shared {
            session: session.clone(),
            message: message.into(),
            slot: CapabilitySlot::new(),
        });
        let _subscription = session.subscribe(shared.clone());
        Self {
            shared,
            _subscription,
        }
    }

    /// Resolves with the signature bytes.
    pub fn sign_message(&self) -> Completion<Bytes> {
        let s = &self.shared;
        let request =
            ModalRequest::capability(ModalRequestKind::SignMessage, &s.session.config().app_title);
        s.slot.begin(&s.session, request)
    }

    pub fn is_pending(&self) -> bool {
        self.shared.slot.is_pending()
    }
}

impl EnvelopeListener for Shared {
    fn on_inbound(&self, event: &InboundEvent) {
        match &event.message {
            Inbound::RequestSignMessage => {
                if !self.slot.is_pending() {
                    return;
                }
                let Some(source) = event.source.as_deref() else {
                    tracing::warn!("requestSignMessage without a source window");
                    return;
                };
                self.session.reply_to(
                    source,
                    &Outbound::StartSignMessage {
                        message: to_hex(&self.message),
                        title: self.session.config().app_title.clone(),
                    },
                );
            }
            Inbound::FinishSignMessage(fin) => {
                let outcome = fin.clone().into_bytes("signing message");
                self.slot.finish(&self.session, outcome);
            }
            _ => {}
        }
    }
}
