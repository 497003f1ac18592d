use crate::session::Session;

/// Open/close controls for the wallet modal.
#[derive(Clone)]
pub struct ModalHandle {
    session: Session,
}

pub fn modal(session: &Session) -> ModalHandle {
    ModalHandle {
        session: session.clone(),
    }
}

impl ModalHandle {
    pub fn open_modal(&self) {
        self.session.open_modal();
    }

    pub fn close_modal(&self) {
        self.session.close_modal();
    }

    /// User-initiated close; refused for non-closeable requests.
    pub fn dismiss(&self) -> bool {
        self.session.dismiss_modal()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_modal_open()
    }
}
