use tokio::sync::watch;

use comet_core::protocol::User;

use crate::session::Session;

/// The signed-in user, if the frame has pushed one.
pub fn account(session: &Session) -> Option<User> {
    session.user()
}

pub fn watch_account(session: &Session) -> watch::Receiver<Option<User>> {
    session.watch_user()
}
