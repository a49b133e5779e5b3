//! The authenticated context a store operates under

use crate::task::UserId;

/// The identity and credential of the signed-in user.
///
/// This is an explicit value passed to a [`RemoteStore`](crate::store::RemoteStore) at
/// construction (rather than ambient global state), so that tests can run several independent
/// sessions side by side. The backend enforces row ownership server-side; this crate only ever
/// reads and writes rows belonging to `owner`.
#[derive(Clone, Debug)]
pub struct Session {
    owner: UserId,
    access_token: String,
}

impl Session {
    pub fn new(owner: UserId, access_token: impl ToString) -> Self {
        Self {
            owner,
            access_token: access_token.to_string(),
        }
    }

    pub fn owner(&self) -> &UserId { &self.owner }
    pub fn access_token(&self) -> &str { &self.access_token }
}
