//! User-visible outcome notices for repository operations

use std::fmt::{Display, Error, Formatter};

/// The outcome of a repository operation, as the user should see it.
///
/// One notice is emitted per operation (success or failure); presentation typically renders it
/// as a transient toast.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Nothing has happened yet
    None,
    /// The operation succeeded
    Success(String),
    /// The operation failed; the displayed task set is unchanged and the user may retry
    Failure(String),
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Notice::None => write!(f, ""),
            Notice::Success(text) => write!(f, "{}", text),
            Notice::Failure(text) => write!(f, "{}", text),
        }
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::None
    }
}

/// See [`notice_channel`]
pub type NoticeSender = tokio::sync::watch::Sender<Notice>;
/// See [`notice_channel`]
pub type NoticeReceiver = tokio::sync::watch::Receiver<Notice>;

/// Create a notice channel, that presentation can subscribe to for the latest outcome
pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    tokio::sync::watch::channel(Notice::default())
}

/// The notification collaborator of a [`TaskRepository`](crate::repository::TaskRepository).
///
/// Every outcome is logged with the `log::*` macros; if a channel is attached, it is forwarded
/// there as well.
pub struct Notices {
    channel: Option<NoticeSender>,
}

impl Notices {
    pub fn new() -> Self {
        Self { channel: None }
    }
    pub fn new_with_channel(channel: NoticeSender) -> Self {
        Self { channel: Some(channel) }
    }

    /// Report a successful operation
    pub fn success(&self, text: &str) {
        log::info!("{}", text);
        self.send(Notice::Success(text.to_string()));
    }

    /// Report a failed operation
    pub fn failure(&self, text: &str) {
        log::error!("{}", text);
        self.send(Notice::Failure(text.to_string()));
    }

    fn send(&self, notice: Notice) {
        self.channel
            .as_ref()
            .map(|sender| sender.send(notice));
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}
