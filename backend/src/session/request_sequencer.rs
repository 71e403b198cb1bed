//! Monotonic request tickets so only the latest search is ever applied.

use tokio_util::sync::CancellationToken;


/// Sequence number of one issued search. Later searches get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(pub u64);

#[derive(Debug)]
pub struct RequestSequencer {
    latest: u64,
    root: CancellationToken,
    current: CancellationToken,
}

impl Default for RequestSequencer {
    fn default() -> Self {
        let root = CancellationToken::new();
        let current = root.child_token();
        Self { latest: 0, root, current }
    }
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket and cancels the request it supersedes.
    ///
    /// After [`cancel_all`](Self::cancel_all) every issued token is born cancelled.
    pub fn issue(&mut self) -> (RequestTicket, CancellationToken) {
        self.current.cancel();
        self.current = self.root.child_token();
        self.latest += 1;
        (RequestTicket(self.latest), self.current.clone())
    }

    pub fn latest(&self) -> Option<RequestTicket> {
        (self.latest > 0).then_some(RequestTicket(self.latest))
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest && !self.root.is_cancelled()
    }

    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.root.is_cancelled()
    }
}
