//! Ticket identities and the RAII admission guard

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::OwnedSemaphorePermit;
use tracing::debug;

use crate::limiter::Shared;

/// Identity of one admission slot, numbered `1..=capacity`.
///
/// At most one live [`Ticket`] carries a given id at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TicketId(usize);

impl TicketId {
    pub(crate) const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Numeric value of the slot
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<TicketId> for usize {
    fn from(id: TicketId) -> Self {
        id.0
    }
}

/// An admitted unit of work.
///
/// Dropping the ticket releases it: the in-flight count goes down, the id
/// returns to the supply and at most one waiter is woken. Release happens
/// exactly once, including when the holder unwinds from a panic.
#[must_use = "dropping a ticket releases it immediately"]
pub struct Ticket {
    id: TicketId,
    shared: Arc<Shared>,
    permit: Option<OwnedSemaphorePermit>,
}

impl Ticket {
    pub(crate) fn new(id: TicketId, shared: Arc<Shared>, permit: OwnedSemaphorePermit) -> Self {
        Self {
            id,
            shared,
            permit: Some(permit),
        }
    }

    /// Slot this ticket occupies
    #[must_use]
    pub fn id(&self) -> TicketId {
        self.id
    }

    /// Release the ticket now rather than at end of scope
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        let Some(permit) = self.permit.take() else {
            return;
        };
        let in_flight = self.shared.in_flight.fetch_sub(1, Ordering::AcqRel) - 1;
        // The id must be back in the supply before the permit wakes a waiter.
        self.shared.slots.lock().give_back(self.id);
        drop(permit);
        debug!(ticket = %self.id, in_flight, "ticket released");
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_id_display_and_conversion() {
        let id = TicketId::new(3);
        assert_eq!(id.to_string(), "#3");
        assert_eq!(usize::from(id), 3);
        assert_eq!(id.get(), 3);
        assert!(TicketId::new(1) < id);
    }
}
