//! Listener bookkeeping
//!
//! The engine owns one registry. Each event kind is attached at most once,
//! so repeated setup calls never stack handlers.

use std::collections::BTreeMap;

use super::{DomEventKind, Host, ListenerId, ListenerTarget};

/// Attached listeners by event kind
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    attached: BTreeMap<DomEventKind, (ListenerTarget, ListenerId)>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener unless one for `kind` is already attached
    pub fn attach<H: Host + ?Sized>(&mut self, host: &mut H, target: ListenerTarget, kind: DomEventKind) -> ListenerId {
        if let Some((_, id)) = self.attached.get(&kind) {
            log::trace!("{kind:?} listener already attached");
            return *id;
        }
        let id = host.add_listener(target, kind);
        self.attached.insert(kind, (target, id));
        log::debug!("Attached {kind:?} listener on {target:?}");
        id
    }

    /// Detach the listener for `kind`, if any
    pub fn detach<H: Host + ?Sized>(&mut self, host: &mut H, kind: DomEventKind) -> bool {
        match self.attached.remove(&kind) {
            Some((_, id)) => {
                host.remove_listener(id);
                log::debug!("Detached {kind:?} listener");
                true
            }
            None => false,
        }
    }

    /// Detach every listener
    pub fn detach_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        for (_, (_, id)) in std::mem::take(&mut self.attached) {
            host.remove_listener(id);
        }
    }

    /// Whether a listener for `kind` is attached
    pub fn is_attached(&self, kind: DomEventKind) -> bool {
        self.attached.contains_key(&kind)
    }

    /// Number of attached listeners
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    /// Whether nothing is attached
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}
