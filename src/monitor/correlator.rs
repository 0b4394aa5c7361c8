//! Session identity correlation
//!
//! The game announces the lobby's killer by an ephemeral session id, while
//! player-join lines carry (session id, platform id) pairs. This state
//! machine joins the two regardless of arrival order and emits a domain
//! event once the killer's platform identity is known.

use std::collections::HashMap;

use tracing::debug;

use crate::events::DomainEvent;
use crate::monitor::classifier::LineEvent;

/// Correlation state for the current lobby.
///
/// Both fields are cleared together on every resolution, which models the
/// start of the next lobby cycle. Until then the mapping accumulates an
/// entry per observed participant, not only the eventual killer; the map is
/// deliberately unbounded since a lobby holds a handful of players and the
/// next resolution empties it.
#[derive(Debug, Default)]
pub struct SessionCorrelator {
    pending_killer_session_id: Option<String>,
    session_to_persistent: HashMap<String, String>,
}

impl SessionCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one classified token; emit at most one domain event.
    pub fn process(&mut self, event: LineEvent) -> Option<DomainEvent> {
        match event {
            LineEvent::OutfitSelected { character } => {
                // orthogonal to identity resolution; correlation state untouched
                Some(DomainEvent::KillerCharacterDetected { character })
            }
            LineEvent::KillerAnnounced { session_id } => {
                debug!(%session_id, "detected killer session id");
                match self.session_to_persistent.get(&session_id) {
                    Some(persistent_id) => {
                        let persistent_id = persistent_id.clone();
                        self.resolve(persistent_id, session_id)
                    }
                    None => {
                        debug!("no platform id known yet for this killer session id");
                        self.pending_killer_session_id = Some(session_id);
                        None
                    }
                }
            }
            LineEvent::PlayerAdded {
                session_id,
                persistent_id,
            } => {
                debug!(%session_id, %persistent_id, "participant joined lobby");
                self.session_to_persistent
                    .insert(session_id.clone(), persistent_id.clone());

                if self.pending_killer_session_id.as_deref() == Some(session_id.as_str()) {
                    self.resolve(persistent_id, session_id)
                } else {
                    None
                }
            }
        }
    }

    fn resolve(&mut self, persistent_id: String, session_id: String) -> Option<DomainEvent> {
        self.pending_killer_session_id = None;
        self.session_to_persistent.clear();
        Some(DomainEvent::KillerIdentityResolved {
            persistent_id,
            session_id,
        })
    }

    /// True when no resolution is pending and no participants are mapped
    pub fn is_idle(&self) -> bool {
        self.pending_killer_session_id.is_none() && self.session_to_persistent.is_empty()
    }
}
