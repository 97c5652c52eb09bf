//! InterpretationStrategy trait - ChangeEvent -> optional Message
//!
//! One implementation per event kind, bound together in a [`StrategyRegistry`].

use std::fmt;
use std::sync::Arc;

use crate::{ChangeEvent, ContractError, EventKind, Message, TabularStore};

/// Decides whether an event deserves a notification, and composes it.
///
/// Implementations may read the store but never write to it.
pub trait InterpretationStrategy: Send + Sync {
    /// Strategy name (used for logging)
    fn name(&self) -> &str;

    /// The event kind this strategy understands
    fn kind(&self) -> EventKind;

    /// Interpret one event
    ///
    /// `Ok(None)` means the event does not match the interest rule.
    ///
    /// # Errors
    /// - `StrategyMismatch` when handed another kind of event
    /// - `RuleResolution` / `InvalidColumnConfig` on misconfiguration
    fn interpret(
        &self,
        event: &ChangeEvent,
        store: &dyn TabularStore,
    ) -> Result<Option<Message>, ContractError>;
}

/// Exactly one strategy per event kind, fixed at construction
#[derive(Clone)]
pub struct StrategyRegistry {
    created: Arc<dyn InterpretationStrategy>,
    edited: Arc<dyn InterpretationStrategy>,
}

impl StrategyRegistry {
    /// Bind the two strategies
    ///
    /// # Errors
    /// Returns `StrategyMismatch` if either strategy reports the wrong kind.
    pub fn new(
        created: Arc<dyn InterpretationStrategy>,
        edited: Arc<dyn InterpretationStrategy>,
    ) -> Result<Self, ContractError> {
        for (strategy, expected) in [(&created, EventKind::Created), (&edited, EventKind::Edited)] {
            if strategy.kind() != expected {
                return Err(ContractError::StrategyMismatch {
                    expected,
                    actual: strategy.kind(),
                });
            }
        }
        Ok(Self { created, edited })
    }

    /// Strategy registered for a kind
    pub fn get(&self, kind: EventKind) -> &Arc<dyn InterpretationStrategy> {
        match kind {
            EventKind::Created => &self.created,
            EventKind::Edited => &self.edited,
        }
    }

    /// Strategy for a concrete event
    pub fn for_event(&self, event: &ChangeEvent) -> &Arc<dyn InterpretationStrategy> {
        self.get(event.kind())
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("created", &self.created.name())
            .field("edited", &self.edited.name())
            .finish()
    }
}
