//! Typed handler registry keyed by (class, operation).

use std::collections::HashMap;

use gsip_wire::{Message, MessageClass};
use tracing::debug;

/// A message handler. The returned message, if any, is the reply to send
/// back over the link.
pub type Handler = Box<dyn FnMut(&Message) -> Option<Message> + Send>;

/// Routes each decoded message to at most one handler.
///
/// Bindings are keyed by the (class, operation) pair. Operation codes
/// outside the protocol table still arrive here and go to the fallback
/// handler; whether to ignore or report them is the application's call,
/// not the decoder's.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<(MessageClass, u8), Handler>,
    fallback: Option<Handler>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler for one (class, operation) pair.
    ///
    /// Returns `true` if a previous binding was replaced; at most one
    /// handler ever serves a given pair.
    pub fn bind<F>(&mut self, class: MessageClass, operation: u8, handler: F) -> bool
    where
        F: FnMut(&Message) -> Option<Message> + Send + 'static,
    {
        self.handlers
            .insert((class, operation), Box::new(handler))
            .is_some()
    }

    /// Bind the handler for messages with no matching binding.
    pub fn bind_fallback<F>(&mut self, handler: F) -> bool
    where
        F: FnMut(&Message) -> Option<Message> + Send + 'static,
    {
        self.fallback.replace(Box::new(handler)).is_some()
    }

    /// Returns true if a handler is bound for the pair.
    pub fn is_bound(&self, class: MessageClass, operation: u8) -> bool {
        self.handlers.contains_key(&(class, operation))
    }

    /// Deliver one message to its handler and collect the optional reply.
    pub fn dispatch(&mut self, msg: &Message) -> Option<Message> {
        if let Some(handler) = self.handlers.get_mut(&(msg.class, msg.operation)) {
            return handler(msg);
        }
        if let Some(fallback) = self.fallback.as_mut() {
            return fallback(msg);
        }
        debug!(
            class = ?msg.class,
            operation = msg.operation,
            name = msg.operation_name(),
            "no handler bound, message ignored"
        );
        None
    }
}
