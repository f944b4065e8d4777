//! Intermediate representation of a compiled diagram
//!
//! Actors in left-to-right placement order plus the ordered message
//! exchanges between them. Regenerated from scratch on every evaluate
//! cycle; nothing here is incremental.

/// Line style of an exchange arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    /// Dotted lines conventionally mark return messages
    Dotted,
}

/// A lifeline column in the diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Identifier used in exchanges
    pub id: String,
    /// Display label (differs from id when declared with `[label = "..."]`)
    pub label: String,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
        }
    }

    pub fn with_label(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A single message from one actor to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Sender actor id
    pub from: String,
    /// Receiver actor id
    pub to: String,
    /// Optional message label
    pub label: Option<String>,
    pub line: LineStyle,
}

impl Exchange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
            line: LineStyle::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }
}

/// The compiled diagram: what the parser produces and the renderer consumes
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompiledDiagram {
    actors: Vec<Actor>,
    exchanges: Vec<Exchange>,
}

impl CompiledDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor, keeping declaration order; duplicates are merged, an
    /// explicit label wins over an implicit one
    pub fn add_actor(&mut self, actor: Actor) {
        match self.actors.iter_mut().find(|a| a.id == actor.id) {
            Some(existing) => {
                if actor.label != actor.id {
                    existing.label = actor.label;
                }
            }
            None => self.actors.push(actor),
        }
    }

    /// Make sure an actor exists, creating an implicit one on first mention
    pub fn ensure_actor(&mut self, id: &str) {
        if !self.actors.iter().any(|a| a.id == id) {
            self.actors.push(Actor::new(id));
        }
    }

    /// Append an exchange, implicitly declaring both endpoints
    pub fn add_exchange(&mut self, exchange: Exchange) {
        self.ensure_actor(&exchange.from);
        self.ensure_actor(&exchange.to);
        self.exchanges.push(exchange);
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Column position of an actor, for layout
    pub fn actor_index(&self, id: &str) -> Option<usize> {
        self.actors.iter().position(|a| a.id == id)
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
