//! The live, filtered projection of an in-memory collection.
//!
//! A [`Projection`] exclusively owns its backing sequence. The view is
//! recomputed synchronously and wholesale whenever the backing or the filter
//! changes: O(n × fields) per change, no diffing, no incremental filtering.
//! Consumers that need to keep a selection across a recompute must re-find
//! it by identity.

use crate::codec;
use crate::descriptor::EntityDescriptor;
use crate::entity::Entity;
use crate::filter::{self, Query};
use crate::types::EntityId;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tracing::debug;

/// Notification emitted after every view recompute.
///
/// Carries only sizes; renderers pull the actual rows via
/// [`Projection::view`] or [`Projection::display_rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionEvent {
    /// The view was recomputed.
    Refreshed {
        /// Number of instances in the backing sequence.
        total: usize,
        /// Number of instances currently visible.
        visible: usize,
    },
}

/// An observable, filtered, re-orderable view over a backing collection.
///
/// Invariant: `view` is always exactly the order-preserving subsequence of
/// `backing` matching the current query.
pub struct Projection<T: Entity> {
    descriptor: Arc<EntityDescriptor>,
    backing: Vec<T>,
    query: Query,
    view: Vec<T>,
    subscribers: Vec<Sender<ProjectionEvent>>,
}

impl<T: Entity> Projection<T> {
    /// Creates an empty projection for one entity type.
    #[must_use]
    pub fn new(descriptor: Arc<EntityDescriptor>) -> Self {
        Self {
            descriptor,
            backing: Vec::new(),
            query: Query::default(),
            view: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Returns the descriptor this projection renders.
    #[must_use]
    pub fn descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.descriptor
    }

    /// Replaces the backing sequence wholesale.
    pub fn set_backing(&mut self, items: Vec<T>) {
        self.backing = items;
        self.refresh();
    }

    /// Updates the filter from raw search text.
    pub fn set_filter_text(&mut self, text: &str) {
        self.query = Query::new(text);
        self.refresh();
    }

    /// Returns the normalized filter text.
    #[must_use]
    pub fn filter_text(&self) -> &str {
        self.query.as_str()
    }

    /// Returns the full backing sequence.
    #[must_use]
    pub fn backing(&self) -> &[T] {
        &self.backing
    }

    /// Returns the filtered view.
    #[must_use]
    pub fn view(&self) -> &[T] {
        &self.view
    }

    /// Finds a backing instance by identity.
    #[must_use]
    pub fn find(&self, id: EntityId) -> Option<&T> {
        self.backing.iter().find(|item| item.identity() == Some(id))
    }

    /// Appends an instance to the backing sequence.
    pub fn insert(&mut self, instance: T) {
        self.backing.push(instance);
        self.refresh();
    }

    /// Replaces the backing entry with the same identity.
    ///
    /// Returns `false` (and leaves the backing unchanged) when no entry
    /// carries that identity.
    pub fn replace(&mut self, instance: T) -> bool {
        let id = instance.identity();
        if id.is_none() {
            return false;
        }
        match self.backing.iter_mut().find(|item| item.identity() == id) {
            Some(slot) => {
                *slot = instance;
                self.refresh();
                true
            }
            None => false,
        }
    }

    /// Removes the backing entry with the given identity.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.backing.len();
        self.backing.retain(|item| item.identity() != Some(id));
        if self.backing.len() == before {
            return false;
        }
        self.refresh();
        true
    }

    /// Stably reorders the backing sequence by one field's values.
    ///
    /// Returns `false` when the descriptor has no such field.
    pub fn sort_by_field(&mut self, field: &str, ascending: bool) -> bool {
        if self.descriptor.field(field).is_none() {
            return false;
        }
        self.backing.sort_by(|a, b| {
            let ord = a.field(field).compare(&b.field(field));
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        self.refresh();
        true
    }

    /// Subscribes to recompute notifications.
    ///
    /// Disconnected receivers are pruned on the next notification.
    pub fn subscribe(&mut self) -> Receiver<ProjectionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Renders the view as ordered `(field name, formatted value)` rows,
    /// restricted to visible fields.
    #[must_use]
    pub fn display_rows(&self) -> Vec<Vec<(&str, String)>> {
        self.view
            .iter()
            .map(|item| {
                self.descriptor
                    .visible_fields()
                    .map(|f| (f.name(), codec::format(&item.field(f.name()))))
                    .collect()
            })
            .collect()
    }

    fn refresh(&mut self) {
        self.view = self
            .backing
            .iter()
            .filter(|item| filter::matches(*item, &self.descriptor, &self.query))
            .cloned()
            .collect();

        debug!(
            entity = self.descriptor.type_name(),
            total = self.backing.len(),
            visible = self.view.len(),
            "projection refreshed"
        );

        let event = ProjectionEvent::Refreshed {
            total: self.backing.len(),
            visible: self.view.len(),
        };
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}
