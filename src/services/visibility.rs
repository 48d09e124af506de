//! Quiz and material visibility
//!
//! [`ContentVisibilityFilter`] is the read side: a pure projection of an
//! event's content onto what a viewer role may see. [`VisibilityService`] is
//! the write side: organizer toggles that only touch the local collection
//! after the backend accepted them.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::api::EventApi;
use crate::models::{Event, GatedContent, ViewerRole};
use crate::utils::errors::{Result, SeesError};
use crate::utils::logging;

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentVisibilityFilter;

impl ContentVisibilityFilter {
    /// Whether a single item is exposed to the role
    pub fn is_exposed<T: GatedContent>(item: &T, role: ViewerRole) -> bool {
        role.can_manage() || item.is_visible()
    }

    /// Items exposed to the role, in their original order.
    ///
    /// Organizers see everything, hidden drafts included.
    pub fn filter<T: GatedContent + Clone>(items: &[T], role: ViewerRole) -> Vec<T> {
        items
            .iter()
            .filter(|item| Self::is_exposed(*item, role))
            .cloned()
            .collect()
    }

    /// Copy of the event with quizzes and materials narrowed to the role
    pub fn project(event: &Event, role: ViewerRole) -> Event {
        Event {
            quizzes: Self::filter(&event.quizzes, role),
            materials: Self::filter(&event.materials, role),
            ..event.clone()
        }
    }
}

/// Organizer-only visibility toggles, round-tripped to the backend
#[derive(Debug)]
pub struct VisibilityService<A> {
    api: Arc<A>,
}

impl<A> Clone for VisibilityService<A> {
    fn clone(&self) -> Self {
        Self { api: Arc::clone(&self.api) }
    }
}

impl<A: EventApi> VisibilityService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Set one item's visibility.
    ///
    /// The local item changes only when the backend call succeeds; on
    /// failure it keeps its prior value and the error is returned.
    pub async fn set_visibility<T: GatedContent>(
        &self,
        role: ViewerRole,
        event_id: i64,
        items: &mut [T],
        item_id: i64,
        visible: bool,
    ) -> Result<()> {
        ensure_manager(role, T::KIND.as_str(), event_id)?;

        let index = position_of(items, item_id)?;

        if let Err(e) = self.api.set_visibility(T::KIND, item_id, visible).await {
            warn!(
                kind = T::KIND.as_str(),
                item_id = item_id,
                event_id = event_id,
                error = %e,
                "Visibility change rejected, keeping previous value"
            );
            return Err(e);
        }

        items[index].set_visible(visible);
        logging::log_visibility_change(T::KIND.as_str(), item_id, event_id, visible);
        Ok(())
    }

    /// Flip one item's visibility and return the new value
    pub async fn toggle<T: GatedContent>(
        &self,
        role: ViewerRole,
        event_id: i64,
        items: &mut [T],
        item_id: i64,
    ) -> Result<bool> {
        let index = position_of(items, item_id)?;
        let target = !items[index].is_visible();
        self.set_visibility(role, event_id, items, item_id, target).await?;
        Ok(target)
    }

    /// Apply several changes to distinct items concurrently.
    ///
    /// Each change succeeds or fails on its own; results come back in the
    /// order the changes were given.
    pub async fn set_many<T: GatedContent>(
        &self,
        role: ViewerRole,
        event_id: i64,
        items: &mut [T],
        changes: &[(i64, bool)],
    ) -> Result<Vec<(i64, Result<()>)>> {
        ensure_manager(role, T::KIND.as_str(), event_id)?;

        let mut distinct = HashSet::new();
        for (item_id, _) in changes {
            if !distinct.insert(*item_id) {
                return Err(SeesError::InvalidInput(format!(
                    "{} {} changed twice in one batch", T::KIND, item_id
                )));
            }
            position_of(items, *item_id)?;
        }

        let api = &self.api;
        let outcomes = join_all(
            changes
                .iter()
                .map(|(item_id, visible)| api.set_visibility(T::KIND, *item_id, *visible)),
        )
        .await;

        let mut results = Vec::with_capacity(changes.len());
        for ((item_id, visible), outcome) in changes.iter().zip(outcomes) {
            match outcome {
                Ok(()) => {
                    let index = position_of(items, *item_id)?;
                    items[index].set_visible(*visible);
                    logging::log_visibility_change(T::KIND.as_str(), *item_id, event_id, *visible);
                    results.push((*item_id, Ok(())));
                }
                Err(e) => {
                    warn!(kind = T::KIND.as_str(), item_id = *item_id, error = %e, "Visibility change rejected");
                    results.push((*item_id, Err(e)));
                }
            }
        }
        Ok(results)
    }
}

fn ensure_manager(role: ViewerRole, kind: &str, event_id: i64) -> Result<()> {
    if role.can_manage() {
        return Ok(());
    }
    logging::log_permission_denied("set_visibility", Some(role), event_id);
    Err(SeesError::PermissionDenied(format!(
        "Only organizers can change {} visibility", kind
    )))
}

fn position_of<T: GatedContent>(items: &[T], item_id: i64) -> Result<usize> {
    items
        .iter()
        .position(|item| item.id() == item_id)
        .ok_or_else(|| SeesError::InvalidInput(format!("No {} with id {}", T::KIND, item_id)))
}
