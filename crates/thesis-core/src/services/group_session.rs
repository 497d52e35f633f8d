// ============================================================================
// Thesis Core - Group Session Store
// File: crates/thesis-core/src/services/group_session.rs
// ============================================================================
//! Which group the user is currently acting in.
//!
//! The store is the only writer of the selection. It owns the authoritative
//! group list, the user's memberships, and the load lifecycle
//! (`Idle -> Loading -> Ready | Error`). Selection is orthogonal to the load
//! lifecycle: before the first successful load a selection is provisional and
//! gets confirmed or reset once the list arrives.
//!
//! Concurrent `load()` calls are ordered by a generation counter; only the
//! latest call may write its result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use thesis_shared::utils::is_valid_slug;

use crate::domain::{AuthContext, Group, GroupMembership};
use crate::error::SessionError;
use crate::repositories::{GroupRepository, SelectionStorage};
use crate::services::role_resolver::{GroupPermissions, RoleResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupSelection {
    #[default]
    None,
    /// Chosen before the group list was available; not yet validated.
    Provisional(Uuid),
    /// Present in the loaded group list.
    Confirmed(Uuid),
}

impl GroupSelection {
    pub fn group_id(&self) -> Option<Uuid> {
        match self {
            GroupSelection::None => None,
            GroupSelection::Provisional(id) | GroupSelection::Confirmed(id) => Some(*id),
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, GroupSelection::Provisional(_))
    }
}

/// One-time notices for the notification layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    GroupChanged { group_id: Uuid, name: String },
    SelectionReset { group_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    Failed(SessionError),
    /// A newer `load()` started before this one finished; result discarded.
    Superseded,
    SignedOut,
}

/// Everything a view needs to render group-scoped UI.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub status: LoadStatus,
    pub selection: GroupSelection,
    pub available_groups: Vec<Group>,
    pub memberships: Vec<GroupMembership>,
    pub user_id: Option<Uuid>,
    pub system_is_admin: bool,
    pub error: Option<SessionError>,
    pub notices: Vec<SessionNotice>,
    /// Set after the first successful load, cleared on teardown.
    pub has_loaded: bool,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// A load has finished (either way) and none is running.
    pub fn is_settled(&self) -> bool {
        match self.status {
            LoadStatus::Ready | LoadStatus::Error => true,
            LoadStatus::Idle | LoadStatus::Loading => false,
        }
    }

    pub fn current_group_id(&self) -> Option<Uuid> {
        self.selection.group_id()
    }

    /// The selected group, once confirmed against the loaded list.
    pub fn current_group(&self) -> Option<&Group> {
        match self.selection {
            GroupSelection::Confirmed(id) => self.find_by_id(&id),
            _ => None,
        }
    }

    pub fn find_by_id(&self, id: &Uuid) -> Option<&Group> {
        self.available_groups.iter().find(|g| &g.id == id)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Group> {
        self.available_groups.iter().find(|g| g.slug == slug)
    }

    pub fn resolver(&self) -> RoleResolver {
        RoleResolver::new(self.memberships.clone(), self.system_is_admin)
    }

    pub fn permissions(&self) -> GroupPermissions {
        match self.current_group() {
            Some(group) => self.resolver().permissions_for(&group.id),
            None => GroupPermissions::without_group(self.system_is_admin),
        }
    }

    pub fn is_group_admin(&self) -> bool {
        self.permissions().is_group_admin
    }

    pub fn is_supervisor(&self) -> bool {
        self.permissions().is_supervisor
    }

    pub fn is_advisor(&self) -> bool {
        self.permissions().is_advisor
    }

    pub fn can_manage(&self) -> bool {
        self.permissions().can_manage
    }

    /// Applies a fresh group list and reconciles the selection against it.
    /// Returns the id of a selection that had to be dropped.
    fn apply_loaded(&mut self, groups: Vec<Group>, mut memberships: Vec<GroupMembership>) -> Option<Uuid> {
        if let Some(user_id) = self.user_id {
            memberships.retain(|m| m.user_id == user_id);
        }
        self.available_groups = groups;
        self.memberships = memberships;
        self.status = LoadStatus::Ready;
        self.has_loaded = true;
        self.error = None;

        let selected = self.selection.group_id()?;
        if self.find_by_id(&selected).is_some() {
            self.selection = GroupSelection::Confirmed(selected);
            None
        } else {
            self.selection = GroupSelection::None;
            self.error = Some(SessionError::StaleState { group_id: selected });
            self.notices.push(SessionNotice::SelectionReset { group_id: selected });
            Some(selected)
        }
    }
}

/// Held across the fetch in [`GroupSessionStore::load`].
struct PendingLoad<'a> {
    store: &'a GroupSessionStore,
    generation: u64,
    armed: bool,
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.store.abandon_load(self.generation);
        }
    }
}

/// Single provider of group session state.
pub struct GroupSessionStore {
    groups: Arc<dyn GroupRepository>,
    storage: Arc<dyn SelectionStorage>,
    state: watch::Sender<SessionState>,
    generation: AtomicU64,
}

impl GroupSessionStore {
    /// Creates the store and rehydrates the persisted selection as provisional.
    pub fn new(groups: Arc<dyn GroupRepository>, storage: Arc<dyn SelectionStorage>) -> Self {
        let selection = match storage.load() {
            Ok(Some(id)) => {
                debug!("Rehydrated group selection {}", id);
                GroupSelection::Provisional(id)
            }
            Ok(None) => GroupSelection::None,
            Err(e) => {
                warn!("Ignoring unreadable group selection: {}", e);
                GroupSelection::None
            }
        };

        let (state, _) = watch::channel(SessionState {
            selection,
            ..SessionState::default()
        });

        Self {
            groups,
            storage,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Fetches groups and memberships. Only the most recent call updates state.
    pub async fn load(&self) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.status = LoadStatus::Loading;
        });
        info!(generation, "Loading groups and memberships");
        let mut pending = PendingLoad { store: self, generation, armed: true };

        let result = tokio::try_join!(self.groups.list_groups(), self.groups.list_my_memberships());
        pending.armed = false;

        let mut outcome = LoadOutcome::Superseded;
        let mut dropped = None;
        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            outcome = match result {
                Ok((groups, memberships)) => {
                    info!(generation, groups = groups.len(), memberships = memberships.len(), "Groups loaded");
                    dropped = s.apply_loaded(groups, memberships);
                    LoadOutcome::Ready
                }
                Err(e) => {
                    error!(generation, "Failed to load groups: {}", e);
                    s.status = LoadStatus::Error;
                    s.error = Some(e.clone());
                    LoadOutcome::Failed(e)
                }
            };
            true
        });

        if outcome == LoadOutcome::Superseded {
            debug!(generation, "Discarding superseded group load");
        }
        if let Some(group_id) = dropped {
            warn!("Selected group {} is no longer available, selection reset", group_id);
            self.persist(None);
        }
        outcome
    }

    /// Reverts `Loading` when the current load is dropped before it finishes.
    fn abandon_load(&self, generation: u64) {
        let reverted = self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::SeqCst) != generation || s.status != LoadStatus::Loading {
                return false;
            }
            s.status = if s.has_loaded { LoadStatus::Ready } else { LoadStatus::Idle };
            true
        });
        if reverted {
            warn!(generation, "Group load cancelled");
        }
    }

    /// Called on every authentication change: reloads, or tears down on sign-out.
    pub async fn on_auth_changed(&self, auth: &AuthContext) -> LoadOutcome {
        if !auth.is_authenticated() {
            self.teardown();
            return LoadOutcome::SignedOut;
        }

        let switched = self.state.borrow().user_id.is_some_and(|id| Some(id) != auth.user_id);
        if switched {
            info!("Signed-in user changed, clearing previous group session");
            self.teardown();
        }

        self.state.send_modify(|s| {
            s.user_id = auth.user_id;
            s.system_is_admin = auth.is_admin;
        });
        self.load().await
    }

    /// Clears everything on logout and invalidates in-flight loads.
    pub fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| *s = SessionState::default());
        self.persist(None);
        info!("Group session cleared");
    }

    /// Selects a group (or clears the selection).
    ///
    /// Unknown groups are accepted provisionally until the group list has
    /// loaded; afterwards they are rejected with `NotFound`.
    pub fn set_current_group(&self, group_id: Option<Uuid>) -> Result<(), SessionError> {
        let mut outcome = Ok(());
        let mut changed = false;

        self.state.send_if_modified(|s| {
            let Some(id) = group_id else {
                if s.selection == GroupSelection::None {
                    return false;
                }
                s.selection = GroupSelection::None;
                changed = true;
                return true;
            };

            if !s.has_loaded {
                if s.selection.group_id() == Some(id) {
                    return false;
                }
                s.selection = GroupSelection::Provisional(id);
                changed = true;
                return true;
            }

            let Some(name) = s.find_by_id(&id).map(|g| g.name.clone()) else {
                let err = SessionError::NotFound(format!("group {}", id));
                s.error = Some(err.clone());
                outcome = Err(err);
                return true;
            };
            if s.selection == GroupSelection::Confirmed(id) {
                return false;
            }
            s.selection = GroupSelection::Confirmed(id);
            if !matches!(s.error, Some(SessionError::Network(_))) {
                s.error = None;
            }
            s.notices.push(SessionNotice::GroupChanged { group_id: id, name });
            changed = true;
            true
        });

        match &outcome {
            Ok(()) if changed => {
                debug!("Current group set to {:?}", group_id);
                self.persist(group_id);
            }
            Err(e) => warn!("Rejected group selection: {}", e),
            _ => {}
        }
        outcome
    }

    /// Resolves a `:groupSlug` route segment.
    ///
    /// `Ok(Some(group))` when resolved, `Ok(None)` while groups are still
    /// loading, `Err(NotFound)` when the list is loaded and has no such slug.
    pub fn resolve_from_slug(&self, slug: &str) -> Result<Option<Group>, SessionError> {
        if !is_valid_slug(slug) {
            return Err(self.record_error(SessionError::group_not_found(slug)));
        }

        let (found, current, settled, load_error) = {
            let s = self.state.borrow();
            (
                s.find_by_slug(slug).cloned(),
                s.current_group_id(),
                s.has_loaded && s.status != LoadStatus::Loading,
                if s.has_loaded { None } else { s.error.clone().filter(|_| s.status == LoadStatus::Error) },
            )
        };

        match found {
            Some(group) => {
                if current != Some(group.id) {
                    self.set_current_group(Some(group.id))?;
                }
                Ok(Some(group))
            }
            None if settled => Err(self.record_error(SessionError::group_not_found(slug))),
            None => match load_error {
                Some(e) => Err(e),
                None => Ok(None),
            },
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn error(&self) -> Option<SessionError> {
        self.state.borrow().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    pub fn current_group(&self) -> Option<Group> {
        self.state.borrow().current_group().cloned()
    }

    pub fn current_group_id(&self) -> Option<Uuid> {
        self.state.borrow().current_group_id()
    }

    pub fn available_groups(&self) -> Vec<Group> {
        self.state.borrow().available_groups.clone()
    }

    pub fn system_is_admin(&self) -> bool {
        self.state.borrow().system_is_admin
    }

    pub fn permissions(&self) -> GroupPermissions {
        self.state.borrow().permissions()
    }

    pub fn is_group_admin(&self) -> bool {
        self.permissions().is_group_admin
    }

    pub fn is_supervisor(&self) -> bool {
        self.permissions().is_supervisor
    }

    pub fn is_advisor(&self) -> bool {
        self.permissions().is_advisor
    }

    pub fn can_manage(&self) -> bool {
        self.permissions().can_manage
    }

    /// Drains pending notices without waking subscribers.
    pub fn take_notices(&self) -> Vec<SessionNotice> {
        let mut drained = Vec::new();
        self.state.send_if_modified(|s| {
            drained = std::mem::take(&mut s.notices);
            false
        });
        drained
    }

    fn record_error(&self, err: SessionError) -> SessionError {
        warn!("{}", err);
        let recorded = err.clone();
        self.state.send_modify(|s| s.error = Some(recorded));
        err
    }

    fn persist(&self, group_id: Option<Uuid>) {
        if let Err(e) = self.storage.save(group_id) {
            warn!("Failed to persist group selection: {}", e);
        }
    }
}
