//! A signed-in client session.
//!
//! `Session` owns the [`AppState`] and the assistant [`Conversation`]. Every
//! mutation is written through the data adapter first; only the row the
//! backend hands back is reduced into state, so a failed write leaves the
//! state untouched. Edits and deletes only accept ids the session already
//! holds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use masroufi_assistant::error::AssistantError;
use masroufi_assistant::invoke::AssistantClient;
use masroufi_assistant::proxy::ChatRequest;
use masroufi_auth::flows::AuthSession;
use masroufi_core::conversation::{ChatMessage, Conversation};
use masroufi_core::models::{Budget, Category, Goal, Notification, Transaction, User};
use masroufi_core::state::{reduce, Action, AppState};
use masroufi_core::summary::summarize;
use masroufi_store::changes::{Change, ChangeFeed, SubscriptionId};
use masroufi_store::rest::{RestBackend, StoreConfig};
use masroufi_store::{Backend, DataAccess, Table};

use crate::assistant::Assistant;
use crate::error::ClientError;

/// Transitions reported by the auth service.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// `User` is the profile known at sign-in; the stored profile wins when
    /// one exists.
    SignedIn(User),
    SignedOut,
}

pub struct Session<B, A> {
    data: DataAccess<B>,
    assistant: A,
    state: AppState,
    conversation: Conversation,
    /// Set by feed callbacks, cleared by [`Session::refresh`].
    stale: Arc<AtomicBool>,
    watching: Option<(Arc<dyn ChangeFeed>, Vec<SubscriptionId>)>,
}

impl Session<RestBackend, AssistantClient> {
    /// Session against the hosted services, acting as the user behind `auth`.
    pub fn connect(
        store: StoreConfig,
        assistant: AssistantClient,
        auth: &AuthSession,
    ) -> Result<Self, ClientError> {
        let backend = RestBackend::new(store)?.with_access_token(&auth.access_token);
        let assistant = assistant.with_access_token(&auth.access_token);
        Ok(Self::new(DataAccess::new(backend), assistant))
    }
}

impl<B: Backend, A: Assistant> Session<B, A> {
    pub fn new(data: DataAccess<B>, assistant: A) -> Self {
        Self {
            data,
            assistant,
            state: AppState::default(),
            conversation: Conversation::default(),
            stale: Arc::default(),
            watching: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn data(&self) -> &DataAccess<B> {
        &self.data
    }

    /// React to an auth transition.
    ///
    /// Signing in loads the stored profile (creating it on first sign-in)
    /// and every collection the user owns. Signing out drops all state and
    /// the conversation.
    pub async fn on_auth_change(&mut self, event: AuthEvent) -> Result<(), ClientError> {
        match event {
            AuthEvent::SignedIn(user) => {
                let user = self.load_profile(user).await?;
                info!(user_id = %user.id, "session signed in");
                self.stale.store(false, Ordering::SeqCst);
                let snapshot = self.data.load_snapshot(user.id).await;
                self.dispatch(Action::Hydrated { user, snapshot });
            }
            AuthEvent::SignedOut => {
                info!("session signed out");
                self.dispatch(Action::SignedOut);
                self.conversation.clear();
                self.stale.store(false, Ordering::SeqCst);
            }
        }
        Ok(())
    }

    /// Mark the session stale whenever `feed` reports a change on any
    /// table. Replaces a previously watched feed.
    pub fn watch(&mut self, feed: Arc<dyn ChangeFeed>) {
        self.unwatch();
        let ids = Table::ALL
            .iter()
            .map(|&table| {
                let stale = Arc::clone(&self.stale);
                feed.subscribe(
                    table,
                    Arc::new(move |change: &Change| {
                        debug!(table = %change.table, id = %change.id, "remote change");
                        stale.store(true, Ordering::SeqCst);
                    }),
                )
            })
            .collect();
        self.watching = Some((feed, ids));
    }

    /// True when a watched feed reported a change since the last load.
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Re-fetch if a watched feed reported a change. Returns whether a
    /// reload happened.
    pub async fn sync(&mut self) -> Result<bool, ClientError> {
        if !self.is_stale() {
            return Ok(false);
        }
        if !self.state.authenticated {
            self.stale.store(false, Ordering::SeqCst);
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Reload every collection for the signed-in user.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let user = self.current_user()?.clone();
        self.stale.store(false, Ordering::SeqCst);
        let snapshot = self.data.load_snapshot(user.id).await;
        self.dispatch(Action::Hydrated { user, snapshot });
        Ok(())
    }

    async fn load_profile(&self, user: User) -> Result<User, ClientError> {
        match self.data.fetch_user(user.id).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Ok(self.data.insert(&user).await?),
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "profile read failed, using sign-in profile");
                Ok(user)
            }
        }
    }

    pub async fn update_profile(&mut self, user: User) -> Result<&User, ClientError> {
        let owner = self.owner()?;
        if user.id != owner {
            return Err(ClientError::NotFound {
                kind: "user",
                id: user.id,
            });
        }
        let saved = self.data.update(owner, &user).await?;
        self.dispatch(Action::UserSaved(saved));
        self.current_user()
    }

    // ── Transactions ─────────────────────────────────────────────────────────

    pub async fn add_transaction(&mut self, mut txn: Transaction) -> Result<Transaction, ClientError> {
        txn.user_id = self.owner()?;
        txn.validate()?;
        let saved = self.data.insert(&txn).await?;
        self.dispatch(Action::TransactionSaved(saved.clone()));
        Ok(saved)
    }

    pub async fn update_transaction(&mut self, mut txn: Transaction) -> Result<Transaction, ClientError> {
        let owner = self.held(
            "transaction",
            txn.id,
            self.state.transactions.iter().map(|t| t.id),
        )?;
        txn.user_id = owner;
        txn.validate()?;
        let saved = self.data.update(owner, &txn).await?;
        self.dispatch(Action::TransactionSaved(saved.clone()));
        Ok(saved)
    }

    pub async fn remove_transaction(&mut self, id: Uuid) -> Result<(), ClientError> {
        let owner = self.held(
            "transaction",
            id,
            self.state.transactions.iter().map(|t| t.id),
        )?;
        self.data.delete::<Transaction>(owner, id).await?;
        self.dispatch(Action::TransactionRemoved(id));
        Ok(())
    }

    // ── Categories, budgets, goals ───────────────────────────────────────────

    pub async fn add_category(&mut self, mut category: Category) -> Result<Category, ClientError> {
        category.user_id = self.owner()?;
        category.validate()?;
        let saved = self.data.insert(&category).await?;
        self.dispatch(Action::CategorySaved(saved.clone()));
        Ok(saved)
    }

    pub async fn add_budget(&mut self, mut budget: Budget) -> Result<Budget, ClientError> {
        budget.user_id = self.owner()?;
        budget.validate()?;
        let saved = self.data.insert(&budget).await?;
        self.dispatch(Action::BudgetSaved(saved.clone()));
        Ok(saved)
    }

    pub async fn update_budget(&mut self, mut budget: Budget) -> Result<Budget, ClientError> {
        let owner = self.held(
            "budget",
            budget.id,
            self.state.budgets.iter().map(|b| b.id),
        )?;
        budget.user_id = owner;
        budget.validate()?;
        let saved = self.data.update(owner, &budget).await?;
        self.dispatch(Action::BudgetSaved(saved.clone()));
        Ok(saved)
    }

    pub async fn add_goal(&mut self, mut goal: Goal) -> Result<Goal, ClientError> {
        goal.user_id = self.owner()?;
        goal.validate()?;
        let saved = self.data.insert(&goal).await?;
        self.dispatch(Action::GoalSaved(saved.clone()));
        Ok(saved)
    }

    pub async fn update_goal(&mut self, mut goal: Goal) -> Result<Goal, ClientError> {
        let owner = self.held(
            "goal",
            goal.id,
            self.state.goals.iter().map(|g| g.id),
        )?;
        goal.user_id = owner;
        goal.validate()?;
        let saved = self.data.update(owner, &goal).await?;
        self.dispatch(Action::GoalSaved(saved.clone()));
        Ok(saved)
    }

    // ── Notifications ────────────────────────────────────────────────────────

    pub async fn mark_notification_read(&mut self, id: Uuid) -> Result<(), ClientError> {
        let owner = self.owner()?;
        let mut notification: Notification = self
            .state
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(ClientError::NotFound {
                kind: "notification",
                id,
            })?;
        if notification.read {
            return Ok(());
        }

        notification.read = true;
        let saved = self.data.update(owner, &notification).await?;
        self.dispatch(Action::NotificationSaved(saved));
        Ok(())
    }

    // ── Assistant ────────────────────────────────────────────────────────────

    /// Ask the assistant about the user's finances.
    ///
    /// The current state is summarized into the context string sent with
    /// the prompt. The prompt and the reply are appended to the
    /// conversation; a failed call appends the fallback reply instead of
    /// returning an error. The prompt is sent as typed.
    pub async fn ask_assistant(&mut self, prompt: &str) -> Result<&ChatMessage, ClientError> {
        if prompt.trim().is_empty() {
            return Err(AssistantError::MissingField("prompt".to_string()).into());
        }

        let context = summarize(
            self.state.currency(),
            &self.state.transactions,
            &self.state.categories,
            &self.state.budgets,
        )
        .to_context_string();

        self.conversation.push_user(prompt);
        let reply = self
            .assistant
            .ask(&ChatRequest::new(prompt, context))
            .await;
        Ok(self.conversation.push_reply(reply))
    }

    fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, action);
    }

    fn current_user(&self) -> Result<&User, ClientError> {
        match (&self.state.user, self.state.authenticated) {
            (Some(user), true) => Ok(user),
            _ => Err(ClientError::NotSignedIn),
        }
    }

    fn owner(&self) -> Result<Uuid, ClientError> {
        self.current_user().map(|u| u.id)
    }

    /// The owner, provided `id` is among the ids this session holds.
    fn held(
        &self,
        kind: &'static str,
        id: Uuid,
        mut ids: impl Iterator<Item = Uuid>,
    ) -> Result<Uuid, ClientError> {
        let owner = self.owner()?;
        if ids.any(|held| held == id) {
            Ok(owner)
        } else {
            Err(ClientError::NotFound { kind, id })
        }
    }
}

impl<B, A> Session<B, A> {
    fn unwatch(&mut self) {
        if let Some((feed, ids)) = self.watching.take() {
            for id in ids {
                feed.unsubscribe(id);
            }
        }
    }
}

impl<B, A> Drop for Session<B, A> {
    fn drop(&mut self) {
        self.unwatch();
    }
}
