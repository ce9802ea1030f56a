//! Login controller actor: an isolated Tokio task that owns the login
//! state.
//!
//! The outside world talks to it through a [`LoginHandle`] (an mpsc
//! sender plus a watch receiver for snapshots). Every transition runs on
//! the actor's task, one command at a time, so there is never more than
//! one writer.
//!
//! The auth call is the one slow thing. It runs on its own spawned task
//! and its result comes back into the actor's `select!` loop, so edits
//! keep flowing while an attempt is outstanding and a second submit sees
//! `is_loading` and backs off.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use latchkey_auth::{AuthError, AuthService, AuthToken};
use latchkey_net::Connectivity;
use latchkey_store::{CredentialKey, CredentialStore, StoredValue};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};

use crate::navigation::{self, NavigationEvents, NavigationReason, Navigator};
use crate::state::{LoginForm, messages, remaining_minutes};
use crate::{Clock, LOCKOUT_THRESHOLD, LoginConfig, LoginError, LoginState, SystemClock, Timestamp};

/// What a call to [`LoginHandle::submit`] did.
///
/// The state snapshot is still the thing to render; this just saves the
/// caller from diffing snapshots to find out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// An attempt was handed to the auth service. Watch the state (or
    /// call [`LoginHandle::settled`]) for the result.
    Started,
    /// An attempt (or the startup credential check) is already running.
    /// Nothing happened.
    InFlight,
    /// Blocked by an active lockout with `minutes` (rounded up) to go.
    LockedOut { minutes: u64 },
    /// Blocked because the connectivity oracle reports offline.
    Offline,
}

enum FieldEdit {
    Username(String),
    Password(String),
    RememberMe(bool),
}

/// Commands sent to the controller actor through its channel.
///
/// Every variant except `Shutdown` carries a reply channel. The reply is
/// sent after the transition has been published, so when a handle call
/// returns, the new snapshot is already visible.
enum LoginCommand {
    Edit {
        edit: FieldEdit,
        reply: oneshot::Sender<()>,
    },
    Submit {
        reply: oneshot::Sender<SubmitOutcome>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Refresh {
        reply: oneshot::Sender<()>,
    },
    Shutdown,
}

type AttemptResult = Result<AuthToken, AuthError>;

/// The attempt currently in flight, with the form values it was started
/// with.
struct PendingAttempt {
    username: String,
    remember_me: bool,
    task: JoinHandle<AttemptResult>,
}

// ---------------------------------------------------------------------------
// LoginHandle
// ---------------------------------------------------------------------------

/// Handle to a running login controller.
///
/// Cheap to clone; every clone drives the same controller. The
/// controller stops when [`shutdown`](Self::shutdown) is called or the
/// last handle is dropped.
#[derive(Clone)]
pub struct LoginHandle {
    sender: mpsc::Sender<LoginCommand>,
    state: watch::Receiver<LoginState>,
}

impl LoginHandle {
    /// The latest published snapshot.
    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    /// A receiver that observes every future snapshot.
    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.clone()
    }

    /// Replaces the username and clears the error line.
    pub async fn set_username(&self, value: impl Into<String>) -> Result<(), LoginError> {
        self.edit(FieldEdit::Username(value.into())).await
    }

    /// Replaces the password and clears the error line.
    pub async fn set_password(&self, value: impl Into<String>) -> Result<(), LoginError> {
        self.edit(FieldEdit::Password(value.into())).await
    }

    /// Sets whether a successful login should be remembered.
    pub async fn set_remember_me(&self, value: bool) -> Result<(), LoginError> {
        self.edit(FieldEdit::RememberMe(value)).await
    }

    /// Submits the current credentials.
    ///
    /// Returns once the attempt has been started or rejected locally; it
    /// does not wait for the auth service.
    pub async fn submit(&self) -> Result<SubmitOutcome, LoginError> {
        self.request(|reply| LoginCommand::Submit { reply }).await
    }

    /// Clears stored credentials and returns the form to its defaults.
    pub async fn reset(&self) -> Result<(), LoginError> {
        self.request(|reply| LoginCommand::Reset { reply }).await
    }

    /// Rebuilds the snapshot against the current time, e.g. so a lockout
    /// that has run out stops showing as locked.
    pub async fn refresh(&self) -> Result<(), LoginError> {
        self.request(|reply| LoginCommand::Refresh { reply }).await
    }

    /// Waits until nothing is in flight and returns that snapshot.
    pub async fn settled(&self) -> Result<LoginState, LoginError> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| !s.is_loading())
            .await
            .map_err(|_| LoginError::ControllerClosed)?;
        Ok(settled.clone())
    }

    /// Stops the controller. An in-flight attempt is abandoned.
    pub async fn shutdown(&self) -> Result<(), LoginError> {
        self.sender
            .send(LoginCommand::Shutdown)
            .await
            .map_err(|_| LoginError::ControllerClosed)
    }

    /// Returns `true` once the controller task has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn edit(&self, edit: FieldEdit) -> Result<(), LoginError> {
        self.request(|reply| LoginCommand::Edit { edit, reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> LoginCommand,
    ) -> Result<T, LoginError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| LoginError::ControllerClosed)?;
        reply_rx.await.map_err(|_| LoginError::ControllerClosed)
    }
}

// ---------------------------------------------------------------------------
// LoginController
// ---------------------------------------------------------------------------

/// Entry point for starting a login controller.
///
/// ```rust,no_run
/// use latchkey_auth::StaticAuthService;
/// use latchkey_login::{LoginConfig, LoginController};
/// use latchkey_net::ConnectivityMonitor;
/// use latchkey_store::MemoryStore;
///
/// # async fn demo() -> Result<(), latchkey_login::LoginError> {
/// let (login, mut navigation) = LoginController::builder(
///     StaticAuthService::demo(),
///     MemoryStore::new(),
///     ConnectivityMonitor::default(),
/// )
/// .config(LoginConfig::with_lockout(std::time::Duration::from_secs(300)))
/// .spawn();
///
/// login.set_username("anne").await?;
/// login.set_password("anne").await?;
/// login.submit().await?;
///
/// if navigation.next().await.is_some() {
///     // show the welcome screen
/// }
/// # Ok(())
/// # }
/// ```
pub struct LoginController;

impl LoginController {
    /// Starts configuring a controller around its three collaborators.
    pub fn builder<A, S, N>(auth: A, store: S, connectivity: N) -> LoginControllerBuilder<A, S, N>
    where
        A: AuthService,
        S: CredentialStore,
        N: Connectivity,
    {
        LoginControllerBuilder {
            auth,
            store,
            connectivity,
            config: LoginConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

/// Builder for a [`LoginController`].
pub struct LoginControllerBuilder<A, S, N> {
    auth: A,
    store: S,
    connectivity: N,
    config: LoginConfig,
    clock: Arc<dyn Clock>,
}

impl<A, S, N> LoginControllerBuilder<A, S, N>
where
    A: AuthService,
    S: CredentialStore,
    N: Connectivity,
{
    /// Sets the controller configuration.
    pub fn config(mut self, config: LoginConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the system clock.
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Spawns the controller task and returns its handle and the
    /// navigation receiver.
    ///
    /// Returns immediately. The startup credential check runs inside the
    /// task; until it finishes the state reports `is_loading`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self) -> (LoginHandle, NavigationEvents) {
        let config = self.config.validated();
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
        let (navigator, navigation) = navigation::channel(config.navigation_buffer);

        let form = LoginForm {
            is_loading: true,
            ..LoginForm::default()
        };
        let initial = LoginState::new(form.clone(), &config, self.clock.now());
        let (state_tx, state_rx) = watch::channel(initial);

        let actor = LoginActor {
            config,
            form,
            auth: Arc::new(self.auth),
            store: self.store,
            connectivity: self.connectivity,
            clock: self.clock,
            state: state_tx,
            navigator,
            receiver: command_rx,
            pending: None,
            announced_expiry: None,
        };

        tokio::spawn(actor.run());

        let handle = LoginHandle {
            sender: command_tx,
            state: state_rx,
        };
        (handle, navigation)
    }
}

// ---------------------------------------------------------------------------
// LoginActor
// ---------------------------------------------------------------------------

/// The internal controller state. Runs inside a Tokio task.
struct LoginActor<A, S, N> {
    config: LoginConfig,
    form: LoginForm,
    auth: Arc<A>,
    store: S,
    connectivity: N,
    clock: Arc<dyn Clock>,
    state: watch::Sender<LoginState>,
    navigator: Navigator,
    receiver: mpsc::Receiver<LoginCommand>,
    pending: Option<PendingAttempt>,
    /// Lockout expiry we've already re-published for, so the expiry
    /// timer fires once per lockout.
    announced_expiry: Option<Timestamp>,
}

impl<A, S, N> LoginActor<A, S, N>
where
    A: AuthService,
    S: CredentialStore,
    N: Connectivity,
{
    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::info!(
            lockout_secs = self.config.lockout_secs,
            "login controller started"
        );

        self.hydrate().await;

        loop {
            let lockout_timer = self.lockout_timer();

            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    match cmd {
                        LoginCommand::Edit { edit, reply } => {
                            self.apply_edit(edit);
                            let _ = reply.send(());
                        }
                        LoginCommand::Submit { reply } => {
                            let outcome = self.submit();
                            let _ = reply.send(outcome);
                        }
                        LoginCommand::Reset { reply } => {
                            self.reset().await;
                            let _ = reply.send(());
                        }
                        LoginCommand::Refresh { reply } => {
                            self.publish();
                            let _ = reply.send(());
                        }
                        LoginCommand::Shutdown => break,
                    }
                }
                joined = join_attempt(&mut self.pending) => {
                    if let Some(attempt) = self.pending.take() {
                        self.resolve(attempt, joined).await;
                    }
                }
                () = sleep_for(lockout_timer) => {
                    self.announced_expiry = self.form.lockout_expires_at;
                    self.publish();
                }
            }
        }

        if let Some(attempt) = self.pending.take() {
            attempt.task.abort();
            tracing::debug!("in-flight login attempt abandoned");
        }
        tracing::info!("login controller stopped");
    }

    // -- Startup --------------------------------------------------------

    /// Restores a remembered session and any lockout from the store.
    async fn hydrate(&mut self) {
        self.form.is_loading = true;
        self.publish();

        let has_token = match self.store.get(CredentialKey::RememberedToken).await {
            Ok(value) => value
                .as_ref()
                .and_then(StoredValue::as_text)
                .is_some_and(|token| !token.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read remembered token");
                false
            }
        };

        self.form.is_loading = false;
        if has_token {
            self.form.remember_me = true;
            self.publish();
            tracing::info!("remembered token found, signing in");
            self.navigator.emit(NavigationReason::RememberedToken);
        } else {
            self.publish();
        }

        let stored_expiry = match self.store.get(CredentialKey::LockoutExpiresAt).await {
            Ok(value) => value
                .as_ref()
                .and_then(StoredValue::as_integer)
                .and_then(|millis| u64::try_from(millis).ok()),
            Err(e) => {
                // Can't tell whether a lockout is active; leave the
                // stored value alone rather than erase a real one.
                tracing::warn!(error = %e, "failed to read lockout expiry");
                return;
            }
        };

        let now = self.clock.now();
        match stored_expiry {
            Some(expires) if expires > now => {
                self.form.lockout_expires_at = Some(expires);
                self.publish();
                tracing::info!(expires_at = expires, "lockout restored from store");
            }
            _ => {
                if let Err(e) = self.store.remove(CredentialKey::LockoutExpiresAt).await {
                    tracing::warn!(error = %e, "failed to clear stale lockout");
                }
            }
        }
    }

    // -- Commands -------------------------------------------------------

    fn apply_edit(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Username(value) => {
                self.form.username = value;
                self.form.error_message = None;
            }
            FieldEdit::Password(value) => {
                self.form.password = value;
                self.form.error_message = None;
            }
            FieldEdit::RememberMe(value) => {
                self.form.remember_me = value;
            }
        }
        self.publish();
    }

    fn submit(&mut self) -> SubmitOutcome {
        if self.form.is_loading {
            tracing::debug!("submit ignored, attempt already in flight");
            return SubmitOutcome::InFlight;
        }

        if let Some(remaining) = self.form.lockout_remaining(self.clock.now()) {
            let minutes = remaining_minutes(remaining);
            self.form.error_message = Some(messages::locked_out(minutes));
            self.publish();
            tracing::debug!(minutes, "submit rejected, account locked");
            return SubmitOutcome::LockedOut { minutes };
        }

        if !self.connectivity.is_online() {
            self.form.error_message = Some(messages::NO_INTERNET.to_string());
            self.publish();
            tracing::debug!("submit rejected, offline");
            return SubmitOutcome::Offline;
        }

        self.form.is_loading = true;
        self.form.error_message = None;
        self.publish();

        let auth = Arc::clone(&self.auth);
        let username = self.form.username.clone();
        let password = self.form.password.clone();
        let task = tokio::spawn({
            let username = username.clone();
            async move { auth.login(&username, &password).await }
        });

        tracing::info!(%username, "login attempt started");
        self.pending = Some(PendingAttempt {
            username,
            remember_me: self.form.remember_me,
            task,
        });
        SubmitOutcome::Started
    }

    async fn reset(&mut self) {
        if let Some(attempt) = self.pending.take() {
            attempt.task.abort();
        }

        for key in CredentialKey::ALL {
            if let Err(e) = self.store.remove(key).await {
                tracing::warn!(%key, error = %e, "failed to clear credential on reset");
            }
        }

        self.form = LoginForm::default();
        self.announced_expiry = None;
        self.publish();
        tracing::info!("login state reset");
    }

    // -- Attempt resolution ---------------------------------------------

    async fn resolve(
        &mut self,
        attempt: PendingAttempt,
        joined: Result<AttemptResult, JoinError>,
    ) {
        let result = joined.unwrap_or_else(|e| {
            tracing::error!(error = %e, "login attempt task failed");
            Err(AuthError::Unavailable(e.to_string()))
        });

        match result {
            Ok(token) => self.on_success(attempt, token).await,
            Err(e) => self.on_failure(attempt, e).await,
        }
    }

    async fn on_success(&mut self, attempt: PendingAttempt, token: AuthToken) {
        if attempt.remember_me {
            let value = StoredValue::from(token.into_inner());
            if let Err(e) = self.store.set(CredentialKey::RememberedToken, value).await {
                tracing::warn!(error = %e, "failed to persist remembered token");
            }
        }
        if let Err(e) = self.store.remove(CredentialKey::LockoutExpiresAt).await {
            tracing::warn!(error = %e, "failed to clear lockout after sign-in");
        }

        self.form.is_loading = false;
        self.form.failure_count = 0;
        self.form.lockout_expires_at = None;
        self.form.error_message = None;
        self.publish();

        tracing::info!(username = %attempt.username, "login succeeded");
        self.navigator.emit(NavigationReason::SignedIn);
    }

    async fn on_failure(&mut self, attempt: PendingAttempt, error: AuthError) {
        let failures = self.form.failure_count.saturating_add(1);

        if failures >= LOCKOUT_THRESHOLD {
            let lockout_ms =
                u64::try_from(self.config.lockout_duration().as_millis()).unwrap_or(u64::MAX);
            let expires = self.clock.now().saturating_add(lockout_ms);
            self.form.lockout_expires_at = Some(expires);

            let value = StoredValue::Integer(i64::try_from(expires).unwrap_or(i64::MAX));
            if let Err(e) = self.store.set(CredentialKey::LockoutExpiresAt, value).await {
                tracing::warn!(error = %e, "failed to persist lockout");
            }
            tracing::info!(
                username = %attempt.username,
                failures,
                expires_at = expires,
                "account locked out"
            );
        } else {
            tracing::info!(
                username = %attempt.username,
                failures,
                error = %error,
                "login failed"
            );
        }

        self.form.failure_count = failures;
        self.form.error_message = Some(messages::INVALID_CREDENTIALS.to_string());
        self.form.is_loading = false;
        self.publish();
    }

    // -- Helpers --------------------------------------------------------

    /// Replaces the published snapshot.
    fn publish(&self) {
        let snapshot = LoginState::new(self.form.clone(), &self.config, self.clock.now());
        self.state.send_replace(snapshot);
    }

    /// How long until the current lockout runs out, if we still need to
    /// announce it.
    fn lockout_timer(&self) -> Option<Duration> {
        let expires = self.form.lockout_expires_at?;
        if self.announced_expiry == Some(expires) {
            return None;
        }
        let now = self.clock.now();
        Some(Duration::from_millis(expires.saturating_sub(now)))
    }
}

/// Resolves when the pending attempt finishes; pends forever if there is
/// none.
async fn join_attempt(
    pending: &mut Option<PendingAttempt>,
) -> Result<AttemptResult, JoinError> {
    match pending {
        Some(attempt) => (&mut attempt.task).await,
        None => future::pending().await,
    }
}

async fn sleep_for(duration: Option<Duration>) {
    match duration {
        Some(duration) => tokio::time::sleep(duration).await,
        None => future::pending().await,
    }
}
