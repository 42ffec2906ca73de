//! The two mounted screens and their load sequence.
//!
//! Mounting returns a `Loading` view at once and runs token then data, in
//! that order, on a worker thread. The view settles once when the worker
//! reports back. The view owns a drop guard for the worker's cancellation
//! token: tearing the view down stops the worker before its next request,
//! and a response already in flight is discarded.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use petboard_core::{AccessToken, Animal, ApiError, Dashboard, TypeFilter, ViewError, ViewState};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{info, warn};

use crate::session::{Session, SessionError};
use crate::transport::Transport;

const LIST_FAILED: &str = "Failed to fetch pets";
const DETAIL_FAILED: &str = "Failed to fetch pet details";

/// Why a mount stopped before settling.
enum Interrupted {
    Cancelled,
    Failed(ViewError),
}

fn authenticate<T: Transport>(session: &Session<T>, cancel: &CancellationToken) -> Result<AccessToken, Interrupted> {
    session.token(cancel).map_err(|err| match err {
        SessionError::Cancelled => Interrupted::Cancelled,
        err => {
            warn!(error = %err, "authentication failed");
            Interrupted::Failed(ViewError::Authentication)
        }
    })
}

/// Map a data-phase failure to what the view shows, invalidating the token on 401.
fn fetch_failed<T: Transport>(
    session: &Session<T>,
    token: &AccessToken,
    err: SessionError,
    status_message: &str,
) -> Interrupted {
    let error = match err {
        SessionError::Cancelled => return Interrupted::Cancelled,
        SessionError::Api(ApiError::DeserializationError(message)) => ViewError::fetch(message),
        SessionError::Api(api) => {
            if api.is_unauthorized() {
                session.invalidate(token);
            }
            ViewError::fetch(status_message)
        }
        SessionError::Transport(transport) => ViewError::fetch(transport.to_string()),
    };
    warn!(error = %error, "fetch failed");
    Interrupted::Failed(error)
}

/// A view whose load runs on a worker thread.
struct Mounted<V> {
    state: ViewState<V>,
    pending: Option<Receiver<Result<V, Interrupted>>>,
    _teardown: DropGuard,
}

impl<V: Send + 'static> Mounted<V> {
    fn spawn<F>(cancel: CancellationToken, load: F) -> Self
    where
        F: FnOnce(&CancellationToken) -> Result<V, Interrupted> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let worker_cancel = cancel.clone();
        thread::spawn(move || {
            // The view may already be gone; nobody is left to tell.
            let _ = tx.send(load(&worker_cancel));
        });
        Self {
            state: ViewState::Loading,
            pending: Some(rx),
            _teardown: cancel.drop_guard(),
        }
    }

    /// Take the worker's outcome if it has arrived.
    fn poll(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => self.settle(outcome),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.pending = None,
        }
    }

    /// Block until the worker reports back.
    fn wait(&mut self) {
        let Some(rx) = self.pending.take() else {
            return;
        };
        if let Ok(outcome) = rx.recv() {
            self.settle(outcome);
        }
    }

    fn settle(&mut self, outcome: Result<V, Interrupted>) {
        self.pending = None;
        let state = std::mem::replace(&mut self.state, ViewState::Loading);
        self.state = match outcome {
            Ok(value) => state.resolve(Ok(value)),
            Err(Interrupted::Failed(error)) => state.resolve(Err(error)),
            // Cancelled loads never settle.
            Err(Interrupted::Cancelled) => state,
        };
    }
}

/// The list route: summary, charts, filters, and the animal list.
pub struct DashboardView {
    inner: Mounted<Dashboard>,
}

impl DashboardView {
    pub fn mount<T: Transport + 'static>(session: Arc<Session<T>>, cancel: CancellationToken) -> Self {
        let inner = Mounted::spawn(cancel, move |cancel| {
            let dashboard = Self::load(&session, cancel)?;
            info!(animals = dashboard.animals().len(), "dashboard ready");
            Ok(dashboard)
        });
        Self { inner }
    }

    fn load<T: Transport>(session: &Session<T>, cancel: &CancellationToken) -> Result<Dashboard, Interrupted> {
        let token = authenticate(session, cancel)?;
        let client = session.client();
        let request = client.build_list_animals(&token);
        let animals = session
            .send(&request, cancel)
            .and_then(|response| Ok(client.parse_list_animals(response)?))
            .map_err(|err| fetch_failed(session, &token, err, LIST_FAILED))?;
        Ok(Dashboard::new(animals))
    }

    /// Current state, picking up the load outcome if it has arrived.
    pub fn poll(&mut self) -> &ViewState<Dashboard> {
        self.inner.poll();
        &self.inner.state
    }

    /// Block until the load settles or is cancelled.
    pub fn wait(&mut self) -> &ViewState<Dashboard> {
        self.inner.wait();
        &self.inner.state
    }

    pub fn state(&self) -> &ViewState<Dashboard> {
        &self.inner.state
    }

    /// Update the search text. Ignored unless the view is ready.
    pub fn set_search(&mut self, search: impl Into<String>) {
        if let Some(dashboard) = self.inner.state.ready_mut() {
            dashboard.set_search(search);
        }
    }

    /// Update the type selector. Ignored unless the view is ready.
    pub fn set_type_filter(&mut self, type_filter: TypeFilter) {
        if let Some(dashboard) = self.inner.state.ready_mut() {
            dashboard.set_type_filter(type_filter);
        }
    }
}

/// The `/pet/:id` route.
pub struct DetailView {
    id: u64,
    inner: Mounted<Animal>,
}

impl DetailView {
    pub fn mount<T: Transport + 'static>(session: Arc<Session<T>>, id: u64, cancel: CancellationToken) -> Self {
        let inner = Mounted::spawn(cancel, move |cancel| {
            let pet = Self::load(&session, id, cancel)?;
            info!(id, "pet details ready");
            Ok(pet)
        });
        Self { id, inner }
    }

    fn load<T: Transport>(session: &Session<T>, id: u64, cancel: &CancellationToken) -> Result<Animal, Interrupted> {
        let token = authenticate(session, cancel)?;
        let client = session.client();
        let request = client.build_get_animal(&token, id);
        session
            .send(&request, cancel)
            .and_then(|response| Ok(client.parse_get_animal(response)?))
            .map_err(|err| fetch_failed(session, &token, err, DETAIL_FAILED))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn poll(&mut self) -> &ViewState<Animal> {
        self.inner.poll();
        &self.inner.state
    }

    pub fn wait(&mut self) -> &ViewState<Animal> {
        self.inner.wait();
        &self.inner.state
    }

    pub fn state(&self) -> &ViewState<Animal> {
        &self.inner.state
    }
}
