//! Lazily established, process-wide database handle.
//!
//! [`ConnectionManager`] moves through `Uninitialized -> Connecting -> Ready`.
//! Concurrent first callers all await the same in-flight attempt; a failed
//! attempt drops back to `Uninitialized` so the next caller starts over.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::ConnectionError;

/// Opens a fresh handle to the backing store.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    /// Human-readable target used in logs (never contains credentials).
    fn target(&self) -> String;

    async fn connect(&self) -> Result<Self::Handle, ConnectionError>;
}

type Attempt<H> = Shared<BoxFuture<'static, Result<H, ConnectionError>>>;

enum State<H: Clone> {
    Uninitialized,
    Connecting { generation: u64, attempt: Attempt<H> },
    Ready(H),
}

struct Inner<H: Clone> {
    state: State<H>,
    generation: u64,
}

/// Owns the single shared handle produced by a [`Connector`].
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    inner: Mutex<Inner<C::Handle>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            inner: Mutex::new(Inner {
                state: State::Uninitialized,
                generation: 0,
            }),
        }
    }

    /// Return the shared handle, connecting first if nobody has yet.
    pub async fn acquire(&self) -> Result<C::Handle, ConnectionError> {
        let (generation, attempt) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            match &inner.state {
                State::Ready(handle) => return Ok(handle.clone()),
                State::Connecting {
                    generation,
                    attempt,
                } => (*generation, attempt.clone()),
                State::Uninitialized => {
                    inner.generation += 1;
                    let generation = inner.generation;
                    let connector = Arc::clone(&self.connector);
                    tracing::info!(
                        target: "devevent-db",
                        attempt = generation,
                        db = %connector.target(),
                        "opening database connection"
                    );
                    let attempt = async move { connector.connect().await }
                        .boxed()
                        .shared();
                    inner.state = State::Connecting {
                        generation,
                        attempt: attempt.clone(),
                    };
                    (generation, attempt)
                }
            }
        };

        let outcome = attempt.await;

        let mut inner = self.lock();
        let owns_state = matches!(
            &inner.state,
            State::Connecting { generation: current, .. } if *current == generation
        );
        if owns_state {
            match &outcome {
                Ok(handle) => {
                    tracing::info!(target: "devevent-db", attempt = generation, "database connection ready");
                    inner.state = State::Ready(handle.clone());
                }
                Err(err) => {
                    tracing::error!(
                        target: "devevent-db",
                        attempt = generation,
                        error = %err,
                        "database connection failed"
                    );
                    inner.state = State::Uninitialized;
                }
            }
        }

        outcome
    }

    /// Whether a handle has already been established.
    pub fn is_ready(&self) -> bool {
        matches!(self.lock().state, State::Ready(_))
    }

    /// Number of connection attempts started so far.
    pub fn attempts(&self) -> u64 {
        self.lock().generation
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn lock(&self) -> MutexGuard<'_, Inner<C::Handle>> {
        // Every critical section leaves the state consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
