// ── Session manager ──
//
// Owns the single device link. Access is serialized through a tokio
// mutex: a command acquires the session, runs all of its exchanges in
// order, and releases it. A dead link is dropped and replaced on the
// next acquisition, so a timeout never leaves the gateway stuck.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use tikgate_api::Record;

use crate::device::{Connector, DeviceLink};
use crate::error::CoreError;

/// Lazily-connected, reconnect-on-demand owner of one device link.
pub struct SessionManager<C: Connector> {
    connector: C,
    slot: Mutex<Option<C::Link>>,
    attempts: u32,
    retry_delay: Duration,
}

impl<C: Connector> SessionManager<C> {
    /// `attempts` is clamped to at least one.
    pub fn new(connector: C, attempts: u32, retry_delay: Duration) -> Self {
        Self {
            connector,
            slot: Mutex::new(None),
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Wait for exclusive access and return a working session,
    /// (re)connecting if there is no healthy link.
    pub async fn acquire(&self) -> Result<Session<'_, C::Link>, CoreError> {
        let mut guard = self.slot.lock().await;

        if guard.as_ref().is_some_and(|link| !link.is_healthy()) {
            debug!("discarding dead device link");
            *guard = None;
        }

        if guard.is_none() {
            *guard = Some(self.connect_with_retry().await?);
        }

        Ok(Session { guard })
    }

    /// Hand a session back. Dropping it has the same effect.
    pub fn release(&self, session: Session<'_, C::Link>) {
        drop(session);
    }

    /// Close the current link, if any. The next `acquire()` reconnects.
    pub async fn disconnect(&self) {
        if self.slot.lock().await.take().is_some() {
            debug!("device link closed");
        }
    }

    async fn connect_with_retry(&self) -> Result<C::Link, CoreError> {
        let target = self.connector.describe();
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.connector.connect().await {
                Ok(link) => {
                    info!(%target, attempt, "device session established");
                    return Ok(link);
                }
                // Retrying will not fix bad credentials.
                Err(e) if e.is_auth() => return Err(e.into()),
                Err(e) => {
                    warn!(%target, attempt, error = %e, "device connect failed");
                    last_error = Some(e);
                    if attempt < self.attempts {
                        tokio::time::sleep(self.retry_delay * attempt).await;
                    }
                }
            }
        }

        Err(CoreError::Connectivity {
            reason: last_error.map_or_else(|| "no connection attempts".into(), |e| e.to_string()),
        })
    }
}

/// Exclusive access to the device link for the duration of one command.
pub struct Session<'a, L> {
    guard: MutexGuard<'a, Option<L>>,
}

impl<L: DeviceLink> Session<'_, L> {
    /// Issue one request/response exchange.
    ///
    /// A connectivity failure drops the link so the next acquisition
    /// reconnects; the error is returned as-is (no retry here).
    pub async fn call(
        &mut self,
        path: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Record>, CoreError> {
        let link = self.guard.as_mut().ok_or_else(|| CoreError::Connectivity {
            reason: "session closed".into(),
        })?;

        match link.call(path, action, params).await {
            Ok(records) => Ok(records),
            Err(e) => {
                if e.is_connectivity() || !link.is_healthy() {
                    warn!(path, error = %e, "device link lost");
                    *self.guard = None;
                }
                Err(e.into())
            }
        }
    }

    pub async fn print(&mut self, path: &str) -> Result<Vec<Record>, CoreError> {
        self.call(path, "print", &[]).await
    }
}
