//! The free list of idle connections to the one configured peer.
//!
//! The pool is an explicit object owned by the client and handed by
//! reference to each exchange, never process-wide state. Its only
//! mutation points are the push and pop of the free list, each a short
//! critical section; the lock is never held across I/O. Acquiring never
//! waits for capacity: it either pops an idle connection or dials a new
//! one, so open connections are bounded by the caller's peak concurrency
//! rather than by the pool.

use std::io;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::connection::conn::Connection;
use crate::connection::stream::Transport;

/// A free-list connection pool for a single peer endpoint.
pub(crate) struct ConnectionPool {
    transport: Transport,
    idle: Mutex<Vec<Connection>>,
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool").field("transport", &self.transport).finish_non_exhaustive()
    }
}

impl ConnectionPool {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport, idle: Mutex::new(Vec::new()) }
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Hands out a connection: an idle one if available, else fresh.
    pub(crate) async fn acquire(&self) -> io::Result<Connection> {
        let idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop();

        if let Some(mut conn) = idle {
            debug!("reusing pooled connection");
            conn.mark_reused();
            return Ok(conn);
        }

        self.dial().await
    }

    /// Opens a new connection, bypassing the free list.
    pub(crate) async fn dial(&self) -> io::Result<Connection> {
        let stream = self.transport.connect().await?;
        Ok(Connection::new(stream))
    }

    /// Returns a healthy connection to the free list.
    ///
    /// A connection with undecoded bytes left in its buffer is off a
    /// message boundary and is dropped instead of pooled.
    pub(crate) fn release(&self, conn: Connection) {
        if conn.has_buffered() {
            warn!("discarding connection with unconsumed bytes");
            return;
        }

        self.idle.lock().unwrap_or_else(PoisonError::into_inner).push(conn);
    }

    /// Number of connections currently sitting in the free list.
    pub(crate) fn idle_len(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
