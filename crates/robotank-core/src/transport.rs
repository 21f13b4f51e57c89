//! The boundary between the simulation and whatever draws it.
//!
//! The game loop talks to a renderer only through a [`RendererLink`]:
//! snapshots go out, [`ControlState`]s come back. Two links are provided:
//!
//! - [`DirectLink`]: calls the renderer synchronously on the loop's thread
//! - [`ChannelLink`]: runs the renderer on its own thread behind bounded
//!   crossbeam channels; the loop never blocks on it
//!
//! Any `FnMut(&WorldSnapshot) -> ControlState` is a [`Renderer`].
//!
//! ```
//! use robotank_core::control::ControlState;
//! use robotank_core::snapshot::WorldSnapshot;
//! use robotank_core::transport::{DirectLink, RendererLink};
//!
//! let mut link = DirectLink::new(|snapshot: &WorldSnapshot| {
//!     if snapshot.tick >= 3 { ControlState::the_end() } else { ControlState::default() }
//! });
//! link.publish(WorldSnapshot { tick: 3, objects: Vec::new() }).unwrap();
//! assert_eq!(link.poll_control().unwrap(), Some(ControlState::the_end()));
//! assert_eq!(link.poll_control().unwrap(), None);
//! ```

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError, TrySendError};
use tracing::{debug, warn};

use crate::control::ControlState;
use crate::error::TransportError;
use crate::snapshot::WorldSnapshot;

/// Something that draws snapshots and reports user input.
pub trait Renderer {
    /// Draws one frame and returns the current input state.
    fn render(&mut self, snapshot: &WorldSnapshot) -> ControlState;
}

impl<F> Renderer for F
where
    F: FnMut(&WorldSnapshot) -> ControlState,
{
    fn render(&mut self, snapshot: &WorldSnapshot) -> ControlState {
        self(snapshot)
    }
}

/// How the game loop reaches its renderer.
pub trait RendererLink {
    /// Hands a snapshot to the renderer. May drop it if the renderer is busy.
    ///
    /// # Errors
    ///
    /// Fails when the renderer is gone.
    fn publish(&mut self, snapshot: WorldSnapshot) -> Result<(), TransportError>;

    /// The most recent control state since the last poll, without blocking.
    ///
    /// # Errors
    ///
    /// Fails when the renderer is gone and nothing is left to read.
    fn poll_control(&mut self) -> Result<Option<ControlState>, TransportError>;

    /// Shuts the renderer down. Calling it again does nothing.
    ///
    /// # Errors
    ///
    /// [`TransportError::RendererPanicked`] when the renderer died abnormally.
    fn close(&mut self) -> Result<(), TransportError>;
}

// =============================================================================
// DirectLink
// =============================================================================

/// In-process link: `publish` renders immediately.
#[derive(Debug)]
pub struct DirectLink<R> {
    renderer: R,
    pending: Option<ControlState>,
}

impl<R: Renderer> DirectLink<R> {
    /// Wraps a renderer.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            pending: None,
        }
    }

    /// The wrapped renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Unwraps the renderer.
    pub fn into_inner(self) -> R {
        self.renderer
    }
}

impl<R: Renderer> RendererLink for DirectLink<R> {
    fn publish(&mut self, snapshot: WorldSnapshot) -> Result<(), TransportError> {
        self.pending = Some(self.renderer.render(&snapshot));
        Ok(())
    }

    fn poll_control(&mut self) -> Result<Option<ControlState>, TransportError> {
        Ok(self.pending.take())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

// =============================================================================
// ChannelLink
// =============================================================================

/// Snapshots buffered for a threaded renderer before new ones are dropped.
pub const DEFAULT_SNAPSHOT_CAPACITY: usize = 4;

/// Link to a renderer running on its own thread.
///
/// Snapshots travel through a bounded channel and are dropped with a warning
/// when it is full. Control states travel back unbounded; polling keeps only
/// the newest.
#[derive(Debug)]
pub struct ChannelLink {
    snapshots: Option<Sender<WorldSnapshot>>,
    controls: Receiver<ControlState>,
    worker: Option<JoinHandle<()>>,
    outcome: Option<TransportError>,
    dropped: u64,
}

impl ChannelLink {
    /// Starts `renderer` on a new thread.
    pub fn spawn<R>(renderer: R) -> Self
    where
        R: Renderer + Send + 'static,
    {
        Self::spawn_with_capacity(renderer, DEFAULT_SNAPSHOT_CAPACITY)
    }

    /// Starts `renderer` with room for `capacity` pending snapshots
    /// (at least one).
    pub fn spawn_with_capacity<R>(mut renderer: R, capacity: usize) -> Self
    where
        R: Renderer + Send + 'static,
    {
        let (snapshot_tx, snapshot_rx) = bounded::<WorldSnapshot>(capacity.max(1));
        let (control_tx, control_rx) = unbounded::<ControlState>();

        let worker = thread::spawn(move || {
            for snapshot in &snapshot_rx {
                let control = renderer.render(&snapshot);
                if control_tx.send(control).is_err() {
                    break;
                }
            }
        });

        Self {
            snapshots: Some(snapshot_tx),
            controls: control_rx,
            worker: Some(worker),
            outcome: None,
            dropped: 0,
        }
    }

    /// Snapshots dropped because the renderer was behind.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Joins the renderer thread and records how it ended.
    fn reap(&mut self) -> TransportError {
        if let Some(worker) = self.worker.take() {
            let outcome = if worker.join().is_err() {
                TransportError::RendererPanicked
            } else {
                TransportError::Disconnected
            };
            self.outcome = Some(outcome);
        }
        self.outcome.clone().unwrap_or(TransportError::Disconnected)
    }
}

impl RendererLink for ChannelLink {
    fn publish(&mut self, snapshot: WorldSnapshot) -> Result<(), TransportError> {
        let Some(sender) = &self.snapshots else {
            return Err(TransportError::Disconnected);
        };
        match sender.try_send(snapshot) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(snapshot)) => {
                self.dropped += 1;
                warn!(tick = snapshot.tick, dropped = self.dropped, "renderer busy, snapshot dropped");
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => {
                self.snapshots = None;
                Err(self.reap())
            }
        }
    }

    fn poll_control(&mut self) -> Result<Option<ControlState>, TransportError> {
        let mut latest = None;
        loop {
            match self.controls.try_recv() {
                Ok(control) => latest = Some(control),
                Err(TryRecvError::Empty) => return Ok(latest),
                Err(TryRecvError::Disconnected) => {
                    return match latest {
                        Some(control) => Ok(Some(control)),
                        None => Err(self.reap()),
                    };
                }
            }
        }
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.snapshots = None;
        if self.worker.is_none() && self.outcome.is_none() {
            return Ok(());
        }
        debug!(dropped = self.dropped, "closing renderer link");
        match self.reap() {
            TransportError::RendererPanicked => Err(TransportError::RendererPanicked),
            TransportError::Disconnected => Ok(()),
        }
    }
}

impl Drop for ChannelLink {
    fn drop(&mut self) {
        self.snapshots = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
