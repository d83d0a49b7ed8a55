//! Key event reader backed by a crossterm event stream in a background tokio task.
//!
//! The session loop never waits on input: it drains whatever has queued up
//! since the last iteration with [`EventReader::try_next`].

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Terminal events relevant to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
}

/// Reads terminal events in a background task and queues them on a channel.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the background event reader.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(forward_events(EventStream::new(), tx, cancel.clone()));

        Self { rx, cancel }
    }

    /// Next queued event, without waiting. `None` when the queue is empty.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Signal the background reader to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Forward key presses and resizes from `stream` until it ends, the
/// receiver goes away, or `cancel` fires. A read error skips that event.
async fn forward_events<S>(
    mut stream: S,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) where
    S: Stream<Item = std::io::Result<CrosstermEvent>> + Unpin,
{
    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => break,
            next = stream.next() => next,
        };

        let event = match next {
            Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => Event::Key(key),
            Some(Ok(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
            // Key release/repeat, mouse, focus, paste
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!(error = %e, "terminal event read failed");
                continue;
            }
            None => {
                debug!("terminal event stream ended");
                break;
            }
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

impl Default for EventReader {
    fn default() -> Self {
        Self::new()
    }
}
