//! Structured event stream for `autofisher`.
//!
//! Discrete, typed events emitted by the automation core. Events are
//! serialized as newline-delimited JSON (JSONL) and include a monotonically
//! increasing sequence number for ordering guarantees.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::{CritSignal, MinigamePhase};

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted by the automation core.
///
/// Each variant is tagged with `"type"` when serialized to JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Controller hooks were registered.
    SessionSubscribed {
        /// When the hooks were registered.
        timestamp: DateTime<Utc>,
        /// Session epoch the hooks belong to.
        epoch: u64,
    },

    /// Controller hooks were removed.
    SessionReleased {
        /// When the hooks were removed.
        timestamp: DateTime<Utc>,
        /// Session epoch after the release.
        epoch: u64,
    },

    /// A bite was detected and the hooked flag raised.
    BiteHooked {
        /// When the bite was hooked.
        timestamp: DateTime<Utc>,
        /// Line reads it took to see the bite.
        reads: u64,
    },

    /// A crit window was observed during the active phase.
    CritObserved {
        /// When the crit was observed.
        timestamp: DateTime<Utc>,
        /// Crit classification.
        signal: CritSignal,
    },

    /// A reel was committed after a good crit.
    ReelCommitted {
        /// When the reel was committed.
        timestamp: DateTime<Utc>,
        /// Delay between the crit and the reel, in milliseconds.
        delay_ms: u64,
    },

    /// A scheduled reel could not be committed.
    ReelFailed {
        /// When the failure occurred.
        timestamp: DateTime<Utc>,
        /// Engine-provided failure detail.
        reason: String,
    },

    /// A minigame round finished.
    RoundFinished {
        /// When the outcome was reported.
        timestamp: DateTime<Utc>,
        /// Outcome phase.
        outcome: MinigamePhase,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Serialization or I/O failures are silently dropped because observability
/// must never interrupt automation.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug; manual impl.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
