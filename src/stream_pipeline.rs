// THEORY:
// The `stream_pipeline` module is the host-side driver that puts a classifier
// on a clock. Cameras and pose detectors deliver frames whenever they are ready;
// the classifier wants exactly one frame per fixed tick, in order, and must
// never be touched by two callers at once.
//
// Key architectural principles:
// 1.  **One task owns one classifier**: Each `ActivityStream` spawns a tokio task
//     that holds its `ActivityClassifier` by value. Frames, resets and shutdown
//     reach it only as messages, so calls into the classifier are serialized
//     without locks.
// 2.  **Newest frame wins**: Frames do not queue. They land in a single
//     `watch` slot where each submission replaces the last, so a burst of
//     frames between two ticks costs nothing and the tick always sees the
//     newest one. A tick with no fresh frame is skipped and publishes nothing.
//     Only control messages (reset, shutdown) travel over the bounded mpsc.
// 3.  **One current label**: Results are published through a `watch` channel,
//     so subscribers always see the latest label and never a backlog.
// 4.  **Many streams, many classifiers**: `StreamPool` keys streams by capture
//     id. It never shares a classifier between streams.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::{ClassifierConfig, StreamConfig};
use crate::core_modules::activity::ActivityLabel;
use crate::core_modules::keypoint::Frame;
use crate::error::{ActivityError, Result};
use crate::pipeline::ActivityClassifier;

/// Control messages for the stream task. Frames bypass this queue.
enum StreamMessage {
    Reset(oneshot::Sender<()>),
    Shutdown,
}

/// The label published after a classification cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivityUpdate {
    /// Number of cycles classified so far; 0 before the first one.
    pub sequence: u64,
    pub label: ActivityLabel,
}

/// A running classifier for one capture stream.
pub struct ActivityStream {
    id: String,
    sender: mpsc::Sender<StreamMessage>,
    frames: watch::Sender<Option<Frame>>,
    updates: watch::Receiver<ActivityUpdate>,
    worker: JoinHandle<()>,
}

impl ActivityStream {
    /// Starts the stream task. Must be called from within a tokio runtime.
    pub fn spawn(id: impl Into<String>, classifier_config: ClassifierConfig, stream_config: StreamConfig) -> Self {
        let id = id.into();
        let (sender, receiver) = mpsc::channel(stream_config.command_queue.max(1));
        let (frames, pending) = watch::channel(None);
        let (publisher, updates) = watch::channel(ActivityUpdate::default());
        let classifier = ActivityClassifier::new(classifier_config);

        let span = info_span!("activity_stream", id = %id);
        let worker = tokio::spawn(
            run_stream(classifier, receiver, pending, publisher, stream_config).instrument(span),
        );

        Self {
            id,
            sender,
            frames,
            updates,
            worker,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Makes `frame` the one classified on the next tick, replacing any frame
    /// still waiting. Never blocks.
    pub fn submit(&self, frame: Frame) -> Result<()> {
        self.frames
            .send(Some(frame))
            .map_err(|_| ActivityError::StreamClosed)
    }

    /// Clears the classifier's motion history and any pending frame. Resolves
    /// once the task has applied the reset.
    pub async fn reset(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.sender
            .send(StreamMessage::Reset(ack))
            .await
            .map_err(|_| ActivityError::StreamClosed)?;
        done.await.map_err(|_| ActivityError::StreamClosed)
    }

    pub fn subscribe(&self) -> watch::Receiver<ActivityUpdate> {
        self.updates.clone()
    }

    pub fn current(&self) -> ActivityUpdate {
        *self.updates.borrow()
    }

    /// Stops the task and waits for it to finish.
    pub async fn shutdown(self) -> Result<()> {
        // A closed channel means the task is already gone; joining still reports how it ended.
        let _ = self.sender.send(StreamMessage::Shutdown).await;
        self.worker.await.map_err(|e| {
            warn!(stream = %self.id, error = %e, "activity stream task failed");
            ActivityError::StreamClosed
        })
    }
}

async fn run_stream(
    mut classifier: ActivityClassifier,
    mut receiver: mpsc::Receiver<StreamMessage>,
    mut pending: watch::Receiver<Option<Frame>>,
    publisher: watch::Sender<ActivityUpdate>,
    config: StreamConfig,
) {
    info!(tick_ms = config.tick_interval.as_millis() as u64, "activity stream started");

    // `interval` rejects a zero period.
    let mut ticker = time::interval(config.tick_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut sequence = 0u64;

    loop {
        tokio::select! {
            // Control messages go first so a reset is applied before the next tick.
            biased;

            message = receiver.recv() => match message {
                Some(StreamMessage::Reset(ack)) => {
                    classifier.reset_history();
                    // Discards the waiting frame.
                    pending.mark_unchanged();
                    debug!("motion history reset");
                    let _ = ack.send(());
                }
                Some(StreamMessage::Shutdown) | None => break,
            },
            _ = ticker.tick() => {
                if !matches!(pending.has_changed(), Ok(true)) {
                    continue;
                }
                let Some(frame) = pending.borrow_and_update().clone() else {
                    continue;
                };

                let label = classifier.classify(&frame);
                sequence += 1;
                let previous = publisher.send_replace(ActivityUpdate { sequence, label });
                if previous.label != label {
                    debug!(from = %previous.label, to = %label, sequence, "activity changed");
                }
            }
        }
    }

    info!(cycles = sequence, "activity stream stopped");
}

/// One `ActivityStream` per capture id.
pub struct StreamPool {
    classifier_config: ClassifierConfig,
    stream_config: StreamConfig,
    streams: HashMap<String, ActivityStream>,
}

impl StreamPool {
    pub fn new(classifier_config: ClassifierConfig, stream_config: StreamConfig) -> Self {
        Self {
            classifier_config,
            stream_config,
            streams: HashMap::new(),
        }
    }

    /// Starts a stream for `id`, or returns a subscription to the one already running.
    pub fn open(&mut self, id: impl Into<String>) -> watch::Receiver<ActivityUpdate> {
        let id = id.into();
        let classifier_config = &self.classifier_config;
        let stream_config = &self.stream_config;
        self.streams
            .entry(id)
            .or_insert_with_key(|id| ActivityStream::spawn(id.clone(), classifier_config.clone(), stream_config.clone()))
            .subscribe()
    }

    pub fn submit(&self, id: &str, frame: Frame) -> Result<()> {
        self.stream(id)?.submit(frame)
    }

    pub async fn reset(&self, id: &str) -> Result<()> {
        self.stream(id)?.reset().await
    }

    pub fn subscribe(&self, id: &str) -> Result<watch::Receiver<ActivityUpdate>> {
        Ok(self.stream(id)?.subscribe())
    }

    pub async fn close(&mut self, id: &str) -> Result<()> {
        let stream = self
            .streams
            .remove(id)
            .ok_or_else(|| ActivityError::UnknownStream(id.to_string()))?;
        info!(stream = stream.id(), "closing activity stream");
        stream.shutdown().await
    }

    /// Stops every stream concurrently. Returns the first failure, if any,
    /// after all of them have been joined.
    pub async fn shutdown_all(&mut self) -> Result<()> {
        let results = join_all(self.streams.drain().map(|(_, stream)| stream.shutdown())).await;
        results.into_iter().collect::<Result<Vec<()>>>().map(|_| ())
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    fn stream(&self, id: &str) -> Result<&ActivityStream> {
        self.streams
            .get(id)
            .ok_or_else(|| ActivityError::UnknownStream(id.to_string()))
    }
}
