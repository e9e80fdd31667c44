use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use axum::extract::ws::{Message, Utf8Bytes};
use futures_util::Sink;

use crate::domain::ports::{BroadcastReport, Broadcaster, ClientSink, SinkError};

// Outbound channel that records every payload it was asked to send.
#[derive(Default)]
pub(crate) struct RecordingSink {
    sent: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn shared() -> Arc<dyn ClientSink> {
        Self::new()
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("sink mutex poisoned").clone()
    }
}

impl ClientSink for RecordingSink {
    fn send_text(&self, text: Utf8Bytes) -> Result<(), SinkError> {
        let mut guard = self.sent.lock().expect("sink mutex poisoned");
        guard.push(text.as_str().to_string());
        Ok(())
    }
}

// Outbound channel whose peer has gone away.
pub(crate) struct ClosedSink;

impl ClientSink for ClosedSink {
    fn send_text(&self, _text: Utf8Bytes) -> Result<(), SinkError> {
        Err(SinkError::Closed)
    }
}

// Socket write half whose peer never reads: every write stays pending forever.
pub(crate) struct StalledSocket;

impl Sink<Message> for StalledSocket {
    type Error = std::io::Error;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Pending
    }

    fn start_send(self: Pin<&mut Self>, _item: Message) -> Result<(), Self::Error> {
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Pending
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Pending
    }
}

// Broadcaster that only counts how often a fan-out was requested.
#[derive(Default)]
pub(crate) struct CountingBroadcaster {
    calls: AtomicUsize,
}

impl CountingBroadcaster {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Broadcaster for CountingBroadcaster {
    async fn broadcast(&self) -> BroadcastReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        BroadcastReport::default()
    }
}
