use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Status message event
    StatusMessage(String),

    /// Custom application events, dialog lifecycle included
    Custom(String, serde_json::Value),
}

/// Event handler for managing input events
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,

    /// Tick interval for periodic events
    tick_interval: Duration,
}

impl EventHandler {
    /// Create a new event handler ticking every `tick_rate`
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            tick_interval: tick_rate,
        }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        // Internal events first so status updates are not starved by input
        if let Ok(event) = self.receiver.try_recv() {
            return Some(event);
        }

        let tick = self.tick_interval;
        let polled = tokio::task::spawn_blocking(move || -> std::io::Result<Option<CrosstermEvent>> {
            if crossterm::event::poll(tick)? {
                crossterm::event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await;

        match polled {
            Ok(Ok(Some(event))) => Some(self.convert_crossterm_event(event)),
            _ => Some(Event::Tick),
        }
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(&self, event: CrosstermEvent) -> Event {
        match event {
            CrosstermEvent::Key(key_event) => Event::Key(key_event),
            CrosstermEvent::Mouse(mouse_event) => Event::Mouse(mouse_event),
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            CrosstermEvent::FocusGained => Event::Custom("focus_gained".to_string(), serde_json::Value::Null),
            CrosstermEvent::FocusLost => Event::Custom("focus_lost".to_string(), serde_json::Value::Null),
            CrosstermEvent::Paste(text) => Event::Custom("paste".to_string(), serde_json::Value::String(text)),
        }
    }

    /// Send an internal event
    pub fn send(&self, event: Event) -> Result<()> {
        self.sender.send(event)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_internal_events_come_first() {
        let mut handler = EventHandler::new(Duration::from_millis(10));
        handler.send(Event::StatusMessage("hello".to_string())).unwrap();

        match handler.next().await {
            Some(Event::StatusMessage(message)) => assert_eq!(message, "hello"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_paste_becomes_custom_event() {
        let handler = EventHandler::new(Duration::from_millis(10));
        match handler.convert_crossterm_event(CrosstermEvent::Paste("text".to_string())) {
            Event::Custom(name, value) => {
                assert_eq!(name, "paste");
                assert_eq!(value, serde_json::Value::String("text".to_string()));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
