/// Input events the engine forwards to games.
/// Generic: button semantics are assigned by each game through `Custom` kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// A command from the page UI (buttons, overlays).
    Custom { kind: u32 },
}

impl InputEvent {
    pub fn custom(kind: u32) -> Self {
        InputEvent::Custom { kind }
    }
}

/// A queue of input events.
/// The host pushes events as they arrive; the runner clears the queue once a
/// frame has consumed it.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drop all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_iter_and_clear() {
        let mut q = InputQueue::new();
        q.push(InputEvent::custom(1));
        q.push(InputEvent::KeyDown { key_code: 32 });
        assert_eq!(q.len(), 2);

        let events: Vec<_> = q.iter().copied().collect();
        assert_eq!(events, vec![InputEvent::Custom { kind: 1 }, InputEvent::KeyDown { key_code: 32 }]);
        assert_eq!(q.len(), 2, "iterating leaves the queue intact");

        q.clear();
        assert!(q.is_empty());
    }
}
