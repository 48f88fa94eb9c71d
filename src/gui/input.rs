use std::collections::VecDeque;

use kiss3d::event::{Action, Key, MouseButton, WindowEvent};

// Key config, all in one place
const KEY_MOVE_FORWARD: Key = Key::W;
const KEY_MOVE_BACKWARD: Key = Key::S;
const KEY_MOVE_LEFT: Key = Key::A;
const KEY_MOVE_RIGHT: Key = Key::D;
const KEY_TOGGLE_FREE_LOOK: Key = Key::F;
const KEY_TOGGLE_ORBITS: Key = Key::O;

// Mouse button that drags the view around
const DRAG_BUTTON: MouseButton = MouseButton::Button1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    ToggleFreeLook,
    ToggleOrbits,
}

/// Window input, reduced to what the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    DragButton { pressed: bool },
    CursorMoved { x: f64, y: f64 },
    Scroll { delta: f64 },
    Resized { width: u32, height: u32 },
    Command(SceneCommand),
    CloseRequested,
}

impl InputEvent {
    /// Returns `None` for events nothing in the viewer cares about.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        let input = match *event {
            WindowEvent::MouseButton(DRAG_BUTTON, action, _) => InputEvent::DragButton {
                pressed: action == Action::Press,
            },
            WindowEvent::CursorPos(x, y, _) => InputEvent::CursorMoved { x, y },
            WindowEvent::Scroll(_, dy, _) => InputEvent::Scroll { delta: dy },
            WindowEvent::FramebufferSize(width, height) => InputEvent::Resized { width, height },
            WindowEvent::Close => InputEvent::CloseRequested,
            WindowEvent::Key(key, Action::Press, _) => {
                let command = match key {
                    KEY_MOVE_FORWARD => SceneCommand::MoveForward,
                    KEY_MOVE_BACKWARD => SceneCommand::MoveBackward,
                    KEY_MOVE_LEFT => SceneCommand::MoveLeft,
                    KEY_MOVE_RIGHT => SceneCommand::MoveRight,
                    KEY_TOGGLE_FREE_LOOK => SceneCommand::ToggleFreeLook,
                    KEY_TOGGLE_ORBITS => SceneCommand::ToggleOrbits,
                    _ => return None,
                };
                InputEvent::Command(command)
            }
            _ => return None,
        };
        Some(input)
    }
}

/// Events collected from the window, waiting to be handled before the next
/// frame is composed.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn push_window_event(&mut self, event: &WindowEvent) {
        if let Some(input) = InputEvent::from_window_event(event) {
            self.push(input);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use kiss3d::event::Modifiers;

    use super::*;

    #[test]
    fn test_translate_window_events() {
        let none = Modifiers::empty();

        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::MouseButton(
                MouseButton::Button1,
                Action::Press,
                none
            )),
            Some(InputEvent::DragButton { pressed: true })
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::MouseButton(
                MouseButton::Button1,
                Action::Release,
                none
            )),
            Some(InputEvent::DragButton { pressed: false })
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::MouseButton(
                MouseButton::Button2,
                Action::Press,
                none
            )),
            None
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::Scroll(0.0, -2.0, none)),
            Some(InputEvent::Scroll { delta: -2.0 })
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::FramebufferSize(640, 480)),
            Some(InputEvent::Resized {
                width: 640,
                height: 480
            })
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::Key(Key::O, Action::Press, none)),
            Some(InputEvent::Command(SceneCommand::ToggleOrbits))
        );
        // Only presses count, so holding a key doesn't repeat the command
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::Key(Key::O, Action::Release, none)),
            None
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::Key(Key::Z, Action::Press, none)),
            None
        );
    }

    #[test]
    fn test_queue_keeps_order() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::DragButton { pressed: true });
        queue.push_window_event(&WindowEvent::CursorPos(3.0, 4.0, Modifiers::empty()));
        queue.push_window_event(&WindowEvent::Refresh);
        queue.push(InputEvent::DragButton { pressed: false });
        assert_eq!(queue.len(), 3);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                InputEvent::DragButton { pressed: true },
                InputEvent::CursorMoved { x: 3.0, y: 4.0 },
                InputEvent::DragButton { pressed: false },
            ]
        );
        assert!(queue.is_empty());
    }
}
