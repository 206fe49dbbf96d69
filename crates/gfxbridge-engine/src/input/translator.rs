use std::sync::Arc;

use crate::event::{ButtonKind, ButtonState, Event, EventQueue, KeyCode, ModifierSet};

use super::keymap::{KeyTranslationTable, PlatformModifiers};

/// Raw platform event record, before normalization.
///
/// Positions are content-relative with a top-left origin and may fall outside
/// the window (e.g. while dragging).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Cursor moved or dragged.
    PointerMoved { x: f64, y: f64 },

    Button {
        button: ButtonKind,
        state: ButtonState,
    },

    /// Vertical wheel delta in lines.
    Wheel { delta: f64 },

    Key {
        /// Character value for printable keys, or an [`extended`](super::extended) code.
        code: u32,
        modifiers: PlatformModifiers,
        state: ButtonState,
    },

    /// Content area resized.
    Resized { width: u32, height: u32 },

    /// Anything the translator does not consume.
    Other,
}

/// What the platform should do with an event after translation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Disposition {
    /// Run the platform's default handling as well.
    Forward,
    /// The event was turned into a key event; skip default handling.
    Consumed,
}

/// Key chord that requests shutdown instead of producing a key event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ExitChord {
    pub key: KeyCode,
    pub modifiers: ModifierSet,
}

impl ExitChord {
    pub fn matches(&self, key: KeyCode, modifiers: ModifierSet) -> bool {
        key == self.key && modifiers.contains(self.modifiers)
    }
}

impl Default for ExitChord {
    fn default() -> Self {
        Self {
            key: KeyCode::KeyQ,
            modifiers: ModifierSet::RIGHT_META,
        }
    }
}

/// Converts platform events into normalized [`Event`]s and posts them.
///
/// Owns the transient pointer state: last clamped cursor position, the
/// fractional wheel accumulator and the current content bounds.
#[derive(Debug)]
pub struct InputTranslator {
    queue: Arc<EventQueue>,
    keys: KeyTranslationTable,
    exit_chord: ExitChord,
    exit_requested: bool,

    width: f64,
    height: f64,

    mx: u16,
    my: u16,
    scroll: i32,
    scroll_accum: f64,
}

impl InputTranslator {
    pub fn new(queue: Arc<EventQueue>, exit_chord: ExitChord) -> Self {
        Self {
            queue,
            keys: KeyTranslationTable::new(),
            exit_chord,
            exit_requested: false,
            width: 0.0,
            height: 0.0,
            mx: 0,
            my: 0,
            scroll: 0,
            scroll_accum: 0.0,
        }
    }

    /// Current clamped pointer position.
    pub fn pointer(&self) -> (u16, u16) {
        (self.mx, self.my)
    }

    /// Current integral wheel position.
    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    /// True once the exit chord has been seen.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Translates one platform event, posting at most one normalized event
    /// (three for a resize).
    pub fn translate(&mut self, event: PlatformEvent) -> Disposition {
        match event {
            PlatformEvent::PointerMoved { x, y } => {
                self.mx = clamp_axis(x, self.width);
                self.my = clamp_axis(y, self.height);
                self.queue.post_mouse_event(self.mx, self.my, self.scroll);
            }

            PlatformEvent::Button { button, state } => {
                self.queue
                    .post_mouse_button_event(self.mx, self.my, self.scroll, button, state);
            }

            PlatformEvent::Wheel { delta } => {
                self.scroll_accum += delta;
                self.scroll = self.scroll_accum as i32;
                self.queue.post_mouse_event(self.mx, self.my, self.scroll);
            }

            PlatformEvent::Key { code, modifiers, state } => {
                return self.translate_key(code, modifiers.into(), state);
            }

            PlatformEvent::Resized { width, height } => self.resize(width, height),

            PlatformEvent::Other => {}
        }

        Disposition::Forward
    }

    /// Records new content bounds and posts `Resize` followed by forced
    /// left/right button releases.
    ///
    /// A resize can swallow a real button-up; the synthetic releases keep
    /// consumers from seeing a stuck button.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);

        let release = |button| Event::Mouse {
            x: self.mx,
            y: self.my,
            wheel: self.scroll,
            button: Some((button, ButtonState::Up)),
        };

        self.queue.push_all([
            Event::Resize {
                width: saturate_u16(width),
                height: saturate_u16(height),
            },
            release(ButtonKind::Left),
            release(ButtonKind::Right),
        ]);
    }

    fn translate_key(
        &mut self,
        code: u32,
        modifiers: ModifierSet,
        state: ButtonState,
    ) -> Disposition {
        let Some(key) = self.keys.translate(code) else {
            log::trace!("dropping unmapped key code {code:#x}");
            return Disposition::Forward;
        };

        if state == ButtonState::Down && self.exit_chord.matches(key, modifiers) {
            log::debug!("exit chord pressed");
            self.exit_requested = true;
            self.queue.post_exit_event();
            return Disposition::Forward;
        }

        self.queue.post_key_event(key, modifiers, state);
        Disposition::Consumed
    }
}

fn clamp_axis(v: f64, extent: f64) -> u16 {
    // NaN falls through `clamp` and casts to 0.
    v.clamp(0.0, extent) as u16
}

fn saturate_u16(v: u32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::extended;

    fn setup() -> (Arc<EventQueue>, InputTranslator) {
        let queue = Arc::new(EventQueue::new());
        let mut tr = InputTranslator::new(Arc::clone(&queue), ExitChord::default());
        tr.resize(800, 600);
        while queue.poll().is_some() {}
        (queue, tr)
    }

    fn drain(queue: &EventQueue) -> Vec<Event> {
        std::iter::from_fn(|| queue.poll()).collect()
    }

    fn key(code: u32, modifiers: PlatformModifiers, state: ButtonState) -> PlatformEvent {
        PlatformEvent::Key { code, modifiers, state }
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_clamps_to_content_bounds() {
        let (queue, mut tr) = setup();

        tr.translate(PlatformEvent::PointerMoved { x: -5.0, y: 50.0 });
        assert_eq!(tr.pointer(), (0, 50));

        tr.translate(PlatformEvent::PointerMoved { x: 900.0, y: 50.0 });
        assert_eq!(tr.pointer(), (800, 50));

        tr.translate(PlatformEvent::PointerMoved { x: 10.0, y: 1e9 });
        assert_eq!(tr.pointer(), (10, 600));

        assert_eq!(
            drain(&queue),
            vec![
                Event::Mouse {
                    x: 0,
                    y: 50,
                    wheel: 0,
                    button: None,
                },
                Event::Mouse {
                    x: 800,
                    y: 50,
                    wheel: 0,
                    button: None,
                },
                Event::Mouse {
                    x: 10,
                    y: 600,
                    wheel: 0,
                    button: None,
                },
            ]
        );
    }

    #[test]
    fn button_uses_last_position_and_scroll() {
        let (queue, mut tr) = setup();
        tr.translate(PlatformEvent::PointerMoved { x: 12.7, y: 30.2 });
        tr.translate(PlatformEvent::Wheel { delta: 2.0 });
        let _ = drain(&queue);

        let d = tr.translate(PlatformEvent::Button {
            button: ButtonKind::Middle,
            state: ButtonState::Down,
        });

        assert_eq!(d, Disposition::Forward);
        assert_eq!(
            drain(&queue),
            vec![Event::Mouse {
                x: 12,
                y: 30,
                wheel: 2,
                button: Some((ButtonKind::Middle, ButtonState::Down)),
            }]
        );
    }

    #[test]
    fn wheel_accumulates_fractional_deltas() {
        let (queue, mut tr) = setup();
        tr.translate(PlatformEvent::Wheel { delta: 0.4 });
        tr.translate(PlatformEvent::Wheel { delta: 0.4 });
        tr.translate(PlatformEvent::Wheel { delta: 0.4 });
        tr.translate(PlatformEvent::Wheel { delta: -2.5 });

        let wheels: Vec<i32> = drain(&queue)
            .into_iter()
            .map(|ev| match ev {
                Event::Mouse { wheel, button: None, .. } => wheel,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(wheels, vec![0, 0, 1, -1]);
        assert_eq!(tr.scroll(), -1);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_posts_size_then_both_releases() {
        let (queue, mut tr) = setup();
        tr.translate(PlatformEvent::Resized {
            width: 800,
            height: 600,
        });

        assert_eq!(
            drain(&queue),
            vec![
                Event::Resize {
                    width: 800,
                    height: 600,
                },
                Event::Mouse {
                    x: 0,
                    y: 0,
                    wheel: 0,
                    button: Some((ButtonKind::Left, ButtonState::Up)),
                },
                Event::Mouse {
                    x: 0,
                    y: 0,
                    wheel: 0,
                    button: Some((ButtonKind::Right, ButtonState::Up)),
                },
            ]
        );
    }

    #[test]
    fn resize_updates_clamp_bounds() {
        let (queue, mut tr) = setup();
        tr.resize(100, 80);
        tr.translate(PlatformEvent::PointerMoved { x: 500.0, y: 500.0 });
        assert_eq!(tr.pointer(), (100, 80));
        assert_eq!(drain(&queue).len(), 4);
    }

    #[test]
    fn oversized_resize_saturates() {
        let (queue, mut tr) = setup();
        tr.resize(70_000, 10);
        assert_eq!(queue.poll(), Some(Event::Resize {
            width: u16::MAX,
            height: 10,
        }));
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn key_down_is_posted_and_consumed() {
        let (queue, mut tr) = setup();
        let d = tr.translate(key(u32::from(b'a'), PlatformModifiers::SHIFT, ButtonState::Down));

        assert_eq!(d, Disposition::Consumed);
        assert_eq!(
            drain(&queue),
            vec![Event::Key {
                code: KeyCode::KeyA,
                modifiers: ModifierSet::SHIFT,
                state: ButtonState::Down,
            }]
        );
    }

    #[test]
    fn extended_key_up_is_posted() {
        let (queue, mut tr) = setup();
        let d = tr.translate(key(extended::F5, PlatformModifiers::empty(), ButtonState::Up));

        assert_eq!(d, Disposition::Consumed);
        assert_eq!(
            drain(&queue),
            vec![Event::Key {
                code: KeyCode::F5,
                modifiers: ModifierSet::empty(),
                state: ButtonState::Up,
            }]
        );
    }

    #[test]
    fn unmapped_key_is_dropped_but_forwarded() {
        let (queue, mut tr) = setup();
        let d = tr.translate(key(0x4E2D, PlatformModifiers::empty(), ButtonState::Down));
        assert_eq!(d, Disposition::Forward);
        assert!(queue.is_empty());
    }

    #[test]
    fn exit_chord_posts_exit_instead_of_key() {
        let (queue, mut tr) = setup();
        let d = tr.translate(key(u32::from(b'q'), PlatformModifiers::META, ButtonState::Down));

        assert_eq!(d, Disposition::Forward);
        assert!(tr.exit_requested());
        assert_eq!(drain(&queue), vec![Event::Exit]);
    }

    #[test]
    fn exit_chord_ignores_release_and_missing_modifier() {
        let (queue, mut tr) = setup();
        tr.translate(key(u32::from(b'q'), PlatformModifiers::META, ButtonState::Up));
        tr.translate(key(u32::from(b'q'), PlatformModifiers::CONTROL, ButtonState::Down));

        assert!(!tr.exit_requested());
        let events = drain(&queue);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, Event::Key { code: KeyCode::KeyQ, .. })));
    }

    #[test]
    fn other_events_are_forwarded_silently() {
        let (queue, mut tr) = setup();
        assert_eq!(tr.translate(PlatformEvent::Other), Disposition::Forward);
        assert!(queue.is_empty());
    }
}
