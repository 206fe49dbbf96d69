use std::collections::VecDeque;

use parking_lot::Mutex;

use super::types::{ButtonKind, ButtonState, Event, KeyCode, ModifierSet};

/// Unbounded FIFO of normalized events shared between threads.
///
/// Any number of producers may push; a single consumer polls from the head.
/// Events are never reordered, merged or dropped. Capacity is unbounded, so a
/// producer that outpaces the consumer grows the queue without limit; pacing
/// producers is up to the caller.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Mutex<VecDeque<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the tail. Never blocks on capacity.
    pub fn push(&self, event: Event) {
        self.inner.lock().push_back(event);
    }

    /// Appends several events under one lock so no other producer can
    /// interleave between them.
    pub fn push_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        self.inner.lock().extend(events);
    }

    /// Removes and returns the head event, or `None` immediately when empty.
    pub fn poll(&self) -> Option<Event> {
        self.inner.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    // ── host-visible posting surface ─────────────────────────────────────

    pub fn post_size_event(&self, width: u16, height: u16) {
        self.push(Event::Resize { width, height });
    }

    /// Posts a pointer update without a button transition.
    pub fn post_mouse_event(&self, x: u16, y: u16, wheel: i32) {
        self.push(Event::Mouse { x, y, wheel, button: None });
    }

    pub fn post_mouse_button_event(
        &self,
        x: u16,
        y: u16,
        wheel: i32,
        button: ButtonKind,
        state: ButtonState,
    ) {
        self.push(Event::Mouse {
            x,
            y,
            wheel,
            button: Some((button, state)),
        });
    }

    pub fn post_key_event(&self, code: KeyCode, modifiers: ModifierSet, state: ButtonState) {
        self.push(Event::Key { code, modifiers, state });
    }

    /// Posts `Exit` behind everything already queued.
    pub fn post_exit_event(&self) {
        self.push(Event::Exit);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn drain(queue: &EventQueue) -> Vec<Event> {
        std::iter::from_fn(|| queue.poll()).collect()
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn poll_on_empty_returns_none() {
        let queue = EventQueue::new();
        assert_eq!(queue.poll(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn poll_returns_events_in_push_order() {
        let queue = EventQueue::new();
        queue.post_size_event(640, 480);
        queue.post_mouse_event(1, 2, 0);
        queue.post_mouse_event(1, 2, 0);
        queue.post_key_event(KeyCode::KeyA, ModifierSet::SHIFT, ButtonState::Down);

        assert_eq!(queue.len(), 4);
        assert_eq!(
            drain(&queue),
            vec![
                Event::Resize {
                    width: 640,
                    height: 480,
                },
                Event::Mouse {
                    x: 1,
                    y: 2,
                    wheel: 0,
                    button: None,
                },
                // Identical adjacent moves are kept, not coalesced.
                Event::Mouse {
                    x: 1,
                    y: 2,
                    wheel: 0,
                    button: None,
                },
                Event::Key {
                    code: KeyCode::KeyA,
                    modifiers: ModifierSet::SHIFT,
                    state: ButtonState::Down,
                },
            ]
        );
        assert_eq!(queue.poll(), None);
    }

    #[test]
    fn exit_is_not_prioritized_over_queued_events() {
        let queue = EventQueue::new();
        queue.post_mouse_button_event(3, 4, 0, ButtonKind::Left, ButtonState::Down);
        queue.post_exit_event();
        queue.post_mouse_event(5, 6, 0);

        assert!(matches!(queue.poll(), Some(Event::Mouse { x: 3, .. })));
        assert_eq!(queue.poll(), Some(Event::Exit));
        assert!(matches!(queue.poll(), Some(Event::Mouse { x: 5, .. })));
    }

    #[test]
    fn push_all_keeps_group_contiguous() {
        let queue = EventQueue::new();
        queue.push_all([
            Event::Resize {
                width: 1,
                height: 1,
            },
            Event::Exit,
        ]);
        assert_eq!(drain(&queue), vec![Event::Resize {
            width: 1,
            height: 1,
        }, Event::Exit]);
    }

    // ── concurrency ───────────────────────────────────────────────────────

    #[test]
    fn concurrent_producers_preserve_per_producer_order() {
        const PER_PRODUCER: u16 = 500;
        let queue = Arc::new(EventQueue::new());

        let producers: Vec<_> = (0..4u16)
            .map(|id| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for seq in 0..PER_PRODUCER {
                        queue.post_mouse_event(id, seq, 0);
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().expect("producer panicked");
        }

        let events = drain(&queue);
        assert_eq!(events.len(), 4 * PER_PRODUCER as usize);

        let mut next = [0u16; 4];
        for ev in events {
            let Event::Mouse { x, y, .. } = ev else {
                panic!("unexpected event {ev:?}");
            };
            assert_eq!(y, next[x as usize], "producer {x} reordered");
            next[x as usize] += 1;
        }
        assert_eq!(next, [PER_PRODUCER; 4]);
    }

    #[test]
    fn consumer_drains_while_producer_pushes() {
        let queue = Arc::new(EventQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..1000u16 {
                    queue.post_size_event(i, i);
                }
                queue.post_exit_event();
            })
        };

        let mut expected = 0u16;
        loop {
            match queue.poll() {
                Some(Event::Exit) => break,
                Some(Event::Resize { width, .. }) => {
                    assert_eq!(width, expected);
                    expected += 1;
                }
                Some(other) => panic!("unexpected event {other:?}"),
                None => thread::yield_now(),
            }
        }
        producer.join().expect("producer panicked");
        assert_eq!(expected, 1000);
    }
}
