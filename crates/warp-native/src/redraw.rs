use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use warp_core::{FrameScheduler, FrameToken};
use winit::window::Window;

/// Bookkeeping for the single outstanding redraw. Shared between the
/// scheduler (owned by the host) and the event loop that grants frames.
#[derive(Clone, Default)]
pub struct RedrawQueue {
    next_id: Rc<Cell<i64>>,
    pending: Rc<Cell<Option<FrameToken>>>,
}

impl RedrawQueue {
    pub fn push(&self) -> FrameToken {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let token = FrameToken(id);
        self.pending.set(Some(token));
        token
    }

    pub fn cancel(&self, token: FrameToken) {
        if self.pending.get() == Some(token) {
            self.pending.set(None);
        }
    }

    /// Consume the pending request. OS-initiated redraws without one are
    /// not frames.
    pub fn grant(&self) -> Option<FrameToken> {
        self.pending.take()
    }
}

/// `Window::request_redraw` as a frame scheduler.
pub struct RedrawScheduler {
    window: Arc<Window>,
    queue: RedrawQueue,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>, queue: RedrawQueue) -> Self {
        Self { window, queue }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = self.queue.push();
        self.window.request_redraw();
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        self.queue.cancel(token);
    }
}
