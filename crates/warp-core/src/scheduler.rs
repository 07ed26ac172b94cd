use std::cell::RefCell;
use std::rc::Rc;

/// Handle for one requested frame callback (a rAF id on the web).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(pub i64);

/// "Call me back at the next repaint" as provided by the host environment.
///
/// The environment invokes the host's `frame` once per granted request.
/// Requests are one-shot; the host re-requests at the end of every frame.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel(&mut self, token: FrameToken);
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: i64,
    pending: Option<FrameToken>,
    requested: u64,
    cancelled: u64,
}

/// Deterministic scheduler: frames are granted only when the owner calls
/// [`ManualScheduler::grant`]. Clones share state, so a test can keep one
/// while the host owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the outstanding request, if any. The caller then runs one
    /// frame.
    pub fn grant(&self) -> Option<FrameToken> {
        self.state.borrow_mut().pending.take()
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.state.borrow().pending
    }

    pub fn requested(&self) -> u64 {
        self.state.borrow().requested
    }

    pub fn cancelled(&self) -> u64 {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let mut s = self.state.borrow_mut();
        s.next_id += 1;
        s.requested += 1;
        let token = FrameToken(s.next_id);
        s.pending = Some(token);
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        let mut s = self.state.borrow_mut();
        if s.pending == Some(token) {
            s.pending = None;
            s.cancelled += 1;
        }
    }
}
