use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;

/// Cancellation token checked by async continuations before they touch the
/// scene. A child token is alive only while every ancestor is alive.
#[derive(Clone, Debug)]
pub struct Liveness {
    flags: SmallVec<[Rc<Cell<bool>>; 2]>,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        let mut flags = SmallVec::new();
        flags.push(Rc::new(Cell::new(true)));
        Self { flags }
    }

    /// Token that dies with `self` but can also be revoked on its own.
    pub fn child(&self) -> Self {
        let mut flags = self.flags.clone();
        flags.push(Rc::new(Cell::new(true)));
        Self { flags }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.flags.iter().all(|f| f.get())
    }

    /// Revokes this token and every child derived from it.
    pub fn revoke(&self) {
        if let Some(own) = self.flags.last() {
            own.set(false);
        }
    }
}
