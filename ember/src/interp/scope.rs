//! Call stack of environment frames
//!
//! The top frame is the active scope for lookups and assignment. The root
//! frame is never popped; every other frame belongs to one forced call and
//! is popped when that call finishes.

use super::env::Environment;

#[derive(Debug)]
pub struct CallStack {
    /// Stack of frames, index 0 is the root
    frames: Vec<Environment>,
}

impl CallStack {
    /// Create a stack holding only `root`
    pub fn new(root: Environment) -> Self {
        CallStack { frames: vec![root] }
    }

    /// Push a call frame; returns the new depth
    pub fn push(&mut self, frame: Environment) -> usize {
        self.frames.push(frame);
        self.frames.len()
    }

    /// Pop the top call frame
    ///
    /// Returns `None` instead of removing the root frame.
    pub fn pop(&mut self) -> Option<Environment> {
        if self.frames.len() <= 1 {
            return None;
        }
        self.frames.pop()
    }

    /// Number of frames, root included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Active frame
    pub fn current(&self) -> &Environment {
        // The root frame is never removed, so `last` always exists
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Environment {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    pub fn root(&self) -> &Environment {
        &self.frames[0]
    }
}
