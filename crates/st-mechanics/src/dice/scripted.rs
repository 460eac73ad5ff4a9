//! A die source that replays a fixed script of faces.

use super::DieSource;

/// Replays a fixed sequence of faces, cycling when it runs out.
///
/// Scripted faces are returned as-is regardless of the requested number of
/// sides. An empty script rolls ones.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: Vec<u32>,
    cursor: usize,
}

impl ScriptedDice {
    /// Create a script from the faces to return, in order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            cursor: 0,
        }
    }

    /// How many faces have been drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }

    fn next_face(&mut self) -> u32 {
        if self.faces.is_empty() {
            self.cursor += 1;
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}

impl DieSource for ScriptedDice {
    fn roll(&mut self, count: u32, _faces: u32) -> Vec<u32> {
        (0..count).map(|_| self.next_face()).collect()
    }
}
