use serde::Serialize;

/// Board coordinates of a node's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One clickable target on the board.
///
/// `index` is both identity and required click order. Deactivated nodes stay
/// in the round's list so every index keeps addressing the same node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub index: usize,
    pub position: Position,
    pub active: bool,
    pub clicked: bool,
    pub remaining_time: f64,
}

impl Node {
    pub fn new(index: usize, position: Position, lifetime_secs: f64) -> Self {
        Self {
            index,
            position,
            active: true,
            clicked: false,
            remaining_time: lifetime_secs,
        }
    }

    /// Whether a click on this node can count as a hit: still on the board and not yet clicked
    pub fn is_clickable(&self) -> bool {
        self.active && !self.clicked
    }

    /// Label shown to the player (1-based)
    pub fn label(&self) -> String {
        (self.index + 1).to_string()
    }
}
