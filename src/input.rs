//! Per-step input snapshots
//!
//! The driver owns the devices. Once per step it hands the session an
//! [`InputFrame`]: the buttons currently held, and the subset that went down
//! since the previous step. [`InputLatch`] derives the second set from a
//! stream of held sets.

use serde::{Deserialize, Serialize};

/// Input actions the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCW,
    RotateCCW,
    Hold,
}

/// One flag per [`Action`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons {
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
    pub hard_drop: bool,
    pub rotate_cw: bool,
    pub rotate_ccw: bool,
    pub hold: bool,
}

impl Buttons {
    pub fn from_actions(actions: &[Action]) -> Self {
        let mut buttons = Self::default();
        for &action in actions {
            buttons.set(action, true);
        }
        buttons
    }

    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::SoftDrop => self.soft_drop,
            Action::HardDrop => self.hard_drop,
            Action::RotateCW => self.rotate_cw,
            Action::RotateCCW => self.rotate_ccw,
            Action::Hold => self.hold,
        }
    }

    pub fn set(&mut self, action: Action, down: bool) {
        let flag = match action {
            Action::MoveLeft => &mut self.left,
            Action::MoveRight => &mut self.right,
            Action::SoftDrop => &mut self.soft_drop,
            Action::HardDrop => &mut self.hard_drop,
            Action::RotateCW => &mut self.rotate_cw,
            Action::RotateCCW => &mut self.rotate_ccw,
            Action::Hold => &mut self.hold,
        };
        *flag = down;
    }

    pub fn any(&self) -> bool {
        *self != Self::default()
    }

    /// Buttons down in `self` that were up in `previous`
    pub fn newly_down(&self, previous: &Buttons) -> Buttons {
        Buttons {
            left: self.left && !previous.left,
            right: self.right && !previous.right,
            soft_drop: self.soft_drop && !previous.soft_drop,
            hard_drop: self.hard_drop && !previous.hard_drop,
            rotate_cw: self.rotate_cw && !previous.rotate_cw,
            rotate_ccw: self.rotate_ccw && !previous.rotate_ccw,
            hold: self.hold && !previous.hold,
        }
    }
}

/// What the session sees for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Buttons asserted during this step
    pub held: Buttons,
    /// Buttons that went down since the previous step
    pub pressed: Buttons,
}

impl InputFrame {
    /// No buttons at all
    pub fn idle() -> Self {
        Self::default()
    }

    /// A frame where `actions` were all just pressed
    pub fn tap(actions: &[Action]) -> Self {
        let buttons = Buttons::from_actions(actions);
        Self {
            held: buttons,
            pressed: buttons,
        }
    }

    /// A frame where `actions` are down but were already down last step
    pub fn hold_down(actions: &[Action]) -> Self {
        Self {
            held: Buttons::from_actions(actions),
            pressed: Buttons::default(),
        }
    }
}

/// Tracks held buttons across steps to work out fresh presses
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    previous: Buttons,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the frame for this step from the buttons currently held
    pub fn frame(&mut self, held: Buttons) -> InputFrame {
        let pressed = held.newly_down(&self.previous);
        self.previous = held;
        InputFrame { held, pressed }
    }

    /// Forget everything, e.g. after the window lost focus
    pub fn release_all(&mut self) {
        self.previous = Buttons::default();
    }
}
