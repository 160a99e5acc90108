/// Logical actions sampled once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Fire,
}

impl Action {
    pub const COUNT: usize = 7;

    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Fire,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Held-action flags plus the horizontal look delta accumulated since the
/// previous tick (pointer units, positive = pointer moved right).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    held: [bool; Action::COUNT],
    pub look_delta: f64,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set(&mut self, action: Action, down: bool) {
        self.held[action.index()] = down;
    }

    #[inline]
    pub fn is_down(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    /// Builder form used by tests and scripted input.
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    pub fn with_look(mut self, delta: f64) -> Self {
        self.look_delta = delta;
        self
    }

    /// Returns `+1`, `-1` or `0` for an opposing pair of actions.
    #[inline]
    pub fn axis(&self, positive: Action, negative: Action) -> f64 {
        let mut value = 0.0;
        if self.is_down(positive) {
            value += 1.0;
        }
        if self.is_down(negative) {
            value -= 1.0;
        }
        value
    }

    /// Clears the per-tick look delta, keeping held actions.
    pub fn end_tick(&mut self) {
        self.look_delta = 0.0;
    }
}
