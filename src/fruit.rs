use crate::{
    actor::Actor,
    grid::Point,
    variables::{FRUIT_DOTS_EATEN, FRUIT_LIFETIME_TICKS},
};

/// The bonus item offered on each level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FruitKind {
    Cherry,
    Strawberry,
    Orange,
    Apple,
    Melon,
    Galaxian,
    Bell,
    Key,
}

impl FruitKind {
    pub fn for_level(level: u32) -> Self {
        match level {
            0 | 1 => FruitKind::Cherry,
            2 => FruitKind::Strawberry,
            3 | 4 => FruitKind::Orange,
            5 | 6 => FruitKind::Apple,
            7 | 8 => FruitKind::Melon,
            9 | 10 => FruitKind::Galaxian,
            11 | 12 => FruitKind::Bell,
            _ => FruitKind::Key,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            FruitKind::Cherry => 100,
            FruitKind::Strawberry => 300,
            FruitKind::Orange => 500,
            FruitKind::Apple => 700,
            FruitKind::Melon => 1000,
            FruitKind::Galaxian => 2000,
            FruitKind::Bell => 3000,
            FruitKind::Key => 5000,
        }
    }
}

/// A stationary collectible. It never steers, so its actor never leaves the
/// cell it was placed in.
#[derive(Clone, Debug)]
pub struct Fruit {
    pub actor: Actor,
    kind: FruitKind,
    visible_ticks: u32,
}

impl Fruit {
    pub fn new() -> Self {
        Self {
            actor: Actor::new(0.0),
            kind: FruitKind::Cherry,
            visible_ticks: 0,
        }
    }

    pub fn kind(&self) -> FruitKind {
        self.kind
    }

    pub fn is_visible(&self) -> bool {
        self.visible_ticks > 0
    }

    /// Returns true if eating `dots_eaten` dots should bring the fruit out.
    pub fn is_due(&self, dots_eaten: u32) -> bool {
        !self.is_visible() && FRUIT_DOTS_EATEN.contains(&dots_eaten)
    }

    /// Places the fruit for `level` at `position`.
    pub fn show(&mut self, position: Point, level: u32) {
        self.kind = FruitKind::for_level(level);
        self.visible_ticks = FRUIT_LIFETIME_TICKS;
        self.actor.respawn(position, None);
    }

    pub fn hide(&mut self) {
        self.visible_ticks = 0;
    }

    /// Moves the fruit back to `position`, hidden.
    pub fn new_life(&mut self, position: Point) {
        self.hide();
        self.actor.respawn(position, None);
    }

    /// Counts down the time left on the board. The fruit never changes cell,
    /// so this never reports a crossing.
    pub fn tick(&mut self) -> bool {
        self.visible_ticks = self.visible_ticks.saturating_sub(1);
        self.actor.tick()
    }
}

impl Default for Fruit {
    fn default() -> Self {
        Self::new()
    }
}
