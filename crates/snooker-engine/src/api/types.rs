use serde::{Deserialize, Serialize};

/// Handle to a body owned by the physics adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Handle to a point constraint owned by the physics adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintHandle(pub u32);

/// The six uniquely spotted colours.
/// Declaration order is the order colours are iterated and processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Yellow,
        Color::Green,
        Color::Brown,
        Color::Blue,
        Color::Pink,
        Color::Black,
    ];

    /// Points awarded for pocketing this colour.
    pub fn value(self) -> u32 {
        match self {
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Brown => 4,
            Color::Blue => 5,
            Color::Pink => 6,
            Color::Black => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Brown => "brown",
            Color::Blue => "blue",
            Color::Pink => "pink",
            Color::Black => "black",
        }
    }
}

/// What a registry ball is. Reds are fungible, colours are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallKind {
    Red,
    Colored(Color),
}

impl BallKind {
    /// Value the ball carries when it is first placed on the table.
    pub fn base_value(self) -> u32 {
        match self {
            BallKind::Red => 1,
            BallKind::Colored(color) => color.value(),
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, BallKind::Red)
    }
}

/// Colour tag used by renderers: red, one of the six colours, or the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallTag {
    Red,
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
    Cue,
}

impl BallTag {
    /// Stable numeric index for packed instance buffers.
    pub fn index(self) -> u32 {
        match self {
            BallTag::Red => 0,
            BallTag::Yellow => 1,
            BallTag::Green => 2,
            BallTag::Brown => 3,
            BallTag::Blue => 4,
            BallTag::Pink => 5,
            BallTag::Black => 6,
            BallTag::Cue => 7,
        }
    }
}

impl From<BallKind> for BallTag {
    fn from(kind: BallKind) -> Self {
        match kind {
            BallKind::Red => BallTag::Red,
            BallKind::Colored(Color::Yellow) => BallTag::Yellow,
            BallKind::Colored(Color::Green) => BallTag::Green,
            BallKind::Colored(Color::Brown) => BallTag::Brown,
            BallKind::Colored(Color::Blue) => BallTag::Blue,
            BallKind::Colored(Color::Pink) => BallTag::Pink,
            BallKind::Colored(Color::Black) => BallTag::Black,
        }
    }
}

/// How the balls are laid out when a game begins. Chosen once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrangementMode {
    /// Reds in a pyramid, colours on their spots.
    Ordered,
    /// Every ball scattered uniformly at random.
    Unordered,
    /// Reds scattered along a noise field, colours on their spots.
    Partial,
}

impl ArrangementMode {
    /// Keyboard shortcut: `1` ordered, `2` partial, `3` unordered.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(ArrangementMode::Ordered),
            '2' => Some(ArrangementMode::Partial),
            '3' => Some(ArrangementMode::Unordered),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArrangementMode::Ordered => "ordered",
            ArrangementMode::Unordered => "unordered",
            ArrangementMode::Partial => "partial",
        }
    }
}

/// The class of ball the player must legally strike next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetBall {
    #[default]
    Red,
    Colored,
}

impl TargetBall {
    pub fn label(self) -> &'static str {
        match self {
            TargetBall::Red => "Red Ball",
            TargetBall::Colored => "Colorful Ball",
        }
    }
}

/// Game result. Anything but `InProgress` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    InProgress,
    Won,
    TimedOut,
}

/// Which class of ball the cue ball touched first during the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitKind {
    #[default]
    None,
    Red,
    Colored,
}

impl From<BallKind> for HitKind {
    fn from(kind: BallKind) -> Self {
        match kind {
            BallKind::Red => HitKind::Red,
            BallKind::Colored(_) => HitKind::Colored,
        }
    }
}
