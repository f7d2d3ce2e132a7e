use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct FloorId;
}

/// Half extent of the floor grid; coordinates run from `-GRID_RADIUS` to `GRID_RADIUS`.
pub const GRID_RADIUS: i32 = 2;
pub const GRID_SIDE: usize = (GRID_RADIUS * 2 + 1) as usize;
pub const GRID_CELLS: usize = GRID_SIDE * GRID_SIDE;

/// Side length of one floor in world units.
pub const FLOOR_SIZE: f32 = 20.0;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }

    pub fn in_bounds(self) -> bool {
        (-GRID_RADIUS..=GRID_RADIUS).contains(&self.x)
            && (-GRID_RADIUS..=GRID_RADIUS).contains(&self.y)
    }

    /// Every in-bounds coordinate, column-major (x outer, y inner).
    pub fn all() -> impl Iterator<Item = Self> {
        (-GRID_RADIUS..=GRID_RADIUS)
            .flat_map(|x| (-GRID_RADIUS..=GRID_RADIUS).map(move |y| Self { x, y }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const CARDINALS: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// The 8 king's-move offsets around a cell.
pub const KING_MOVES: [(i32, i32); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

/// A position exactly halfway between two cells, stored doubled so it stays integral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoundaryPos {
    pub x2: i32,
    pub y2: i32,
}

impl BoundaryPos {
    pub fn between(coord: GridCoord, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { x2: coord.x * 2 + dx, y2: coord.y * 2 + dy }
    }

    /// The two cells touching this boundary, lower coordinate first.
    pub fn cells(self) -> (GridCoord, GridCoord) {
        let low = GridCoord { x: self.x2.div_euclid(2), y: self.y2.div_euclid(2) };
        let high = GridCoord { x: low.x + self.x2.rem_euclid(2), y: low.y + self.y2.rem_euclid(2) };
        (low, high)
    }

    pub fn orientation(self) -> Orientation {
        if self.x2.rem_euclid(2) == 1 { Orientation::Vertical } else { Orientation::Horizontal }
    }
}

/// Which way a boundary segment runs. Boundaries between horizontal neighbours are vertical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Theme {
    #[default]
    Unspecified,
    Desert,
    Ocean,
    Grasslands,
    Temple,
    Snow,
}

impl Theme {
    /// Every theme a floor can actually be given.
    pub const SPECIFIED: [Self; 5] =
        [Self::Desert, Self::Ocean, Self::Grasslands, Self::Temple, Self::Snow];

    pub fn collectable(self) -> CollectableType {
        match self {
            Self::Desert => CollectableType::Diamond,
            Self::Ocean => CollectableType::Seashell,
            Self::Grasslands => CollectableType::Lavender,
            Self::Temple => CollectableType::Ruby,
            Self::Snow => CollectableType::Coal,
            Self::Unspecified => CollectableType::Unspecified,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Desert => 'D',
            Self::Ocean => 'O',
            Self::Grasslands => 'G',
            Self::Temple => 'T',
            Self::Snow => 'S',
            Self::Unspecified => '?',
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CollectableType {
    Diamond,
    Seashell,
    Lavender,
    Ruby,
    Coal,
    #[default]
    Unspecified,
}

impl CollectableType {
    pub const COUNT: usize = 6;
    pub const ALL: [Self; Self::COUNT] =
        [Self::Diamond, Self::Seashell, Self::Lavender, Self::Ruby, Self::Coal, Self::Unspecified];

    pub fn theme(self) -> Theme {
        match self {
            Self::Diamond => Theme::Desert,
            Self::Seashell => Theme::Ocean,
            Self::Lavender => Theme::Grasslands,
            Self::Ruby => Theme::Temple,
            Self::Coal => Theme::Snow,
            Self::Unspecified => Theme::Unspecified,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}
