//! Centered 5×5 occupancy grid used while a level is being laid out.

use crate::error::BoundsError;
use crate::types::{Direction, FloorId, GRID_CELLS, GRID_RADIUS, GRID_SIDE, GridCoord};

pub(crate) fn raw_index(coord: GridCoord) -> Result<usize, BoundsError> {
    if !coord.in_bounds() {
        return Err(BoundsError { coord });
    }
    let raw_x = (coord.x + GRID_RADIUS) as usize;
    let raw_y = (coord.y + GRID_RADIUS) as usize;
    Ok(raw_x * GRID_SIDE + raw_y)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Which floor, if any, sits on each cell of the centred 5×5 grid.
pub struct GridMatrix {
    cells: [Option<FloorId>; GRID_CELLS],
}

impl GridMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Floor stored at `coord`, or `Ok(None)` for an empty in-bounds cell.
    ///
    /// Returns [`BoundsError`] when `coord` lies outside the 5×5 grid.
    pub fn get(&self, coord: GridCoord) -> Result<Option<FloorId>, BoundsError> {
        Ok(self.cells[raw_index(coord)?])
    }

    /// Records `floor` at `coord`, replacing whatever was there.
    ///
    /// Returns [`BoundsError`] when `coord` lies outside the 5×5 grid.
    pub fn set(&mut self, coord: GridCoord, floor: FloorId) -> Result<(), BoundsError> {
        self.cells[raw_index(coord)?] = Some(floor);
        Ok(())
    }

    /// Whether the cell next to `coord` holds a floor. Stepping off the grid counts as empty.
    pub fn has_neighbor(&self, coord: GridCoord, direction: Direction) -> bool {
        matches!(self.get(coord.step(direction)), Ok(Some(_)))
    }

    /// The floor on the centre cell, if one has been placed.
    pub fn origin(&self) -> Option<FloorId> {
        self.get(GridCoord::ORIGIN).ok().flatten()
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        matches!(self.get(coord), Ok(Some(_)))
    }

    /// Occupied cells in column-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (GridCoord, FloorId)> + '_ {
        GridCoord::all().filter_map(|coord| self.get(coord).ok().flatten().map(|id| (coord, id)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn out_of_range_access_is_a_bounds_error() {
        let mut ids: SlotMap<FloorId, ()> = SlotMap::with_key();
        let id = ids.insert(());
        let mut grid = GridMatrix::new();

        let outside = GridCoord::new(3, 0);
        assert_eq!(grid.get(outside), Err(BoundsError { coord: outside }));
        let below = GridCoord::new(0, -3);
        assert_eq!(grid.set(below, id), Err(BoundsError { coord: below }));
        assert_eq!(grid.get(GridCoord::new(2, -2)), Ok(None));
    }

    #[test]
    fn has_neighbor_treats_the_grid_edge_as_empty() {
        let mut ids: SlotMap<FloorId, ()> = SlotMap::with_key();
        let mut grid = GridMatrix::new();
        grid.set(GridCoord::new(2, 2), ids.insert(())).unwrap();
        grid.set(GridCoord::new(1, 2), ids.insert(())).unwrap();

        assert!(!grid.has_neighbor(GridCoord::new(2, 2), Direction::Up));
        assert!(!grid.has_neighbor(GridCoord::new(2, 2), Direction::Right));
        assert!(!grid.has_neighbor(GridCoord::new(2, 2), Direction::Down));
        assert!(grid.has_neighbor(GridCoord::new(2, 2), Direction::Left));
        assert!(grid.has_neighbor(GridCoord::new(1, 2), Direction::Right));
    }

    #[test]
    fn occupied_lists_every_set_cell() {
        let mut ids: SlotMap<FloorId, ()> = SlotMap::with_key();
        let mut grid = GridMatrix::new();
        let origin = ids.insert(());
        grid.set(GridCoord::ORIGIN, origin).unwrap();
        grid.set(GridCoord::new(0, 1), ids.insert(())).unwrap();

        assert_eq!(grid.origin(), Some(origin));
        assert_eq!(grid.occupied_count(), 2);
        let coords: Vec<_> = grid.occupied().map(|(coord, _)| coord).collect();
        assert_eq!(coords, vec![GridCoord::ORIGIN, GridCoord::new(0, 1)]);
    }
}
