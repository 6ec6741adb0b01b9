//! Scene layout - fixed geometry of the dining room plus the table grid.

use serde::{Deserialize, Serialize};

use bistro_logic::constants::{CANVAS_H, CANVAS_W};
use bistro_logic::upgrades::UpgradeState;

use crate::components::{Bounds, Vec2};

/// A table and the spot its guest sits on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub pos: Vec2,
    pub seat: Vec2,
    pub occupied: bool,
}

/// Geometry of the restaurant, 3/4 view.
///
/// Back wall at the top, kitchen below it, then the serving counter, the
/// dining floor, and the entrance at the bottom left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    pub canvas_w: f32,
    pub canvas_h: f32,
    pub wall_y: f32,
    pub wall_h: f32,
    pub kitchen_y: f32,
    pub kitchen_h: f32,
    pub counter_y: f32,
    pub floor_y: f32,
    pub floor_h: f32,
    pub door: Vec2,
    pub queue: Vec2,
    pub exit_x: f32,
    pub stoves: Vec<Vec2>,
    pub kitchen_idle: Vec<Vec2>,
    pub waiter_idle: Vec<Vec2>,
    pub pickup: Vec2,
    pub tables: Vec<Table>,
    pub windows: Vec<Vec2>,
    pub register: Vec2,
    pub cat_bounds: Bounds,
    pub boss_spot: Vec2,
}

const WALL_Y: f32 = 0.0;
const WALL_H: f32 = 60.0;
const KITCHEN_Y: f32 = 60.0;
const KITCHEN_H: f32 = 70.0;
const COUNTER_Y: f32 = 130.0;
const FLOOR_Y: f32 = 138.0;
const FLOOR_H: f32 = 220.0;

const TABLE_START_X: f32 = 80.0;
const TABLE_GAP_X: f32 = 115.0;
const MAX_TABLE_COLUMNS: usize = 4;

impl SceneLayout {
    /// Build the layout for the current upgrade levels.
    pub fn new(upgrades: &UpgradeState) -> Self {
        Self {
            canvas_w: CANVAS_W,
            canvas_h: CANVAS_H,
            wall_y: WALL_Y,
            wall_h: WALL_H,
            kitchen_y: KITCHEN_Y,
            kitchen_h: KITCHEN_H,
            counter_y: COUNTER_Y,
            floor_y: FLOOR_Y,
            floor_h: FLOOR_H,
            door: Vec2::new(15.0, FLOOR_Y + FLOOR_H - 55.0),
            queue: Vec2::new(55.0, FLOOR_Y + FLOOR_H - 40.0),
            exit_x: -40.0,
            stoves: [160.0, 260.0, 360.0]
                .iter()
                .map(|&x| Vec2::new(x, KITCHEN_Y + 10.0))
                .collect(),
            kitchen_idle: [180.0, 280.0, 380.0]
                .iter()
                .map(|&x| Vec2::new(x, KITCHEN_Y + 38.0))
                .collect(),
            waiter_idle: [120.0, 155.0, 190.0]
                .iter()
                .map(|&x| Vec2::new(x, COUNTER_Y + 16.0))
                .collect(),
            pickup: Vec2::new(140.0, COUNTER_Y + 4.0),
            tables: table_grid(upgrades.table_count()),
            windows: [80.0, 240.0, 400.0]
                .iter()
                .map(|&x| Vec2::new(x, WALL_Y + 14.0))
                .collect(),
            register: Vec2::new(CANVAS_W - 80.0, FLOOR_Y + FLOOR_H - 40.0),
            cat_bounds: Bounds {
                left: 70.0,
                right: CANVAS_W - 70.0,
                top: FLOOR_Y + 20.0,
                bottom: FLOOR_Y + FLOOR_H - 50.0,
            },
            boss_spot: Vec2::new(250.0, 200.0),
        }
    }

    /// First free table in array order.
    pub fn free_table(&self) -> Option<usize> {
        self.tables.iter().position(|t| !t.occupied)
    }

    pub fn occupied_count(&self) -> usize {
        self.tables.iter().filter(|t| t.occupied).count()
    }

    /// Mark exactly the given table indices as occupied.
    pub fn resync_occupancy(&mut self, seated: impl IntoIterator<Item = usize>) {
        for table in &mut self.tables {
            table.occupied = false;
        }
        for index in seated {
            if let Some(table) = self.tables.get_mut(index) {
                table.occupied = true;
            }
        }
    }

    /// Stove for a chef slot, wrapping if there are more chefs than stoves.
    pub fn stove(&self, slot: usize) -> Vec2 {
        pick(&self.stoves, slot)
    }

    pub fn chef_idle(&self, slot: usize) -> Vec2 {
        pick(&self.kitchen_idle, slot)
    }

    pub fn waiter_idle(&self, slot: usize) -> Vec2 {
        pick(&self.waiter_idle, slot)
    }

    /// Where the n-th guest in line stands.
    pub fn queue_spot(&self, position: usize, spacing: f32) -> Vec2 {
        let offset = position as f32 * spacing;
        self.queue.offset(offset, offset * 0.3)
    }
}

fn pick(spots: &[Vec2], slot: usize) -> Vec2 {
    if spots.is_empty() {
        Vec2::ZERO
    } else {
        spots[slot % spots.len()]
    }
}

/// Two rows, at most four columns, filled row by row.
fn table_grid(count: usize) -> Vec<Table> {
    let cols = MAX_TABLE_COLUMNS.min(count.div_ceil(2)).max(1);
    let row1_y = FLOOR_Y + 30.0;
    let row2_y = FLOOR_Y + 110.0;

    (0..count)
        .map(|i| {
            let (col, y) = if i < cols { (i, row1_y) } else { (i - cols, row2_y) };
            let pos = Vec2::new(TABLE_START_X + col as f32 * TABLE_GAP_X, y);
            Table {
                pos,
                seat: pos.offset(8.0, -6.0),
                occupied: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_logic::upgrades::UpgradeId;

    #[test]
    fn test_default_layout_has_two_tables() {
        let layout = SceneLayout::new(&UpgradeState::new());
        assert_eq!(layout.tables.len(), 2);
        assert_eq!(layout.tables[0].pos, Vec2::new(80.0, 168.0));
        assert_eq!(layout.tables[0].seat, Vec2::new(88.0, 162.0));
        // One column: the second table drops to the back row.
        assert_eq!(layout.tables[1].pos, Vec2::new(80.0, 248.0));
        assert_eq!(layout.door, Vec2::new(15.0, 303.0));
        assert_eq!(layout.queue, Vec2::new(55.0, 318.0));
    }

    #[test]
    fn test_table_grid_caps_at_four_columns() {
        let tables = table_grid(7);
        let front: Vec<_> = tables.iter().filter(|t| t.pos.y == 168.0).collect();
        assert_eq!(front.len(), 4);
        assert_eq!(tables[3].pos.x, 80.0 + 3.0 * 115.0);
        assert_eq!(tables[4].pos, Vec2::new(80.0, 248.0));
    }

    #[test]
    fn test_more_tables_after_upgrade() {
        let mut upgrades = UpgradeState::new();
        upgrades.apply(UpgradeId::TableCount);
        upgrades.apply(UpgradeId::TableCount);
        let layout = SceneLayout::new(&upgrades);
        assert_eq!(layout.tables.len(), 4);
    }

    #[test]
    fn test_resync_occupancy() {
        let mut layout = SceneLayout::new(&UpgradeState::new());
        layout.tables[0].occupied = true;
        layout.resync_occupancy([1, 9]);
        assert!(!layout.tables[0].occupied);
        assert!(layout.tables[1].occupied);
        assert_eq!(layout.free_table(), Some(0));
        assert_eq!(layout.occupied_count(), 1);
    }

    #[test]
    fn test_queue_spot_offsets() {
        let layout = SceneLayout::new(&UpgradeState::new());
        let third = layout.queue_spot(2, 22.0);
        assert_eq!(third.x, 55.0 + 44.0);
        assert!((third.y - (318.0 + 13.2)).abs() < 1e-4);
    }
}
