/// Default tuning values for the simulation core.
///
/// These seed the `Default` implementations in [`crate::config`]; a TOML
/// configuration file can override any of them at start-up.
pub const DEFAULT_MAX_HEALTH: f32 = 100.0;
pub const DEFAULT_MOVE_SPEED: f32 = 5.0;
/// Distance at which a moving unit snaps to its target and stops.
pub const DEFAULT_STOPPING_DISTANCE: f32 = 0.1;

pub const PATHFINDING_UPDATE_RATE: f32 = 0.1;
pub const MAX_PATHFINDING_ATTEMPTS: u32 = 3;
pub const PATHFINDING_TIMEOUT: f32 = 5.0;

pub const INITIAL_WOOD: i64 = 100;
pub const INITIAL_STONE: i64 = 50;
pub const INITIAL_FOOD: i64 = 200;
pub const INITIAL_MAGIC: i64 = 25;
/// Cap shared by every resource kind.
pub const MAX_RESOURCE_AMOUNT: i64 = 9999;

pub const POPULATION_THRESHOLD: usize = 10;
pub const RESOURCE_THRESHOLD: i64 = 500;
/// Seconds between raid threshold evaluations.
pub const RAID_CHECK_INTERVAL: f64 = 5.0;
/// Seconds between enemy spawn ticks.
pub const SPAWN_INTERVAL: f64 = 30.0;
