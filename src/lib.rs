//! Library crate providing the Warrens simulation core.
//! Re-exports the unit, registry, ledger and monitor types for the binary and tests.
pub mod config;
pub mod constants;
pub mod events;
pub mod ledger;
pub mod logging;
pub mod monitor;
pub mod registry;
pub mod simulation;
pub mod unit;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use config::{ConfigError, LedgerConfig, MonitorConfig, RegistryConfig, SimConfig, UnitConfig};
pub use events::{EventBus, LedgerEvent, MonitorEvent, RegistryEvent, SimEvent, UnitEvent};
pub use ledger::{ResourceCosts, ResourceKind, ResourceLedger, ResourceSnapshot, UnknownResource};
pub use logging::init as init_logging;
pub use monitor::{
    MonitorSources, PopulationSource, RaidReason, ResourceSource, ThresholdMonitor, TickReport,
};
pub use registry::UnitRegistry;
pub use simulation::{GameState, Simulation};
pub use unit::{
    EntityId, MovementStatus, Unit, UnitHandle, UnitHooks, UnitKind, UnitSnapshot,
};
pub use vector_math::{direction_to, distance};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use warrens::prelude::*;
    //! ```

    pub use crate::ledger::{ResourceCosts, ResourceKind, ResourceLedger};
    pub use crate::registry::UnitRegistry;
    pub use crate::simulation::Simulation;
    pub use crate::unit::{Unit, UnitHandle, UnitKind};
    pub use crate::SimConfig;
    pub use glam::Vec3;
}
