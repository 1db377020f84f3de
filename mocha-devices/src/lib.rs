mod error;
mod lights;
mod memory;
mod registry;
mod resolver;
mod similarity;

pub use error::{DeviceError, ResolveError};
pub use lights::{Lights, PowerChange, BLINK_INTERVAL};
pub use memory::{MemoryRegistry, SimulatedLight};
pub use registry::{DeviceRegistry, Hsv, PowerState};
pub use resolver::{CatalogEntry, FuzzyResolver, MatchResult, DEFAULT_THRESHOLD};
pub use similarity::partial_ratio;
