//! Strategic deconfliction for a primary UAV and the traffic around it.
//!
//! Detects waypoint pairs that break separation at matching times and
//! reroutes the other vehicles with a bounded, seedable local search.

pub mod conflict;
pub mod error;
pub mod mission;
pub mod models;
pub mod report;
pub mod reroute;
pub mod rules;
pub mod session;
pub mod spatial;

pub use conflict::{detect_conflicts, Conflict, ConflictDetector};
pub use error::{DeconflictError, Result};
pub use models::{Field, Fleet, Position, Trajectory, Waypoint, PRIMARY_ID};
pub use reroute::{reroute_fleet, RerouteOutcome, Rerouter, UnresolvedWaypoint};
pub use rules::{Comparison, DeconflictConfig, TimeMode};
pub use session::{Deconflictor, MissionStatus};
pub use spatial::euclidean_distance;
