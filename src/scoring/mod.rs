pub mod components;
pub mod config;
pub mod constructor;
pub mod engine;
pub mod validation;

pub use components::{Component, ComponentSet};
pub use config::*;
pub use constructor::{constructor_points, mean_csi, ConstructorInputs};
pub use engine::{calculate_csi, calculate_points, round3, PointsResult, MAX_EVENT_POINTS};
pub use validation::validate_scoring;
