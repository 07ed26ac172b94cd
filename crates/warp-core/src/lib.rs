pub mod config;
pub mod connections;
pub mod constants;
pub mod error;
pub mod field;
pub mod host;
pub mod scene;
pub mod scheduler;
pub mod simulation;
pub mod warp;

pub use config::*;
pub use connections::{Connection, ConnectionSet};
pub use error::{ConfigError, HostError, RenderError};
pub use field::{ParticleSet, Population};
pub use host::{BackendFactory, ParticleHost, Phase, RenderBackend, Viewport};
pub use scene::{LineVertex, PointInstance, SceneFrame};
pub use scheduler::{FrameScheduler, FrameToken, ManualScheduler};
pub use simulation::Simulation;
pub use warp::{WarpState, WarpTrigger};
