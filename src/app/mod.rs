pub mod instance;
pub mod launch;
pub mod resolver;
pub mod screens;
pub mod stack;

pub use instance::{AppLifecycle, InstanceId, MicroApplication};
pub use launch::{LaunchMode, LaunchRequest, Params};
pub use resolver::{MutationPlan, resolve};
pub use screens::PresentationUnit;
pub use stack::AppStack;
