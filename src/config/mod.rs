//! Configuration for sg-toolbox

pub mod settings;

pub use settings::Settings;
