pub mod compare;
pub mod plan;
pub mod presets;
pub mod scenario;
pub mod share;
