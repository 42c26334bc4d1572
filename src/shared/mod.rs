pub mod constants;
pub mod presets;
