// Utility modules

pub mod encode;
pub mod output_path;
