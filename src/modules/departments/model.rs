pub use campus_models::departments::*;
