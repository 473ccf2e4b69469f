pub use campus_models::schedules::*;
