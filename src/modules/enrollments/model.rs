pub use campus_models::enrollments::*;
