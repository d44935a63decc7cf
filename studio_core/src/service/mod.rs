pub mod assignments;
pub mod attendance;
pub mod classes;
pub mod enrollments;
pub mod exercises;
pub mod progress;
pub mod reports;
pub mod sessions;
pub mod templates;
pub mod users;
pub mod workout_logs;
