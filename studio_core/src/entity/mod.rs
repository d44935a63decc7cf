pub mod attendance;
pub mod class;
pub mod class_enrollment;
pub mod class_session;
pub mod exercise;
pub mod progress_measurement;
pub mod template_exercise;
pub mod user;
pub mod workout_assignment;
pub mod workout_log;
pub mod workout_log_entry;
pub mod workout_template;

#[cfg(test)]
mod tests;

pub mod prelude {
    // Re-export all entities for convenience
    pub use super::attendance::{
        ActiveModel as AttendanceActiveModel, AttendanceStatus, Column as AttendanceColumn,
        Entity as Attendance, Model as AttendanceModel,
    };
    pub use super::class::{
        ActiveModel as ClassActiveModel, ClassStatus, Column as ClassColumn, Entity as Class,
        Model as ClassModel,
    };
    pub use super::class_enrollment::{
        ActiveModel as ClassEnrollmentActiveModel, Column as ClassEnrollmentColumn,
        EnrollmentStatus, Entity as ClassEnrollment, Model as ClassEnrollmentModel,
    };
    pub use super::class_session::{
        ActiveModel as ClassSessionActiveModel, Column as ClassSessionColumn,
        Entity as ClassSession, Model as ClassSessionModel, SessionStatus,
    };
    pub use super::exercise::{
        ActiveModel as ExerciseActiveModel, Column as ExerciseColumn, Difficulty,
        Entity as Exercise, Model as ExerciseModel,
    };
    pub use super::progress_measurement::{
        ActiveModel as ProgressMeasurementActiveModel, Column as ProgressMeasurementColumn,
        Entity as ProgressMeasurement, MeasurementKind, Model as ProgressMeasurementModel,
    };
    pub use super::template_exercise::{
        ActiveModel as TemplateExerciseActiveModel, Column as TemplateExerciseColumn,
        Entity as TemplateExercise, Model as TemplateExerciseModel,
    };
    pub use super::user::{
        ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
        Role, UserStatus,
    };
    pub use super::workout_assignment::{
        ActiveModel as WorkoutAssignmentActiveModel, AssignmentStatus,
        Column as WorkoutAssignmentColumn, Entity as WorkoutAssignment,
        Model as WorkoutAssignmentModel,
    };
    pub use super::workout_log::{
        ActiveModel as WorkoutLogActiveModel, Column as WorkoutLogColumn, Entity as WorkoutLog,
        Model as WorkoutLogModel,
    };
    pub use super::workout_log_entry::{
        ActiveModel as WorkoutLogEntryActiveModel, Column as WorkoutLogEntryColumn,
        Entity as WorkoutLogEntry, Model as WorkoutLogEntryModel,
    };
    pub use super::workout_template::{
        ActiveModel as WorkoutTemplateActiveModel, Column as WorkoutTemplateColumn,
        Entity as WorkoutTemplate, Model as WorkoutTemplateModel,
    };

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::{
        ActiveModelTrait,
        ActiveValue,

        ColumnTrait,
        ConnectionTrait,

        // Database and connection types
        Database,
        DatabaseConnection,
        // Common result types
        DbErr,

        // Core traits
        EntityTrait,
        ModelTrait,
        NotSet,
        // Pagination
        PaginatorTrait,
        QueryFilter,
        QueryOrder,
        QuerySelect,
        // Active model helpers
        Set,
        TransactionTrait,
    };
}
