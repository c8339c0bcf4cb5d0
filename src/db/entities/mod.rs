#[allow(unused_imports)]
pub mod prelude {
    pub use super::access_request::Entity as AccessRequest;
    pub use super::exercise::Entity as Exercise;
    pub use super::exercise_muscle_group::Entity as ExerciseMuscleGroup;
    pub use super::feedback::Entity as Feedback;
    pub use super::muscle_group::Entity as MuscleGroup;
    pub use super::password_reset_token::Entity as PasswordResetToken;
    pub use super::registration_token::Entity as RegistrationToken;
    pub use super::user::Entity as User;
    pub use super::workout::Entity as Workout;
    pub use super::workout_exercise::Entity as WorkoutExercise;
    pub use super::workout_set::Entity as WorkoutSet;
}

pub mod access_request;
pub mod exercise;
pub mod exercise_muscle_group;
pub mod feedback;
pub mod muscle_group;
pub mod password_reset_token;
pub mod registration_token;
pub mod user;
pub mod workout;
pub mod workout_exercise;
pub mod workout_set;
