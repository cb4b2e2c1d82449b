mod user;
pub use user::{UserEntity, UserEntityCreateUpdate};

mod profile;
pub use profile::UserProfile;

mod module;
pub use module::{
    CatalogFilter, DifficultyLevel, ModuleCatalogRow, ModuleCreate, TrainingModule,
};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

mod enrollment;
pub use enrollment::Enrollment;

mod quiz_attempt;
pub use quiz_attempt::{QuizAttempt, QuizAttemptCreate};

mod awards;
pub use awards::{Certificate, UserBadge};

mod stats;
pub use stats::UserStatsRow;

mod mentorship;
pub use mentorship::{
    MentorshipSession, SessionRequest, SessionStatus, SessionType,
};
