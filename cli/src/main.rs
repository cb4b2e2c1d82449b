use clap::{Parser, Subcommand};
use govskills::model::entity::{
    Certificate, Lesson, LessonCreate, ModuleCreate, QuizAttempt, QuizAttemptCreate,
    TrainingModule, UserBadge, UserEntity, UserEntityCreateUpdate,
};
use govskills::model::{
    CrudRepository, DatabaseError, DbConnection, ModelManager, PaginatableRepository,
};
use govskills::web::AuthenticatedUser;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the training DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage training modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Record quiz attempts
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },

    /// Grant badges and certificates
    Award {
        #[command(subcommand)]
        action: AwardCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    List,
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// beginner, intermediate or advanced
        #[arg(long)]
        difficulty: String,
        #[arg(long)]
        category: String,
        /// Estimated duration in minutes
        #[arg(long)]
        duration: Option<i32>,
    },
    List,
    Delete {
        #[arg(long)]
        title: String,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        /// Module title to attach the lesson to
        #[arg(long)]
        module_title: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Quiz attempt recording
#[derive(Subcommand, Debug)]
pub enum QuizCommands {
    Record {
        #[arg(long)]
        username: String,
        #[arg(long)]
        score: f32,
        #[arg(long, default_value_t = 0)]
        points: i32,
        /// Backdate the attempt by this many days
        #[arg(long, default_value_t = 0)]
        days_ago: i64,
    },
}

/// Badge / certificate granting
#[derive(Subcommand, Debug)]
pub enum AwardCommands {
    Badge {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
    },
    Certificate {
        #[arg(long)]
        username: String,
        #[arg(long)]
        title: String,
    },
}

async fn user_id_by_name(mm: &ModelManager, username: &str) -> Result<uuid::Uuid, DatabaseError> {
    sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(mm.executor())
        .await
        .map_err(DatabaseError::from)
}

#[tokio::main]
async fn main() -> govskills::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let db_con = DbConnection::connect(&std::env::var("DATABASE_URL").unwrap())?;
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                username,
                password,
                email,
            } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        username,
                        email,
                        password_hash: govskills::auth::hash_password(&password).unwrap(),
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }
            UserCommands::List => {
                let page = UserEntity::page(&mm, &actor, 100, 0).await?;
                for user in &page.items {
                    println!("{} {}", user.id(), user.username());
                }
                println!("total: {}", page.total);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                title,
                description,
                difficulty,
                category,
                duration,
            } => {
                let module = TrainingModule::create(
                    &mm,
                    &actor,
                    ModuleCreate {
                        title,
                        description,
                        difficulty_level: difficulty,
                        category,
                        estimated_duration: duration,
                        prerequisites: None,
                        thumbnail_url: None,
                    },
                )
                .await?;
                println!("Module created: {:?}", module);
            }
            ModuleCommands::List => {
                let page = TrainingModule::page(&mm, &actor, 100, 0).await?;
                for module in &page.items {
                    println!(
                        "{} [{}] {} ({})",
                        module.id(),
                        module.difficulty_level(),
                        module.title(),
                        module.category()
                    );
                }
                println!("total: {}", page.total);
            }
            ModuleCommands::Delete { title } => {
                let module_id: uuid::Uuid =
                    sqlx::query_scalar("SELECT id FROM training_modules WHERE title = $1")
                        .bind(&title)
                        .fetch_one(mm.executor())
                        .await
                        .map_err(DatabaseError::from)?;

                if let Some(module) = TrainingModule::find_by_id(&mm, &actor, module_id).await? {
                    module.delete(&mm, &actor).await?;
                    println!("Module deleted: {}", title);
                }
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module_title,
                title,
                order_index,
            } => {
                let module_id: uuid::Uuid =
                    sqlx::query_scalar("SELECT id FROM training_modules WHERE title = $1")
                        .bind(&module_title)
                        .fetch_one(mm.executor())
                        .await
                        .map_err(DatabaseError::from)?;

                let lesson = Lesson::create(
                    &mm,
                    &actor,
                    LessonCreate {
                        module_id,
                        title,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Lesson created: {:?}", lesson);
            }
        },

        Commands::Quiz { action } => match action {
            QuizCommands::Record {
                username,
                score,
                points,
                days_ago,
            } => {
                let user_id = user_id_by_name(&mm, &username).await?;
                let completed_at = (days_ago > 0)
                    .then(|| chrono::Utc::now() - chrono::Duration::days(days_ago));

                let attempt = QuizAttempt::record(
                    &mm,
                    QuizAttemptCreate {
                        user_id,
                        score_percentage: score,
                        points_earned: points,
                        completed_at,
                    },
                )
                .await?;
                println!("Quiz attempt recorded: {:?}", attempt);
            }
        },

        Commands::Award { action } => match action {
            AwardCommands::Badge { username, name } => {
                let user_id = user_id_by_name(&mm, &username).await?;
                let badge = UserBadge::award(&mm, user_id, &name).await?;
                println!("Badge awarded: {:?}", badge);
            }
            AwardCommands::Certificate { username, title } => {
                let user_id = user_id_by_name(&mm, &username).await?;
                let certificate = Certificate::issue(&mm, user_id, &title).await?;
                println!("Certificate issued: {:?}", certificate);
            }
        },
    }

    Ok(())
}
