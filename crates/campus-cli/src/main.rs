use campus::store::PgRecordStore;
use campus_cli::seeder::{self, PerDepartment, SeedConfig};
use campus_records::{IdAllocator, PrefixTable};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "campus-cli")]
#[command(about = "Campus CLI - Administrative tools for Campus Records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an ADMIN account
    CreateAdmin {
        /// Username (4-20 characters)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake departments, teachers, courses, and students
    Seed {
        /// Number of departments to create
        #[arg(short = 'd', long, default_value = "4")]
        departments: usize,

        /// Number of teachers per department
        #[arg(long, default_value = "3")]
        teachers: usize,

        /// Number of chained courses per department
        #[arg(long, default_value = "4")]
        courses: usize,

        /// Number of students
        #[arg(long, default_value = "50")]
        students: usize,
    },
    /// Allocate the next identifier for an entity type (department, teacher, course, ...)
    Allocate {
        entity_type: String,
    },
    /// Clear all catalog data (keeps user accounts)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin { username, password } => {
            handle_create_admin(&pool, username, password).await
        }
        Commands::Seed {
            departments,
            teachers,
            courses,
            students,
        } => handle_seed(&pool, departments, teachers, courses, students).await,
        Commands::Allocate { entity_type } => handle_allocate(&pool, &entity_type).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::postgres::PgPool,
    username: Option<String>,
    password: Option<String>,
) {
    let username = username.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Username")
            .validate_with(|input: &String| -> Result<(), &str> {
                if (4..=20).contains(&input.chars().count()) {
                    Ok(())
                } else {
                    Err("Username must be 4-20 characters")
                }
            })
            .interact_text()
            .expect("Failed to read username")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match create_admin_internal(pool, &username, &password).await {
        Ok(()) => {
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", username);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(
    pool: &sqlx::postgres::PgPool,
    departments: usize,
    teachers: usize,
    courses: usize,
    students: usize,
) {
    let config = SeedConfig::new(departments)
        .with_per_department(PerDepartment { teachers, courses })
        .with_students(students);

    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_allocate(pool: &sqlx::postgres::PgPool, entity_type: &str) {
    let store = PgRecordStore::new(pool.clone());
    let allocator = IdAllocator::new(PrefixTable::standard());

    match allocator.allocate(&store, entity_type).await {
        Ok(identifier) => println!("{}", identifier),
        Err(e) => {
            eprintln!("❌ Error allocating identifier: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_seed(pool: &sqlx::postgres::PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}

async fn create_admin_internal(
    db: &sqlx::postgres::PgPool,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    use campus_core::hash_password;

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let created = sqlx::query_scalar::<_, String>(
        "INSERT INTO users (username, password, role)
         VALUES ($1, $2, 'ADMIN')
         ON CONFLICT (username) DO NOTHING
         RETURNING username",
    )
    .bind(username)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    match created {
        Some(_) => Ok(()),
        None => Err("User with this username already exists".into()),
    }
}
