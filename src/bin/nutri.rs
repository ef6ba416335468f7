//! nutri CLI - Command-line interface for Nutriplan
//!
//! Commands:
//! - plan: Compute a nutrition plan from flags or a questionnaire file
//! - show / clear: Inspect or remove the stored plan record
//! - validate: Validate a batch of questionnaires
//! - meals: Meal-book summary, upcoming groups and favorites
//! - doctor: Diagnose configuration and store health

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use nutriplan::intake::{validate_forms, FieldValue, IntakeForm};
use nutriplan::meals::{MealBook, MealGroup};
use nutriplan::pipeline::PlanProcessor;
use nutriplan::types::PlanRecord;
use nutriplan::{PlannerConfig, NUTRIPLAN_VERSION, PRODUCER_NAME};

/// nutri - Daily calorie and macronutrient targets from a questionnaire
#[derive(Parser)]
#[command(name = "nutri")]
#[command(version = NUTRIPLAN_VERSION)]
#[command(about = "Compute nutrition plans from intake questionnaires", long_about = None)]
struct Cli {
    /// Path of the stored plan record (overrides NUTRIPLAN_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a nutrition plan
    Plan {
        /// Questionnaire JSON file (use - for stdin); flags are ignored when set
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        answers: AnswerArgs,

        /// Save the resulting record to the store
        #[arg(long)]
        save: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the stored plan record
    Show {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete the stored plan record
    Clear,

    /// Validate questionnaire answers
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Meal-book operations
    Meals {
        #[command(subcommand)]
        command: MealsCommand,
    },

    /// Diagnose configuration and store health
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct AnswerArgs {
    /// Display name
    #[arg(long, default_value = "me")]
    name: String,

    /// Age in years
    #[arg(long)]
    age: Option<f64>,

    /// male or female
    #[arg(long, default_value = "male")]
    gender: String,

    /// Weight in kilograms
    #[arg(long)]
    weight: Option<f64>,

    /// Height in centimeters
    #[arg(long)]
    height: Option<f64>,

    /// sedentary, light, moderate, active or very_active
    #[arg(long)]
    activity: Option<String>,

    /// lose_weight, gain_mass, maintain or performance
    #[arg(long)]
    objective: Option<String>,

    /// Usual hours of sleep per night
    #[arg(long)]
    sleep_hours: Option<f64>,
}

impl From<AnswerArgs> for IntakeForm {
    fn from(args: AnswerArgs) -> Self {
        IntakeForm {
            objective: args.objective,
            activity_level: args.activity,
            name: Some(args.name),
            age: args.age.map(FieldValue::Number),
            gender: Some(args.gender),
            weight_kg: args.weight.map(FieldValue::Number),
            height_cm: args.height.map(FieldValue::Number),
            sleep_hours: args.sleep_hours.map(FieldValue::Number),
        }
    }
}

#[derive(Subcommand)]
enum MealsCommand {
    /// Registered calories for today against the daily goal
    Summary {
        /// Meal book JSON file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Daily calorie goal (defaults to the stored plan, then NUTRIPLAN_CALORIE_GOAL)
        #[arg(long)]
        goal: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Upcoming meals grouped by date
    Upcoming {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Favorite meals
    Favorites {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one questionnaire per line)
    Ndjson,
    /// JSON array of questionnaires
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "nutriplan=debug" } else { "nutriplan=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), NutriCliError> {
    let mut config = PlannerConfig::from_env();
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    match cli.command {
        Commands::Plan {
            input,
            answers,
            save,
            format,
        } => cmd_plan(&config, input.as_deref(), answers, save, format),

        Commands::Show { format } => cmd_show(&config, format),

        Commands::Clear => {
            config.store().clear()?;
            Ok(())
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Meals { command } => cmd_meals(&config, command),

        Commands::Doctor { json } => cmd_doctor(&config, json),
    }
}

fn cmd_plan(
    config: &PlannerConfig,
    input: Option<&Path>,
    answers: AnswerArgs,
    save: bool,
    format: OutputFormat,
) -> Result<(), NutriCliError> {
    let form = match input {
        Some(path) => IntakeForm::from_json(&read_input(path)?)?,
        None => IntakeForm::from(answers),
    };

    let processor = if save {
        PlanProcessor::with_store(config.store())
    } else {
        PlanProcessor::new()
    };

    let record = processor.process(&form)?;
    print!("{}", format_record(&record, &format)?);
    Ok(())
}

fn cmd_show(config: &PlannerConfig, format: OutputFormat) -> Result<(), NutriCliError> {
    let record = config
        .store()
        .load()?
        .ok_or_else(|| NutriCliError::NoStoredPlan(config.store_path.clone()))?;

    print!("{}", format_record(&record, &format)?);
    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), NutriCliError> {
    let input_data = read_input(input)?;

    let forms = match input_format {
        InputFormat::Ndjson => IntakeForm::parse_ndjson(&input_data)?,
        InputFormat::Json => IntakeForm::parse_array(&input_data)?,
    };

    let failures = validate_forms(&forms);

    let report = ValidationReport {
        total_forms: forms.len(),
        valid_forms: forms.len() - failures.len(),
        invalid_forms: failures.len(),
        errors: failures
            .iter()
            .map(|f| ValidationErrorDetail {
                index: f.index,
                name: f.name.clone(),
                error: f.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total forms:   {}", report.total_forms);
        println!("Valid forms:   {}", report.valid_forms);
        println!("Invalid forms: {}", report.invalid_forms);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - {} (index {}): {}",
                    err.name.as_deref().unwrap_or("unnamed"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_forms > 0 {
        Err(NutriCliError::ValidationFailed(report.invalid_forms))
    } else {
        Ok(())
    }
}

fn cmd_meals(config: &PlannerConfig, command: MealsCommand) -> Result<(), NutriCliError> {
    match command {
        MealsCommand::Summary { input, goal, json } => {
            let book = MealBook::from_json(&read_input(&input)?)?;
            let goal = goal.unwrap_or_else(|| config.summary_goal());

            let summary = book.today_summary(goal);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Today's Summary");
                println!("===============");
                println!("Registered: {} kcal", summary.registered_calories);
                println!("Goal:       {} kcal", summary.goal);
                println!("Progress:   {}%", summary.percentage);
            }
        }

        MealsCommand::Upcoming { input, json } => {
            let book = MealBook::from_json(&read_input(&input)?)?;
            let groups = book.upcoming_by_date();
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                print!("{}", format_groups(&groups));
            }
        }

        MealsCommand::Favorites { input, json } => {
            let book = MealBook::from_json(&read_input(&input)?)?;
            let favorites = book.favorites();
            if json {
                println!("{}", serde_json::to_string_pretty(&favorites)?);
            } else {
                println!("Favorite Meals");
                println!("==============");
                for meal in &favorites {
                    println!(
                        "  {} {:<9} {} ({} kcal)",
                        meal.time,
                        meal.meal_type.as_str(),
                        meal.name,
                        meal.calories
                    );
                }
            }
        }
    }

    Ok(())
}

fn cmd_doctor(config: &PlannerConfig, json: bool) -> Result<(), NutriCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("nutriplan version {}", NUTRIPLAN_VERSION),
    });

    checks.push(DoctorCheck {
        name: "calorie_goal".to_string(),
        status: CheckStatus::Ok,
        message: format!("Fallback daily goal {} kcal", config.daily_calorie_goal),
    });

    let store_check = match config.store().load() {
        Ok(Some(record)) => DoctorCheck {
            name: "store".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Plan for {} saved {} ({} kcal)",
                record.intake.name,
                record.created_at.format("%Y-%m-%d %H:%M UTC"),
                record.plan.calories
            ),
        },
        Ok(None) => DoctorCheck {
            name: "store".to_string(),
            status: CheckStatus::Warning,
            message: format!("No plan stored at {}", config.store_path.display()),
        },
        Err(e) => DoctorCheck {
            name: "store".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    };
    checks.push(store_check);

    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (interactive mode)"
    } else {
        "stdin is a pipe (questionnaires can be piped in with -i -)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: NUTRIPLAN_VERSION.to_string(),
        store_path: config.store_path.display().to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("nutri Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("Store:    {}", report.store_path);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(NutriCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(path: &Path) -> Result<String, NutriCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn format_record(record: &PlanRecord, format: &OutputFormat) -> Result<String, NutriCliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)? + "\n"),
        OutputFormat::JsonPretty => Ok(record.to_json()? + "\n"),
        OutputFormat::Text => {
            let plan = &record.plan;
            let intake = &record.intake;
            let mut out = String::new();
            out.push_str(&format!("Nutrition plan for {}\n", intake.name));
            out.push_str(&format!(
                "Objective: {}   Activity: {}\n\n",
                intake.objective.map(|o| o.as_str()).unwrap_or("maintain"),
                intake.activity_level.map(|a| a.as_str()).unwrap_or("sedentary")
            ));
            out.push_str(&format!("Calories:  {} kcal/day\n", plan.calories));
            out.push_str(&format!("Protein:   {} g\n", plan.protein_g));
            out.push_str(&format!("Carbs:     {} g\n", plan.carbs_g));
            out.push_str(&format!("Fat:       {} g\n", plan.fat_g));
            out.push_str(&format!("Meals:     {} per day\n", plan.meals_per_day));
            Ok(out)
        }
    }
}

fn format_groups(groups: &[MealGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        match group.date {
            Some(date) => out.push_str(&format!("{}\n", date.format("%A, %d %b %Y"))),
            None => out.push_str("No specific date\n"),
        }
        for meal in &group.meals {
            out.push_str(&format!(
                "  {} {:<9} {} ({} kcal)\n",
                meal.time,
                meal.meal_type.as_str(),
                meal.name,
                meal.calories
            ));
        }
    }
    out
}

// Error types

#[derive(Debug)]
enum NutriCliError {
    Io(io::Error),
    Plan(nutriplan::PlanError),
    Json(serde_json::Error),
    NoStoredPlan(PathBuf),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for NutriCliError {
    fn from(e: io::Error) -> Self {
        NutriCliError::Io(e)
    }
}

impl From<nutriplan::PlanError> for NutriCliError {
    fn from(e: nutriplan::PlanError) -> Self {
        NutriCliError::Plan(e)
    }
}

impl From<serde_json::Error> for NutriCliError {
    fn from(e: serde_json::Error) -> Self {
        NutriCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<NutriCliError> for CliError {
    fn from(e: NutriCliError) -> Self {
        match e {
            NutriCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            NutriCliError::Plan(nutriplan::PlanError::Validation(e)) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'nutri validate' for details".to_string()),
            },
            NutriCliError::Plan(e) => CliError {
                code: "PLAN_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check age, weight and height values".to_string()),
            },
            NutriCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            NutriCliError::NoStoredPlan(path) => CliError {
                code: "NO_STORED_PLAN".to_string(),
                message: format!("No plan stored at {}", path.display()),
                hint: Some("Run 'nutri plan --save' first".to_string()),
            },
            NutriCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} forms failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            NutriCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_forms: usize,
    valid_forms: usize,
    invalid_forms: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    name: Option<String>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    store_path: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
