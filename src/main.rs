use chrono::NaiveDate;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tutor_tracker::{
    commands::{apply_lesson_args, apply_student_args, parse_date},
    config::{self, AppConfig, ServiceCredentials, TableNames},
    core::{
        lessons,
        payment::format_amount,
        search,
        stats::{self, summarize_student},
        students,
    },
    entities::{LessonDraft, LessonListing, Student, StudentDraft},
    errors::{Error, Result},
    session::SessionStore,
    store::{self as record_store, AirtableStore, MemoryStore, RecordStore},
};

const USAGE: &str = "Usage: tutor-tracker [--demo] <command>\n\
\n\
Commands:\n\
  login <username> <password>   Log in as the administrator\n\
  logout                         End the session\n\
  whoami                         Show who is logged in\n\
  check                          Check credentials and connect to the service\n\
  dashboard                      Totals and recent lessons\n\
  students [search]              List students with balances\n\
  student <id>                   Show one student and their lessons\n\
  lessons [search]               List all lessons\n\
  add-student <name> [key=value...]\n\
  edit-student <id> [key=value...]\n\
  delete-student <id>\n\
  add-lesson <student-id> <YYYY-MM-DD> [key=value...]\n\
  edit-lesson <id> [key=value...]\n\
  delete-lesson <id>\n\
\n\
Student fields: name, email, phone, grade, guardian, guardian-phone\n\
Lesson fields:  student, date, duration, subject, notes, due, paid, is-paid\n\
An empty value (e.g. email=) clears the field.\n";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 2. Load .env file, non-fatal: variables can be set externally
    if dotenvy::dotenv().is_ok() {
        info!("Loaded .env file.");
    }

    match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("❌ {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let demo = args.iter().any(|arg| arg == "--demo");
    args.retain(|arg| arg != "--demo");

    let app_config = config::load_app_config(config::DEFAULT_CONFIG_PATH)?;
    let mut session = SessionStore::initialize(&app_config.settings.session.path, app_config.admin.clone())?;

    let command = args.first().map(String::as_str);
    match command {
        Some("login") => {
            let (Some(username), Some(password)) = (args.get(1), args.get(2)) else {
                return Ok(print_usage());
            };
            if session.login(username, password)? {
                println!("✅ Logged in as {username}");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("❌ Invalid username or password");
                Ok(ExitCode::FAILURE)
            }
        }
        Some("logout") => {
            session.logout()?;
            println!("Logged out");
            Ok(ExitCode::SUCCESS)
        }
        Some("whoami") => {
            match session.current_user() {
                Some(user) => println!("{} (since {})", user.username, user.logged_in_at.to_rfc3339()),
                None => println!("Not logged in"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Some("check") => check_configuration(&app_config, demo).await,
        Some(_) => {
            if !session.is_authenticated() {
                println!("Please log in first: tutor-tracker login <username> <password>");
                return Ok(ExitCode::FAILURE);
            }
            let tables = app_config.settings.service.tables.clone();
            if demo {
                let store = MemoryStore::with_tables(&[tables.students.as_str(), tables.lessons.as_str()]);
                seed_demo_data(&store, &tables).await?;
                run_data_command(&store, &app_config, &args).await
            } else {
                let credentials = ServiceCredentials::from_env()?;
                let store = AirtableStore::new(&credentials, &app_config.settings.service.endpoint_url)?;
                run_data_command(&store, &app_config, &args).await
            }
        }
        None => Ok(print_usage()),
    }
}

fn print_usage() -> ExitCode {
    eprintln!("{USAGE}");
    ExitCode::FAILURE
}

/// Checks the environment, then makes one small request against the students table.
async fn check_configuration(app_config: &AppConfig, demo: bool) -> Result<ExitCode> {
    let report = config::check_environment();
    if !report.is_ok() {
        for problem in report.problems() {
            println!("❌ {problem}");
        }
        println!("Set the variables in .env and run `tutor-tracker check` again.");
        return Ok(ExitCode::FAILURE);
    }
    println!("✅ Service credentials are set");
    if demo {
        return Ok(ExitCode::SUCCESS);
    }

    let service = &app_config.settings.service;
    let credentials = ServiceCredentials::from_env()?;
    let store = AirtableStore::new(&credentials, &service.endpoint_url)?;
    match record_store::check_connection(&store, &service.tables.students).await {
        Ok(()) => {
            println!("✅ Connected to table '{}'", service.tables.students);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Connection check failed: {}", e);
            println!("❌ {}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_data_command<S: RecordStore>(store: &S, app_config: &AppConfig, args: &[String]) -> Result<ExitCode> {
    let tables = &app_config.settings.service.tables;
    let currency = app_config.settings.display.currency_symbol.as_str();
    let term = args.get(1).map_or("", String::as_str);

    match args.first().map(String::as_str) {
        Some("dashboard") => {
            let totals = stats::fetch_dashboard_stats(store, tables).await?;
            println!("Total students:  {}", totals.total_students);
            println!("Total lessons:   {}", totals.total_lessons);
            println!("Unpaid lessons:  {}", totals.unpaid_lessons);
            println!("Total revenue:   {}", format_amount(currency, totals.total_revenue));
            println!("\nRecent lessons");
            let recent = lessons::get_recent_lessons(store, tables, app_config.settings.display.recent_lessons).await?;
            if recent.is_empty() {
                println!("  No lessons yet. Start by adding a lesson!");
            }
            for listing in &recent {
                print_listing(listing, currency);
            }
        }
        Some("students") => {
            let all = students::get_all_students(store, tables).await?;
            for student in search::filter_students(&all, term) {
                let summary = summarize_student(student);
                println!(
                    "{:<28} {:>3} lessons  balance {}  [{}]",
                    student.name,
                    summary.total_lessons,
                    format_amount(currency, summary.outstanding_balance),
                    student.id
                );
            }
        }
        Some("student") => {
            let Some(id) = args.get(1) else {
                return Ok(print_usage());
            };
            let student = students::get_student_by_id(store, tables, id).await?;
            print_student(&student, currency);
        }
        Some("lessons") => {
            let listings = lessons::get_lessons_with_students(store, tables).await?;
            for listing in search::filter_lessons(&listings, term) {
                print_listing(listing, currency);
            }
        }
        _ => return run_write_command(store, tables, args).await,
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_write_command<S: RecordStore>(store: &S, tables: &TableNames, args: &[String]) -> Result<ExitCode> {
    let command = args.first().map_or("", String::as_str);
    let (Some(target), fields) = (args.get(1), args.get(2..).unwrap_or_default()) else {
        return Ok(print_usage());
    };

    match command {
        "add-student" => {
            let mut draft = StudentDraft::named(target.as_str());
            apply_student_args(&mut draft, fields)?;
            let student = students::create_student(store, tables, &draft).await?;
            println!("✅ Added student {} [{}]", student.name, student.id);
        }
        "edit-student" => {
            let existing = students::get_student_by_id(store, tables, target).await?;
            let mut draft = StudentDraft::from(&existing);
            apply_student_args(&mut draft, fields)?;
            let student = students::update_student(store, tables, target, &draft).await?;
            println!("✅ Updated student {} [{}]", student.name, student.id);
        }
        "delete-student" => {
            let existing = students::get_student_by_id(store, tables, target).await?;
            students::delete_student(store, tables, target).await?;
            println!("✅ Deleted student {}", existing.name);
            if !existing.lessons.is_empty() {
                println!("   Their {} lesson(s) were kept.", existing.lessons.len());
            }
        }
        "add-lesson" => {
            let Some((date, fields)) = fields.split_first() else {
                return Ok(print_usage());
            };
            let student = students::get_student_by_id(store, tables, target).await?;
            let mut draft = LessonDraft::new(student.id.as_str(), parse_date(date)?);
            apply_lesson_args(&mut draft, fields)?;
            let lesson = lessons::create_lesson(store, tables, &draft).await?;
            println!("✅ Added lesson for {} on {} [{}]", student.name, lesson.date, lesson.id);
        }
        "edit-lesson" => {
            let existing = lessons::get_lesson_by_id(store, tables, target).await?;
            let mut draft = LessonDraft::from(&existing);
            apply_lesson_args(&mut draft, fields)?;
            let lesson = lessons::update_lesson(store, tables, target, &draft).await?;
            println!("✅ Updated lesson on {} [{}]", lesson.date, lesson.id);
        }
        "delete-lesson" => {
            lessons::delete_lesson(store, tables, target).await?;
            println!("✅ Deleted lesson {target}");
        }
        _ => return Ok(print_usage()),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_listing(listing: &LessonListing, currency: &str) {
    let lesson = &listing.lesson;
    println!(
        "  {}  {:<24} {:>4} min  {:<12} {}{}",
        lesson.date.format("%b %d, %Y"),
        listing.display_student_name(),
        lesson.duration_minutes,
        lesson.subject.as_deref().unwrap_or("-"),
        lesson.payment().status.label(currency),
        lesson
            .reference
            .as_deref()
            .map(|reference| format!("  [{reference}]"))
            .unwrap_or_default(),
    );
}

fn print_student(student: &Student, currency: &str) {
    let summary = summarize_student(student);
    println!("{}", student.name);
    for (label, value) in [
        ("Grade", &student.grade),
        ("Email", &student.email),
        ("Phone", &student.phone),
        ("Guardian", &student.guardian_name),
        ("Guardian phone", &student.guardian_phone),
    ] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    println!(
        "  Lessons: {}  Outstanding: {}  Revenue: {}",
        summary.total_lessons,
        format_amount(currency, summary.outstanding_balance),
        format_amount(currency, summary.total_revenue)
    );
    for lesson in &student.lessons {
        let listing = LessonListing {
            lesson: lesson.clone(),
            student_name: Some(student.name.clone()),
        };
        print_listing(&listing, currency);
    }
}

/// Fills an in-memory store with a few students and lessons covering every payment state.
async fn seed_demo_data(store: &MemoryStore, tables: &TableNames) -> Result<()> {
    let date = |day: u32| {
        NaiveDate::from_ymd_opt(2025, 3, day).ok_or_else(|| Error::Validation {
            message: format!("invalid demo date: day {day}"),
        })
    };

    let mut ayesha = StudentDraft::named("Ayesha Patel");
    ayesha.grade = Some("Grade 11".to_string());
    ayesha.email = Some("ayesha@example.com".to_string());
    let ayesha = students::create_student(store, tables, &ayesha).await?;

    let mut johan = StudentDraft::named("Johan Botha");
    johan.guardian_name = Some("Marike Botha".to_string());
    let johan = students::create_student(store, tables, &johan).await?;

    let demo_lessons = [
        (&ayesha.id, 3, Some("Mathematics"), Some(300.0), Some(300.0), false),
        (&ayesha.id, 10, Some("Mathematics"), Some(300.0), Some(150.0), false),
        (&johan.id, 12, Some("Physical Science"), Some(250.0), None, false),
        (&johan.id, 5, None, None, None, true),
    ];
    for (student_id, day, subject, amount_due, amount_paid, is_paid) in demo_lessons {
        let draft = LessonDraft {
            subject: subject.map(str::to_string),
            amount_due,
            amount_paid,
            is_paid,
            ..LessonDraft::new(student_id.as_str(), date(day)?)
        };
        lessons::create_lesson(store, tables, &draft).await?;
    }
    info!("Seeded demo data");
    Ok(())
}
