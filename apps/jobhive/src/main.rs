mod browse;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobhive::api_client::ApiClient;
use jobhive::config::Config;
use jobhive::errors::AppError;
use jobhive::listings::display::{posted_label, render_line, status_label};
use jobhive::listings::overlay::JobView;
use jobhive::listings::{DisplayMode, FilterDefaults, JobBoard, SeekerList};
use jobhive::models::user::{User, UserRole};
use jobhive::notice::Notice;
use jobhive::session::{self, SessionStore};

#[derive(Parser)]
#[command(name = "jobhive")]
#[command(about = "Browse JobHive listings, apply and save jobs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List jobs, newest first
    Jobs(JobsArgs),
    /// Filter interactively, one command per line
    Browse(JobsArgs),
    /// Show one job in full
    Show { job_id: i64 },
    /// Apply to a job with your saved resume
    Apply { job_id: i64 },
    /// Save a job, or unsave it if already saved
    Save { job_id: i64 },
    /// Jobs you applied to
    Applied,
    /// Jobs you saved
    Saved,
    /// Start sign-up; a verification code is emailed to you
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value_t = AccountType::Student)]
        account_type: AccountType,
    },
    /// Finish sign-up with the emailed code
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
}

#[derive(Clone, Copy, ValueEnum)]
enum AccountType {
    Student,
    Employer,
}

impl From<AccountType> for UserRole {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Student => UserRole::JobSeeker,
            AccountType::Employer => UserRole::Employer,
        }
    }
}

#[derive(Args)]
struct JobsArgs {
    /// e.g. "dubai" (substring of the job location)
    #[arg(long)]
    location: Option<String>,
    /// full-time, part-time, internship, contract, freelance
    #[arg(long)]
    job_type: Option<String>,
    /// entry or internship
    #[arg(long)]
    experience: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    /// Matches title, company, location or skills
    #[arg(long)]
    search: Option<String>,
    /// Required skill; repeat for several (all must match)
    #[arg(long = "skill")]
    skills: Vec<String>,
    /// Show every match instead of the latest six
    #[arg(long)]
    all: bool,
}

impl JobsArgs {
    fn defaults(&self) -> FilterDefaults {
        FilterDefaults {
            location: self.location.clone(),
            job_type: self.job_type.clone(),
            experience: self.experience.clone(),
            industry: self.industry.clone(),
            search: self.search.clone(),
            skills: (!self.skills.is_empty()).then(|| self.skills.clone()),
        }
    }

    fn mode(&self) -> DisplayMode {
        if self.all {
            DisplayMode::FullPage
        } else {
            DisplayMode::Summary
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("JobHive client v{} against {}", env!("CARGO_PKG_VERSION"), config.api_base);

    let api = Arc::new(
        ApiClient::new(config.api_base.clone(), config.http_timeout, config.save_id_key)
            .map_err(AppError::from)?,
    );
    let store = SessionStore::new(config.session_path.clone());
    let session = store.load().await?;
    let board_for = |defaults: FilterDefaults, mode: DisplayMode| {
        JobBoard::new(
            api.clone(),
            session.clone(),
            defaults,
            mode,
            config.search_debounce,
        )
    };

    let outcome = match cli.command {
        Command::Jobs(args) => {
            let mut board = board_for(args.defaults(), args.mode());
            board.load().await;
            print_listing(&board);
            Ok(None)
        }
        Command::Browse(args) => {
            let mut board = board_for(args.defaults(), args.mode());
            browse::run(&mut board).await?;
            Ok(None)
        }
        Command::Show { job_id } => {
            let mut board = board_for(FilterDefaults::default(), DisplayMode::FullPage);
            board.show(job_id).await.map(|view| {
                print_detail(&view);
                None
            })
        }
        Command::Apply { job_id } => {
            let mut board = board_for(FilterDefaults::default(), DisplayMode::FullPage);
            board.apply(job_id).await.map(Some)
        }
        Command::Save { job_id } => {
            let mut board = board_for(FilterDefaults::default(), DisplayMode::FullPage);
            board.toggle_save(job_id).await.map(Some)
        }
        Command::Applied => {
            let mut board = board_for(FilterDefaults::default(), DisplayMode::FullPage);
            board
                .seeker_jobs(SeekerList::Applied)
                .await
                .map(|views| print_seeker_jobs(&views, "You have not applied to any jobs yet."))
        }
        Command::Saved => {
            let mut board = board_for(FilterDefaults::default(), DisplayMode::FullPage);
            board
                .seeker_jobs(SeekerList::Saved)
                .await
                .map(|views| print_seeker_jobs(&views, "You have no saved jobs."))
        }
        Command::Register {
            name,
            email,
            password,
            account_type,
        } => session::register(api.as_ref(), &name, &email, &password, account_type.into())
            .await
            .map(Some),
        Command::Verify { email, code } => session::verify_email(api.as_ref(), &store, &email, &code)
            .await
            .map(|s| {
                Some(Notice::info(
                    "Email Verified",
                    format!("Your account is ready, {}.", display_name(&s.user)),
                ))
            }),
        Command::Login { email, password } => {
            session::login(api.as_ref(), &store, &email, &password)
                .await
                .map(|s| {
                    Some(Notice::info(
                        "Signed In",
                        format!("Welcome back, {}.", display_name(&s.user)),
                    ))
                })
        }
        Command::Logout => store.clear().await.map(|()| {
            Some(Notice::info(
                "Signed Out",
                format!("Removed {}.", store.path().display()),
            ))
        }),
    };

    Ok(if report(outcome) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn display_name(user: &User) -> &str {
    if user.name.is_empty() {
        &user.email
    } else {
        &user.name
    }
}

fn print_listing(board: &JobBoard) {
    let views = board.view();
    if views.is_empty() {
        println!("No matching jobs found. Try adjusting your filters to find more opportunities.");
        return;
    }

    let now = Utc::now();
    println!(
        "Showing {} of {} matching jobs",
        views.len(),
        board.controller().match_count()
    );
    for view in &views {
        println!("{}", render_line(view, now));
    }
}

fn print_seeker_jobs(views: &[JobView], empty: &str) -> Option<Notice> {
    if views.is_empty() {
        println!("{empty}");
        return None;
    }
    let now = Utc::now();
    for view in views {
        println!("{}", render_line(view, now));
    }
    None
}

fn print_detail(view: &JobView) {
    let job = &view.job;
    println!("{} (#{})", job.title, job.id);
    if !job.company.is_empty() {
        println!("  Company:  {}", job.company);
    }
    let remote = if job.is_remote { " (remote)" } else { "" };
    println!("  Location: {}{remote}", job.location);
    println!("  Type:     {}", job.job_type);
    if !job.salary.is_empty() {
        println!("  Salary:   {}", job.salary);
    }
    println!("  Status:   {}", status_label(job.status.as_ref()));
    println!("  {}", posted_label(job.posted_date.as_deref(), Utc::now()));
    if let Some(deadline) = &job.deadline {
        println!("  Apply by: {deadline}");
    }
    if !job.skills.is_empty() {
        println!("  Skills:   {}", job.skills.join(", "));
    }
    if view.is_applied {
        println!("  You have applied to this job.");
    }
    if view.is_saved {
        println!("  Saved.");
    }
    if let Some(description) = job.description.as_deref().filter(|d| !d.trim().is_empty()) {
        println!("\n{description}");
    }
}

/// Prints the outcome; returns whether it succeeded.
fn report(outcome: Result<Option<Notice>, AppError>) -> bool {
    match outcome {
        Ok(Some(notice)) => {
            println!("{notice}");
            true
        }
        Ok(None) => true,
        Err(e) => {
            eprintln!("{}", e.notice());
            if let Some(route) = e.redirect() {
                eprintln!("Sign in first with `jobhive login` ({route}).");
            }
            false
        }
    }
}
