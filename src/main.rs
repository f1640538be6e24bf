use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use clinic_schedule::api::ScheduleClient;
use clinic_schedule::builder::BuilderState;
use clinic_schedule::calendar::{date_key, DateRange};
use clinic_schedule::config::Config;
use clinic_schedule::error::Result;
use clinic_schedule::reconstruct::working_hours;
use clinic_schedule::schedule::compose;
use clinic_schedule::session::BuilderSession;
use clinic_schedule::slots::SlotType;
use clinic_schedule::time::TimeOfDay;
use clinic_schedule::util::{day_label, format_minutes, truncate};

#[derive(Parser)]
#[command(name = "clinic_schedule")]
#[command(about = "Build and edit recurring doctor appointment schedules")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List doctors from the directory
    Doctors {
        /// Only show doctors in this department
        #[arg(short, long)]
        department: Option<String>,
    },
    /// List stored schedules
    Schedules,
    /// Show the days and slots the given parameters produce
    Preview {
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Create a schedule for a doctor
    Create {
        /// Doctor ID
        doctor: String,
        #[command(flatten)]
        build: BuildArgs,
        /// Print the payload instead of saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Load a doctor's stored schedule, adjust it and optionally save it again
    Edit {
        /// Doctor ID
        doctor: String,
        #[command(flatten)]
        build: BuildArgs,
        /// Save the edited schedule
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Days to leave out, comma separated
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<NaiveDate>,
    /// Start of working hours (HH:MM)
    #[arg(long)]
    start: Option<TimeOfDay>,
    /// End of working hours (HH:MM)
    #[arg(long)]
    end: Option<TimeOfDay>,
    /// Slot length in minutes (10, 15, 20 or 30)
    #[arg(long)]
    duration: Option<u32>,
    /// Number of consecutive break slots
    #[arg(long)]
    breaks: Option<usize>,
    /// Index of the slot the break starts at
    #[arg(long)]
    break_at: Option<usize>,
}

impl BuildArgs {
    fn apply(&self, state: &mut BuilderState) -> Result<()> {
        if self.from.is_some() || self.to.is_some() {
            state.set_date_range(DateRange {
                from: self.from.or(state.date_range.from),
                to: self.to.or(state.date_range.to),
            });
        }
        for date in &self.exclude {
            state.set_excluded(*date, true);
        }
        if self.start.is_some() || self.end.is_some() {
            state.set_working_hours(
                self.start.unwrap_or(state.day_start),
                self.end.unwrap_or(state.day_end),
            );
        }
        if let Some(duration) = self.duration {
            state.set_slot_duration(duration)?;
        }
        if let Some(breaks) = self.breaks {
            state.set_break_count(breaks);
        }
        if let Some(index) = self.break_at {
            state.select_slot(index);
        }
        Ok(())
    }
}

fn print_preview(state: &BuilderState) {
    let view = state.derive_view();

    match state.date_range.bounds() {
        Some((from, to)) => println!("\nRange: {} - {}", day_label(from), day_label(to)),
        None => println!("\nRange: not selected"),
    }
    println!(
        "Hours: {} - {}, {} slots",
        state.day_start,
        state.day_end,
        format_minutes(state.slot_duration_minutes)
    );

    println!("\n{:<20} {:<10}", "Day", "Included");
    println!("{}", "-".repeat(31));
    for day in &view.days {
        println!(
            "{:<20} {:<10}",
            day_label(day.date),
            if day.excluded { "no" } else { "yes" }
        );
    }

    println!("\n{:<6} {:<14} {:<10}", "Index", "Time", "Type");
    println!("{}", "-".repeat(31));
    for (index, slot) in view.slots.iter().enumerate() {
        let kind = match slot.slot_type {
            SlotType::Available => "available",
            SlotType::Break => "break",
        };
        println!(
            "{:<6} {:<14} {:<10}",
            index,
            format!("{}-{}", slot.start_time, slot.end_time),
            kind
        );
    }

    println!(
        "\n{} of {} days included, {} slots per day",
        view.included_day_count(),
        view.days.len(),
        view.slots.len()
    );
}

fn report(session: &BuilderSession) {
    if let Some(note) = session.notification() {
        if note.is_error {
            error!("{}", note.message);
        } else {
            info!("{}", note.message);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("clinic_schedule=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let client = ScheduleClient::new(&config.api)?;
    let defaults = BuilderState::from_defaults(&config.builder);

    match cli.command {
        Commands::Doctors { department } => {
            info!("Fetching doctor directory...");
            let mut session = BuilderSession::new(client, defaults);
            session.load_directory().await;
            report(&session);
            session.select_department(department);

            let doctors = session.doctors_in_department();
            if doctors.is_empty() {
                println!("\nNo doctors found.");
            } else {
                println!("\n{:<12} {:<30} {:<20}", "ID", "Name", "Department");
                println!("{}", "-".repeat(64));

                for doctor in doctors {
                    let department = session
                        .departments()
                        .iter()
                        .find(|d| d.id == doctor.department_id)
                        .map(|d| d.name.as_str())
                        .unwrap_or(doctor.department_id.as_str());
                    println!(
                        "{:<12} {:<30} {:<20}",
                        truncate(&doctor.id, 12),
                        truncate(&doctor.name, 28),
                        truncate(department, 20)
                    );
                }
            }
        }
        Commands::Schedules => {
            info!("Fetching schedules...");
            let schedules = client.list_schedules().await?;

            if schedules.is_empty() {
                println!("\nNo schedules stored.");
            } else {
                println!(
                    "\n{:<12} {:<12} {:<12} {:<6} {:<14} {:<8} {:<8}",
                    "Doctor", "From", "To", "Days", "Hours", "Slots", "Breaks"
                );
                println!("{}", "-".repeat(78));

                for schedule in schedules {
                    let (from, to) = match schedule.date_span() {
                        Some((from, to)) => (date_key(from), date_key(to)),
                        None => ("-".to_string(), "-".to_string()),
                    };
                    let hours = schedule
                        .days
                        .iter()
                        .min_by_key(|d| d.date)
                        .and_then(working_hours)
                        .map(|(start, end)| format!("{}-{}", start, end))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<12} {:<12} {:<12} {:<6} {:<14} {:<8} {:<8}",
                        truncate(&schedule.doctor, 12),
                        from,
                        to,
                        schedule.days.len(),
                        hours,
                        schedule.slot_count(),
                        schedule.break_slot_count()
                    );
                }
            }
        }
        Commands::Preview { build } => {
            let mut state = defaults;
            build.apply(&mut state)?;
            print_preview(&state);
        }
        Commands::Create {
            doctor,
            build,
            dry_run,
        } => {
            let mut session = BuilderSession::new(client, defaults);
            session.select_doctor(Some(doctor.clone()));
            build.apply(session.state_mut())?;
            print_preview(session.state());

            if dry_run {
                let schedule = compose(session.state(), Some(doctor.as_str()))?;
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                info!("Saving schedule for doctor {}...", doctor);
                let result = session.save().await;
                report(&session);
                result?;
            }
        }
        Commands::Edit {
            doctor,
            build,
            save,
        } => {
            info!("Loading schedule for doctor {}...", doctor);
            let mut session = BuilderSession::new(client, defaults);
            session.open_edit(&doctor).await;
            report(&session);
            session.clear_notification();

            build.apply(session.state_mut())?;
            print_preview(session.state());

            if save {
                info!("Saving edited schedule for doctor {}...", doctor);
                let result = session.save().await;
                report(&session);
                result?;
            }
        }
    }

    Ok(())
}
