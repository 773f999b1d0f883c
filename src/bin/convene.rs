use anyhow::Result;
use chrono::NaiveDateTime;
use convene::cli;
use convene::config::{Config, DateStyle};
use convene::context::{AppContext, StandardContext};
use convene::controller::RecordController;
use convene::model::fields::{format_display, format_storage, parse_date_time};
use convene::model::{
    Appointment, AppointmentFilter, Email, Event, EventId, Name, Phone, Profile, ProfileId,
    Reason, Tag, Telegram, Title,
};
use convene::storage::LocalStorage;
use convene::store::RecordStore;
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    TermLogger::init(
        LevelFilter::Warn,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let args: Vec<String> = env::args().collect();

    // Split options from positional arguments.
    let mut root_override: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => {
                cli::print_help("convene");
                return Ok(());
            }
            "-r" | "--root" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--root requires a directory argument"))?;
                root_override = Some(PathBuf::from(value));
            }
            other => positional.push(other.to_string()),
        }
    }

    let ctx = StandardContext::new(root_override);

    match positional.first().map(String::as_str) {
        // Bare invocation behaves like `list`.
        None | Some("list") => {
            let scope = positional.get(1).map(String::as_str).unwrap_or("all");
            run_list(&ctx, scope)
        }
        Some("seed") => run_seed(&ctx),
        Some("export") => run_export(&ctx),
        Some(other) => anyhow::bail!("Unknown command: {} (try --help)", other),
    }
}

/// Missing config is normal on first run; anything else is a real error.
fn load_config(ctx: &dyn AppContext) -> Result<Config> {
    match Config::load(ctx) {
        Ok(config) => Ok(config),
        Err(err) if Config::is_missing_config_error(&err) => {
            log::info!(
                "No config at {}; using defaults",
                Config::get_path_string(ctx)?
            );
            Ok(Config::default())
        }
        Err(err) => Err(err),
    }
}

fn render_date(config: &Config, date_time: NaiveDateTime) -> String {
    match config.date_style {
        DateStyle::Friendly => format_display(&date_time),
        DateStyle::Iso => format_storage(&date_time),
    }
}

fn describe_event_id(config: &Config, id: &EventId) -> String {
    format!(
        "{} ({} - {})",
        id.title(),
        render_date(config, id.start()),
        render_date(config, id.end())
    )
}

fn run_list(ctx: &dyn AppContext, scope: &str) -> Result<()> {
    let config = load_config(ctx)?;
    let store = LocalStorage::load(ctx)?;
    let mut controller = RecordController::new(store);
    if config.hide_marked_appointments {
        controller
            .set_appointment_filter(AppointmentFilter::Not(Box::new(AppointmentFilter::Marked)));
    }

    match scope {
        "all" => {
            print_profiles(&config, &controller);
            println!();
            print_events(&config, &controller);
            println!();
            print_appointments(&config, &controller);
        }
        "profiles" => print_profiles(&config, &controller),
        "events" => print_events(&config, &controller),
        "appointments" => print_appointments(&config, &controller),
        other => anyhow::bail!("Unknown list scope: {} (try --help)", other),
    }
    Ok(())
}

fn print_profiles(config: &Config, controller: &RecordController) {
    let profiles = controller.filtered_profiles();
    println!("Profiles ({}):", profiles.len());
    for (index, profile) in profiles.iter().enumerate() {
        println!("{:>3}. {}", index + 1, profile);
        for event_id in profile.events_attending() {
            println!("     - {}", describe_event_id(config, event_id));
        }
    }
}

fn print_events(config: &Config, controller: &RecordController) {
    let mut events = controller.filtered_events();
    if config.sort_events_by_start {
        events.sort_by_key(|event| event.start());
    }
    println!("Events ({}):", events.len());
    for (index, event) in events.iter().enumerate() {
        let mut line = format!(
            "{:>3}. {}; From: {}; To: {}",
            index + 1,
            event.title(),
            render_date(config, event.start()),
            render_date(config, event.end())
        );
        if !event.tags().is_empty() {
            line.push_str("; Tags: ");
            for tag in event.tags() {
                line.push_str(&format!("[{}]", tag));
            }
        }
        println!("{}", line);
        for attendee in event.attendees() {
            println!("     - {}", attendee.name());
        }
    }
}

fn print_appointments(config: &Config, controller: &RecordController) {
    let appointments = controller.filtered_appointments();
    println!("Appointments ({}):", appointments.len());
    for (index, appointment) in appointments.iter().enumerate() {
        let marked = if appointment.is_marked() { " [done]" } else { "" };
        println!(
            "{:>3}. {} - {} on {}{}",
            index + 1,
            appointment.patient().name(),
            appointment.reason(),
            render_date(config, appointment.date_time()),
            marked
        );
    }
}

fn run_seed(ctx: &dyn AppContext) -> Result<()> {
    let records_path = ctx.get_records_file_path()?;
    if records_path.exists() {
        anyhow::bail!("Refusing to seed: {} already exists", records_path.display());
    }

    let store = sample_store()?;
    LocalStorage::save(ctx, &store)?;
    println!(
        "Wrote {} profiles, {} events and {} appointments to {}",
        store.profiles().len(),
        store.events().len(),
        store.appointments().len(),
        records_path.display()
    );

    match Config::load(ctx) {
        Ok(_) => {}
        Err(err) if Config::is_missing_config_error(&err) => {
            Config::default().save(ctx)?;
            println!("Wrote default config to {}", Config::get_path_string(ctx)?);
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

fn run_export(ctx: &dyn AppContext) -> Result<()> {
    println!("{}", LocalStorage::export_string(ctx)?);
    Ok(())
}

fn sample_store() -> Result<RecordStore> {
    let mut store = RecordStore::new();

    let profiles = [
        ("Alice Pauline", "94351253", "alice@example.com", "@alicep", vec!["friends"]),
        ("Benson Meier", "98765432", "benson@example.com", "", vec!["friends", "owesMoney"]),
        ("Carl Kurz", "95352563", "heinz@example.com", "", vec![]),
    ];
    for (name, phone, email, telegram, tags) in profiles {
        let telegram = if telegram.is_empty() {
            Telegram::none()
        } else {
            Telegram::new(telegram)?
        };
        let mut tag_set = BTreeSet::new();
        for tag in tags {
            tag_set.insert(Tag::new(tag)?);
        }
        store.add_profile(Profile::new(
            Name::new(name)?,
            Phone::new(phone)?,
            Email::new(email)?,
            telegram,
            tag_set,
        ))?;
    }

    let events = [
        ("Standup", "2022-10-12 09:00", "2022-10-12 09:30", vec!["work"]),
        ("Team lunch", "2022-10-12 12:00", "2022-10-12 13:00", vec![]),
    ];
    for (title, start, end, tags) in events {
        let mut tag_set = BTreeSet::new();
        for tag in tags {
            tag_set.insert(Tag::new(tag)?);
        }
        store.add_event(Event::new(
            Title::new(title)?,
            parse_date_time(start)?,
            parse_date_time(end)?,
            tag_set,
        )?)?;
    }

    let standup = store.events()[0].id();
    let alice = ProfileId::new(Name::new("Alice Pauline")?);
    let benson = ProfileId::new(Name::new("Benson Meier")?);
    store.add_attendees(&standup, &[alice.clone(), benson])?;

    store.book_appointment(Appointment::new(
        Reason::new("Dental checkup")?,
        parse_date_time("2022-10-14 16:30")?,
        false,
        alice,
    ))?;

    Ok(store)
}
