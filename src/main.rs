//! SEES command line client
//!
//! Main application entry point

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use sees_client::{
    api::{CheckoutOutcome, EventApi},
    config::Settings,
    models::{parse_timestamp, Event, EventType, ViewerRole},
    services::{ClassifiedEvents, ContentVisibilityFilter, UpdateState},
    state::ClientContext,
    utils::{helpers, logging},
};

#[derive(Parser)]
#[command(name = "sees")]
#[command(about = "SEES educational events client", long_about = None)]
struct Cli {
    /// Configuration file (TOML, extension optional)
    #[arg(long, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List your events grouped by role
    Events,
    /// List all your events in one deduplicated list
    Dashboard {
        /// Only show events matching this text
        #[arg(long)]
        search: Option<String>,
        /// Only show events of this type (in-person, virtual, hybrid)
        #[arg(long = "type")]
        event_type: Option<EventType>,
        /// Only show events that have not started yet, soonest first
        #[arg(long)]
        upcoming: bool,
    },
    /// Open an event and acknowledge its latest update
    Show {
        event_id: i64,
        /// Role to assume when it cannot be derived from membership
        #[arg(long)]
        role: Option<ViewerRole>,
    },
    /// Set a quiz's visibility (organizers only)
    ToggleQuiz {
        quiz_id: i64,
        event_id: i64,
        #[arg(action = clap::ArgAction::Set)]
        visible: bool,
    },
    /// Set a material's visibility (organizers only)
    ToggleMaterial {
        material_id: i64,
        event_id: i64,
        #[arg(action = clap::ArgAction::Set)]
        visible: bool,
    },
    /// Edit an event you organize
    Edit {
        event_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Start time, e.g. 2026-05-04T18:00
        #[arg(long)]
        date: Option<String>,
        #[arg(long = "type")]
        event_type: Option<EventType>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        virtual_location: Option<String>,
        /// Ticket price; 0 makes the event free
        #[arg(long)]
        price: Option<f64>,
    },
    /// Start or stop attending an event
    Attend { event_id: i64 },
    /// Buy a ticket or register for a free event
    Checkout { event_id: i64 },
    /// Show your profile
    Profile,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_file(&cli.config).context("loading configuration")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;
    info!("Starting {}", sees_client::info());

    let mut context = ClientContext::from_settings(settings)?;
    if let Some(profile) = context.resolve_viewer().await? {
        info!(user_id = profile.id, "Signed in as {}", profile.display_name());
    }

    match cli.command {
        Commands::Events => list_events(&context).await,
        Commands::Dashboard { search, event_type, upcoming } => {
            dashboard(&context, search.as_deref(), event_type, upcoming).await
        }
        Commands::Show { event_id, role } => show_event(&context, event_id, role).await,
        Commands::ToggleQuiz { quiz_id, event_id, visible } => {
            set_visibility(&context, event_id, quiz_id, visible, true).await
        }
        Commands::ToggleMaterial { material_id, event_id, visible } => {
            set_visibility(&context, event_id, material_id, visible, false).await
        }
        Commands::Edit {
            event_id,
            title,
            description,
            date,
            event_type,
            location,
            virtual_location,
            price,
        } => {
            let changes = EventChanges {
                title,
                description,
                date,
                event_type,
                location,
                virtual_location,
                price,
            };
            edit_event(&context, event_id, changes).await
        }
        Commands::Attend { event_id } => attend(&context, event_id).await,
        Commands::Checkout { event_id } => checkout(&context, event_id).await,
        Commands::Profile => {
            let profile = context.api.fetch_profile().await?;
            println!("{} <{}>", profile.display_name(), profile.email);
            if let Some(phone) = profile.phone {
                println!("Phone: {}", phone);
            }
            Ok(())
        }
    }
}

fn print_event_line(event: &Event) {
    let marker = if event.unread_update { " *" } else { "" };
    println!(
        "  [{}] {}{} | {} | {} | {}",
        event.id,
        event.title,
        marker,
        event.event_type.label(),
        helpers::format_event_date(event.date),
        helpers::format_price(event.ticket_price),
    );
}

async fn list_events(context: &ClientContext) -> Result<()> {
    let classified: ClassifiedEvents = context.services.load_my_events(&context.session).await?;

    for role in ViewerRole::ALL {
        let bucket = classified.bucket(role);
        println!("{} ({})", role.bucket_label(), bucket.len());
        for event in bucket {
            print_event_line(event);
        }
    }

    if classified.unread_count() > 0 {
        println!("{} event(s) have unread updates", classified.unread_count());
    }
    Ok(())
}

async fn dashboard(
    context: &ClientContext,
    search: Option<&str>,
    event_type: Option<EventType>,
    upcoming: bool,
) -> Result<()> {
    let catalog = context.services.load_catalog(&context.session).await?;

    let mut found = if upcoming {
        catalog.upcoming(Utc::now())
    } else {
        catalog.search("")
    };
    if let Some(query) = search {
        let matching: HashSet<i64> = catalog.search(query).iter().map(|e| e.id).collect();
        found.retain(|e| matching.contains(&e.id));
    }
    if let Some(event_type) = event_type {
        let of_type: HashSet<i64> = catalog.of_type(event_type).iter().map(|e| e.id).collect();
        found.retain(|e| of_type.contains(&e.id));
    }

    if found.is_empty() {
        println!("No events found.");
    }
    for event in found {
        print_event_line(event);
        if upcoming {
            if let Some(date) = event.date {
                println!("      starts {}", helpers::format_timestamp(date));
            }
        }
        if !event.description.is_empty() {
            println!("      {}", helpers::truncate_text(&event.description, 120));
        }
    }
    Ok(())
}

async fn show_event(context: &ClientContext, event_id: i64, role: Option<ViewerRole>) -> Result<()> {
    let detail = context.services.open_event(&context.session, event_id, role).await?;
    let event = &detail.event;

    println!("{} ({})", event.title, detail.role);
    println!("{}", event.description);
    println!("When:  {}", helpers::format_event_date(event.date));
    println!("Type:  {}", event.event_type.label());
    if let Some(location) = event.physical_location() {
        println!("Where: {}", location);
    }
    if let Some(link) = event.virtual_link() {
        println!("Link:  {}", link);
    }
    println!("Price: {}", helpers::format_price(event.ticket_price));

    println!("Quizzes:");
    for quiz in &event.quizzes {
        let hidden = if quiz.visible { "" } else { " (hidden)" };
        println!("  [{}] {} - {} question(s){}", quiz.id, quiz.title, quiz.questions.len(), hidden);
    }
    println!("Materials:");
    for material in &event.materials {
        let hidden = if material.visible { "" } else { " (hidden)" };
        println!("  [{}] {} ({}){}", material.id, material.name, material.file, hidden);
    }

    if let (UpdateState::Unread, Some(message)) = (detail.state, detail.acknowledge_error) {
        warn!("Could not mark event as viewed: {}", message);
    }
    Ok(())
}

async fn set_visibility(
    context: &ClientContext,
    event_id: i64,
    item_id: i64,
    visible: bool,
    is_quiz: bool,
) -> Result<()> {
    let mut event = context.api.fetch_event(event_id).await?;
    let role = context
        .session
        .role_on(&event)
        .context("you have no role on this event")?;

    if is_quiz {
        context
            .services
            .visibility
            .set_visibility(role, event_id, &mut event.quizzes, item_id, visible)
            .await?;
    } else {
        context
            .services
            .visibility
            .set_visibility(role, event_id, &mut event.materials, item_id, visible)
            .await?;
    }

    let shown = ContentVisibilityFilter::project(&event, ViewerRole::Attendee);
    println!(
        "Updated. Attendees now see {} quiz(zes) and {} material(s).",
        shown.quizzes.len(),
        shown.materials.len()
    );
    Ok(())
}

/// Field overrides given on the command line
struct EventChanges {
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
    event_type: Option<EventType>,
    location: Option<String>,
    virtual_location: Option<String>,
    price: Option<f64>,
}

async fn edit_event(context: &ClientContext, event_id: i64, changes: EventChanges) -> Result<()> {
    let mut event = context.api.fetch_event(event_id).await?;
    let editor = &context.services.editor;
    let mut edit = editor.open(&context.session, &mut event).await?;

    if let Some(message) = &edit.acknowledge_error {
        warn!("Could not mark event as viewed: {}", message);
    }

    let draft = &mut edit.draft;
    if let Some(title) = changes.title {
        draft.title = title;
    }
    if let Some(description) = changes.description {
        draft.description = description;
    }
    if let Some(raw) = changes.date {
        draft.date = Some(parse_timestamp(&raw).with_context(|| format!("unrecognised date: {}", raw))?);
    }
    if let Some(event_type) = changes.event_type {
        draft.event_type = event_type;
    }
    if let Some(location) = changes.location {
        draft.location = Some(location);
    }
    if let Some(link) = changes.virtual_location {
        draft.virtual_location = Some(link);
    }
    if let Some(price) = changes.price {
        draft.ticket_price = Some(price);
    }

    editor.save(&context.session, &mut event, &edit.draft).await?;
    println!("Updated {}.", event.title);
    print_event_line(&event);
    Ok(())
}

async fn attend(context: &ClientContext, event_id: i64) -> Result<()> {
    let mut event = context.api.fetch_event(event_id).await?;
    let attending = context
        .services
        .attendance
        .toggle_attendance(&context.session, &mut event)
        .await?;

    if attending {
        println!("You are attending {}.", event.title);
    } else {
        println!("You are no longer attending {}.", event.title);
    }
    Ok(())
}

async fn checkout(context: &ClientContext, event_id: i64) -> Result<()> {
    let mut event = context.api.fetch_event(event_id).await?;
    match context
        .services
        .attendance
        .checkout(&context.session, &mut event)
        .await?
    {
        CheckoutOutcome::Registered => println!("You have successfully registered for {}!", event.title),
        CheckoutOutcome::Redirect(url) => println!("Complete your payment at: {}", url),
    }
    Ok(())
}
