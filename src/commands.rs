use std::fmt::Write as _;

use chrono::{TimeZone, Timelike};
use color_eyre::eyre::{bail, eyre, Result};
use sesplan_client::actions::AvailabilityActions;
use sesplan_client::api::Pagination;
use sesplan_client::auth::AuthSession;
use sesplan_client::config::ClientConfig;
use sesplan_client::middleware::auth::TokenStore;
use sesplan_client::my_availability::MyAvailability;
use sesplan_core::availability::grid::GridIndex;
use sesplan_core::availability::selection::{SelectionIntent, SelectionState};
use sesplan_core::availability::slot_keys::SlotKeySelection;
use sesplan_core::availability::{time_increment, GridCell};
use sesplan_core::models::user::LoginCredentials;
use tracing::warn;

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M";

async fn require_session(config: ClientConfig) -> Result<AuthSession> {
    AuthSession::restore(config)
        .await?
        .ok_or_else(|| eyre!("Not logged in, run `sesplan login` first"))
}

pub async fn login(config: ClientConfig, username: String, password: String) -> Result<()> {
    let credentials = LoginCredentials { username, password };
    let session = AuthSession::login(config, &credentials).await?;
    println!("Logged in as {} <{}>", session.user().username, session.user().email);
    Ok(())
}

pub async fn logout(config: ClientConfig) -> Result<()> {
    let store = TokenStore::new(config.token_path.clone());
    match AuthSession::restore(config).await {
        Ok(Some(session)) => session.logout()?,
        Ok(None) => {}
        Err(e) => {
            warn!("Could not verify the stored token: {}", e);
            store.clear()?;
        }
    }
    println!("Logged out");
    Ok(())
}

pub async fn whoami(config: ClientConfig) -> Result<()> {
    let session = require_session(config).await?;
    let user = session.user();
    println!("#{} {} <{}>", user.id, user.username, user.email);
    Ok(())
}

pub async fn sessions(config: ClientConfig, campaign: Option<i64>) -> Result<()> {
    let session = require_session(config).await?;
    let sessions = match campaign {
        Some(campaign_id) => session.client().sessions_by_campaign(campaign_id).await?,
        None => session.client().my_sessions().await?,
    };

    if sessions.is_empty() {
        println!("No sessions");
    }
    for s in sessions {
        match s.date_time {
            Some(date_time) => println!("#{} {} ({})", s.id, s.title, date_time),
            None => println!("#{} {}", s.id, s.title),
        }
    }
    Ok(())
}

pub async fn slots(config: ClientConfig, session_id: i64) -> Result<()> {
    let tz = config.timezone;
    let session = require_session(config).await?;
    let slots = session
        .client()
        .session_slots(session_id, Pagination::default())
        .await?;

    if slots.is_empty() {
        println!("No slots");
    }
    for slot in slots {
        match slot.window() {
            Ok((from, to)) => println!(
                "#{} {} - {} ({} available)",
                slot.id,
                from.with_timezone(&tz).format(LOCAL_FORMAT),
                to.with_timezone(&tz).format(LOCAL_FORMAT),
                slot.user_availabilities.len()
            ),
            Err(e) => warn!("Slot {} has an invalid window: {}", slot.id, e),
        }
    }
    Ok(())
}

async fn load_grid<Tz: TimeZone>(session: &AuthSession, session_id: i64, tz: Tz) -> Result<GridIndex<Tz>> {
    let client = session.client();
    let slots = client.session_slots(session_id, Pagination::default()).await?;
    let availabilities = client.session_availabilities(session_id).await?;
    Ok(GridIndex::build(&slots, &availabilities, session.user().id, tz))
}

pub async fn grid(config: ClientConfig, session_id: i64) -> Result<()> {
    let tz = config.timezone;
    let session = require_session(config).await?;
    let index = load_grid(&session, session_id, tz).await?;

    if index.days().is_empty() {
        println!("This session has no slots yet");
        return Ok(());
    }
    print!("{}", render_grid(&index));
    Ok(())
}

/// Draws the grid: `.` outside any slot, `*` where the acting user is
/// available, otherwise the number of available users.
pub fn render_grid<Tz: TimeZone>(index: &GridIndex<Tz>) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:>5}", "");
    for day in index.days() {
        let _ = write!(out, " {:>10}", day.label);
    }
    out.push('\n');

    for time in index.time_slots() {
        let _ = write!(out, "{}", time.format("%H:%M"));
        for day in index.days() {
            let symbol = if !index.is_active_cell(day.date, *time) {
                ".".to_string()
            } else if index.is_user_available(day.date, *time, index.acting_user_id()) {
                "*".to_string()
            } else {
                match index.available_users_count(day.date, *time) {
                    count @ 0..=9 => count.to_string(),
                    _ => "+".to_string(),
                }
            };
            let _ = write!(out, " {:>10}", symbol);
        }
        out.push('\n');
    }
    out
}

pub async fn mark(
    config: ClientConfig,
    session_id: i64,
    from: &str,
    to: &str,
    intent: SelectionIntent,
) -> Result<()> {
    let from: GridCell = from.parse()?;
    let to: GridCell = to.parse()?;

    let tz = config.timezone;
    let session = require_session(config).await?;
    let index = load_grid(&session, session_id, tz).await?;

    let mut state = SelectionState::new();
    state.start(from, intent, &index);
    state.update(from, to, &index.dates(), index.time_slots(), &index)?;
    let label = state.label();
    let selection = state
        .finish()
        .ok_or_else(|| eyre!("Selection ended before it started"))?;

    if selection.cells.is_empty() {
        bail!("No cell between {} and {} belongs to the slot under {}", from, to, from);
    }

    let mut actions = AvailabilityActions::new();
    let report = actions
        .process_selection(session.client(), session_id, &selection, &tz)
        .await?;

    println!(
        "{}: {} ({} intervals, {} already present)",
        actions.success_message().unwrap_or("Done"),
        label,
        report.submitted,
        report.conflicts
    );
    Ok(())
}

async fn load_mine(session: &AuthSession, session_id: i64) -> Result<MyAvailability> {
    let mut mine = MyAvailability::new(Some(session_id));
    if !mine.fetch(session.client()).await {
        bail!(
            "Could not load your availability: {}",
            mine.load_error().unwrap_or("invalid session")
        );
    }
    Ok(mine)
}

pub async fn mine(config: ClientConfig, session_id: i64) -> Result<()> {
    let tz = config.timezone;
    let session = require_session(config).await?;
    let mine = load_mine(&session, session_id).await?;

    if mine.availabilities().is_empty() {
        println!("No availability declared");
    }
    for avail in mine.availabilities() {
        match avail.window() {
            Ok((from, to)) => println!(
                "{} - {}",
                from.with_timezone(&tz).format(LOCAL_FORMAT),
                to.with_timezone(&tz).format(LOCAL_FORMAT)
            ),
            Err(e) => warn!("Availability {} has an invalid window: {}", avail.id, e),
        }
    }
    Ok(())
}

pub async fn toggle(config: ClientConfig, session_id: i64, cells: &[String]) -> Result<()> {
    let tz = config.timezone;
    let session = require_session(config).await?;
    let mut mine = load_mine(&session, session_id).await?;

    let mut selection = SlotKeySelection::from_availabilities(tz, time_increment(), mine.availabilities());
    for key in cells {
        let cell: GridCell = key.parse()?;
        selection.toggle(cell.date, cell.time.hour() * 60 + cell.time.minute());
    }

    let blocks = selection.blocks();
    let count = blocks.len();
    if !mine.save(session.client(), blocks).await {
        bail!(
            "Could not save your availability: {}",
            mine.save_error().unwrap_or("invalid session")
        );
    }
    println!("Saved {} availability blocks", count);
    Ok(())
}

pub async fn clear_mine(config: ClientConfig, session_id: i64) -> Result<()> {
    let session = require_session(config).await?;
    let mut mine = MyAvailability::new(Some(session_id));
    if !mine.clear_on_server(session.client()).await {
        bail!(
            "Could not delete your availability: {}",
            mine.save_error().unwrap_or("invalid session")
        );
    }
    println!("Availability cleared");
    Ok(())
}
