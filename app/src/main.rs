//! CLI demo driving the ticketing core end to end.
//!
//! Walks the full lifecycle: fetch the seeded data, sign in, submit a
//! ticket, triage it, discuss it, resolve it, rate it, then render the
//! derived views.

use std::time::Duration;

use accesstrack::app::App;
use accesstrack::auth::{self, Permission};
use accesstrack::config::Config;
use accesstrack::slices::notifications::NotificationsAction;
use accesstrack::slices::tickets::TicketsAction;
use accesstrack::slices::users::UsersAction;
use accesstrack::types::{NewTicket, Rating, Severity, TicketPriority, TicketStatus, UserId};
use accesstrack::views::{ExportScope, TicketQuery, export_csv, priority_counts, status_counts};

const OP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .init();

    println!("=== Accesstrack Demo ===\n");
    let app = App::from_config(&config);

    // Initial data load
    let mut handle = app.tickets.send(TicketsAction::FetchTickets).await?;
    handle.wait().await;
    let mut handle = app.users.send(UsersAction::FetchUsers).await?;
    handle.wait().await;

    let ticket_count = app.tickets.state(|s| s.tickets.len()).await;
    let user_count = app.users.state(|s| s.users.len()).await;
    println!("Loaded {ticket_count} tickets and {user_count} users");

    // Sign in as the admin
    let mut handle = app
        .users
        .send(UsersAction::FetchUser { id: UserId::new(1) })
        .await?;
    handle.wait().await;
    let current_user = app.users.state(|s| s.current_user.clone()).await;
    match &current_user {
        Some(user) => println!("Signed in as {} ({})", user.name, user.role),
        None => println!("Sign-in failed"),
    }

    // Submit a new ticket, optionally enhancing the description first
    let mut description =
        "The search results page cannot be operated with a keyboard.".to_string();
    if let Some(assist) = &app.assist {
        description = assist.enhance_description(&description).await;
    }

    let submitted = app
        .tickets
        .send_and_wait_for(
            TicketsAction::SubmitTicket {
                submission: NewTicket {
                    title: "Keyboard trap in search results".to_string(),
                    description,
                    location: "Search".to_string(),
                    priority: TicketPriority::High,
                    reported_by: UserId::new(2),
                },
            },
            |a| {
                matches!(
                    a,
                    TicketsAction::TicketSubmitted { .. } | TicketsAction::OperationFailed { .. }
                )
            },
            OP_TIMEOUT,
        )
        .await?;

    let TicketsAction::TicketSubmitted { ticket } = submitted else {
        anyhow::bail!("ticket submission failed");
    };
    println!("\nSubmitted ticket #{}: {}", ticket.id, ticket.title);
    app.notifications
        .send(NotificationsAction::Add {
            message: format!("Ticket #{} submitted", ticket.id),
            severity: Severity::Success,
        })
        .await?;

    // Triage: assign, move through the lifecycle, discuss
    let admin = UserId::new(1);
    let mut handle = app
        .tickets
        .send(TicketsAction::AssignUser {
            ticket_id: ticket.id,
            user_id: admin,
        })
        .await?;
    handle.wait().await;

    for status in [TicketStatus::InProgress, TicketStatus::Resolved] {
        let mut handle = app
            .tickets
            .send(TicketsAction::UpdateStatus {
                ticket_id: ticket.id,
                status,
                actor: admin,
            })
            .await?;
        handle.wait().await;
    }

    let mut handle = app
        .tickets
        .send(TicketsAction::AddComment {
            ticket_id: ticket.id,
            author: admin,
            content: "Focus order fixed and tab loop removed.".to_string(),
        })
        .await?;
    handle.wait().await;

    let mut handle = app
        .tickets
        .send(TicketsAction::SubmitRating {
            ticket_id: ticket.id,
            rating: Rating::try_new(5)?,
            feedback: "Fast turnaround".to_string(),
        })
        .await?;
    handle.wait().await;

    let resolved = app
        .tickets
        .state(|s| s.get(ticket.id).cloned())
        .await
        .ok_or_else(|| anyhow::anyhow!("submitted ticket missing from state"))?;
    println!(
        "Ticket #{} is now {} with {} status changes, {} comment(s), rating {:?}",
        resolved.id,
        resolved.status,
        resolved.status_history.len(),
        resolved.comments.len(),
        resolved.rating.map(Rating::value),
    );

    // Derived views over the final state
    let tickets = app.tickets.state(|s| s.tickets.clone()).await;

    println!("\nTicket list (newest first):");
    for t in TicketQuery::default().apply(&tickets) {
        println!("  #{} [{}/{}] {}", t.id, t.status, t.priority, t.title);
    }

    println!("\nDashboard:");
    for (status, count) in status_counts(&tickets) {
        println!("  {status}: {count}");
    }
    for (priority, count) in priority_counts(&tickets) {
        println!("  {priority}: {count}");
    }

    if auth::can(current_user.as_ref(), Permission::ExportData) {
        println!("\nCSV export (resolved tickets):");
        println!("{}", export_csv(&tickets, ExportScope::Resolved));
    } else {
        println!("\nCurrent user may not export data");
    }

    let unread = app.notifications.state(|s| s.unread_count()).await;
    println!("\nUnread notifications: {unread}");

    // Graceful shutdown
    app.tickets.shutdown(OP_TIMEOUT).await?;
    app.users.shutdown(OP_TIMEOUT).await?;
    app.notifications.shutdown(OP_TIMEOUT).await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}
