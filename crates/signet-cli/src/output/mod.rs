//! Output formatting utilities for the CLI
//!
//! Human-readable renderings of scopes, simulation transcripts, and the
//! orchestrator status, plus the colored message helpers every command
//! uses.

use tabled::{settings::Style, Table, Tabled};

use signet_core::ClientSet;
use signet_orchestrator::StatusSnapshot;

use crate::sim::TranscriptEntry;

/// Format the derived scopes of a request, one per line, in priority order
pub fn format_scopes(requested: ClientSet) -> String {
    signet_core::registry::derive_scopes(requested).join("\n")
}

/// Format an orchestrator status snapshot as a two-column table
pub fn format_status(status: &StatusSnapshot) -> String {
    #[derive(Tabled)]
    struct StatusRow {
        #[tabled(rename = "FIELD")]
        field: &'static str,
        #[tabled(rename = "VALUE")]
        value: String,
    }

    let row = |field, value: String| StatusRow { field, value };
    let rows = vec![
        row("phase", status.phase.to_string()),
        row("requested", status.requested.to_string()),
        row("connected", status.connected.to_string()),
        row(
            "pending",
            status
                .pending_client
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        row("signed in", yes_no(status.signed_in)),
        row("sign-in error", yes_no(status.sign_in_error)),
        row("auto sign-in", yes_no(status.auto_sign_in)),
        row("user initiated", yes_no(status.user_initiated)),
        row(
            "awaiting resolution",
            yes_no(status.awaiting_external_resolution),
        ),
        row(
            "invitation",
            status
                .pending_invitation
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Print a transcript entry with a color matching its outcome
pub fn print_entry(entry: &TranscriptEntry) {
    match entry {
        TranscriptEntry::Step { step } => println!("-- {}", step),
        TranscriptEntry::ClientCreated { client, scopes } => {
            print_info(&format!("created {} ({} scopes)", client, scopes.len()))
        }
        TranscriptEntry::Connect {
            client,
            attempt,
            outcome,
        } => print_info(&format!("{} connect #{}: {}", client, attempt, outcome)),
        TranscriptEntry::Disconnect { client } => print_info(&format!("{} disconnected", client)),
        TranscriptEntry::SignOut { client, deferred } => {
            if *deferred {
                print_info(&format!("{} signing out (deferred)", client))
            } else {
                print_info(&format!("{} signed out", client))
            }
        }
        TranscriptEntry::ResolutionRequested {
            client,
            code,
            outcome,
        } => print_warning(&format!(
            "resolution {} for {} requested ({:?})",
            code, client, outcome
        )),
        TranscriptEntry::Diagnostic { code, description } => match description {
            Some(description) => print_error(&format!("error {}: {}", code, description)),
            None => print_error(&format!("error {}", code)),
        },
        TranscriptEntry::Invitation { id } => print_info(&format!("invitation {}", id)),
        TranscriptEntry::SignInSuccess => print_success("signed in"),
        TranscriptEntry::SignInFailure => print_error("sign-in failed"),
        TranscriptEntry::Disconnection => print_warning("disconnected"),
        TranscriptEntry::Rejected { error } => print_error(&format!("rejected: {}", error)),
    }
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix
///
/// Outputs to stderr.
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow; outputs to stderr
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
