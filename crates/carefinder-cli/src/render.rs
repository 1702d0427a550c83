//! Plain-text rendering of a view session.

use carefinder_view::{
    ContactAction, DetailPanel, MapSurface, MemoryList, MemoryMap, Notice, ViewSession,
};

pub(crate) fn print_session(session: &ViewSession<MemoryMap, MemoryList>, fallback: bool) {
    print!("{}", session_text(session, fallback));
}

fn session_text(session: &ViewSession<MemoryMap, MemoryList>, fallback: bool) -> String {
    let mut out = String::new();
    let list = session.list();

    if let Some(address) = session.user_address() {
        out.push_str(&format!("Near {address}\n\n"));
    }
    if fallback && !list.entries().is_empty() {
        out.push_str("Showing sample providers; these are not real listings.\n\n");
    }

    for entry in list.entries() {
        let row = &entry.row;
        let marker = if entry.active { '>' } else { ' ' };
        let stars = row.stars.map(|s| s.render()).unwrap_or_default();
        out.push_str(&format!(
            "{marker} [{}] {} ({})\n    {} | {}\n    {stars} {} ({} reviews)\n",
            row.initials, row.name, row.id, row.specialty, row.distance, row.rating, row.review_count
        ));
    }

    match list.notice() {
        Some(Notice::Loading) | None => {}
        Some(Notice::Empty { message }) => out.push_str(&format!("{message}\n")),
        Some(Notice::Error { message }) => {
            out.push_str(&format!("{message}\nRun the command again to retry.\n"));
        }
    }

    if let Some(panel) = list.detail() {
        out.push('\n');
        out.push_str(&detail_text(panel));
    }

    let map = session.map();
    if let Some(center) = map.center() {
        out.push_str(&format!("\nmap: centre {center}, zoom {}\n", map.zoom()));
    }
    out
}

fn detail_text(panel: &DetailPanel) -> String {
    let mut out = format!("{} [{}]\n{}\n", panel.name, panel.initials, panel.specialty);
    let stars = panel.stars.map(|s| s.render()).unwrap_or_default();
    out.push_str(&format!("{stars} {} ({})\n", panel.rating, panel.review_count));
    out.push_str(&format!("Phone: {}\n", panel.phone));
    if let Some(website) = &panel.website {
        out.push_str(&format!("Website: {website}\n"));
    }
    out.push_str(&format!("Address: {}\n{}\n", panel.address, panel.distance));
    match &panel.contact {
        ContactAction::Call { digits } => out.push_str(&format!("Contact: tel:{digits}\n")),
        ContactAction::Website { url } => out.push_str(&format!("Contact: {url}\n")),
        ContactAction::None => {}
    }

    out.push_str("Reviews:\n");
    if let Some(placeholder) = panel.reviews_placeholder {
        out.push_str(&format!("  {placeholder}\n"));
    }
    for review in &panel.reviews {
        out.push_str(&format!(
            "  {} ({}) {}\n    {}\n",
            review.author,
            review.date,
            review.stars.render(),
            review.text
        ));
    }
    out
}
