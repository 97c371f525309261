use std::fmt::Write as _;

use client_core::{QueryLifecycle, SessionSnapshot};

pub fn render_persona(persona: Option<&str>) -> String {
    format!("Persona: {}", persona.unwrap_or("(unknown)"))
}

pub fn render_catalog(snapshot: &SessionSnapshot) -> String {
    let catalog = &snapshot.catalog;
    let mark = |selected: &[String], value: &str| {
        if selected.iter().any(|s| s == value) {
            "[x]"
        } else {
            "[ ]"
        }
    };

    let mut out = String::from("Categories:\n");
    if catalog.categories.is_empty() {
        out.push_str("  (none available)\n");
    }
    for category in &catalog.categories {
        let _ = writeln!(
            out,
            "  {} {category}",
            mark(&snapshot.selected_categories, category)
        );
    }

    out.push_str("Pricing:\n");
    if catalog.pricing.is_empty() {
        out.push_str("  (none available)\n");
    }
    for tier in &catalog.pricing {
        let _ = writeln!(out, "  {} {tier}", mark(&snapshot.selected_pricing, tier));
    }
    out
}

/// Renders the current answer the way the prompt displays it.
pub fn render_session(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_persona(snapshot.persona.as_deref()));

    if snapshot.query == QueryLifecycle::Pending {
        out.push_str("Searching...\n");
        return out;
    }

    let Some(view) = &snapshot.view else {
        return out;
    };

    if !view.summary.is_empty() {
        let _ = writeln!(out, "\nOverview:\n  {}", view.summary);
    }

    if let Some(best) = &view.best {
        let _ = writeln!(out, "\nBest recommended tool: {}", best.name);
        if !best.reason.is_empty() {
            let _ = writeln!(out, "  {}", best.reason);
        }
    }

    if view.has_no_tools() {
        if !view.is_error {
            out.push_str("\nNo AI tools found.\n");
        }
        return out;
    }

    if !view.tools.is_empty() {
        out.push_str("\nTools:\n");
    }
    for tool in &view.tools {
        let expanded = snapshot.expanded_tool.as_deref() == Some(tool.name.as_str());
        let marker = if expanded { ">" } else { "-" };
        if tool.pricing.is_empty() {
            let _ = writeln!(out, "  {marker} {}", tool.name);
        } else {
            let _ = writeln!(out, "  {marker} {} [{}]", tool.name, tool.pricing);
        }
        if expanded && !tool.summary.is_empty() {
            let _ = writeln!(out, "      {}", tool.summary);
        }
    }
    out
}
