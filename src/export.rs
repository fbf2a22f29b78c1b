//! Client-side lead exports: CSV text and a printable HTML document.
//!
//! Both formats are pure transformations of a lead collection plus an
//! optional selection; the hand-off to the platform (save dialog, system
//! browser) happens in the controller, not here.

use std::collections::BTreeSet;

use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::api::Lead;

/// CSV column order. Fixed; every field is individually quoted.
pub const CSV_COLUMNS: [&str; 13] = [
    "Name",
    "Description",
    "Phone",
    "Email",
    "Map URL",
    "Address",
    "Source",
    "Rating",
    "Reviews",
    "Has Website",
    "Facebook",
    "Instagram",
    "Date",
];

const DATE_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const FILE_DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Resolve which leads an export covers: the selected subset when the
/// selection is non-empty, otherwise every loaded lead. Selection ids
/// with no matching lead are silently dropped, never an error. Shared by
/// both export formats.
pub fn resolve_export_set<'a>(leads: &'a [Lead], selection: &BTreeSet<i64>) -> Vec<&'a Lead> {
    if selection.is_empty() {
        return leads.iter().collect();
    }
    leads
        .iter()
        .filter(|lead| selection.contains(&lead.id))
        .collect()
}

/// Render leads as CSV text with the documented column order. Missing
/// values render as empty quoted fields, never a `null` literal.
pub fn leads_to_csv(leads: &[&Lead]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_COLUMNS.iter().map(|col| col.to_string()));
    for lead in leads {
        push_row(&mut out, csv_fields(lead).into_iter());
    }
    out
}

/// Suggested filename for a CSV export generated on `date`.
pub fn csv_file_name(date: time::Date) -> String {
    let stamp = date
        .format(FILE_DATE_FORMAT)
        .unwrap_or_else(|_| "export".to_string());
    format!("leads-{stamp}.csv")
}

/// Render leads as a printable HTML table with a generation header.
/// Printing itself is delegated to the platform browser.
pub fn leads_to_html(leads: &[&Lead], generated_at: OffsetDateTime) -> String {
    let stamp = generated_at
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| String::new());
    let mut rows = String::new();
    for lead in leads {
        rows.push_str("<tr>");
        for value in [
            lead.name.as_str(),
            lead.description.as_deref().unwrap_or(""),
            lead.phone.as_deref().unwrap_or(""),
            lead.email.as_deref().unwrap_or(""),
            lead.address.as_deref().unwrap_or(""),
            &lead.rating.map(|r| r.to_string()).unwrap_or_default(),
            &lead.reviews.map(|r| r.to_string()).unwrap_or_default(),
        ] {
            rows.push_str("<td>");
            rows.push_str(&escape_html(value));
            rows.push_str("</td>");
        }
        rows.push_str("</tr>\n");
    }
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>Leads</title>\n\
         <style>body{{font-family:sans-serif;margin:24px}}table{{border-collapse:collapse;width:100%}}\
         th,td{{border:1px solid #ccc;padding:6px 8px;text-align:left;font-size:12px}}\
         th{{background:#f0f0f0}}</style></head><body>\n\
         <h1>Lead Export</h1>\n\
         <p>Generated {stamp} &mdash; {count} leads</p>\n\
         <table><thead><tr>\
         <th>Name</th><th>Description</th><th>Phone</th><th>Email</th>\
         <th>Address</th><th>Rating</th><th>Reviews</th>\
         </tr></thead><tbody>\n{rows}</tbody></table>\n</body></html>\n",
        count = leads.len(),
    )
}

fn csv_fields(lead: &Lead) -> Vec<String> {
    vec![
        lead.name.clone(),
        lead.description.clone().unwrap_or_default(),
        lead.phone.clone().unwrap_or_default(),
        lead.email.clone().unwrap_or_default(),
        map_url(lead),
        lead.address.clone().unwrap_or_default(),
        lead.source.clone().unwrap_or_default(),
        lead.rating.map(|r| r.to_string()).unwrap_or_default(),
        lead.reviews.map(|r| r.to_string()).unwrap_or_default(),
        if lead.has_website() { "Yes" } else { "No" }.to_string(),
        lead.facebook.clone().unwrap_or_default(),
        lead.instagram.clone().unwrap_or_default(),
        format_created_at(&lead.created_at),
    ]
}

/// Use the scraped URL verbatim, falling back to a constructed Google
/// Maps search for "name address" when none exists.
fn map_url(lead: &Lead) -> String {
    if let Some(url) = lead.website.as_deref() {
        if !url.trim().is_empty() {
            return url.to_string();
        }
    }
    let query = format!("{} {}", lead.name, lead.address.as_deref().unwrap_or(""));
    format!(
        "https://www.google.com/maps/search/{}",
        urlencoding::encode(query.trim())
    )
}

/// Render a backend timestamp in local short form; unparseable values
/// pass through verbatim.
fn format_created_at(raw: &str) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format_created_at_with_offset(raw, offset)
}

fn format_created_at_with_offset(raw: &str, offset: UtcOffset) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) else {
        return raw.to_string();
    };
    parsed
        .to_offset(offset)
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| raw.to_string())
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out.push('\n');
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
