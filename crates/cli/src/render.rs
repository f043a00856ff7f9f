//! Terminal output for records and listings.

use reunite_client::{MissingPersonRecord, PartitionedReports, ReportPage};

/// One-line summary for listings.
pub fn print_line(record: &MissingPersonRecord) {
    let location = record
        .last_seen_location
        .as_deref()
        .unwrap_or("location unknown");
    println!(
        "#{:<6} {:<8} {}  ({})",
        record.id, record.status, record.full_name, location
    );
}

/// Full detail view of one report.
pub fn print_record(record: &MissingPersonRecord) {
    println!("Report #{} ({})", record.id, record.status);
    println!("  Name:        {}", record.full_name);
    if let Some(age) = record.age {
        println!("  Age:         {age}");
    }
    if let Some(gender) = record.gender {
        println!("  Gender:      {gender}");
    }
    if let Some(height) = record.height.as_deref() {
        println!("  Height:      {height}");
    }
    if let Some(weight) = record.weight.as_deref() {
        println!("  Weight:      {weight}");
    }
    if let Some(hair) = record.hair_color.as_deref() {
        println!("  Hair:        {hair}");
    }
    if let Some(eyes) = record.eye_color.as_deref() {
        println!("  Eyes:        {eyes}");
    }
    if let Some(location) = record.last_seen_location.as_deref() {
        println!("  Last seen:   {location}");
    }
    if let Some(date) = record.last_seen_date {
        println!("  Seen on:     {}", date.format("%Y-%m-%d"));
    }
    if let Some(description) = record.description.as_deref() {
        println!("  Description: {description}");
    }

    if let Some(reporter) = &record.reporter {
        println!(
            "  Reported by: {} on {}",
            reporter.username,
            record.created_at.format("%Y-%m-%d")
        );
    }

    if !record.photos.is_empty() {
        println!("  Photos:");
        for photo in &record.photos {
            println!("    {}", photo.url);
        }
    }

    if !record.relatives.is_empty() {
        println!("  Relatives:");
        for relative in &record.relatives {
            let relationship = relative.relationship.as_deref().unwrap_or("relative");
            let phone = relative.phone.as_deref().unwrap_or("no phone");
            println!("    {} ({relationship}, {phone})", relative.name);
        }
    }
}

/// Listing with its pagination footer.
pub fn print_page(page: &ReportPage) {
    if page.data.is_empty() {
        println!("No reports found.");
        return;
    }

    for record in &page.data {
        print_line(record);
    }
    println!();
    println!(
        "Page {} of {} ({} total)",
        page.current_page, page.pages, page.total
    );
}

/// Dashboard view: the user's own reports, then the recent strip.
pub fn print_dashboard(grouped: &PartitionedReports<'_>) {
    println!("My reports:");
    if grouped.mine.is_empty() {
        println!("  (none)");
    }
    for record in &grouped.mine {
        print_line(record);
    }

    println!();
    println!("Recent reports:");
    if grouped.recent.is_empty() {
        println!("  (none)");
    }
    for record in grouped.recent {
        print_line(record);
    }
}
