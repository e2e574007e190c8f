//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use mobilezone_aggregator::ViewMode;
use mobilezone_domain::{BrandFacet, PhoneRecord, SearchOutcome, SearchReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Everything one search screen shows.
pub struct SearchView<'a> {
    /// Listing title
    pub heading: String,
    /// Local catalogue matches
    pub local: Vec<&'a PhoneRecord>,
    /// Remote search state
    pub outcome: SearchOutcome,
    /// Layout for phone listings
    pub view_mode: ViewMode,
}

impl SearchView<'_> {
    /// Local plus remote listing count.
    pub fn total_shown(&self) -> usize {
        self.local.len() + self.outcome.phones().len()
    }

    /// Whether nothing was found anywhere and nothing is still coming.
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && !self.outcome.is_pending() && self.outcome.phones().is_empty()
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a phone listing.
    pub fn format_phones(&self, phones: &[&PhoneRecord], view_mode: ViewMode) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(phones)?),
            OutputFormat::Quiet => Ok(phone_ids(phones)),
            OutputFormat::Table => Ok(self.phones_human(phones, view_mode)),
        }
    }

    /// Format brand facets.
    pub fn format_brands(&self, brands: &[BrandFacet]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(brands)?),
            OutputFormat::Quiet => Ok(brands
                .iter()
                .map(|b| b.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if brands.is_empty() {
                    return Ok(self.colorize("No brands found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Brand", "Listings"]);
                for brand in brands {
                    builder.push_record([brand.name.clone(), brand.count.to_string()]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format the full detail view of one phone.
    pub fn format_phone_detail(&self, phone: &PhoneRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(phone)?),
            OutputFormat::Quiet => Ok(phone.id.clone()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Name".to_string(), phone.name.clone()]);
                builder.push_record(["Brand".to_string(), phone.brand.clone()]);
                builder.push_record(["Price".to_string(), phone.price_label()]);
                builder.push_record(["Released".to_string(), phone.release_date.clone()]);
                builder.push_record([
                    "Rating".to_string(),
                    format!("{:.1} {}", phone.rating, stars(phone)),
                ]);
                for (label, value) in phone.specs.rows() {
                    builder.push_record([label.to_string(), value.to_string()]);
                }
                let origin = if phone.is_synthesized() {
                    "Live market search"
                } else {
                    "Catalogue"
                };
                builder.push_record(["Source".to_string(), origin.to_string()]);

                let mut out = self.colorize(&phone.name, "cyan");
                if phone.trending() {
                    out.push_str(&format!(" {}", self.colorize("(trending)", "magenta")));
                }
                out.push('\n');
                out.push_str(&styled(builder));
                Ok(out)
            }
        }
    }

    /// Format a search screen: heading, remote report, then local matches.
    pub fn format_search(&self, view: &SearchView<'_>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "heading": view.heading,
                    "totalShown": view.total_shown(),
                    "local": view.local,
                    "outcome": view.outcome,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => {
                let remote: Vec<&PhoneRecord> = view.outcome.phones().iter().collect();
                let ids = [phone_ids(&remote), phone_ids(&view.local)];
                Ok(ids
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            OutputFormat::Table => Ok(self.search_human(view)),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn search_human(&self, view: &SearchView<'_>) -> String {
        let mut sections = vec![
            self.colorize(&view.heading, "cyan"),
            format!("Showing {} models found", view.total_shown()),
        ];

        match &view.outcome {
            SearchOutcome::Idle => {}
            SearchOutcome::Pending { query } => {
                sections.push(self.info(&format!("Searching live market data for \"{}\"...", query)));
            }
            SearchOutcome::Settled { report, .. } => {
                sections.push(self.report_human(report));
                if !report.phones.is_empty() {
                    let remote: Vec<&PhoneRecord> = report.phones.iter().collect();
                    sections.push(self.colorize("Live market results", "magenta"));
                    sections.push(self.phones_human(&remote, view.view_mode));
                }
            }
        }

        if view.is_empty() {
            sections.push(self.warning(
                "No phones found. Try adjusting your search or filters.",
            ));
        } else if !view.local.is_empty() {
            sections.push(self.colorize("Catalogue", "magenta"));
            sections.push(self.phones_human(&view.local, view.view_mode));
        }

        sections.join("\n\n")
    }

    fn report_human(&self, report: &SearchReport) -> String {
        if report.failed {
            return self.error(&report.summary);
        }

        let mut out = self.info(&report.summary);
        if !report.citations.is_empty() {
            out.push_str("\nSources:");
            for citation in &report.citations {
                match &citation.uri {
                    Some(uri) => out.push_str(&format!("\n  - {} ({})", citation.title, uri)),
                    None => out.push_str(&format!("\n  - {}", citation.title)),
                }
            }
        }
        out
    }

    fn phones_human(&self, phones: &[&PhoneRecord], view_mode: ViewMode) -> String {
        if phones.is_empty() {
            return self.colorize("No phones found.", "yellow");
        }

        match view_mode {
            ViewMode::List => phones
                .iter()
                .map(|p| {
                    format!(
                        "{}  {} ({})  {}  {}",
                        p.id,
                        p.name,
                        p.brand,
                        self.colorize(&p.price_label(), "green"),
                        stars(p)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            ViewMode::Grid => {
                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Brand", "Price", "Released", "Rating", "Trending"]);
                for phone in phones {
                    builder.push_record([
                        short_id(&phone.id),
                        phone.name.clone(),
                        phone.brand.clone(),
                        phone.price_label(),
                        phone.release_date.clone(),
                        format!("{:.1}", phone.rating),
                        if phone.trending() { "yes" } else { "" }.to_string(),
                    ]);
                }
                styled(builder)
            }
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().bold().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn phone_ids(phones: &[&PhoneRecord]) -> String {
    phones
        .iter()
        .map(|p| p.id.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Five-slot star bar for a rating.
fn stars(phone: &PhoneRecord) -> String {
    let full = usize::from(phone.full_stars());
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

/// Truncate remote-search ids for readability; catalogue ids are short.
fn short_id(id: &str) -> String {
    const MAX: usize = 14;
    if id.chars().count() <= MAX {
        id.to_string()
    } else {
        let head: String = id.chars().take(MAX).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilezone_domain::{Citation, PhoneSpecs};

    fn create_test_phone(id: &str, name: &str) -> PhoneRecord {
        PhoneRecord {
            id: id.to_string(),
            name: name.to_string(),
            brand: "Samsung".to_string(),
            price: 129999.0,
            currency: "Rs.".to_string(),
            image: "https://picsum.photos/seed/a55/400/500".to_string(),
            specs: PhoneSpecs::default(),
            release_date: "March 2024".to_string(),
            rating: 4.5,
            is_trending: Some(true),
        }
    }

    fn view<'a>(local: Vec<&'a PhoneRecord>, outcome: SearchOutcome) -> SearchView<'a> {
        SearchView {
            heading: "Results for \"galaxy\"".to_string(),
            local,
            outcome,
            view_mode: ViewMode::Grid,
        }
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let phone = create_test_phone("4", "Galaxy A55");
        let output = formatter.format_phones(&[&phone], ViewMode::Grid).unwrap();
        assert!(output.contains("Galaxy A55"));
        assert!(output.contains("Rs. 129,999"));
        assert!(output.contains("Trending"));
    }

    #[test]
    fn test_list_view() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let phone = create_test_phone("4", "Galaxy A55");
        let output = formatter.format_phones(&[&phone], ViewMode::List).unwrap();
        assert_eq!(output, "4  Galaxy A55 (Samsung)  Rs. 129,999  ★★★★☆");
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let phone = create_test_phone("4", "Galaxy A55");
        let output = formatter.format_phones(&[&phone], ViewMode::Grid).unwrap();
        assert!(output.contains("\"releaseDate\""));
        assert!(output.contains("\"isTrending\": true"));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let a = create_test_phone("4", "Galaxy A55");
        let b = create_test_phone("1", "Galaxy S24 Ultra");
        let output = formatter.format_phones(&[&a, &b], ViewMode::Grid).unwrap();
        assert_eq!(output, "4\n1");
    }

    #[test]
    fn test_empty_phones() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_phones(&[], ViewMode::Grid).unwrap();
        assert!(output.contains("No phones found"));
    }

    #[test]
    fn test_brands_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_brands(&[BrandFacet::new("Samsung", 145), BrandFacet::new("Apple", 42)])
            .unwrap();
        assert!(output.contains("Samsung"));
        assert!(output.contains("145"));
    }

    #[test]
    fn test_detail_lists_specs() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let phone = create_test_phone("4", "Galaxy A55");
        let output = formatter.format_phone_detail(&phone).unwrap();
        assert!(output.contains("Processor"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Catalogue"));
        assert!(output.contains("(trending)"));
    }

    #[test]
    fn test_search_failure_shows_message_only() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let outcome = SearchOutcome::Settled {
            query: "galaxy".to_string(),
            report: SearchReport::failure("Error fetching live data. Please try again later."),
        };
        let output = formatter.format_search(&view(Vec::new(), outcome)).unwrap();
        assert!(output.contains("✗ Error fetching live data"));
        assert!(output.contains("No phones found"));
        assert!(output.contains("Showing 0 models found"));
    }

    #[test]
    fn test_search_layers_remote_before_local() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let local = create_test_phone("4", "Galaxy A55");
        let remote = create_test_phone("ai-0-abc", "Galaxy S24 FE");
        let outcome = SearchOutcome::Settled {
            query: "galaxy".to_string(),
            report: SearchReport::found(
                "Prices are stable.",
                vec![Citation::new(None, Some("https://example.com".to_string()))],
                vec![remote],
            ),
        };

        let output = formatter.format_search(&view(vec![&local], outcome)).unwrap();
        assert!(output.contains("Showing 2 models found"));
        assert!(output.contains("Source (https://example.com)"));
        let remote_at = output.find("Galaxy S24 FE").unwrap();
        let local_at = output.find("Galaxy A55").unwrap();
        assert!(remote_at < local_at);
    }

    #[test]
    fn test_search_pending_notice() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let local = create_test_phone("4", "Galaxy A55");
        let outcome = SearchOutcome::Pending {
            query: "galaxy".to_string(),
        };
        let output = formatter.format_search(&view(vec![&local], outcome)).unwrap();
        assert!(output.contains("Searching live market data"));
    }

    #[test]
    fn test_search_json_has_phase() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_search(&view(Vec::new(), SearchOutcome::Idle))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["outcome"]["phase"], "idle");
        assert_eq!(json["totalShown"], 0);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("12"), "12");
        assert_eq!(
            short_id("ai-0-0190f3a2b4c57d8e9f"),
            "ai-0-0190f3a2b…"
        );
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
