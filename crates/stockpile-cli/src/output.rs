//! Output formatting for the CLI.

use anyhow::Result;
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use serde_json::Value;
use stockpile_core::{Analytics, AuditEntry, AuditField, Item};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Print output in the specified format.
pub fn print<T: Serialize + HumanDisplay>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", value.human_display()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Print a list in the specified format.
pub fn print_list<T: Serialize + HumanDisplay>(values: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if values.is_empty() {
                println!("Nothing to show.");
            }
            for value in values {
                println!("{}", value.human_display());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(values)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(values)?),
    }
    Ok(())
}

/// Print a list of item summaries with dynamic column widths.
pub fn print_item_list(items: &[ItemSummary], format: OutputFormat) -> Result<()> {
    let OutputFormat::Human = format else {
        return print_list(items, format);
    };

    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    let id_width = items.iter().map(|i| i.id.len()).max().unwrap_or(2).max(2);
    let category_width = items
        .iter()
        .map(|i| i.category.len())
        .max()
        .unwrap_or(8)
        .max(8);
    let price_width = items
        .iter()
        .map(|i| format_price(i.price).len())
        .max()
        .unwrap_or(5)
        .max(5);

    println!(
        "{:<id_w$}  {:<cat_w$}  {:>price_w$}  {}",
        "ID",
        "CATEGORY",
        "PRICE",
        "NAME",
        id_w = id_width,
        cat_w = category_width,
        price_w = price_width
    );
    println!("{}", "-".repeat(id_width + category_width + price_width + 20));

    for item in items {
        let category = if item.category.is_empty() {
            "-"
        } else {
            item.category.as_str()
        };
        println!(
            "{:<id_w$}  {:<cat_w$}  {:>price_w$}  {}",
            item.id,
            category,
            format_price(item.price),
            item.name,
            id_w = id_width,
            cat_w = category_width,
            price_w = price_width
        );
    }

    Ok(())
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => println!("{}", style(message).green()),
        OutputFormat::Json => {
            let body = serde_json::json!({ "status": "ok", "message": message });
            println!("{}", serde_json::to_string(&body)?);
        }
        OutputFormat::Yaml => println!("status: ok\nmessage: {message}"),
    }
    Ok(())
}

/// Print an informational line; only shown in human output.
pub fn print_notice(message: &str, format: OutputFormat) {
    if matches!(format, OutputFormat::Human) {
        println!("{}", style(message).dim());
    }
}

/// Trait for human-readable display.
pub trait HumanDisplay {
    fn human_display(&self) -> String;
}

impl HumanDisplay for Item {
    fn human_display(&self) -> String {
        let mut lines = vec![
            format!("ID:          {}", self.id),
            format!("Name:        {}", self.name),
        ];

        if !self.description.is_empty() {
            lines.push(format!("Description: {}", self.description));
        }
        if !self.category.is_empty() {
            lines.push(format!("Category:    {}", self.category));
        }

        lines.push(format!("Price:       {}", format_price(self.price)));

        if !self.tags.is_empty() {
            lines.push(format!("Tags:        {}", self.tags.join(", ")));
        }

        lines.push(format!("Created:     {}", format_time(&self.created_at)));
        lines.push(format!("Updated:     {}", format_time(&self.updated_at)));
        lines.push(format!("History:     {} entries", self.audit_log.len()));

        lines.join("\n")
    }
}

impl HumanDisplay for AuditEntry {
    fn human_display(&self) -> String {
        let time = format_time(&self.changed_at);
        let change = match self.field {
            AuditField::Creation => style("created").green().to_string(),
            field => format!(
                "{} {} → {}",
                style(field).bold(),
                format_value(self.old_value.as_ref()),
                format_value(self.new_value.as_ref())
            ),
        };

        format!("[{time}] {}: {change}", self.changed_by)
    }
}

impl HumanDisplay for Analytics {
    fn human_display(&self) -> String {
        let mut lines = vec![
            format!("Items:         {}", self.summary.total_items),
            format!("Total value:   {}", format_price(self.summary.total_value)),
            format!("Average price: {}", format_price(self.summary.average_price)),
            String::new(),
            style("Categories").bold().to_string(),
        ];

        for entry in &self.category_distribution {
            lines.push(format!("  {:<20} {}", entry.category, entry.count));
        }

        lines.push(String::new());
        lines.push(style("Price ranges").bold().to_string());
        for range in &self.price_ranges {
            lines.push(format!("  {:<10} {}", range.bucket_label, range.count));
        }

        lines.join("\n")
    }
}

fn format_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "(none)".to_string(),
        Some(Value::String(s)) if s.is_empty() => "\"\"".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(values)) => {
            let parts: Vec<String> = values.iter().map(|v| format_value(Some(v))).collect();
            format!("[{}]", parts.join(", "))
        }
        Some(other) => other.to_string(),
    }
}

/// Summary view of an item for list output.
#[derive(Debug, Serialize)]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            price: item.price,
        }
    }
}

impl HumanDisplay for ItemSummary {
    fn human_display(&self) -> String {
        format!(
            "{:<36} {:<16} {:>10} {}",
            self.id,
            self.category,
            format_price(self.price),
            self.name
        )
    }
}
