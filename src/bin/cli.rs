use calendar_tool::{
    AppConfig, CalendarGenerator, CalendarQuery, CalendarStore, DayEntry, HttpHolidayLookup,
    SqliteCalendarStore, save_entries_to_csv, save_entries_to_json,
};
use chrono::Datelike;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn render_entries_as_text_table(entries: &[DayEntry]) -> String {
    let headers = ["date", "weekday", "category", "description"];
    let rows: Vec<[String; 4]> = entries
        .iter()
        .map(|entry| {
            [
                entry.date.to_string(),
                entry.date.weekday().to_string(),
                entry.category.name.to_string(),
                entry.description.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[&str]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  generate <year>                    Generate the calendar for a year\n  list <year>                        Show every day of a generated year\n  holidays <year>                    Show the holidays of a generated year\n  export <json|csv> <year> <path>    Write a generated year to disk\n  quit|exit                          Exit"
    );
}

fn parse_year(arg: Option<&str>, usage: &str) -> Option<i32> {
    match arg.map(str::parse::<i32>) {
        Some(Ok(year)) => Some(year),
        Some(Err(_)) => {
            println!("Invalid year");
            None
        }
        None => {
            println!("Usage: {usage}");
            None
        }
    }
}

/// Lists a year, printing the not-generated notice when it is empty.
fn load_year(query: &CalendarQuery, year: i32) -> Option<Vec<DayEntry>> {
    match query.list_by_year(year) {
        Ok(entries) if entries.is_empty() => {
            println!("Calendar not generated for year {year}.");
            None
        }
        Ok(entries) => Some(entries),
        Err(e) => {
            println!("Error: {e}");
            None
        }
    }
}

fn build_generator(
    config: &AppConfig,
    store: Arc<dyn CalendarStore>,
) -> Result<CalendarGenerator, Box<dyn std::error::Error>> {
    let lookup = HttpHolidayLookup::new(config.lookup_config()?)?;
    Ok(CalendarGenerator::new(store, Arc::new(lookup)).with_concurrency(config.lookup_concurrency))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let store: Arc<dyn CalendarStore> = Arc::new(SqliteCalendarStore::new(&config.database_path)?);
    let query = CalendarQuery::new(store.clone());
    let runtime = tokio::runtime::Runtime::new()?;
    let mut generator: Option<CalendarGenerator> = None;

    println!("Calendar Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "generate" => {
                let Some(year) = parse_year(parts.next(), "generate <year>") else {
                    continue;
                };
                if generator.is_none() {
                    match build_generator(&config, store.clone()) {
                        Ok(built) => generator = Some(built),
                        Err(e) => {
                            println!("Holiday service not configured: {e}");
                            continue;
                        }
                    }
                }
                let Some(active) = generator.as_ref() else {
                    continue;
                };
                match runtime.block_on(active.generate(year)) {
                    Ok(true) => println!("Calendar generated for year {year}."),
                    Ok(false) => println!("Calendar already generated for year {year}."),
                    Err(e) => println!("Generation failed: {e}"),
                }
            }
            "list" => {
                let Some(year) = parse_year(parts.next(), "list <year>") else {
                    continue;
                };
                if let Some(entries) = load_year(&query, year) {
                    println!("{}", render_entries_as_text_table(&entries));
                }
            }
            "holidays" => {
                let Some(year) = parse_year(parts.next(), "holidays <year>") else {
                    continue;
                };
                match query.list_holidays_by_year(year) {
                    Ok(entries) if !entries.is_empty() => {
                        println!("{}", render_entries_as_text_table(&entries));
                    }
                    Ok(_) => {
                        // An empty holiday list is only a notice when the year is missing.
                        match query.is_generated(year) {
                            Ok(true) => println!("No holidays recorded for year {year}."),
                            Ok(false) => println!("Calendar not generated for year {year}."),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "export" => {
                let format = parts.next();
                let year_s = parts.next();
                let path = parts.next();
                match (format, path) {
                    (Some(format @ ("json" | "csv")), Some(path)) => {
                        let Some(year) = parse_year(year_s, "export <json|csv> <year> <path>")
                        else {
                            continue;
                        };
                        let Some(entries) = load_year(&query, year) else {
                            continue;
                        };
                        let result = if format == "json" {
                            save_entries_to_json(&entries, path)
                        } else {
                            save_entries_to_csv(&entries, path)
                        };
                        match result {
                            Ok(()) => println!(
                                "Exported {} days of {year} to {path}.",
                                entries.len()
                            ),
                            Err(e) => println!("Export failed: {e}"),
                        }
                    }
                    _ => println!("Usage: export <json|csv> <year> <path>"),
                }
            }
            _ => println!("Unknown command '{cmd}'. Type 'help' for commands."),
        }
    }
    Ok(())
}
