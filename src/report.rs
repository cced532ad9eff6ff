//! Console rendering.
//!
//! Human-facing output on stdout: colored per-phase progress while a
//! target is probed, then one aligned summary table and the fastest-server
//! lines once every target has been processed. Diagnostic detail goes to
//! `tracing` instead; none of this output is machine-readable.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::Value;

use crate::probe::TimingRecord;
use crate::target::Target;

// ============================================================================
// ANSI Colors
// ============================================================================

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Total phase count shown in progress prefixes (`[1/4]` .. `[4/4]`).
const PHASE_COUNT: u8 = 4;

// ============================================================================
// Progress Lines
// ============================================================================

/// Prints the run banner.
pub fn run_banner(tx_hash: &str, target_count: usize) {
    println!("\n{BOLD}{BLUE}{}{RESET}", "=".repeat(80));
    println!("{BOLD}{BLUE}Electrum Server Probe{RESET}");
    println!("{BOLD}{BLUE}{}{RESET}", "=".repeat(80));
    println!("\nDiagnostic transaction: {CYAN}{tx_hash}{RESET}");
    println!("Method: {GRAY}blockchain.transaction.get (verbose=true){RESET}");
    println!("Servers to probe: {target_count}");
}

/// Prints the per-target header block.
pub fn target_header(target: &Target) {
    println!("\n{BOLD}{}{RESET}", "=".repeat(80));
    println!("{BOLD}Probing: {CYAN}{}{RESET}", target.name);
    println!("{BOLD}Host: {GRAY}{}:{}{RESET}", target.host, target.port);
    println!("{BOLD}{}{RESET}", "=".repeat(80));
}

/// Prints a numbered phase announcement.
pub fn phase(step: u8, message: &str) {
    println!("\n{YELLOW}[{step}/{PHASE_COUNT}]{RESET} {message}");
}

/// Prints a success line.
pub fn ok(message: &str) {
    println!("{GREEN}\u{2713} {message}{RESET}");
}

/// Prints a failure line.
pub fn fail(message: &str) {
    println!("{RED}\u{2717} {message}{RESET}");
}

/// Prints a warning line.
pub fn warn_line(message: &str) {
    println!("{YELLOW}\u{26a0} {message}{RESET}");
}

/// Prints an indented key/value detail line.
pub fn detail(key: &str, value: &str) {
    println!("  {key}: {GRAY}{value}{RESET}");
}

/// Prints the verbose query result, pretty-printed.
pub fn query_result(result: &Value) {
    println!("{BOLD}{}{RESET}", "\u{2500}".repeat(80));
    println!("{GREEN}Success! Transaction data:{RESET}\n");
    match serde_json::to_string_pretty(result) {
        Ok(pretty) => println!("{pretty}"),
        Err(_) => println!("{result}"),
    }
    println!("{BOLD}{}{RESET}", "\u{2500}".repeat(80));
}

/// Prints an RPC error payload.
pub fn rpc_error(code: i64, message: &str, data: Option<&Value>) {
    println!("{RED}Error in response:{RESET}");
    println!("  Code: {code}");
    println!("  Message: {message}");
    if let Some(data) = data {
        println!("  Data: {data}");
    }
}

/// Prints the interrupt notice.
pub fn interrupted() {
    println!("\n\n{RED}Interrupted{RESET}");
}

// ============================================================================
// Duration Formatting
// ============================================================================

/// Formats an optional duration as milliseconds, `N/A` when unset.
///
/// Unset means the phase was never reached; those values are excluded
/// from the fastest-server comparisons as well.
#[must_use]
pub fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => format!("{:.1} ms", d.as_secs_f64() * 1000.0),
        None => "N/A".to_string(),
    }
}

// ============================================================================
// Summary Table
// ============================================================================

const COLUMNS: [&str; 6] = ["Target", "Connect", "Handshake", "Query", "Total", "Status"];

/// Renders the aligned summary table as plain text.
///
/// Kept color-free so alignment is byte-exact and the layout is testable.
#[must_use]
pub fn render_summary(records: &[TimingRecord]) -> String {
    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            [
                r.target.name.clone(),
                format_duration(r.connect),
                format_duration(r.handshake),
                format_duration(r.query),
                format_duration(r.total),
                if r.succeeded { "OK" } else { "FAILED" }.to_string(),
            ]
        })
        .collect();

    let mut widths: [usize; 6] = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &COLUMNS.map(String::from), &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * (COLUMNS.len() - 1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, row: &[String; 6], widths: &[usize; 6]) {
    for (i, (cell, width)) in row.iter().zip(widths.iter()).enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        // Right-pad; the last column stays ragged.
        if i < row.len() - 1 {
            for _ in cell.chars().count()..*width {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}

// ============================================================================
// Fastest-Server Computation
// ============================================================================

/// Returns the successful record with the smallest total duration.
///
/// Ties break toward source order: the first record encountered wins.
#[must_use]
pub fn fastest_total(records: &[TimingRecord]) -> Option<&TimingRecord> {
    records
        .iter()
        .filter(|r| r.succeeded)
        .filter_map(|r| r.total.map(|d| (r, d)))
        .min_by_key(|(_, d)| *d)
        .map(|(r, _)| r)
}

/// Returns the successful record with the smallest query duration.
#[must_use]
pub fn fastest_query(records: &[TimingRecord]) -> Option<&TimingRecord> {
    records
        .iter()
        .filter(|r| r.succeeded)
        .filter_map(|r| r.query.map(|d| (r, d)))
        .min_by_key(|(_, d)| *d)
        .map(|(r, _)| r)
}

/// Prints the summary table and the fastest-server lines.
pub fn print_summary(records: &[TimingRecord]) {
    println!("\n{BOLD}{BLUE}{}{RESET}", "=".repeat(80));
    println!("{BOLD}{BLUE}Summary{RESET}");
    println!("{BOLD}{BLUE}{}{RESET}", "=".repeat(80));
    println!();
    print!("{}", render_summary(records));
    println!();

    match fastest_total(records) {
        Some(record) => {
            println!(
                "{GREEN}Fastest server: {} ({} total){RESET}",
                record.target.name,
                format_duration(record.total)
            );
            if let Some(record) = fastest_query(records) {
                println!(
                    "{GREEN}Fastest query responder: {} ({} query){RESET}",
                    record.target.name,
                    format_duration(record.query)
                );
            }
        }
        None => println!("{RED}No server completed the diagnostic query{RESET}"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        name: &str,
        connect: Option<u64>,
        handshake: Option<u64>,
        query: Option<u64>,
        total: Option<u64>,
        succeeded: bool,
    ) -> TimingRecord {
        TimingRecord {
            target: Target::new(name, "host", 50001),
            connect: connect.map(Duration::from_millis),
            handshake: handshake.map(Duration::from_millis),
            query: query.map(Duration::from_millis),
            total: total.map(Duration::from_millis),
            succeeded,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "N/A");
        assert_eq!(format_duration(Some(Duration::from_millis(1500))), "1500.0 ms");
        assert_eq!(format_duration(Some(Duration::from_micros(2500))), "2.5 ms");
    }

    #[test]
    fn test_render_summary_marks_unreached_phases() {
        let records = vec![record("dead", Some(10_000), None, None, None, false)];
        let table = render_summary(&records);

        assert_eq!(table.matches("N/A").count(), 3);
        assert!(table.contains("FAILED"));
        assert!(table.contains("10000.0 ms"));
    }

    #[test]
    fn test_render_summary_alignment() {
        let records = vec![
            record("a", Some(1), Some(2), Some(3), Some(6), true),
            record("much-longer-name", Some(10), Some(20), Some(30), Some(60), true),
        ];
        let table = render_summary(&records);
        let lines: Vec<&str> = table.lines().collect();

        // Header, rule, two rows.
        assert_eq!(lines.len(), 4);
        let connect_col = lines[0].find("Connect").expect("header column");
        assert_eq!(lines[2].find("1.0 ms"), Some(connect_col));
        assert_eq!(lines[3].find("10.0 ms"), Some(connect_col));
    }

    #[test]
    fn test_fastest_ignores_failures() {
        let records = vec![
            record("failed-but-quick", Some(1), Some(1), Some(1), Some(3), false),
            record("slow-but-ok", Some(50), Some(50), Some(50), Some(150), true),
        ];

        let fastest = fastest_total(&records).expect("one success");
        assert_eq!(fastest.target.name, "slow-but-ok");
    }

    #[test]
    fn test_fastest_tie_breaks_to_source_order() {
        let records = vec![
            record("first", Some(10), Some(10), Some(10), Some(30), true),
            record("second", Some(10), Some(10), Some(10), Some(30), true),
        ];

        assert_eq!(fastest_total(&records).expect("tie").target.name, "first");
        assert_eq!(fastest_query(&records).expect("tie").target.name, "first");
    }

    #[test]
    fn test_fastest_query_independent_of_total() {
        let records = vec![
            record("slow-query", Some(1), Some(1), Some(80), Some(82), true),
            record("fast-query", Some(50), Some(50), Some(5), Some(105), true),
        ];

        assert_eq!(
            fastest_total(&records).expect("success").target.name,
            "slow-query"
        );
        assert_eq!(
            fastest_query(&records).expect("success").target.name,
            "fast-query"
        );
    }

    #[test]
    fn test_no_successes() {
        let records = vec![record("down", Some(5), None, None, None, false)];
        assert!(fastest_total(&records).is_none());
        assert!(fastest_query(&records).is_none());
    }
}
