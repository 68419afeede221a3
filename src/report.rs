use crate::analyzer::{RankedList, SuspiciousSet, TopEntry};
use colored::Colorize;
use std::fmt::Display;
use std::io::{self, Write};

const IP_WIDTH: usize = 20;
const COUNT_WIDTH: usize = 15;
const ATTEMPTS_WIDTH: usize = 25;

/// Print the requests-per-IP table
pub fn print_ip_counts<K: Display>(
    out: &mut dyn Write,
    ranked: &RankedList<K>,
) -> io::Result<()> {
    writeln!(
        out,
        "{}{}",
        pad("IP Address", IP_WIDTH).white().bold(),
        pad("Request Count", COUNT_WIDTH).white().bold()
    )?;
    for entry in ranked {
        writeln!(
            out,
            "{}{}",
            pad(&entry.key, IP_WIDTH).cyan(),
            pad(&entry.count, COUNT_WIDTH)
        )?;
    }
    Ok(())
}

/// Print the most frequently accessed endpoint, or a notice when none was seen
pub fn print_top_endpoint<K: Display>(
    out: &mut dyn Write,
    ranked: &RankedList<K>,
) -> io::Result<()> {
    match ranked.top() {
        TopEntry::Found(entry) => {
            writeln!(out, "{}", "Most Frequently Accessed Endpoint:".white().bold())?;
            writeln!(
                out,
                "{} (Accessed {} times)",
                entry.key.to_string().cyan(),
                entry.count.to_string().green().bold()
            )
        }
        TopEntry::Empty => writeln!(out, "{}", "No endpoints found in the log file.".yellow()),
    }
}

/// Print flagged IPs with their failed-login counts
pub fn print_suspicious<K: Display + PartialEq>(
    out: &mut dyn Write,
    suspicious: &SuspiciousSet<K>,
) -> io::Result<()> {
    if suspicious.is_empty() {
        return writeln!(out, "{} No suspicious activity detected.", "✓".green());
    }

    writeln!(out, "{}", "Suspicious Activity Detected:".red().bold())?;
    writeln!(
        out,
        "{}",
        format!(
            "More than {} failed login attempts from these IPs",
            suspicious.threshold()
        )
        .dimmed()
    )?;
    writeln!(
        out,
        "{}{}",
        pad("IP Address", IP_WIDTH).white().bold(),
        pad("Failed Login Attempts", ATTEMPTS_WIDTH).white().bold()
    )?;
    for entry in suspicious.entries() {
        writeln!(
            out,
            "{}{}",
            pad(&entry.key, IP_WIDTH).red().bold(),
            pad(&entry.count, ATTEMPTS_WIDTH).red()
        )?;
    }
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Left-align before coloring so escape codes don't count toward the width
fn pad(value: impl Display, width: usize) -> String {
    format!("{:<width$}", value.to_string(), width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::FrequencyTable;

    fn render(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn ip_table_has_header_and_rows() {
        let ranked = ["10.0.0.1", "10.0.0.2", "10.0.0.1"]
            .into_iter()
            .collect::<FrequencyTable<_>>()
            .into_ranked();
        let text = render(|out| print_ip_counts(out, &ranked));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("IP Address          Request Count"));
        assert!(lines[1].starts_with("10.0.0.1            2"));
        assert!(lines[2].starts_with("10.0.0.2            1"));
    }

    #[test]
    fn empty_ip_table_prints_header_only() {
        let ranked = FrequencyTable::<&str>::new().into_ranked();
        let text = render(|out| print_ip_counts(out, &ranked));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn top_endpoint_line() {
        let ranked = ["/a", "/b", "/a"]
            .into_iter()
            .collect::<FrequencyTable<_>>()
            .into_ranked();
        let text = render(|out| print_top_endpoint(out, &ranked));
        assert!(text.contains("Most Frequently Accessed Endpoint:"));
        assert!(text.contains("/a (Accessed 2 times)"));
    }

    #[test]
    fn missing_endpoint_notice() {
        let ranked = FrequencyTable::<&str>::new().into_ranked();
        let text = render(|out| print_top_endpoint(out, &ranked));
        assert_eq!(text.trim(), "No endpoints found in the log file.");
    }

    #[test]
    fn suspicious_table_and_notice() {
        let flagged = ["9.9.9.9", "9.9.9.9", "1.1.1.1"]
            .into_iter()
            .collect::<FrequencyTable<_>>()
            .above_threshold(1);
        let text = render(|out| print_suspicious(out, &flagged));
        assert!(text.contains("Suspicious Activity Detected:"));
        assert!(text.contains("Failed Login Attempts"));
        assert!(text.contains("More than 1 failed login attempts"));
        assert!(text.contains("9.9.9.9"));
        assert!(!text.contains("1.1.1.1"));

        let none = FrequencyTable::<&str>::new().above_threshold(10);
        let text = render(|out| print_suspicious(out, &none));
        assert!(text.contains("No suspicious activity detected."));
    }
}
