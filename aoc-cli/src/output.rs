//! Output formatting for solver results

use crate::executor::SolverResult;
use chrono::TimeDelta;

/// Output formatter for solver results
pub struct OutputFormatter {
    quiet: bool,
    start_time: std::time::Instant,
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: std::time::Instant::now(),
        }
    }

    /// Format and print a single result
    pub fn print_result(&self, result: &SolverResult) {
        match (&result.answer, self.quiet) {
            (Ok(answer), true) => println!("{}", answer),
            (Ok(answer), false) => println!("{}", format_line(result, answer)),
            (Err(e), true) => eprintln!("Error: {}", e),
            (Err(e), false) => eprintln!(
                "{}/{:02} Part {}: Error - {}",
                result.year, result.day, result.part, e
            ),
        }
    }

    /// Print counts, summed parse/solve time, and wall-clock time
    pub fn print_summary(&self, results: &[SolverResult]) {
        if self.quiet {
            return;
        }

        let successes = results.iter().filter(|r| r.answer.is_ok()).count();
        let failures = results.len() - successes;

        let solved = || results.iter().filter(|r| r.answer.is_ok());
        let total_parse_time: TimeDelta = solved().filter_map(|r| r.parse_duration).sum();
        let total_solve_time: TimeDelta = solved().map(|r| r.solve_duration).sum();
        let elapsed = TimeDelta::from_std(self.start_time.elapsed()).unwrap_or(TimeDelta::MAX);

        println!();
        println!("--- Summary ---");
        println!("Solvers: {} solved, {} failed", successes, failures);
        println!("Total parse time: {}", format_duration(total_parse_time));
        println!("Total solve time: {}", format_duration(total_solve_time));
        println!("Elapsed wall-clock time: {}", format_duration(elapsed));
    }
}

fn format_line(result: &SolverResult, answer: &str) -> String {
    let parse_timing = result
        .parse_duration
        .map(|d| format!("parse: {}, ", format_duration(d)))
        .unwrap_or_default();
    format!(
        "{}/{:02} Part {}: {} ({}solve: {})",
        result.year,
        result.day,
        result.part,
        answer,
        parse_timing,
        format_duration(result.solve_duration)
    )
}

/// Format a TimeDelta for display
fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}
