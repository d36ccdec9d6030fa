use std::fmt::Write;

use crate::models::SimConfig;
use crate::simulation::TickReport;

pub trait Formatter {
    fn write(&self, report: &TickReport) -> String;
}

pub struct HumanFormatter;
pub struct JsonFormatter;

impl Formatter for HumanFormatter {
    fn write(&self, report: &TickReport) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Tick {}:", report.tick);

        for outcome in &report.assignments {
            let _ = write!(
                output,
                "Request {} ({} -> {}) -> E{} [{}]",
                outcome.request_id,
                outcome.source_floor,
                outcome.destination_floor,
                outcome.elevator_id,
                outcome.tier
            );
            if outcome.already_at_destination {
                output.push_str(" already at destination");
            }
            output.push('\n');
        }

        for elevator in &report.elevators {
            let _ = writeln!(output, "{}", elevator);
        }
        let _ = writeln!(output, "Pending: {}", report.pending);

        output
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, report: &TickReport) -> String {
        match serde_json::to_string(report) {
            Ok(line) => format!("{}\n", line),
            Err(err) => format!("{{\"error\":\"{}\"}}\n", err),
        }
    }
}

pub fn describe_config(config: &SimConfig) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Elevators: {}", config.elevators_quantity);
    let _ = writeln!(output, "Floors: {}..={}", config.min_floor, config.max_floor);
    let _ = writeln!(
        output,
        "Loop interval: {}ms",
        config.loop_interval_milliseconds
    );
    let random = &config.random_request_service;
    if random.enabled {
        let _ = writeln!(
            output,
            "Random requests: every {}ms",
            random.interval_milliseconds
        );
    } else {
        output.push_str("Random requests: disabled\n");
    }
    match config.seed {
        Some(seed) => {
            let _ = writeln!(output, "Seed: {}", seed);
        }
        None => output.push_str("Seed: none\n"),
    }
    output
}
