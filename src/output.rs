//! Slicer output parsing
//!
//! Extracts filament mass and print duration from what the engine printed to
//! its console, falling back to the generated machine-code file's comment
//! lines when the console output is incomplete. The engines have changed
//! their output wording over the years, so each physical quantity is matched
//! against an ordered list of `(pattern, extractor)` rules with
//! first-confirmed-match-wins semantics. New dialects are added to the rule
//! tables, not to the
//! control flow.
//!
//! Known dialects:
//!
//! - `; total filament used [g] = 12.34` (bracket-qualified grams, current)
//! - `filament used = 12.34g` (legacy)
//! - `estimated printing time (normal mode) = 1h 23m` (hours + minutes)
//! - `estimated printing time = 5m 33s` (minutes + seconds, rounded up to
//!   the next minute at >= 30 s)

use crate::error::Result;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Physical quantities extracted from one slicing run
///
/// Never partially populated: a quantity that could not be resolved by
/// either parsing tier is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicingOutcome {
    /// Filament mass in grams
    pub filament_grams: f64,
    /// Print duration in whole minutes
    pub print_minutes: u32,
}

static MASS_BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)total filament used.*\[g\]\s*=\s*([0-9.]+)").expect("mass pattern")
});
static MASS_LEGACY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)filament used\s*=\s*([0-9.]+)\s*g").expect("legacy mass pattern")
});
static MASS_ANY_GRAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9.]+)\s*g").expect("gram pattern"));
static DURATION_HOURS_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)estimated printing time.*=\s*([0-9]+)h\s*([0-9]+)m").expect("h/m pattern")
});
static DURATION_MINUTES_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)estimated printing time.*=\s*([0-9]+)m\s*([0-9]+)s").expect("m/s pattern")
});
static FILE_DURATION_HOURS_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*([0-9]+)h\s*([0-9]+)m").expect("file h/m pattern"));
static FILE_DURATION_MINUTES_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*([0-9]+)m\s*([0-9]+)s").expect("file m/s pattern"));
static FILE_DURATION_LEGACY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*m").expect("legacy duration pattern"));

/// Pre-filter applied to a lowercased line before the regex runs
type LineFilter = fn(&str) -> bool;

struct MassRule {
    pattern: &'static LazyLock<Regex>,
    filter: LineFilter,
}

struct DurationRule {
    pattern: &'static LazyLock<Regex>,
    filter: LineFilter,
    minutes: fn(&Captures<'_>) -> Option<u32>,
}

fn any_line(_: &str) -> bool {
    true
}

fn mass_grams(captures: &Captures<'_>) -> Option<f64> {
    captures.get(1)?.as_str().parse().ok()
}

fn hours_minutes(captures: &Captures<'_>) -> Option<u32> {
    let hours: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = captures.get(2)?.as_str().parse().ok()?;
    Some(hours * 60 + minutes)
}

/// Seconds round up to the next minute at >= 30
fn minutes_seconds(captures: &Captures<'_>) -> Option<u32> {
    let minutes: u32 = captures.get(1)?.as_str().parse().ok()?;
    let seconds: u32 = captures.get(2)?.as_str().parse().ok()?;
    Some(minutes + u32::from(seconds >= 30))
}

fn legacy_minutes(captures: &Captures<'_>) -> Option<u32> {
    captures.get(1)?.as_str().parse().ok()
}

static CONSOLE_MASS_RULES: [MassRule; 2] = [
    MassRule {
        pattern: &MASS_BRACKET,
        filter: any_line,
    },
    MassRule {
        pattern: &MASS_LEGACY,
        filter: any_line,
    },
];

static CONSOLE_DURATION_RULES: [DurationRule; 2] = [
    DurationRule {
        pattern: &DURATION_HOURS_MINUTES,
        filter: any_line,
        minutes: hours_minutes,
    },
    DurationRule {
        pattern: &DURATION_MINUTES_SECONDS,
        filter: any_line,
        minutes: minutes_seconds,
    },
];

fn bracket_mass_comment(line: &str) -> bool {
    // Purge/wipe-tower allowances also report "total filament used"
    line.contains("total filament used") && line.contains("[g]") && !line.contains("wipe tower")
}

fn legacy_mass_comment(line: &str) -> bool {
    line.contains("filament") && line.contains("weight")
}

fn duration_comment(line: &str) -> bool {
    line.contains("estimated printing time") && line.contains('=')
}

fn legacy_duration_comment(line: &str) -> bool {
    line.contains("time") || line.contains("duration")
}

static FILE_MASS_RULES: [MassRule; 2] = [
    MassRule {
        pattern: &MASS_BRACKET,
        filter: bracket_mass_comment,
    },
    MassRule {
        pattern: &MASS_ANY_GRAMS,
        filter: legacy_mass_comment,
    },
];

static FILE_DURATION_RULES: [DurationRule; 3] = [
    DurationRule {
        pattern: &FILE_DURATION_MINUTES_SECONDS,
        filter: duration_comment,
        minutes: minutes_seconds,
    },
    DurationRule {
        pattern: &FILE_DURATION_HOURS_MINUTES,
        filter: duration_comment,
        minutes: hours_minutes,
    },
    DurationRule {
        pattern: &FILE_DURATION_LEGACY,
        filter: legacy_duration_comment,
        minutes: legacy_minutes,
    },
];

/// Parse the engine's console output and, when incomplete, the generated
/// machine-code file
///
/// File-level fallback only contributes when it resolves at least one
/// non-zero quantity; console-only parses succeed unconditionally.
pub fn parse_slicer_output(stdout: &str, gcode_path: &Path) -> Result<SlicingOutcome> {
    let (mut mass, mut minutes) = scan(
        stdout.lines(),
        &CONSOLE_MASS_RULES,
        &CONSOLE_DURATION_RULES,
    );

    if (mass.is_none() || minutes.is_none()) && gcode_path.exists() {
        debug!(path = %gcode_path.display(), "console output incomplete, scanning machine-code file");
        let (file_mass, file_minutes) = parse_gcode_file(gcode_path)?;
        let resolved_any = file_mass.unwrap_or(0.0) > 0.0 || file_minutes.unwrap_or(0) > 0;
        if resolved_any {
            if mass.is_none() {
                mass = file_mass;
            }
            if minutes.is_none() {
                minutes = file_minutes;
            }
        }
    }

    let outcome = SlicingOutcome {
        filament_grams: mass.unwrap_or(0.0),
        print_minutes: minutes.unwrap_or(0),
    };
    info!(
        grams = outcome.filament_grams,
        minutes = outcome.print_minutes,
        "slicer output parsed"
    );
    Ok(outcome)
}

/// Scan the machine-code file's comment lines for both quantities
pub fn parse_gcode_file(path: &Path) -> Result<(Option<f64>, Option<u32>)> {
    let content = fs::read_to_string(path)?;
    let comments = content.lines().filter(|line| line.starts_with(';'));
    Ok(scan(comments, &FILE_MASS_RULES, &FILE_DURATION_RULES))
}

fn scan<'a>(
    lines: impl Iterator<Item = &'a str>,
    mass_rules: &[MassRule],
    duration_rules: &[DurationRule],
) -> (Option<f64>, Option<u32>) {
    let mut mass = None;
    let mut minutes = None;

    for line in lines {
        if mass.is_some() && minutes.is_some() {
            break;
        }
        let lower = line.to_lowercase();

        if mass.is_none() {
            mass = mass_rules.iter().find_map(|rule| {
                if !(rule.filter)(&lower) {
                    return None;
                }
                rule.pattern
                    .captures(line)
                    .as_ref()
                    .and_then(mass_grams)
            });
        }

        if minutes.is_none() {
            minutes = duration_rules.iter().find_map(|rule| {
                if !(rule.filter)(&lower) {
                    return None;
                }
                rule.pattern
                    .captures(line)
                    .as_ref()
                    .and_then(|c| (rule.minutes)(c))
            });
        }
    }

    (mass, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_bracket_mass_marker() {
        let (mass, _) = scan(
            "; total filament used [g] = 12.34".lines(),
            &CONSOLE_MASS_RULES,
            &CONSOLE_DURATION_RULES,
        );
        assert_eq!(mass, Some(12.34));
    }

    #[test]
    fn test_legacy_mass_marker() {
        let (mass, _) = scan(
            "filament used = 0.67g".lines(),
            &CONSOLE_MASS_RULES,
            &CONSOLE_DURATION_RULES,
        );
        assert_eq!(mass, Some(0.67));
    }

    #[test]
    fn test_hours_minutes_duration() {
        let (_, minutes) = scan(
            "estimated printing time (normal mode) = 1h 23m".lines(),
            &CONSOLE_MASS_RULES,
            &CONSOLE_DURATION_RULES,
        );
        assert_eq!(minutes, Some(83));
    }

    #[test]
    fn test_minutes_seconds_rounds_up_at_thirty() {
        let (_, minutes) = scan(
            "estimated printing time = 5m 33s".lines(),
            &CONSOLE_MASS_RULES,
            &CONSOLE_DURATION_RULES,
        );
        assert_eq!(minutes, Some(6));

        let (_, minutes) = scan(
            "estimated printing time = 5m 29s".lines(),
            &CONSOLE_MASS_RULES,
            &CONSOLE_DURATION_RULES,
        );
        assert_eq!(minutes, Some(5));
    }

    #[test]
    fn test_first_match_wins_per_quantity() {
        let output = "; total filament used [g] = 10.0\n; total filament used [g] = 99.0";
        let (mass, _) = scan(output.lines(), &CONSOLE_MASS_RULES, &CONSOLE_DURATION_RULES);
        assert_eq!(mass, Some(10.0));
    }

    #[test]
    fn test_console_only_success_without_fallback() {
        let outcome = parse_slicer_output(
            "; total filament used [g] = 7.5\nestimated printing time = 0h 42m",
            Path::new("/nonexistent/output.gcode"),
        )
        .unwrap();
        assert_eq!(outcome.filament_grams, 7.5);
        assert_eq!(outcome.print_minutes, 42);
    }

    #[test]
    fn test_missing_everything_yields_zeroes() {
        let outcome =
            parse_slicer_output("no markers here", Path::new("/nonexistent/out.gcode")).unwrap();
        assert_eq!(outcome.filament_grams, 0.0);
        assert_eq!(outcome.print_minutes, 0);
    }

    #[test]
    fn test_gcode_fallback_fills_missing_quantities() {
        let dir = tempfile::tempdir().unwrap();
        let gcode = dir.path().join("part_output.gcode");
        fs::write(
            &gcode,
            "G1 X10 Y10\n\
             ; total filament used [g] = 3.21\n\
             ; estimated printing time (normal mode) = 2h 5m\n",
        )
        .unwrap();

        let outcome = parse_slicer_output("console said nothing useful", &gcode).unwrap();
        assert_eq!(outcome.filament_grams, 3.21);
        assert_eq!(outcome.print_minutes, 125);
    }

    #[test]
    fn test_gcode_wipe_tower_lines_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let gcode = dir.path().join("part_output.gcode");
        fs::write(
            &gcode,
            "; total filament used [g] (wipe tower) = 50.0\n\
             ; total filament used [g] = 4.0\n",
        )
        .unwrap();

        let (mass, _) = parse_gcode_file(&gcode).unwrap();
        assert_eq!(mass, Some(4.0));
    }

    #[test]
    fn test_gcode_legacy_weight_comment() {
        let dir = tempfile::tempdir().unwrap();
        let gcode = dir.path().join("part_output.gcode");
        fs::write(&gcode, "; filament weight: 8.5 g\n").unwrap();

        let (mass, _) = parse_gcode_file(&gcode).unwrap();
        assert_eq!(mass, Some(8.5));
    }

    #[test]
    fn test_gcode_ignores_non_comment_lines() {
        let dir = tempfile::tempdir().unwrap();
        let gcode = dir.path().join("part_output.gcode");
        fs::write(&gcode, "M117 total filament used [g] = 99.0\n").unwrap();

        let (mass, minutes) = parse_gcode_file(&gcode).unwrap();
        assert_eq!(mass, None);
        assert_eq!(minutes, None);
    }

    #[test]
    fn test_console_values_win_over_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let gcode = dir.path().join("part_output.gcode");
        fs::write(&gcode, "; total filament used [g] = 99.0\n").unwrap();

        let outcome = parse_slicer_output(
            "; total filament used [g] = 1.0",
            &gcode,
        )
        .unwrap();
        assert_eq!(outcome.filament_grams, 1.0);
    }

    #[test]
    fn test_zero_only_fallback_does_not_count_as_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let gcode = dir.path().join("part_output.gcode");
        fs::write(&gcode, "; total filament used [g] = 0.0\n").unwrap();

        let outcome = parse_slicer_output("nothing", &gcode).unwrap();
        assert_eq!(outcome.filament_grams, 0.0);
        assert_eq!(outcome.print_minutes, 0);
    }
}
