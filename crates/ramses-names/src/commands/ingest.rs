//! Ingest handler: apply newline-delimited observations.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use ramses_names_core::{Applied, Observation, Outcome};

use crate::cli::{GlobalOpts, IngestArgs};
use crate::error::CliError;
use crate::output;

use super::Resolver;

/// What one ingest run did.
#[derive(Debug, Default, Serialize)]
struct IngestSummary {
    lines: usize,
    created: usize,
    updated: usize,
    confirmed: usize,
    roles_added: usize,
    malformed: usize,
    rejected: usize,
    save_failures: u64,
}

impl IngestSummary {
    fn record(&mut self, applied: &Applied) {
        match applied {
            Applied::Name(Outcome::Created) => self.created += 1,
            Applied::Name(Outcome::Updated { .. }) => self.updated += 1,
            Applied::Name(Outcome::Confirmed) | Applied::Role { changed: false } => {
                self.confirmed += 1;
            }
            Applied::Role { changed: true } => self.roles_added += 1,
        }
    }
}

fn detail(s: &IngestSummary) -> String {
    [
        format!("Lines:         {}", s.lines),
        format!("Created:       {}", s.created),
        format!("Updated:       {}", s.updated),
        format!("Confirmed:     {}", s.confirmed),
        format!("Roles added:   {}", s.roles_added),
        format!("Malformed:     {}", s.malformed),
        format!("Rejected:      {}", s.rejected),
        format!("Save failures: {}", s.save_failures),
    ]
    .join("\n")
}

fn open_input(file: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    match file {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let f = File::open(path).map_err(|source| CliError::Input {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufReader::new(f)))
        }
    }
}

/// Apply every observation in `input`. Bad lines are logged and counted.
fn ingest(resolver: &Resolver, input: impl BufRead) -> Result<IngestSummary, CliError> {
    let failures_before = resolver.stats().save_failures;
    let mut summary = IngestSummary::default();

    for (idx, line) in input.split(b'\n').enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let line = match String::from_utf8(line) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping non-UTF-8 observation");
                summary.lines += 1;
                summary.malformed += 1;
                continue;
            }
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        summary.lines += 1;

        let observation: Observation = match serde_json::from_str(text) {
            Ok(obs) => obs,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping malformed observation");
                summary.malformed += 1;
                continue;
            }
        };

        match resolver.apply(&observation) {
            Ok(applied) => summary.record(&applied),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "observation rejected");
                summary.rejected += 1;
            }
        }
    }

    summary.save_failures = resolver.stats().save_failures - failures_before;
    Ok(summary)
}

pub fn handle(resolver: &Resolver, args: &IngestArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let input = open_input(args.file.as_deref())?;
    let summary = ingest(resolver, input)?;

    tracing::info!(
        lines = summary.lines,
        malformed = summary.malformed,
        rejected = summary.rejected,
        "ingest finished"
    );

    let rendered = output::render_single(global.output, &summary, detail, |s| {
        s.lines.to_string()
    })?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ramses_names_core::{EntityKind, JsonFileStore, NameResolver};

    fn resolver_in(dir: &tempfile::TempDir) -> Resolver {
        NameResolver::open(JsonFileStore::new(dir.path().join("cache.json")))
    }

    #[test]
    fn mixed_input_is_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_in(&dir);
        let input = concat!(
            r#"{"type":"zone_name_observed","zone_index":"02","name":"Kitchen","ts":100}"#,
            "\n",
            "\n",
            "{not json\n",
            r#"{"type":"zone_name_observed","zone_index":"03","name":"unknown","ts":101}"#,
            "\n",
            r#"{"type":"zone_name_observed","zone_index":"02","name":"Kitchen","ts":102}"#,
            "\n",
            r#"{"type":"zone_device_role_observed","zone_index":"02","role":"zone_sensor","device_id":"04:122498","ts":103}"#,
            "\n",
        );

        let summary = ingest(&resolver, input.as_bytes()).unwrap();

        assert_eq!(summary.lines, 5);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.confirmed, 1);
        assert_eq!(summary.roles_added, 1);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(resolver.resolve(EntityKind::Zone, "02"), "Kitchen");
    }

    #[test]
    fn non_utf8_line_is_skipped_and_later_lines_apply() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_in(&dir);
        let mut input = Vec::new();
        input.extend_from_slice(
            br#"{"type":"zone_name_observed","zone_index":"01","name":"Lounge","ts":100}"#,
        );
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(
            br#"{"type":"zone_name_observed","zone_index":"02","name":"Kitchen","ts":101}"#,
        );
        input.push(b'\n');

        let summary = ingest(&resolver, input.as_slice()).unwrap();

        assert_eq!(summary.lines, 3);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.malformed, 1);
        assert_eq!(resolver.resolve(EntityKind::Zone, "01"), "Lounge");
        assert_eq!(resolver.resolve(EntityKind::Zone, "02"), "Kitchen");
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = open_input(Some(Path::new("/nonexistent/observations.jsonl")))
            .err()
            .unwrap();
        assert!(matches!(err, CliError::Input { .. }));
    }
}
