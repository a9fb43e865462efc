//! Recorded observation traces.
//!
//! A trace is a JSON-lines file, one `{"timestamp_ms": .., "observation": ..}`
//! record per tick, captured from a live screening run. Replaying it through a
//! session reproduces the run exactly, since the engine has no hidden state
//! beyond what the observations and timestamps carry.

use crate::baseline::PriorBaseline;
use crate::features::FeatureExtractor;
use crate::session::{AlertState, Detection, DetectionResult, DetectionSession};
use crate::{Error, Result};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// One tick of a recorded trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord<O> {
    /// Monotonic timestamp of the tick
    pub timestamp_ms: f64,
    /// Observation delivered at that tick
    pub observation: O,
}

/// Parse a JSON-lines trace, skipping blank lines
pub fn read_trace<O: DeserializeOwned, R: BufRead>(reader: R) -> Result<Vec<TraceRecord<O>>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|e| Error::InvalidInput(format!("Trace line {}: {e}", index + 1)))?;
        records.push(record);
    }
    debug!("Read {} trace records", records.len());
    Ok(records)
}

/// What happened over a replayed trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    /// Records fed to the session
    pub ticks: usize,
    /// Records that produced a signal
    pub scored: usize,
    /// Records skipped for lack of a signal
    pub skipped: usize,
    /// Timestamp at which calibration completed, if it did during the trace
    pub calibrated_at_ms: Option<f64>,
    /// Timestamp at which the alert latched, if it did
    pub alerted_at_ms: Option<f64>,
    /// State after the last record
    pub final_state: AlertState,
    /// Baseline at the end of the trace, once calibrated
    pub baseline: Option<PriorBaseline>,
}

/// Feed every record to `session`, calling `on_result` for each scored tick
pub fn replay<E, F>(
    session: &mut DetectionSession<E>,
    records: &[TraceRecord<E::Observation>],
    mut on_result: F,
) -> ReplaySummary
where
    E: FeatureExtractor,
    F: FnMut(&DetectionResult),
{
    let mut summary = ReplaySummary {
        ticks: 0,
        scored: 0,
        skipped: 0,
        calibrated_at_ms: None,
        alerted_at_ms: None,
        final_state: session.state(),
        baseline: None,
    };

    for record in records {
        let previous = session.state();
        summary.ticks += 1;

        match session.detect_frame(&record.observation, record.timestamp_ms) {
            Detection::Scored(result) => {
                summary.scored += 1;
                if previous == AlertState::Calibrating && result.state != AlertState::Calibrating {
                    info!("Calibrated at {:.1}ms", result.timestamp_ms);
                    summary.calibrated_at_ms = Some(result.timestamp_ms);
                }
                if previous != AlertState::Alerted && result.state == AlertState::Alerted {
                    info!("Alert at {:.1}ms (persistence {})", result.timestamp_ms, result.persistence);
                    summary.alerted_at_ms = Some(result.timestamp_ms);
                }
                on_result(&result);
            }
            Detection::NoSignal(_) => summary.skipped += 1,
        }
    }

    summary.final_state = session.state();
    summary.baseline = session.baseline_snapshot();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::features::speech::{SpeechRateExtractor, SpeechSegment};
    use std::io::Cursor;

    #[test]
    fn test_read_trace_skips_blank_lines() {
        let input = r#"{"timestamp_ms": 0.0, "observation": {"text": "ola", "duration_secs": 1.0}}

{"timestamp_ms": 1000.0, "observation": {"text": "", "duration_secs": 1.0}}
"#;
        let records: Vec<TraceRecord<SpeechSegment>> = read_trace(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].timestamp_ms, 1000.0);
    }

    #[test]
    fn test_read_trace_reports_line() {
        let err = read_trace::<SpeechSegment, _>(Cursor::new("{}\n")).unwrap_err();
        assert!(err.to_string().contains("Trace line 1"));
    }

    #[test]
    fn test_replay_summary() {
        let config = SessionConfig {
            baseline_capacity: 2,
            recent_capacity: 1,
            persist_limit: 1,
            min_threshold: 1.0,
            ..SessionConfig::default()
        };
        let mut session = DetectionSession::new(config, SpeechRateExtractor).unwrap();

        let records: Vec<TraceRecord<SpeechSegment>> = [("aaaaa", 0.0), ("", 1.0), ("aaaaa", 2.0), ("a", 3.0)]
            .iter()
            .map(|&(text, t)| TraceRecord {
                timestamp_ms: t,
                observation: SpeechSegment::new(text, 1.0),
            })
            .collect();

        let mut seen = 0;
        let summary = replay(&mut session, &records, |_| seen += 1);

        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.scored, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(seen, 3);
        assert_eq!(summary.calibrated_at_ms, Some(2.0));
        assert_eq!(summary.alerted_at_ms, Some(3.0));
        assert_eq!(summary.final_state, AlertState::Alerted);
        assert!(summary.baseline.is_some());
    }
}
