use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{Context, Result};
use pose_activity::core_modules::timeline::ActivityTimeline;
use pose_activity::logging::{LogConfig, init_tracing};
use pose_activity::{ActivityClassifier, ClassifierConfig, Frame};
use tracing::warn;

fn main() -> Result<()> {
    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: activity_tester <frames.jsonl> [config.toml]");
        return Ok(());
    }
    let frames_path = &args[1];

    init_tracing(&LogConfig::default());

    let config = match args.get(2) {
        Some(path) => ClassifierConfig::load(path).with_context(|| format!("loading config {path}"))?,
        None => ClassifierConfig::default(),
    };

    // --- 2. Frame Source ---
    // One detector frame per line, as JSON.
    let file = File::open(frames_path).with_context(|| format!("opening {frames_path}"))?;
    let reader = BufReader::new(file);

    // --- 3. Classification Loop ---
    let mut classifier = ActivityClassifier::new(config);
    let mut timeline = ActivityTimeline::new();
    let mut skipped = 0usize;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {frames_path}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let frame = match Frame::from_json(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(line = line_number + 1, error = %e, "skipping malformed frame");
                skipped += 1;
                continue;
            }
        };

        let report = classifier.classify_detailed(&frame);
        let frame_index = timeline.frame_count();
        timeline.record(report.label);

        match report.features {
            Some(f) => println!(
                "{frame_index:>6}  {:<14} knees {:>5.1}/{:<5.1} hips {:>5.1}/{:<5.1} moving={} waving={}",
                report.label.as_str(),
                f.left_knee_angle,
                f.right_knee_angle,
                f.left_hip_angle,
                f.right_hip_angle,
                report.moving,
                report.waving,
            ),
            None => println!("{frame_index:>6}  {:<14} (incomplete frame)", report.label.as_str()),
        }
    }

    // --- 4. Summary ---
    let total = timeline.frame_count();
    let segments = timeline.finish();
    println!();
    println!("{total} frames classified, {skipped} skipped, {} segments", segments.len());
    for segment in &segments {
        println!(
            "  frames {:>6}..={:<6} {:<14} ({} frames)",
            segment.start_frame,
            segment.end_frame,
            segment.label.as_str(),
            segment.frame_count()
        );
    }

    Ok(())
}
