//! Summary reporting for a planned drive.
//!
//! [`summary_rows`] flattens a [`DriveLayout`] into ordered field/value
//! pairs; [`write_csv`] persists them as a two-column `Field,Value` file.
//! Field names and number formats are stable so downstream spreadsheets
//! can key on them.

use crate::errors::{BeltError, BeltResult};
use crate::layout::DriveLayout;
use crate::pulley::PulleyRole;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Flatten a layout into ordered `(field, value)` rows.
///
/// Ratio-search fields are present in every report; in manual mode their
/// values are empty so the column set never shifts.
#[must_use]
pub fn summary_rows(layout: &DriveLayout) -> Vec<(String, String)> {
    let config = &layout.config;
    let belt = &config.belt;

    let mut rows: Vec<(String, String)> = Vec::with_capacity(32);
    let mut push = |field: &str, value: String| rows.push((field.to_owned(), value));

    push("DriveTeeth", layout.drive.tooth_count().to_string());
    push("DrivenTeeth", layout.driven.tooth_count().to_string());

    match &layout.ratio_solution {
        Some(solution) => {
            push("SelectionMode", "auto_ratio".to_owned());
            let search = layout.config.ratio_search();
            push(
                "TargetRatioDrivenToDrive",
                search
                    .map(|s| format!("{:.6}", s.target_ratio))
                    .unwrap_or_default(),
            );
            push(
                "RatioError_pct",
                format!("{:.6}", solution.ratio_error * 100.0),
            );
            push(
                "MaxPulleyDiameterLimit_mm",
                search
                    .map(|s| format!("{:.4}", s.max_pulley_diameter))
                    .unwrap_or_default(),
            );
            push(
                "ToothRangeMin",
                search.map(|s| s.min_teeth.to_string()).unwrap_or_default(),
            );
            push(
                "ToothRangeMax",
                search.map(|s| s.max_teeth.to_string()).unwrap_or_default(),
            );
        },
        None => {
            push("SelectionMode", "manual".to_owned());
            push("TargetRatioDrivenToDrive", String::new());
            push("RatioError_pct", String::new());
            push("MaxPulleyDiameterLimit_mm", String::new());
            push("ToothRangeMin", String::new());
            push("ToothRangeMax", String::new());
        },
    }

    push("RatioDrivenToDrive", format!("{:.6}", layout.actual_ratio()));
    push("DrivenSpeedFactor", format!("{:.6}", layout.speed_factor()));

    push("BeltPitch_mm", format!("{:.4}", belt.belt_pitch));
    push("ToothHeight_mm", format!("{:.4}", belt.tooth_height));
    push("TipClearance_mm", format!("{:.4}", belt.tip_clearance));
    push("PulleyThickness_mm", format!("{:.4}", config.pulley_thickness));
    push("BeltWidth_mm", format!("{:.4}", config.belt_width));
    push(
        "DriveBoreDiameter_mm",
        format!("{:.4}", config.drive_bore_diameter),
    );
    push(
        "DrivenBoreDiameter_mm",
        format!("{:.4}", config.driven_bore_diameter),
    );

    push("CenterDistance_mm", format!("{:.4}", layout.center_distance));
    push(
        "CenterDistance_pitches",
        format!("{:.6}", layout.center_in_pitches()),
    );
    push("CenterSource", layout.center_source.describe().to_owned());

    push("RawBeltToothCount", layout.link_count.raw.to_string());
    push("FinalBeltToothCount", layout.link_count.adjusted.to_string());
    push(
        "EvenToothAdjusted",
        yes_no(layout.link_count.even_adjusted),
    );
    push(
        "OddToothPhaseIndexingNote",
        yes_no(layout.link_count.requires_phase_indexing()),
    );

    push("EffectivePitch_mm", format!("{:.4}", layout.effective_pitch));
    push(
        "PitchDeviation_pct",
        format!("{:.6}", layout.pitch_deviation_pct()),
    );
    push(
        "DriveWrap_deg",
        format!("{:.4}", layout.path.wrap_degrees(PulleyRole::Drive)),
    );
    push(
        "DrivenWrap_deg",
        format!("{:.4}", layout.path.wrap_degrees(PulleyRole::Driven)),
    );

    push(
        "EngineeringWarnings",
        layout
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | "),
    );

    rows
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_owned()
}

/// Write rows to `path` as a two-column CSV with a `Field,Value` header.
pub fn write_csv(path: &Path, rows: &[(String, String)]) -> BeltResult<()> {
    let io_err = |source: std::io::Error| BeltError::IoWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "Field,Value").map_err(io_err)?;
    for (field, value) in rows {
        writeln!(writer, "{},{}", escape_csv(field), escape_csv(value)).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    info!(path = %path.display(), rows = rows.len(), "summary CSV written");
    Ok(())
}

/// Quote a CSV field when it contains a comma, quote, or newline.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
