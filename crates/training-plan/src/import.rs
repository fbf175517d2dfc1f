//! Exercise import from CSV
//!
//! Expected header: `name,type,duration,description,equipment,players,area,
//! intensity,coaching_points,variations`. Only `name` is required; coaching
//! points are separated by `|`.

use crate::types::*;
use std::path::Path;

pub async fn load_exercises_from_csv(path: impl AsRef<Path>) -> Result<Vec<ExerciseDraft>> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let drafts = tokio::task::spawn_blocking(move || parse_exercises(&contents)).await??;

    log::info!("Read {} exercises from {}", drafts.len(), path.display());
    Ok(drafts)
}

pub fn parse_exercises(contents: &str) -> Result<Vec<ExerciseDraft>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    let mut drafts = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let field = |index: usize| record.get(index).unwrap_or("").to_string();

        let name = field(0);
        if name.is_empty() {
            log::warn!("Skipping CSV row {} without a name", row + 2);
            continue;
        }

        let defaults = ExerciseDraft::default();
        drafts.push(ExerciseDraft {
            name,
            kind: ExerciseType::parse(&field(1)).unwrap_or(defaults.kind),
            duration_minutes: field(2).parse().unwrap_or(defaults.duration_minutes),
            description: field(3),
            equipment: field(4),
            players: field(5),
            area: field(6),
            intensity: Intensity::parse(&field(7)).unwrap_or(defaults.intensity),
            coaching_points: field(8)
                .split('|')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            variations: field(9),
            ..defaults
        });
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_row() {
        let csv = "name,type,duration,description,equipment,players,area,intensity,coaching_points,variations\n\
                   Rondo,warm-up,15,Keep the ball,cones,5v2,10x10,low,First touch | Body shape,Two touch\n";
        let drafts = parse_exercises(csv).unwrap();
        assert_eq!(drafts.len(), 1);
        let rondo = &drafts[0];
        assert_eq!(rondo.name, "Rondo");
        assert_eq!(rondo.kind, ExerciseType::WarmUp);
        assert_eq!(rondo.duration_minutes, 15);
        assert_eq!(rondo.intensity, Intensity::Low);
        assert_eq!(rondo.coaching_points, vec!["First touch", "Body shape"]);
        assert_eq!(rondo.variations, "Two touch");
    }

    #[test]
    fn test_short_rows_and_bad_values_use_defaults() {
        let csv = "name,type,duration\nFinishing,sprint,lots\n,main,10\n";
        let drafts = parse_exercises(csv).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].kind, ExerciseType::Main);
        assert_eq!(drafts[0].duration_minutes, 10);
        assert_eq!(drafts[0].intensity, Intensity::Medium);
        assert!(drafts[0].coaching_points.is_empty());
    }
}
