use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formfit_core::models::ExerciseType;
use formfit_core::services::PatternLibrary;

#[derive(Args)]
pub struct PatternsCommand {
    /// Exercise to list reference patterns for (all when omitted)
    exercise: Option<String>,

    /// Print the patterns as JSON
    #[arg(long)]
    json: bool,
}

impl PatternsCommand {
    pub fn execute(self) -> Result<()> {
        let library = PatternLibrary::new();

        let exercises = match &self.exercise {
            Some(name) => vec![ExerciseType::from(name.clone())],
            None => library.exercise_types(),
        };

        let patterns: Vec<_> = exercises
            .iter()
            .flat_map(|exercise| library.reference_patterns(exercise))
            .collect();

        if patterns.is_empty() {
            let known: Vec<String> = library
                .exercise_types()
                .iter()
                .map(ExerciseType::to_string)
                .collect();
            anyhow::bail!(
                "No reference patterns for '{}'. Known exercises: {}",
                self.exercise.unwrap_or_default(),
                known.join(", ")
            );
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&patterns)?);
            return Ok(());
        }

        for exercise in &exercises {
            println!("{}", exercise.to_string().bold().cyan());
            for pattern in library.reference_patterns(exercise) {
                println!(
                    "  {:<8} {:?}  accel {:?}  gyro {:?}",
                    pattern.phase,
                    pattern.label,
                    pattern.sample.acceleration,
                    pattern.sample.gyroscope
                );
            }
        }

        Ok(())
    }
}
