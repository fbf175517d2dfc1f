mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use training_pdf::ExportOptions;
use training_plan::{
    ExerciseDraft, ExerciseId, ExerciseType, HeightEstimator, HeightProvider, Illustration,
    Intensity, MeasuredHeights, PageSetup, PaperSize, RenderContext, Session, SessionPatch,
    SessionStore, SessionSummary, Unmeasured, load_session, paginate, save_session, used_height,
};

#[derive(Parser)]
#[command(name = "tplan", about = "Training session planner", version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new, empty session file
    Init {
        /// Session JSON file to create
        #[arg(short, long)]
        output: PathBuf,

        /// Session name
        #[arg(long)]
        name: Option<String>,

        /// Session date (YYYY-MM-DD), today if omitted
        #[arg(long)]
        date: Option<String>,

        /// Start time (HH:MM)
        #[arg(long)]
        time: Option<String>,

        /// Planned duration in minutes
        #[arg(long)]
        duration: Option<u32>,

        /// Number of players
        #[arg(long)]
        players: Option<u32>,

        /// Load level, 1 to 10
        #[arg(long)]
        load: Option<u8>,

        /// Session equipment
        #[arg(long)]
        equipment: Option<String>,

        /// Session objectives
        #[arg(long)]
        objectives: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Append an exercise to a session
    Add {
        /// Session JSON file
        #[arg(short, long)]
        session: PathBuf,

        /// Exercise name
        #[arg(long)]
        name: String,

        /// Exercise type
        #[arg(long = "type", default_value = "main", value_enum)]
        kind: TypeArg,

        /// Duration in minutes
        #[arg(long, default_value = "10")]
        duration: u32,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        equipment: String,

        /// Players, e.g. "4v4 + 2"
        #[arg(long, default_value = "")]
        players: String,

        /// Area, e.g. "30x20m"
        #[arg(long, default_value = "")]
        area: String,

        #[arg(long, default_value = "medium", value_enum)]
        intensity: IntensityArg,

        /// Coaching point (repeatable)
        #[arg(long = "point")]
        coaching_points: Vec<String>,

        #[arg(long, default_value = "")]
        variations: String,

        /// Image URL or data URL for the exercise diagram
        #[arg(long)]
        image: Option<String>,
    },

    /// Remove an exercise from a session
    Remove {
        /// Session JSON file
        #[arg(short, long)]
        session: PathBuf,

        /// Exercise id, e.g. exercise-3
        #[arg(long)]
        id: String,
    },

    /// Move an exercise to a new position (1-based)
    Move {
        /// Session JSON file
        #[arg(short, long)]
        session: PathBuf,

        /// Exercise id, e.g. exercise-3
        #[arg(long)]
        id: String,

        /// Target position, clamped to the end of the list
        #[arg(long)]
        to: usize,
    },

    /// Append exercises from a CSV file
    Import {
        /// Session JSON file
        #[arg(short, long)]
        session: PathBuf,

        /// Input CSV file (columns: name, type, duration, description, ...)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show how exercises split into pages
    Pages {
        /// Session JSON file
        #[arg(short, long)]
        session: PathBuf,

        /// Rendering context to paginate for
        #[arg(long, default_value = "export", value_enum)]
        context: ContextArg,

        /// JSON map of exercise id to measured height (preview only)
        #[arg(long)]
        measured: Option<PathBuf>,

        /// Paper size for export layouts
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Page setup JSON file, overrides --paper
        #[arg(long)]
        layout: Option<PathBuf>,
    },

    /// Print a summary of a session
    Stats {
        /// Session JSON file
        #[arg(short, long)]
        session: PathBuf,
    },

    /// Export a session to PDF
    Export {
        /// Session JSON file
        #[arg(short, long)]
        session: PathBuf,

        /// Output PDF file, named after the session if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output paper size
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Page setup JSON file in points, overrides --paper
        #[arg(long)]
        layout: Option<PathBuf>,

        /// TrueType font to embed, for text outside Latin-1
        #[arg(long)]
        font: Option<PathBuf>,

        /// Leave out page numbers
        #[arg(long)]
        no_page_numbers: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    WarmUp,
    Main,
    CoolDown,
}

#[derive(Clone, Copy, ValueEnum)]
enum IntensityArg {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, ValueEnum)]
enum ContextArg {
    Preview,
    Export,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<TypeArg> for ExerciseType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::WarmUp => Self::WarmUp,
            TypeArg::Main => Self::Main,
            TypeArg::CoolDown => Self::CoolDown,
        }
    }
}

impl From<IntensityArg> for Intensity {
    fn from(arg: IntensityArg) -> Self {
        match arg {
            IntensityArg::Low => Self::Low,
            IntensityArg::Medium => Self::Medium,
            IntensityArg::High => Self::High,
        }
    }
}

impl From<ContextArg> for RenderContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Preview => Self::Preview,
            ContextArg::Export => Self::Export,
        }
    }
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

async fn open_store(path: &Path) -> Result<SessionStore> {
    let session = load_session(path)
        .await
        .with_context(|| format!("Failed to load session {}", path.display()))?;
    Ok(SessionStore::new(session))
}

async fn load_setup(layout: Option<&Path>, context: RenderContext, paper: PaperSize) -> Result<PageSetup> {
    let setup = match layout {
        Some(path) => PageSetup::load(path)
            .await
            .with_context(|| format!("Failed to load page setup {}", path.display()))?,
        None => PageSetup::for_context(context, paper),
    };
    setup.validate_for(context)?;
    Ok(setup)
}

fn print_pages(session: &Session, setup: &PageSetup, heights: &dyn HeightProvider) {
    let budget = setup.budget_for(session);
    let pagination = paginate(&session.exercises, heights, &budget);
    let unit = setup.unit.name();

    for (i, group) in pagination.iter().enumerate() {
        let used = used_height(group.slice(&session.exercises), heights, budget.spacing);
        println!(
            "Page {} ({:?}): {:.1} / {:.1} {}",
            i + 1,
            group.kind,
            used,
            budget.for_kind(group.kind),
            unit
        );
        for (index, exercise) in group.numbered(&session.exercises) {
            println!(
                "  #{:<3} {:<12} {:>7.1}  {}",
                index + 1,
                exercise.id.as_str(),
                heights.height(exercise),
                exercise.display_name()
            );
        }
    }
    if pagination.footer_page {
        println!("Footer ({:.1} {}) moved to its own page", budget.footer, unit);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::from_verbosity(cli.verbose).init()?;

    match cli.command {
        Commands::Init {
            output,
            name,
            date,
            time,
            duration,
            players,
            load,
            equipment,
            objectives,
            force,
        } => {
            if !force && tokio::fs::try_exists(&output).await? {
                bail!("{} already exists (use --force to overwrite)", output.display());
            }
            let mut store = SessionStore::new(Session::default());
            store.update_session(SessionPatch {
                name,
                date,
                time,
                duration_minutes: duration,
                players_count: players,
                load_level: load,
                equipment,
                objectives,
                logo_url: None,
            })?;
            save_session(store.session(), &output).await?;
            println!(
                "Created session \"{}\" → {}",
                store.session().display_name(),
                output.display()
            );
        }

        Commands::Add {
            session,
            name,
            kind,
            duration,
            description,
            equipment,
            players,
            area,
            intensity,
            coaching_points,
            variations,
            image,
        } => {
            let mut store = open_store(&session).await?;
            let id = store.add_exercise(ExerciseDraft {
                kind: kind.into(),
                duration_minutes: duration,
                description,
                equipment,
                players,
                area,
                intensity: intensity.into(),
                coaching_points,
                variations,
                illustration: image.map(Illustration::image),
                ..ExerciseDraft::named(name)
            });
            save_session(store.session(), &session).await?;
            println!("Added {} ({} exercises)", id, store.exercises().len());
        }

        Commands::Remove { session, id } => {
            let mut store = open_store(&session).await?;
            let removed = store.remove_exercise(&ExerciseId::new(id))?;
            save_session(store.session(), &session).await?;
            println!("Removed {} \"{}\"", removed.id, removed.display_name());
        }

        Commands::Move { session, id, to } => {
            let mut store = open_store(&session).await?;
            let id = ExerciseId::new(id);
            store.move_exercise(&id, to.saturating_sub(1))?;
            save_session(store.session(), &session).await?;
            let position = store
                .exercises()
                .iter()
                .position(|ex| ex.id == id)
                .map_or(0, |p| p + 1);
            println!("Moved {} to position {}", id, position);
        }

        Commands::Import { session, input } => {
            let mut store = open_store(&session).await?;
            let drafts = training_plan::load_exercises_from_csv(&input).await?;
            let count = drafts.len();
            for draft in drafts {
                store.add_exercise(draft);
            }
            save_session(store.session(), &session).await?;
            println!("Imported {} exercises from {}", count, input.display());
        }

        Commands::Pages {
            session,
            context,
            measured,
            paper,
            layout,
        } => {
            let store = open_store(&session).await?;
            let context: RenderContext = context.into();
            let setup = load_setup(layout.as_deref(), context, paper.into()).await?;

            match (context, measured) {
                (RenderContext::Preview, Some(path)) => {
                    let mut heights = MeasuredHeights::load(&path, Unmeasured::default()).await?;
                    let stale = heights.prune(store.exercises());
                    if stale > 0 {
                        log::warn!("Ignoring {} measurements for exercises not in the session", stale);
                    }
                    log::info!("Loaded {} measured heights", heights.len());
                    print_pages(store.session(), &setup, &heights);
                }
                (RenderContext::Export, Some(_)) => {
                    bail!("Measured heights only apply to the preview context");
                }
                (context, None) => {
                    let estimator = HeightEstimator::for_context(context);
                    print_pages(store.session(), &setup, &estimator);
                }
            }
        }

        Commands::Stats { session } => {
            let store = open_store(&session).await?;
            let session = store.session();
            let layout = training_pdf::layout_pages(session, &ExportOptions::default());
            let summary = SessionSummary::from_session(session).with_pagination(&layout);

            println!("{}", session.display_name());
            println!(
                "  Date: {} {}",
                training_plan::format_session_date(&session.date),
                session.time
            );
            println!("  Players: {}", session.players_count);
            println!("  Load: {}/10", session.load_level);
            println!(
                "  Objectives: {}",
                training_plan::objectives_abbreviation(&session.objectives)
            );
            println!("  Exercises: {}", summary.exercise_count);
            for (kind, minutes) in &summary.minutes_by_type {
                println!("    {}: {} min", kind.name(), minutes);
            }
            println!(
                "  Total duration: {} of {} planned minutes",
                summary.total_exercise_minutes, summary.planned_minutes
            );
            if summary.overrun_minutes() > 0 {
                println!("  Over plan by {} minutes", summary.overrun_minutes());
            }
            println!("  Coaching points: {}", summary.coaching_points);
            println!("  Illustrated: {}", summary.illustrated);
            if let Some(pages) = summary.page_count {
                println!("  Export pages (A4): {}", pages);
            }
        }

        Commands::Export {
            session,
            output,
            paper,
            layout,
            font,
            no_page_numbers,
        } => {
            let store = open_store(&session).await?;
            let options = ExportOptions {
                setup: load_setup(layout.as_deref(), RenderContext::Export, paper.into()).await?,
                font_path: font,
                page_numbers: !no_page_numbers,
                ..Default::default()
            };
            let output = output.unwrap_or_else(|| {
                PathBuf::from(training_pdf::suggested_file_name(store.session()))
            });

            let pagination = training_pdf::generate_pdf(store.session(), &options, &output).await?;
            println!(
                "Exported {} exercises on {} pages → {}",
                store.exercises().len(),
                pagination.page_count(),
                output.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_layout_unit_must_match_context() {
        let temp_file = NamedTempFile::new().unwrap();
        PageSetup::export(PaperSize::A4)
            .save(temp_file.path())
            .await
            .unwrap();

        let export = load_setup(Some(temp_file.path()), RenderContext::Export, PaperSize::A4).await;
        assert!(export.is_ok());

        let preview = load_setup(Some(temp_file.path()), RenderContext::Preview, PaperSize::A4).await;
        let message = format!("{:#}", preview.unwrap_err());
        assert!(message.contains("px"), "{}", message);
    }

    #[tokio::test]
    async fn test_presets_match_their_context() {
        let preview = load_setup(None, RenderContext::Preview, PaperSize::Letter)
            .await
            .unwrap();
        assert_eq!(preview.unit, training_plan::PageUnit::Pixels);
    }
}
