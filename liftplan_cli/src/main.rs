use clap::{Args, Parser, Subcommand};
use liftplan_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftplan")]
#[command(about = "Starter workout plan generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a starter plan and store it (default)
    Generate(GenerateArgs),

    /// Write a config file with the default settings
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the stored plan
    Show,

    /// List or validate the exercise catalog
    Catalog {
        /// Only list exercises of this movement pattern
        #[arg(long)]
        pattern: Option<String>,

        /// Check the catalog for problems instead of listing it
        #[arg(long)]
        validate: bool,

        /// CSV catalog to read instead of the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Record a performed exercise against a stored routine
    Log {
        routine: String,
        exercise: String,

        #[arg(long)]
        sets: u32,

        #[arg(long)]
        reps: u32,

        #[arg(long, default_value_t = 0.0)]
        weight: f64,

        #[arg(long)]
        rir: Option<u32>,
    },
}

#[derive(Args, Default)]
struct GenerateArgs {
    /// Training days per week (1-5)
    #[arg(long)]
    days: Option<u8>,

    /// gym or home
    #[arg(long)]
    environment: Option<String>,

    /// novice, intermediate or advanced
    #[arg(long)]
    experience: Option<String>,

    /// hypertrophy, strength or general
    #[arg(long)]
    goal: Option<String>,

    /// Multiplier applied to base set counts (0 < scale <= 2)
    #[arg(long)]
    volume_scale: Option<f64>,

    /// Exercise to leave out (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Preferred exercise for a pattern (repeatable)
    #[arg(long = "prefer", value_name = "PATTERN=NAME")]
    prefer: Vec<String>,

    /// Movement restriction to enable, e.g. no_overhead_press (repeatable)
    #[arg(long = "restrict", value_name = "KEY")]
    restrict: Vec<String>,

    /// Muscle group to focus on (repeatable)
    #[arg(long = "target", value_name = "MUSCLE")]
    target: Vec<String>,

    /// Restrict equipment further (repeatable)
    #[arg(long = "equipment", value_name = "EQUIPMENT")]
    equipment: Vec<String>,

    /// Let novices get fresh picks in every routine
    #[arg(long)]
    no_consistency: bool,

    /// Generate without storing the plan
    #[arg(long, alias = "no-persist")]
    dry_run: bool,

    /// Keep stored routines and save colliding ones under new names
    #[arg(long)]
    no_overwrite: bool,

    /// Seed for reproducible selection
    #[arg(long)]
    seed: Option<u64>,

    /// CSV catalog to read instead of the configured one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    liftplan_core::logging::init();

    let cli = Cli::parse();

    let initializing = matches!(cli.command, Some(Commands::Init { .. }));
    let mut config = match &cli.config {
        Some(path) if initializing && !path.exists() => Config::default(),
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Some(Commands::Generate(args)) => cmd_generate(&config, args),
        Some(Commands::Init { force }) => cmd_init(&config, cli.config, force),
        Some(Commands::Show) => cmd_show(&config),
        Some(Commands::Catalog {
            pattern,
            validate,
            catalog,
        }) => cmd_catalog(&config, pattern, validate, catalog),
        Some(Commands::Log {
            routine,
            exercise,
            sets,
            reps,
            weight,
            rir,
        }) => cmd_log(&config, routine, exercise, sets, reps, weight, rir),
        None => {
            // Default to "generate" command
            cmd_generate(&config, GenerateArgs::default())
        }
    }
}

fn catalog_provider(config: &Config, path: Option<PathBuf>) -> Box<dyn CatalogProvider> {
    match path.or_else(|| config.catalog.path.clone()) {
        Some(path) => Box::new(CsvCatalog::new(path)),
        None => Box::new(BuiltinCatalog),
    }
}

/// Command line flags layered over the `[generator]` section
fn generator_config(base: &GeneratorConfig, args: &GenerateArgs) -> Result<GeneratorConfig> {
    let mut generator = base.clone();

    if let Some(days) = args.days {
        generator.training_days = days;
    }
    if let Some(environment) = &args.environment {
        generator.environment = environment.parse()?;
    }
    if let Some(experience) = &args.experience {
        generator.experience_level = experience.parse()?;
    }
    if let Some(goal) = &args.goal {
        generator.goal = goal.parse()?;
    }
    if let Some(scale) = args.volume_scale {
        generator.volume_scale = scale;
    }
    if !args.equipment.is_empty() {
        generator = generator.with_equipment_whitelist(args.equipment.iter().cloned());
    }
    if !args.target.is_empty() {
        generator = generator.targeting(args.target.iter().cloned());
    }
    generator = generator.excluding(args.exclude.iter().cloned());

    for entry in &args.prefer {
        let (pattern, name) = entry.split_once('=').ok_or_else(|| {
            Error::Config(format!("--prefer expects PATTERN=NAME, got '{}'", entry))
        })?;
        let pattern: MovementPattern = pattern
            .parse()
            .map_err(|_| Error::Config(format!("Unknown movement pattern '{}'", pattern)))?;
        generator = generator.preferring(pattern, [name.trim()]);
    }
    for key in &args.restrict {
        generator = generator.restricting(key.as_str());
    }

    if args.no_consistency {
        generator.beginner_consistency_mode = false;
    }
    if args.dry_run {
        generator.persist = false;
    }
    if args.no_overwrite {
        generator.overwrite = false;
    }
    if let Some(seed) = args.seed {
        generator.seed = Some(seed);
    }

    generator.validate()?;
    Ok(generator)
}

fn cmd_generate(config: &Config, args: GenerateArgs) -> Result<()> {
    let generator = generator_config(&config.generator, &args)?;
    let catalog = catalog_provider(config, args.catalog.clone());
    let plan_path = config.data.plan_path();

    let report = generate_starter_plan(&generator, catalog.as_ref(), || {
        JsonPlanStore::open(&plan_path)
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    display_plan(&report.plan);

    println!("Total: {} exercises", report.total_exercises);

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }

    println!();
    match &report.persistence {
        PersistenceOutcome::Skipped => println!("[Dry run - plan not stored]"),
        PersistenceOutcome::Inserted { counts, renamed } => {
            let total: usize = counts.values().sum();
            println!("✓ Stored {} exercises in {}", total, plan_path.display());
            for (from, to) in renamed {
                println!("  Routine {} saved as {}", from, to);
            }
        }
        PersistenceOutcome::Failed { error } => {
            tracing::warn!("Plan not stored at {}: {}", plan_path.display(), error);
            eprintln!("✗ Plan not stored: {}", error);
        }
    }

    Ok(())
}

fn display_plan(plan: &GeneratedPlan) {
    for (routine, rows) in &plan.routines {
        let sets: u32 = rows.iter().map(|r| r.sets).sum();
        println!("\n╭─────────────────────────────────────────╮");
        println!("│  ROUTINE {} ({} sets)", routine, sets);
        println!("╰─────────────────────────────────────────╯");

        if rows.is_empty() {
            println!("  (no exercises available)");
        }
        for row in rows {
            println!(
                "  {}. {}  {} x {}-{} @ RIR {} (RPE {:.1})  [{}, {}]",
                row.exercise_order,
                row.exercise,
                row.sets,
                row.min_rep_range,
                row.max_rep_range,
                row.rir,
                row.rpe,
                row.pattern,
                row.role
            );
        }
    }
    println!();
}

fn cmd_init(config: &Config, path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::default_config_path(),
    };

    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to replace it)",
            path.display()
        )));
    }

    config.save_to(&path)?;
    println!("✓ Wrote {}", path.display());
    Ok(())
}

fn cmd_show(config: &Config) -> Result<()> {
    let plan_path = config.data.plan_path();
    let store = JsonPlanStore::open(&plan_path)?;

    if store.rows().is_empty() {
        println!("No stored plan - run `liftplan generate` first.");
        return Ok(());
    }

    for routine in store.routine_names()? {
        println!("Routine {}", routine);
        for row in store.routine_rows(&routine) {
            println!(
                "  [{}] {}  {} x {}-{} @ RIR {}",
                row.exercise_order,
                row.exercise,
                row.sets,
                row.min_rep_range,
                row.max_rep_range,
                row.rir
            );
        }
    }

    if !store.log().is_empty() {
        println!();
        println!("{} logged workouts", store.log().len());
    }

    Ok(())
}

fn cmd_catalog(
    config: &Config,
    pattern: Option<String>,
    validate: bool,
    path: Option<PathBuf>,
) -> Result<()> {
    let records = catalog_provider(config, path).load()?;

    if validate {
        let errors = validate_catalog(&records);
        if !errors.is_empty() {
            eprintln!("Catalog validation errors:");
            for error in &errors {
                eprintln!("  - {}", error);
            }
            return Err(Error::Catalog(format!("{} problems found", errors.len())));
        }
        println!("✓ Catalog OK ({} exercises)", records.len());
        return Ok(());
    }

    let filter: Option<MovementPattern> = pattern
        .as_deref()
        .map(str::parse::<MovementPattern>)
        .transpose()?;

    for record in &records {
        let (classified, sub) = classify(
            &record.name,
            record.primary_muscle_group.as_deref(),
            record.mechanic.as_deref(),
        );
        let pattern = record.stored_pattern().or(classified);
        let sub = record.stored_subpattern().or(sub);

        if filter.is_some() && pattern != filter {
            continue;
        }

        println!(
            "{:<36} {:<16} {:<20} {}",
            record.name,
            pattern.map(|p| p.as_str()).unwrap_or("-"),
            sub.map(|s| s.as_str()).unwrap_or("-"),
            record.equipment.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

fn cmd_log(
    config: &Config,
    routine: String,
    exercise: String,
    sets: u32,
    reps: u32,
    weight: f64,
    rir: Option<u32>,
) -> Result<()> {
    let plan_path = config.data.plan_path();
    let mut store = JsonPlanStore::open(&plan_path)?;

    let mut entry = WorkoutLogEntry::new(routine, exercise, sets, reps, weight);
    entry.rir = rir;
    let summary = format!("{} / {}: {} x {}", entry.routine, entry.exercise, sets, reps);

    store.append_log(entry)?;
    store.commit()?;
    tracing::info!("Logged {} to {}", summary, plan_path.display());

    println!("✓ Logged {}", summary);
    Ok(())
}
