//! netedit CLI - replay net point placements on a fresh schematic and print
//! the resulting net model.

use clap::{Parser, Subcommand, ValueEnum};
use netedit::{EditorOptions, PlaceNetPointCommand, Point, Project, Schematic, UndoStack};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "netedit")]
#[command(about = "Schematic net point placement with undo/redo", long_about = None)]
#[command(version)]
struct Cli {
    /// Log editor internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place net points one after another, each as its own undo step
    Place {
        /// Positions as X,Y or X,Y=SIGNAL (nanometres)
        #[arg(value_name = "POINT", required = true, allow_hyphen_values = true, value_parser = parse_placement)]
        points: Vec<Placement>,

        /// Net class of newly created net signals [default: "default"]
        #[arg(long)]
        netclass: Option<String>,

        /// Add an unconnected symbol pin at X,Y before placing
        #[arg(long = "pin", value_name = "X,Y", allow_hyphen_values = true, value_parser = parse_point)]
        pins: Vec<Point>,

        /// Hit tolerance in nanometres
        #[arg(long, default_value_t = 0)]
        tolerance: i64,

        /// Largest allowed |x| and |y| in nanometres
        #[arg(long)]
        max_extent: Option<i64>,

        /// Undo this many steps after placing
        #[arg(long, default_value_t = 0)]
        undo: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON dump of the whole project
    Json,
}

#[derive(Debug, Clone)]
struct Placement {
    position: Point,
    net_signal: String,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got \"{}\"", s))?;
    let x = x
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid X coordinate \"{}\": {}", x, e))?;
    let y = y
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid Y coordinate \"{}\": {}", y, e))?;
    Ok(Point::new(x, y))
}

fn parse_placement(s: &str) -> Result<Placement, String> {
    let (coords, net_signal) = match s.split_once('=') {
        Some((coords, name)) => (coords, name.to_string()),
        None => (s, String::new()),
    };
    Ok(Placement {
        position: parse_point(coords)?,
        net_signal,
    })
}

/// Initialize tracing on stderr so stdout stays clean for the report
fn init_tracing(verbose: bool) {
    let default = if verbose { "netedit=debug" } else { "netedit=warn" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Place {
            points,
            netclass,
            pins,
            tolerance,
            max_extent,
            undo,
            format,
        } => {
            let mut options = EditorOptions {
                hit_tolerance: tolerance,
                ..EditorOptions::default()
            };
            if let Some(max_extent) = max_extent {
                options.max_extent = max_extent;
            }
            if let Some(netclass) = netclass {
                options.default_net_class = netclass;
            }
            handle_place(&points, &pins, undo, &options, &format)
        }
    };

    process::exit(exit_code);
}

struct Summary {
    placements: usize,
    changed: usize,
    undone: usize,
    undo_steps: usize,
}

fn handle_place(
    points: &[Placement],
    pins: &[Point],
    undo: usize,
    options: &EditorOptions,
    format: &OutputFormat,
) -> i32 {
    let mut sheet = Schematic::new("Main", options);
    for (i, pin) in pins.iter().enumerate() {
        sheet.add_symbol_pin(format!("P{}", i + 1), *pin, None);
    }
    let mut project = Project::new();
    let schematic = project.add_schematic(sheet);
    let mut stack = UndoStack::new(options);

    let mut changed = 0;
    for placement in points {
        let cmd = PlaceNetPointCommand::new(
            schematic,
            placement.position,
            options.default_net_class.as_str(),
            placement.net_signal.as_str(),
        );
        match stack.exec_cmd(&mut project, Box::new(cmd)) {
            Ok(true) => changed += 1,
            Ok(false) => debug!("Placement at {} changed nothing", placement.position),
            Err(e) => {
                eprintln!(
                    "Error: placing net point at {} failed: {}",
                    placement.position, e
                );
                return 1;
            }
        }
    }

    let mut undone = 0;
    while undone < undo {
        match stack.undo(&mut project) {
            Ok(true) => undone += 1,
            Ok(false) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    info!("Undid {} of {} requested step(s)", undone, undo);

    if let Err(e) = project.check_consistency() {
        eprintln!("Error: {}", e);
        return 1;
    }

    let summary = Summary {
        placements: points.len(),
        changed,
        undone,
        undo_steps: stack.len(),
    };
    match format {
        OutputFormat::Human => output_human(&project, &summary),
        OutputFormat::Json => {
            if let Err(e) = output_json(&project, &summary) {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    0
}

fn output_human(project: &Project, summary: &Summary) {
    let circuit = project.circuit();
    let signal_name = |uuid| {
        circuit
            .net_signal(uuid)
            .map(|ns| ns.name.as_str())
            .unwrap_or("?")
    };

    println!("\nNet classes ({}):", circuit.net_classes().len());
    for nc in circuit.net_classes() {
        println!("  {}", nc.name);
    }

    println!("\nNet signals ({}):", circuit.net_signals().len());
    for ns in circuit.net_signals() {
        let class = circuit
            .net_class(ns.net_class)
            .map(|nc| nc.name.as_str())
            .unwrap_or("?");
        let auto = if ns.has_auto_name { " (auto)" } else { "" };
        println!("  {}{}  [{}]", ns.name, auto, class);
    }

    for schematic in project.schematics() {
        println!("\nSchematic: {}", schematic.name);
        println!("{}", "─".repeat(60));

        println!("  Net points ({}):", schematic.net_points().len());
        for np in schematic.net_points() {
            println!("    {}  {}", np.position, signal_name(np.net_signal));
        }

        if !schematic.net_lines().is_empty() {
            println!("  Net lines ({}):", schematic.net_lines().len());
            for nl in schematic.net_lines() {
                let start = schematic.anchor_position(nl.start);
                let end = schematic.anchor_position(nl.end);
                if let (Some(start), Some(end)) = (start, end) {
                    println!("    {} -> {}", start, end);
                }
            }
        }

        if !schematic.symbol_pins().is_empty() {
            println!("  Symbol pins ({}):", schematic.symbol_pins().len());
            for pin in schematic.symbol_pins() {
                let net = pin.net_signal.map(signal_name).unwrap_or("unconnected");
                println!("    {} {}  {}", pin.name, pin.position, net);
            }
        }
    }

    println!("\nSummary:");
    println!("  Placements: {}", summary.placements);
    println!("  Changed:    {}", summary.changed);
    println!("  Undone:     {}", summary.undone);
    println!("  Undo steps: {}", summary.undo_steps);
}

fn output_json(project: &Project, summary: &Summary) -> serde_json::Result<()> {
    let output = serde_json::json!({
        "project": project,
        "summary": {
            "placements": summary.placements,
            "changed": summary.changed,
            "undone": summary.undone,
            "undo_steps": summary.undo_steps,
        }
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
