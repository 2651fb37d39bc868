//! Area Planner CLI - Submit a solver run and print the resulting floor plan.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use serde::de::DeserializeOwned;

use area_planner::{
    app::PlannerApp,
    client::{SOLVER_BASE_URL, SolverClient, SolverRequest, UreqTransport},
    export,
    schema::{Catalog, ResultModel, RunParameters},
    view::text,
};

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    params: Option<PathBuf>,
    catalog: Option<PathBuf>,
    export: Option<PathBuf>,
    render: Option<PathBuf>,
    example: bool,
}

fn main() {
    env_logger::init();

    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("{e}");
        eprintln!();
        print_usage();
        process::exit(1);
    });

    if args.example {
        print_example();
        return;
    }

    if let Some(path) = &args.render {
        let result: ResultModel = load_json(path, "result");
        let mut app = PlannerApp::default();
        app.load_result(result);
        print_result(&app);
        return;
    }

    let catalog = args
        .catalog
        .as_deref()
        .map(|p| load_json::<Catalog>(p, "catalog"))
        .unwrap_or_default();
    let params = args
        .params
        .as_deref()
        .map(|p| load_json::<RunParameters>(p, "parameters"))
        .unwrap_or_default();

    println!("Area Planner");
    println!("============");
    println!("Solver: {SOLVER_BASE_URL}");
    println!();
    println!("Catalog ({} items):", catalog.len());
    print!("{}", text::render_catalog(&catalog));
    println!();
    print!("{}", text::render_params(&params));
    println!();

    let mut app = PlannerApp::new(catalog, params);
    let client = SolverClient::new(UreqTransport::new());

    println!("Running GA...");
    let start = Instant::now();
    if let Err(e) = pollster::block_on(app.run(&client)) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Done in {:.2}s", start.elapsed().as_secs_f32());
    println!();

    print_result(&app);

    if let Some(target) = &args.export {
        let Some(result) = app.result() else {
            return;
        };
        match export::write_json(target, result) {
            Ok(path) => println!("Results written to {}", path.display()),
            Err(e) => {
                eprintln!("Error exporting results: {e}");
                process::exit(1);
            }
        }
    }
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .map(PathBuf::from)
                .ok_or_else(|| format!("Missing value for {flag}"))
        };
        match arg.as_str() {
            "--params" => args.params = Some(value("--params")?),
            "--catalog" => args.catalog = Some(value("--catalog")?),
            "--export" => args.export = Some(value("--export")?),
            "--render" => args.render = Some(value("--render")?),
            "--example" => args.example = true,
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn print_usage() {
    eprintln!("Usage: area-planner [--params <params.json>] [--catalog <catalog.json>] [--export <path>]");
    eprintln!("       area-planner --render <result.json>");
    eprintln!("       area-planner --example");
    eprintln!();
    eprintln!("Submit one GA run to the area solver and print the floor plan.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --params   Run parameters (defaults are used when omitted)");
    eprintln!("  --catalog  Item catalog (the built-in appliance catalog when omitted)");
    eprintln!("  --export   Write the result JSON to this file or directory");
    eprintln!("  --render   Render a previously exported result without calling the solver");
    eprintln!("  --example  Print the default request body");
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> T {
    let contents = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {what} file {}: {e}", path.display());
        process::exit(1);
    });
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Error parsing {what}: {e}");
        process::exit(1);
    })
}

fn print_result(app: &PlannerApp) {
    match app.view() {
        Some(view) => print!("{}", text::render_view(&view)),
        None => println!("No result."),
    }
}

fn print_example() {
    let catalog = Catalog::default();
    let params = RunParameters::default();
    let request = SolverRequest::new(&catalog, &params);

    println!("Example request body (POST {SOLVER_BASE_URL}/run):");
    match serde_json::to_string_pretty(&request) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing example: {e}"),
    }
}
