//! Wayline CLI
//!
//! Usage:
//!   wayline [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Routing configuration (TOML format)
//!   -h, --help           Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use wayline::scene::Scene;
use wayline::RouteConfig;

#[derive(Parser)]
#[command(name = "wayline")]
#[command(about = "Route diagram connections from a TOML scene description")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Routing configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let config = match &cli.config {
        Some(path) => match RouteConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RouteConfig::default(),
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut scene = match Scene::from_toml(&source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = scene.route_all(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match scene.waypoints() {
        Ok(all) => {
            for (i, points) in all.iter().enumerate() {
                let path: Vec<String> = points
                    .iter()
                    .map(|p| format!("({:.1}, {:.1})", p.x, p.y))
                    .collect();
                println!("connection {}: {}", i + 1, path.join(" -> "));
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Wayline - connection routing for node diagrams

USAGE:
    wayline [OPTIONS] [FILE]
    cat scene.toml | wayline

OPTIONS:
    -c, --config   Routing configuration (TOML file)
    -h, --help     Print help

SCENE FORMAT:
    [[node]]
    id = "a"
    rect = [0.0, 0.0, 20.0, 20.0]

    [[node]]
    id = "b"
    rect = [10.0, 100.0, 30.0, 20.0]

    [[connection]]
    from = "a"
    to = "b"
    router = "orthogonal"   # or "straight"

Each routed connection is printed as its waypoint sequence."#
    );
}
