//! Command-line entry point.
//!
//! # Responsibility
//! - Open a snapshot database and drive an editor session without a canvas.
//! - Print a summary, export the diagram to a directory or import a file.
//!
//! Set `KRIYA_LOG_DIR` to an absolute path to enable file logging.

use clap::{Parser, Subcommand};
use kriya_core::db::open_db;
use kriya_core::{
    default_log_level, init_logging, EdgeLayout, EditorConfig, EditorSession, NodeType, NodeView,
    Point, Rect, RenderSurface, SqliteSnapshotStore, ViewOptions,
};
use log::error;
use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const NODE_WIDTH: f64 = 160.0;
const NODE_HEIGHT: f64 = 60.0;

#[derive(Parser)]
#[command(name = "kriya", about = "Inspect, export and import Kriya flowcharts")]
struct Cli {
    /// Snapshot database file; created when missing
    db_path: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored diagram (default)
    Summary,
    /// Write the diagram as pretty JSON into a directory
    Export {
        /// Target directory; the file name is derived from the title
        dir: PathBuf,
    },
    /// Replace the stored diagram with a JSON file
    Import {
        /// JSON snapshot to load
        file: PathBuf,
    },
}

/// Places node boxes at their diagram coordinates and remembers the last
/// edge layouts instead of painting.
#[derive(Default)]
struct HeadlessSurface {
    rects: HashMap<String, Rect>,
    edges: Vec<EdgeLayout>,
}

impl RenderSurface for HeadlessSurface {
    fn render_nodes(&mut self, nodes: &[NodeView<'_>], _options: ViewOptions) {
        self.rects = nodes
            .iter()
            .map(|view| {
                let rect = Rect::new(view.node.x, view.node.y, NODE_WIDTH, NODE_HEIGHT);
                (view.node.id().to_string(), rect)
            })
            .collect();
    }

    fn render_edges(&mut self, edges: &[EdgeLayout]) {
        self.edges = edges.to_vec();
    }

    fn node_rect(&self, node_id: &str) -> Option<Rect> {
        self.rects.get(node_id).copied()
    }

    fn origin(&self) -> Point {
        Point::default()
    }
}

fn print_summary(session: &EditorSession<SqliteSnapshotStore<'_>, HeadlessSurface>) {
    let diagram = session.diagram();
    println!("{diagram}");
    for node in diagram.nodes() {
        match node.node_type() {
            NodeType::Task => {
                if let Some(task) = node.task() {
                    let status = task.status();
                    println!(
                        "  task {} [{} {}] {}",
                        node.id(),
                        status.as_str(),
                        status.color(),
                        node.title
                    );
                }
            }
            NodeType::Distraction => {
                if let Some(fields) = node.distraction() {
                    let category = fields.distraction_type;
                    println!(
                        "  distraction {} [{} {}] {}",
                        node.id(),
                        category.index(),
                        category.color(),
                        node.title
                    );
                }
            }
        }
    }
    for layout in &session.surface().edges {
        println!("  edge {} exits {:?}", layout.edge_id, layout.anchors.exit);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let conn = open_db(&cli.db_path)?;
    let config = EditorConfig::default();
    let store = SqliteSnapshotStore::try_new(&conn, config.storage_key.as_str())?;
    let mut session = EditorSession::open(store, HeadlessSurface::default(), &config)?;

    match cli.command.unwrap_or(Command::Summary) {
        Command::Summary => print_summary(&session),
        Command::Export { dir } => {
            let path = session.export_to_dir(&dir)?;
            println!("exported {}", path.display());
        }
        Command::Import { file } => {
            session.import_file(&file)?;
            println!("imported {}", session.diagram());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(dir) = std::env::var("KRIYA_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("kriya: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn missing_subcommand_means_summary() {
        let cli = Cli::try_parse_from(["kriya", "plan.db"]).expect("db path alone should parse");
        assert_eq!(cli.db_path, PathBuf::from("plan.db"));
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["kriya", "plan.db", "summary"])
            .expect("summary should parse");
        assert!(matches!(cli.command, Some(Command::Summary)));
    }

    #[test]
    fn export_and_import_take_paths() {
        let cli = Cli::try_parse_from(["kriya", "plan.db", "export", "/tmp/out"])
            .expect("export should parse");
        match cli.command {
            Some(Command::Export { dir }) => assert_eq!(dir, PathBuf::from("/tmp/out")),
            _ => panic!("expected export command"),
        }

        let cli = Cli::try_parse_from(["kriya", "plan.db", "import", "plan.json"])
            .expect("import should parse");
        match cli.command {
            Some(Command::Import { file }) => assert_eq!(file, PathBuf::from("plan.json")),
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn export_without_directory_is_rejected() {
        let err = Cli::try_parse_from(["kriya", "plan.db", "export"])
            .err()
            .expect("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn db_path_is_required() {
        let err = Cli::try_parse_from(["kriya"])
            .err()
            .expect("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
