use std::{fs, path::PathBuf};

use anyhow::Context;
use log::*;
use structopt::StructOpt;

use ttr_map::{DotFile, Engine, GameMap, Graphviz, NodeLabel, Renderer, Style};

#[derive(Debug, StructOpt)]
#[structopt(name = "ttr-render", about = "Render a Ticket to Ride map as a graph")]
struct Opt {
    /// Name of the map, loaded from <data-dir>/<map>.json
    #[structopt(default_value = "usa")]
    map: String,

    /// Directory holding map files
    #[structopt(short, long, default_value = "data", parse(from_os_str))]
    data_dir: PathBuf,

    /// Directory rendered files are written to
    #[structopt(short, long, default_value = "graphs", parse(from_os_str))]
    out_dir: PathBuf,

    /// JSON file overriding the default style
    #[structopt(short, long, parse(from_os_str))]
    style: Option<PathBuf>,

    /// Graphviz layout engine: neato, dot, twopi, circo, fdp, sfdp, osage, patchwork or nop
    #[structopt(short, long)]
    engine: Option<Engine>,

    /// Output format passed to Graphviz as -T<format>
    #[structopt(short, long)]
    format: Option<String>,

    /// What city nodes show: external, inside or key
    #[structopt(long)]
    node_label: Option<NodeLabel>,

    /// Also write the DOT source with this extension
    #[structopt(long)]
    raw_ext: Option<String>,

    /// Only write the DOT source, don't run Graphviz
    #[structopt(long)]
    dot_only: bool,

    /// Log debug output
    #[structopt(short, long)]
    verbose: bool,
}

impl Opt {
    fn style(&self) -> anyhow::Result<Style> {
        let mut style = match &self.style {
            Some(path) => {
                let data = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read style {:?}", path))?;
                serde_json::from_str(&data)
                    .with_context(|| format!("Invalid style {:?}", path))?
            }
            None => Style::default(),
        };
        if let Some(engine) = self.engine {
            style.engine = engine;
        }
        if let Some(format) = &self.format {
            style.format = format.clone();
        }
        if let Some(label) = self.node_label {
            style.node_label = label;
        }
        Ok(style)
    }

    fn renderer(&self) -> Box<dyn Renderer> {
        if self.dot_only {
            Box::new(DotFile::default())
        } else {
            Box::new(Graphviz {
                raw_ext: self.raw_ext.clone(),
                program: None,
            })
        }
    }
}

fn log_map(map: &GameMap) {
    debug!(
        "Map {:?}: {} cities, {} routes, {} tickets",
        map.name,
        map.cities.len(),
        map.routes.len(),
        map.tickets.len()
    );
    for ticket in &map.tickets {
        trace!("Ticket {}", ticket);
    }
    for (length, points) in map.length_scale.iter() {
        trace!("Length {} scores {}", length, points);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Opt::from_args();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder().filter(Some("ttr"), level).init();

    let style = args.style()?;
    let map = ttr_map::load_map(&args.data_dir, &args.map)
        .with_context(|| format!("Error loading map {:?}", args.map))?;
    log_map(&map);

    let graph = ttr_map::build(&map, &style)
        .with_context(|| format!("Map {:?} is inconsistent", map.name))?;
    let summary = graph.summary();
    debug!(
        "Graph: {} nodes, {} edges, {} trains of track",
        summary.cities, summary.routes, summary.total_length
    );
    for (colour, count) in &summary.by_colour {
        debug!("  {}: {}", colour, count);
    }

    let paths = args
        .renderer()
        .render(&graph, &style, &args.out_dir)
        .with_context(|| format!("Error rendering map {:?}", map.name))?;
    for path in paths {
        info!("Wrote {}", path.display());
    }

    Ok(())
}
