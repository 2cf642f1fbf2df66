mod colour;
mod dot;
mod graph;
mod loader;
mod model;
mod render;
mod style;

pub use colour::{Colour, UnknownColour};
pub use dot::{to_dot, write_dot};
pub use graph::{build, Attributes, CityNode, GraphError, MapGraph, RouteEdge, Summary};
pub use loader::{load_file, load_map, map_path, parse_map, LoadError, DATA_DIR};
pub use model::{City, GameMap, LengthScale, ModelError, Route, Ticket};
pub use render::{DotFile, Graphviz, RenderError, Renderer, OUTPUT_DIR};
pub use style::{Engine, NodeLabel, Style, UnknownOption};
