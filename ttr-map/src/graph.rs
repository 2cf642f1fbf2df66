//! City/route multigraph with Graphviz attributes attached.
//!
//! Nodes are cities, edges are routes. Parallel routes between the same pair
//! of cities stay separate edges.

use std::collections::{BTreeMap, HashMap};

use log::*;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use thiserror::Error;

use crate::{
    colour::Colour,
    model::GameMap,
    style::{NodeLabel, Style},
};

pub type Attributes = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityNode {
    pub key: String,
    pub name: String,
    pub attrs: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEdge {
    pub length: u32,
    pub colour: Colour,
    pub attrs: Attributes,
}

#[derive(Debug)]
pub struct MapGraph {
    name: String,
    graph: UnGraph<CityNode, RouteEdge>,
    index: HashMap<String, NodeIndex>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub cities: usize,
    pub routes: usize,
    pub total_length: u32,
    pub by_colour: BTreeMap<Colour, usize>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Route {route} references unknown city {key:?}")]
    Reference { route: usize, key: String },
    #[error("City {0:?} is defined more than once")]
    DuplicateCity(String),
}

/// Builds the graph for `map`, failing on routes whose endpoints are not
/// cities of the map.
pub fn build(map: &GameMap, style: &Style) -> Result<MapGraph, GraphError> {
    let mut graph = UnGraph::with_capacity(map.cities.len(), map.routes.len());
    let mut index = HashMap::with_capacity(map.cities.len());

    for city in &map.cities {
        if index.contains_key(&city.key) {
            return Err(GraphError::DuplicateCity(city.key.clone()));
        }
        let node = CityNode {
            key: city.key.clone(),
            name: city.name.clone(),
            attrs: node_attrs(&city.key, &city.name, style.node_label),
        };
        index.insert(city.key.clone(), graph.add_node(node));
        trace!("Added city {}", city);
    }

    for (i, route) in map.routes.iter().enumerate() {
        let lookup = |key: &String| {
            index.get(key).copied().ok_or_else(|| GraphError::Reference {
                route: i,
                key: key.clone(),
            })
        };
        let a = lookup(&route.cities.0)?;
        let b = lookup(&route.cities.1)?;

        let color = if route.colour.is_wild() {
            style.edge_colour.clone()
        } else {
            route.colour.as_str().to_string()
        };
        let mut attrs = Attributes::new();
        attrs.insert("label", route.length.to_string());
        attrs.insert("len", route.length.to_string());
        attrs.insert("color", color);

        graph.add_edge(
            a,
            b,
            RouteEdge {
                length: route.length,
                colour: route.colour,
                attrs,
            },
        );
        trace!("Added route {}", route);
    }

    debug!(
        "Built graph {:?}: {} cities, {} routes",
        map.name,
        graph.node_count(),
        graph.edge_count()
    );

    Ok(MapGraph {
        name: map.name.clone(),
        graph,
        index,
    })
}

fn node_attrs(key: &str, name: &str, label: NodeLabel) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("tooltip", name.to_string());
    match label {
        NodeLabel::External => {
            attrs.insert("label", String::new());
            attrs.insert("xlabel", name.to_string());
        }
        NodeLabel::Inside => {
            attrs.insert("label", name.to_string());
        }
        NodeLabel::Key => {
            attrs.insert("label", key.to_uppercase());
        }
    }
    attrs
}

impl CityNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

impl RouteEdge {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

impl MapGraph {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, key: &str) -> Option<&CityNode> {
        self.index.get(key).map(|&idx| &self.graph[idx])
    }

    /// Cities in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &CityNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Routes in insertion order, with their endpoints.
    pub fn edges(&self) -> impl Iterator<Item = (&CityNode, &CityNode, &RouteEdge)> {
        self.graph.edge_references().map(move |e| {
            (
                &self.graph[e.source()],
                &self.graph[e.target()],
                e.weight(),
            )
        })
    }

    /// Every route connecting `a` and `b`, in either direction.
    pub fn edges_between(&self, a: &str, b: &str) -> Vec<&RouteEdge> {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a), Some(&b)) => self
                .graph
                .edge_references()
                .filter(|e| {
                    (e.source(), e.target()) == (a, b) || (e.source(), e.target()) == (b, a)
                })
                .map(|e| e.weight())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn neighbours(&self, key: &str) -> Vec<&str> {
        let mut keys: Vec<_> = match self.index.get(key) {
            Some(&idx) => self
                .graph
                .neighbors(idx)
                .map(|n| self.graph[n].key.as_str())
                .collect(),
            None => Vec::new(),
        };
        keys.sort();
        keys.dedup();
        keys
    }

    /// `(key, name)` for every city.
    pub fn node_set(&self) -> BTreeMap<&str, &str> {
        self.nodes()
            .map(|n| (n.key.as_str(), n.name.as_str()))
            .collect()
    }

    /// Every route as `(key, key, length, colour)` with the keys in sorted
    /// order, the whole list sorted.
    pub fn edge_multiset(&self) -> Vec<(&str, &str, u32, Colour)> {
        let mut edges: Vec<_> = self
            .edges()
            .map(|(a, b, e)| {
                let (a, b) = if a.key <= b.key { (a, b) } else { (b, a) };
                (a.key.as_str(), b.key.as_str(), e.length, e.colour)
            })
            .collect();
        edges.sort();
        edges
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            cities: self.node_count(),
            routes: self.edge_count(),
            ..Summary::default()
        };
        for (_, _, e) in self.edges() {
            summary.total_length += e.length;
            *summary.by_colour.entry(e.colour).or_insert(0) += 1;
        }
        summary
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{City, Route};

    fn game_map(cities: &[(&str, &str)], routes: Vec<Route>) -> GameMap {
        GameMap {
            name: "test".into(),
            cities: cities.iter().map(|&(k, n)| City::new(k, n)).collect(),
            routes,
            tickets: Vec::new(),
            length_scale: Default::default(),
        }
    }

    #[test]
    fn test_single_route() {
        let map = game_map(
            &[("a", "Alpha"), ("b", "Beta")],
            vec![Route::new("a", "b", 3, Colour::Red)],
        );
        let graph = build(&map, &Style::default()).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node("a").unwrap().name, "Alpha");
        assert_eq!(graph.node("b").unwrap().name, "Beta");

        let edges = graph.edges_between("b", "a");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].attr("label"), Some("3"));
        assert_eq!(edges[0].attr("len"), Some("3"));
        assert_eq!(edges[0].attr("color"), Some("red"));
    }

    #[test]
    fn test_wild_route_uses_default_colour() {
        let map = game_map(
            &[("a", "Alpha"), ("b", "Beta")],
            vec![Route::new("a", "b", 1, Colour::Wild)],
        );
        let graph = build(&map, &Style::default()).unwrap();
        let (_, _, edge) = graph.edges().next().unwrap();
        assert_eq!(edge.attr("color"), Some("dimgray"));

        let style = Style {
            edge_colour: "gray40".into(),
            ..Style::default()
        };
        let graph = build(&map, &style).unwrap();
        let (_, _, edge) = graph.edges().next().unwrap();
        assert_eq!(edge.attr("color"), Some("gray40"));
    }

    #[test]
    fn test_parallel_routes() {
        let map = game_map(
            &[("a", "Alpha"), ("b", "Beta")],
            vec![
                Route::new("a", "b", 2, Colour::Red),
                Route::new("b", "a", 2, Colour::Red),
                Route::new("a", "b", 2, Colour::Wild),
            ],
        );
        let graph = build(&map, &Style::default()).unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges_between("a", "b").len(), 3);
        assert_eq!(graph.neighbours("a"), vec!["b"]);
    }

    #[test]
    fn test_unknown_city() {
        let map = game_map(
            &[("a", "Alpha")],
            vec![
                Route::new("a", "a", 1, Colour::Red),
                Route::new("a", "z", 4, Colour::Blue),
            ],
        );
        assert_eq!(
            build(&map, &Style::default()).unwrap_err(),
            GraphError::Reference {
                route: 1,
                key: "z".into()
            }
        );
    }

    #[test]
    fn test_duplicate_city() {
        let map = game_map(&[("a", "Alpha"), ("a", "Again")], Vec::new());
        assert_eq!(
            build(&map, &Style::default()).unwrap_err(),
            GraphError::DuplicateCity("a".into())
        );
    }

    #[test]
    fn test_node_labels() {
        let map = game_map(&[("kc", "Kansas City")], Vec::new());

        let graph = build(&map, &Style::default()).unwrap();
        let node = graph.node("kc").unwrap();
        assert_eq!(node.attr("label"), Some(""));
        assert_eq!(node.attr("xlabel"), Some("Kansas City"));
        assert_eq!(node.attr("tooltip"), Some("Kansas City"));

        let style = Style {
            node_label: NodeLabel::Key,
            ..Style::default()
        };
        let graph = build(&map, &style).unwrap();
        let node = graph.node("kc").unwrap();
        assert_eq!(node.attr("label"), Some("KC"));
        assert_eq!(node.attr("xlabel"), None);
    }

    #[test]
    fn test_summary() {
        let map = game_map(
            &[("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")],
            vec![
                Route::new("a", "b", 2, Colour::Red),
                Route::new("b", "c", 4, Colour::Red),
                Route::new("a", "c", 1, Colour::Wild),
            ],
        );
        let summary = build(&map, &Style::default()).unwrap().summary();
        assert_eq!(summary.cities, 3);
        assert_eq!(summary.routes, 3);
        assert_eq!(summary.total_length, 7);
        assert_eq!(summary.by_colour[&Colour::Red], 2);
        assert_eq!(summary.by_colour[&Colour::Wild], 1);
    }
}
