use crate::config::SceneStyle;
use crate::graph::{NetworkGraph, Position, Sign};

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSet {
    pub positions: Vec<Position>,
    pub color: String,
    pub size: f64,
}

/// Disjoint segments as one polyline: `from, to, None` per edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegments {
    pub vertices: Vec<Option<Position>>,
    /// One entry per vertex, break included.
    pub colors: Vec<String>,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub at: Position,
    pub direction: Position,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub neurons: MarkerSet,
    pub edges: LineSegments,
    pub arrows: Vec<Arrow>,
    pub style: SceneStyle,
}

impl Scene {
    pub fn assemble(graph: &NetworkGraph, style: &SceneStyle) -> Scene {
        let neurons = MarkerSet {
            positions: graph.neurons.iter().map(|n| n.position).collect(),
            color: style.neuron_color.clone(),
            size: style.neuron_size,
        };

        let mut vertices = Vec::with_capacity(graph.edges.len() * 3);
        let mut colors = Vec::with_capacity(graph.edges.len() * 3);
        let mut arrows = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            let color = edge_color(style, edge.sign());
            vertices.extend([Some(edge.from), Some(edge.to), None]);
            colors.extend(std::iter::repeat_n(color.to_string(), 3));
            arrows.push(Arrow {
                at: edge.to,
                direction: edge.direction(),
                color: color.to_string(),
            });
        }

        Scene {
            neurons,
            edges: LineSegments {
                vertices,
                colors,
                width: style.edge_width,
            },
            arrows,
            style: style.clone(),
        }
    }
}

pub fn edge_color(style: &SceneStyle, sign: Sign) -> &str {
    match sign {
        Sign::Positive => &style.positive_color,
        Sign::NonPositive => &style.non_positive_color,
    }
}
