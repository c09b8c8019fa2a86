//! Visualization utilities for prm_planning
//!
//! Plots the first two coordinates of roadmaps, trees and paths using gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{ConfigPath, Configuration, ConfigurationMetric};
use crate::path_planning::{IncrementalTree, RoadmapGraph};
use crate::utils::SphereObstacle;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const ORANGE: &str = "#FFA500";
    pub const GRAY: &str = "#808080";
    pub const LIGHT_GRAY: &str = "#D3D3D3";

    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
    pub const ROADMAP: &str = LIGHT_GRAY;
    pub const START_TREE: &str = ORANGE;
    pub const GOAL_TREE: &str = GRAY;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_range: None,
            y_range: None,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_range(&mut self, x: (f64, f64), y: (f64, f64)) -> &mut Self {
        self.x_range = Some(x);
        self.y_range = Some(y);
        self
    }

    /// Plot the edges of a roadmap as segments
    pub fn plot_roadmap<M: ConfigurationMetric>(&mut self, graph: &RoadmapGraph<M>) -> &mut Self {
        let nodes = graph.nodes();
        let segments: Vec<(&Configuration, &Configuration)> = graph
            .edges()
            .iter()
            .map(|e| (&nodes[e.a.index()].config, &nodes[e.b.index()].config))
            .collect();
        self.plot_segments(&segments, colors::ROADMAP);

        let xs: Vec<f64> = nodes.iter().map(|n| n.config[0]).collect();
        let ys: Vec<f64> = nodes.iter().map(|n| n.config[1]).collect();
        self.figure.axes2d().points(&xs, &ys, &[
            Caption("Samples"),
            Color(colors::GRAY),
            PointSymbol('.'),
            PointSize(1.0),
        ]);
        self
    }

    /// Plot every parent link of a tree
    pub fn plot_tree<M: ConfigurationMetric>(&mut self, tree: &IncrementalTree<M>, color: &str) -> &mut Self {
        let nodes = tree.nodes();
        let segments: Vec<(&Configuration, &Configuration)> = nodes
            .iter()
            .filter_map(|n| n.parent.map(|p| (&nodes[p].config, &n.config)))
            .collect();
        self.plot_segments(&segments, color);
        self
    }

    pub fn plot_path(&mut self, path: &ConfigPath, style: &PathStyle) -> &mut Self {
        self.figure.axes2d().lines(&path.coords(0), &path.coords(1), &[
            Caption(&style.caption),
            Color(&style.color),
            LineWidth(style.line_width),
        ]);
        self
    }

    /// Plot sphere obstacles as circle outlines
    pub fn plot_obstacles(&mut self, obstacles: &[SphereObstacle]) -> &mut Self {
        for obs in obstacles {
            let (xs, ys): (Vec<f64>, Vec<f64>) = (0..=36)
                .map(|i| {
                    let theta = i as f64 * std::f64::consts::PI / 18.0;
                    (obs.center[0] + obs.radius * theta.cos(), obs.center[1] + obs.radius * theta.sin())
                })
                .unzip();
            self.figure.axes2d().lines(&xs, &ys, &[Color(colors::OBSTACLE), LineWidth(1.5)]);
        }
        self
    }

    pub fn plot_start(&mut self, q: &Configuration) -> &mut Self {
        self.plot_marker(q, colors::START, "Start")
    }

    pub fn plot_goal(&mut self, q: &Configuration) -> &mut Self {
        self.plot_marker(q, colors::GOAL, "Goal")
    }

    fn plot_marker(&mut self, q: &Configuration, color: &str, caption: &str) -> &mut Self {
        self.figure.axes2d().points(&[q[0]], &[q[1]], &[
            Caption(caption),
            Color(color),
            PointSymbol('O'),
            PointSize(1.5),
        ]);
        self
    }

    fn plot_segments(&mut self, segments: &[(&Configuration, &Configuration)], color: &str) {
        for (a, b) in segments {
            self.figure.axes2d().lines(&[a[0], b[0]], &[a[1], b[1]], &[Color(color)]);
        }
    }

    pub fn show(&mut self) -> Result<(), String> {
        self.apply_settings();
        self.figure.show().map_err(|e| e.to_string()).map(|_| ())
    }

    pub fn save_svg(&mut self, path: &str) -> Result<(), String> {
        self.apply_settings();
        self.figure.save_to_svg(path, 800, 600).map_err(|e| e.to_string())
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("q[0]", &[]);
        axes.set_y_label("q[1]", &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path").with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }

    #[test]
    fn test_visualizer_range() {
        let mut vis = Visualizer::new();
        vis.set_title("Roadmap").set_range((0.0, 10.0), (-1.0, 1.0));
        assert_eq!(vis.x_range, Some((0.0, 10.0)));
        assert_eq!(vis.title, "Roadmap");
    }
}
