//! Visualization utilities for rust_slalom
//!
//! Collects line and point series and renders them into a single gnuplot axes.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{MotionError, MotionProfile, MotionResult, Pose};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const BLUE: &str = "#0000FF";
    pub const ORANGE: &str = "#FFA500";
    pub const PURPLE: &str = "#800080";
    pub const GRAY: &str = "#808080";

    pub const JERK: &str = GRAY;
    pub const ACCEL: &str = ORANGE;
    pub const VELOCITY: &str = RED;
    pub const POSITION: &str = BLUE;
    pub const PATH: &str = RED;
    pub const ROBOT: &str = PURPLE;
    pub const REFERENCE: &str = BLACK;
}

/// Style for line rendering
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

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

/// Profile sampled on a uniform time grid
#[derive(Debug, Clone, Default)]
pub struct ProfileSamples {
    pub t: Vec<f64>,
    pub j: Vec<f64>,
    pub a: Vec<f64>,
    pub v: Vec<f64>,
    pub x: Vec<f64>,
}

impl ProfileSamples {
    /// Sample `profile` at `n + 1` evenly spaced times over its range
    pub fn new<P: MotionProfile + ?Sized>(profile: &P, n: usize) -> Self {
        let n = n.max(1);
        let (t0, t1) = (profile.t_start(), profile.t_end());
        let mut s = ProfileSamples::default();
        for i in 0..=n {
            let t = t0 + (t1 - t0) * i as f64 / n as f64;
            s.t.push(t);
            s.j.push(profile.j(t));
            s.a.push(profile.a(t));
            s.v.push(profile.v(t));
            s.x.push(profile.x(t));
        }
        s
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Series {
    Lines { x: Vec<f64>, y: Vec<f64>, style: PathStyle },
    Points { x: Vec<f64>, y: Vec<f64>, style: PointStyle },
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    series: Vec<Series>,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    /// Create a new visualizer for x-y paths
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            series: Vec::new(),
            title: String::new(),
            x_label: "x [m]".to_string(),
            y_label: "y [m]".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
        }
    }

    /// Create a visualizer for time series
    pub fn time_series(y_label: &str) -> Self {
        let mut vis = Self::new();
        vis.set_x_label("t [s]").set_y_label(y_label).set_aspect_ratio(None);
        vis
    }

    /// Set the plot title
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Set X axis label
    pub fn set_x_label(&mut self, label: &str) -> &mut Self {
        self.x_label = label.to_string();
        self
    }

    /// Set Y axis label
    pub fn set_y_label(&mut self, label: &str) -> &mut Self {
        self.y_label = label.to_string();
        self
    }

    /// Set X axis range
    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    /// Set Y axis range
    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Plot a line from x,y vectors
    pub fn plot_path_xy(&mut self, x: &[f64], y: &[f64], style: &PathStyle) -> &mut Self {
        self.series.push(Series::Lines {
            x: x.to_vec(),
            y: y.to_vec(),
            style: style.clone(),
        });
        self
    }

    /// Plot the positions of a pose sequence
    pub fn plot_poses(&mut self, poses: &[Pose], style: &PathStyle) -> &mut Self {
        let x: Vec<f64> = poses.iter().map(|p| p.x).collect();
        let y: Vec<f64> = poses.iter().map(|p| p.y).collect();
        self.plot_path_xy(&x, &y, style)
    }

    /// Plot points from x,y vectors
    pub fn plot_points_xy(&mut self, x: &[f64], y: &[f64], style: &PointStyle) -> &mut Self {
        self.series.push(Series::Points {
            x: x.to_vec(),
            y: y.to_vec(),
            style: style.clone(),
        });
        self
    }

    /// Plot robot pose with direction indicator
    pub fn plot_robot(&mut self, pose: &Pose, size: f64) -> &mut Self {
        self.plot_points_xy(
            &[pose.x],
            &[pose.y],
            &PointStyle::new(colors::ROBOT, "Robot").with_size(1.5),
        );
        let end_x = pose.x + size * pose.th.cos();
        let end_y = pose.y + size * pose.th.sin();
        self.plot_path_xy(
            &[pose.x, end_x],
            &[pose.y, end_y],
            &PathStyle::new(colors::ROBOT, ""),
        )
    }

    /// Plot one derivative of a sampled profile against time
    ///
    /// `order` selects position (0), velocity (1), acceleration (2) or jerk (3).
    pub fn plot_profile(&mut self, samples: &ProfileSamples, order: usize) -> &mut Self {
        let (y, style) = match order {
            0 => (&samples.x, PathStyle::new(colors::POSITION, "position")),
            1 => (&samples.v, PathStyle::new(colors::VELOCITY, "velocity")),
            2 => (&samples.a, PathStyle::new(colors::ACCEL, "acceleration")),
            _ => (&samples.j, PathStyle::new(colors::JERK, "jerk")),
        };
        let t = samples.t.clone();
        self.plot_path_xy(&t, y, &style)
    }

    /// Number of series added so far
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> MotionResult<()> {
        self.render();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| MotionError::VisualizationError(e.to_string()))
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> MotionResult<()> {
        self.render();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| MotionError::VisualizationError(e.to_string()))
    }

    /// Save plot to SVG file
    pub fn save_svg(&mut self, path: &str) -> MotionResult<()> {
        self.render();
        self.figure
            .save_to_svg(path, 800, 600)
            .map_err(|e| MotionError::VisualizationError(e.to_string()))
    }

    fn render(&mut self) {
        self.figure.clear_axes();
        let axes = self.figure.axes2d();
        for series in &self.series {
            match series {
                Series::Lines { x, y, style } => {
                    axes.lines(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            LineWidth(style.line_width),
                        ],
                    );
                }
                Series::Points { x, y, style } => {
                    axes.points(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            PointSymbol(style.symbol),
                            PointSize(style.size),
                        ],
                    );
                }
            }
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);
        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }
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
    use crate::motion_profile::AccelDesigner;

    #[test]
    fn test_visualizer_creation() {
        let vis = Visualizer::new();
        assert!(vis.aspect_ratio.is_some());
        let vis = Visualizer::time_series("v [m/s]");
        assert!(vis.aspect_ratio.is_none());
        assert_eq!(vis.x_label, "t [s]");
    }

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path").with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }

    #[test]
    fn test_profile_samples() {
        let ad = AccelDesigner::new(100.0, 10.0, 4.0, 0.0, 2.0, 4.0).unwrap();
        let s = ProfileSamples::new(&ad, 100);
        assert_eq!(s.len(), 101);
        assert_eq!(s.t[0], ad.t_start());
        assert_eq!(s.t[100], ad.t_end());
        assert!((s.x[100] - 4.0).abs() < 1e-9);

        let mut vis = Visualizer::time_series("v [m/s]");
        vis.plot_profile(&s, 1).plot_profile(&s, 2);
        vis.plot_robot(&Pose::origin(), 0.1);
        assert_eq!(vis.series_count(), 4);
    }
}
