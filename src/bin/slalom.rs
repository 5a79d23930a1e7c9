// Slalom trajectory sample
//
// Generates a 90 degree slalom, writes the reference trajectory as CSV, then
// tracks it with the feedback controller from a perturbed start and plots both.
use std::f64::consts::PI;

use rust_slalom::common::{MotionResult, Polar, Pose, State};
use rust_slalom::path_tracking::{TrackerConfig, TrackerGain, TrajectoryTracker};
use rust_slalom::slalom::{AngularLimits, Shape, Trajectory};
use rust_slalom::utils::csv::save_trajectory;
use rust_slalom::utils::{colors, PathStyle, Visualizer};
use tracing::info;

fn main() -> MotionResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let shape = Shape::new(
        Pose::new(0.09, 0.09, PI / 2.0),
        0.08,
        0.0,
        AngularLimits::default(),
    )?;
    println!("{}", shape);

    let v = shape.v_ref;
    let mut trajectory = Trajectory::new(&shape, false)?;
    trajectory.reset(v, 0.0, shape.straight_prev / v)?;
    info!(
        v,
        t_curve = trajectory.time_curve(),
        t_total = trajectory.time_total(),
        "slalom trajectory"
    );

    std::fs::create_dir_all("./img")?;
    save_trajectory("./img/slalom.csv", &trajectory, 1e-5)?;

    // reference and tracked paths
    let config = TrackerConfig::default();
    let mut tracker = TrajectoryTracker::with_config(TrackerGain::default(), config);
    tracker.reset(v);
    let mut reference = State::origin();
    let mut q = Pose::new(0.0, 0.003, 0.05);
    let mut vel = Polar::new(v, 0.0);
    let mut acc = Polar::zero();
    let mut ref_path = vec![reference.q];
    let mut robot_path = vec![q];
    let t_end = trajectory.time_total();
    let mut t = 0.0;
    while t < t_end {
        reference = trajectory.update(&reference, t, config.ts, 0.0);
        t += config.ts;
        let out = tracker.update(&q, &vel, &acc, &reference);
        vel = Polar::new(out.v, out.w);
        acc = Polar::new(out.dv, out.dw);
        q.th += vel.rot * config.ts;
        q.x += vel.tra * q.th.cos() * config.ts;
        q.y += vel.tra * q.th.sin() * config.ts;
        ref_path.push(reference.q);
        robot_path.push(q);
    }
    info!(reference = %reference.q, tracked = %q, "end poses");

    let mut vis = Visualizer::new();
    vis.set_title("Slalom")
        .plot_poses(&ref_path, &PathStyle::new(colors::REFERENCE, "reference"))
        .plot_poses(&robot_path, &PathStyle::new(colors::PATH, "tracked"))
        .plot_robot(&q, 0.01);
    vis.save_png("./img/slalom.png", 800, 800)?;
    Ok(())
}
