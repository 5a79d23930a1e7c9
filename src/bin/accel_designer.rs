// Jerk-limited acceleration profile sample
//
// Designs a few distance-constrained profiles, prints them, writes the last one
// as one CSV file per phase and plots velocity and position.
use rust_slalom::common::{MotionProfile, MotionResult};
use rust_slalom::motion_profile::AccelDesigner;
use rust_slalom::utils::csv::save_profile_phases;
use rust_slalom::utils::{colors, PathStyle, ProfileSamples, Visualizer};
use tracing::info;

fn main() -> MotionResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // j_max, a_max, v_max, v_start, v_target, distance
    let params = [
        (100.0, 10.0, 4.0, 0.0, 2.0, 4.0),
        (1000.0, 10.0, 4.0, 0.0, 2.0, 4.0),
        (100.0, 1.0, 4.0, 0.0, 2.0, 4.0),
        (100.0, 10.0, 4.0, 0.0, 2.0, 0.4),
    ];
    let mut designs = Vec::with_capacity(params.len());
    for &(jm, am, vm, vs, vt, d) in &params {
        let ad = AccelDesigner::reachable(jm, am, vm, vs, vt, d)?;
        info!(shape = ?ad.shape(), t_end = ad.t_end(), "{}", ad);
        designs.push(ad);
    }

    std::fs::create_dir_all("./img")?;
    let ad = designs[designs.len() - 1];
    save_profile_phases("./img/accel", &ad, 1e-4)?;

    let samples = ProfileSamples::new(&ad, 1000);
    let mut vis = Visualizer::time_series("v [m/s], a [m/s/s]");
    vis.set_title("AccelDesigner").plot_profile(&samples, 1).plot_profile(&samples, 2);
    vis.save_png("./img/accel_designer.png", 800, 600)?;

    let mut vis = Visualizer::time_series("x [m]");
    for (i, ad) in designs.iter().enumerate() {
        let samples = ProfileSamples::new(ad, 1000);
        vis.plot_path_xy(
            &samples.t,
            &samples.x,
            &PathStyle::new(colors::POSITION, &format!("design {}", i))
                .with_line_width(1.0 + i as f64),
        );
    }
    vis.save_png("./img/accel_designer_position.png", 800, 600)?;
    info!("plots written to ./img");
    Ok(())
}
