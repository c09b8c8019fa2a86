// Bidirectional tree (SBL) demo in a 2-D sphere world
//
// usage: sbl_planner [params.toml]

use std::env;
use std::process;

use log::{error, info};

use prm_planning::common::{Configuration, MotionPlanner, PlannerParams, PlanningResult};
use prm_planning::path_planning::SblPlanner;
use prm_planning::utils::{
    colors, EuclideanMetric, PathStyle, SphereObstacle, SphereWorld, UniformSampler, Visualizer,
};

const SHOW_ANIMATION: bool = false;

fn load_params() -> PlanningResult<PlannerParams> {
    match env::args().nth(1) {
        Some(path) => PlannerParams::load(path),
        None => Ok(PlannerParams::default()
            .with_start(vec![1.0, 1.0])
            .with_goal(vec![19.0, 19.0])
            .with_step_length(0.5)
            .with_max_iterations(5_000)),
    }
}

fn run() -> PlanningResult<()> {
    let params = load_params()?;
    let obstacles = vec![
        SphereObstacle::new(vec![7.0, 7.0], 3.0),
        SphereObstacle::new(vec![13.0, 13.0], 3.0),
        SphereObstacle::new(vec![5.0, 15.0], 2.0),
        SphereObstacle::new(vec![15.0, 5.0], 2.0),
    ];
    let world = SphereWorld::new(obstacles, 0.3, 0.05);
    let sampler = UniformSampler::new(&[0.0, 0.0], &[20.0, 20.0], world.clone())?;

    let mut planner = SblPlanner::new(EuclideanMetric, world.clone(), sampler);
    planner.init_plan(&2usize, params.clone())?;

    let mut trajectory: Vec<Configuration> = Vec::new();
    let result = planner.plan_path(&mut trajectory);

    let mut vis = Visualizer::new();
    vis.set_title("SBL Path Planning").set_range((0.0, 20.0), (0.0, 20.0));
    vis.plot_obstacles(world.obstacles());
    if let Some(tree) = planner.start_tree() {
        vis.plot_tree(tree, colors::START_TREE);
    }
    if let Some(tree) = planner.goal_tree() {
        vis.plot_tree(tree, colors::GOAL_TREE);
    }
    vis.plot_start(&Configuration::from_slice(&params.start));
    vis.plot_goal(&Configuration::from_slice(&params.goal));

    match &result {
        Ok(path) => {
            info!("Path found with {} waypoints, length {:.3}", path.len(), path.total_length(&EuclideanMetric));
            vis.plot_path(path, &PathStyle::default());
        }
        Err(e) => error!("No path: {}", e),
    }

    if SHOW_ANIMATION {
        vis.show().ok();
    }
    match vis.save_svg("./img/path_planning/sbl.svg") {
        Ok(()) => info!("Plot saved to ./img/path_planning/sbl.svg"),
        Err(e) => error!("Could not save plot: {}", e),
    }

    result.map(|_| ())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("SBL path planning start!");

    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
    info!("Done!");
}
