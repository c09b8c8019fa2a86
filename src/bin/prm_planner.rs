// Probabilistic Road-Map demo in a 2-D sphere world
//
// usage: prm_planner [params.toml]

use std::env;
use std::process;

use log::{error, info};

use prm_planning::common::{Configuration, MotionPlanner, PlannerParams, PlanningResult};
use prm_planning::path_planning::RoadmapPlanner;
use prm_planning::utils::{EuclideanMetric, PathStyle, SphereObstacle, SphereWorld, UniformSampler, Visualizer};

const SHOW_ANIMATION: bool = false;

fn load_params() -> PlanningResult<PlannerParams> {
    match env::args().nth(1) {
        Some(path) => PlannerParams::load(path),
        None => Ok(PlannerParams::default()
            .with_start(vec![1.0, 1.0])
            .with_goal(vec![19.0, 19.0])
            .with_node_budget(400)
            .with_neighbor_threshold(3.0)),
    }
}

fn create_world() -> SphereWorld {
    let obstacles = vec![
        SphereObstacle::new(vec![6.0, 6.0], 2.5),
        SphereObstacle::new(vec![14.0, 6.0], 2.0),
        SphereObstacle::new(vec![10.0, 12.0], 3.0),
        SphereObstacle::new(vec![4.0, 15.0], 2.0),
        SphereObstacle::new(vec![16.0, 15.0], 2.5),
    ];
    SphereWorld::new(obstacles, 0.3, 0.1)
}

fn run() -> PlanningResult<()> {
    let params = load_params()?;
    let world = create_world();
    let sampler = UniformSampler::new(&[0.0, 0.0], &[20.0, 20.0], world.clone())?;

    let mut planner = RoadmapPlanner::new(EuclideanMetric, world.clone(), sampler);
    info!("Building road map...");
    planner.init_plan(&2usize, params.clone())?;

    info!("Planning path...");
    let mut trajectory: Vec<Configuration> = Vec::new();
    let result = planner.plan_path(&mut trajectory);

    let mut vis = Visualizer::new();
    vis.set_title("PRM Path Planning").set_range((0.0, 20.0), (0.0, 20.0));
    vis.plot_obstacles(world.obstacles());
    if let Some(roadmap) = planner.roadmap() {
        vis.plot_roadmap(roadmap);
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
    match vis.save_svg("./img/path_planning/prm.svg") {
        Ok(()) => info!("Plot saved to ./img/path_planning/prm.svg"),
        Err(e) => error!("Could not save plot: {}", e),
    }

    result.map(|_| ())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("PRM path planning start!");

    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
    info!("Done!");
}
