use std::fs;

use clap_serde_derive::{clap::Parser, ClapSerde};

use murmur_lib::{
    options::{self, RunOptions, SaveOptions, TrackerType},
    swarm::Swarm,
    watcher::SwarmWatcher,
};

mod cliargs;
mod face;

use cliargs::{Args, Config};
use face::SyntheticFace;

fn main() {
    // Parse whole args with clap
    let mut args = Args::parse();

    // Get config file, missing file means defaults
    let config = match fs::read_to_string(&args.config_path) {
        Ok(contents) => match toml::from_str::<<Config as ClapSerde>::Opt>(&contents) {
            // merge config already parsed from clap
            Ok(file_config) => Config::from(file_config).merge(&mut args.config),
            Err(err) => panic!("Error in configuration file:\n{}", err),
        },
        Err(_) => Config::from(&mut args.config),
    };

    let run_options = get_run_options(&config);

    let mut swarm = Swarm::new(&run_options);
    let mut swarm_watcher = SwarmWatcher::new(run_options.sample_rate);
    let synthetic_face = SyntheticFace::new(run_options.canvas);

    // one serial set_attractors -> update -> watch round per tick
    for tick in 0..config.iterations {
        let attractors = if config.face {
            synthetic_face.points(tick)
        } else {
            Vec::new()
        };
        swarm.set_attractors(attractors);
        swarm.update(&run_options);
        swarm_watcher.watch(&swarm);
    }

    match swarm_watcher.pop_data_save(&run_options.save_options) {
        Ok(data) => println!(
            "ran {} ticks at population {}, collected {} samples",
            config.iterations,
            run_options.max_particles,
            data.len()
        ),
        Err(err) => eprintln!("could not save swarm data: {err}"),
    }
}

fn get_run_options(config: &Config) -> RunOptions {
    let mut run_options = RunOptions::default();

    run_options.max_particles = config.no_particles;
    run_options.canvas = options::get_canvas_size(config.init_width, config.init_height);
    run_options.sample_rate = config.sample_rate;
    run_options.seed = match config.seed {
        0 => None,
        seed => Some(seed),
    };
    run_options.tracker_type = if config.grid {
        TrackerType::SpatGrid
    } else {
        TrackerType::Naive
    };
    run_options.save_options = SaveOptions {
        save_locations: config.save,
        save_locations_timestamp: config.save_timestamp,

        // default
        save_locations_path: run_options.save_options.save_locations_path.clone(),
    };

    run_options
}
