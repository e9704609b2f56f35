use glam::Vec2;
use options::RunOptions;
use swarm::Swarm;
use watcher::{ParticleData, SaveError, SwarmWatcher};

pub mod particle;
pub mod swarm;

pub mod math_helpers;
pub mod options;
pub mod watcher;

/// Runs the full tick loop headlessly: attractors in, one update, one
/// sample, `no_iter` times over, then saves (per the save options) and
/// returns whatever the watcher collected. `attractor_source` is called
/// once per tick with the tick number and may return an empty list.
pub fn swarm_base(
    no_iter: u64,
    run_options: RunOptions,
    mut attractor_source: impl FnMut(u64) -> Vec<Vec2>,
) -> Result<Vec<ParticleData>, SaveError> {
    let ro = run_options;
    let mut swarm = Swarm::new(&ro);
    let mut swarm_watcher = SwarmWatcher::new(ro.sample_rate);

    (0..no_iter).for_each(|tick| {
        swarm.set_attractors(attractor_source(tick));
        swarm.update(&ro);
        swarm_watcher.watch(&swarm);
    });

    swarm_watcher.pop_data_save(&ro.save_options)
}
