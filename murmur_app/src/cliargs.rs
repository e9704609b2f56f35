use clap_serde_derive::{
    clap::{self, Parser},
    serde::Serialize,
    ClapSerde,
};

#[derive(Parser)]
#[derive(ClapSerde)]
#[command(version, about, long_about = None)]
/// Headless flocking swarm chasing a face-shaped attractor cloud.
pub struct Args {
    /// Config file
    #[arg(short, long = "config", default_value = "config.toml")]
    pub config_path: std::path::PathBuf,

    /// Rest of arguments
    #[command(flatten)]
    pub config: <Config as ClapSerde>::Opt,
}

#[derive(ClapSerde, Serialize)]
/// Programatic configuration
///
/// Uses defaults, which can be overwritten by specifying a filepath for the `-c` or `--config` arg option
pub struct Config {
    #[default(600)]
    #[arg(short = 'i', long)]
    /// number of simulation ticks to run
    pub iterations: u64,

    #[default(550)]
    #[arg(short = 'n', long)]
    /// target population size
    pub no_particles: usize,

    #[default(4)]
    #[arg(short = 'r', long)]
    /// ratio of ticks/sample_rate, e.g. 4 = sample every 4th tick
    pub sample_rate: u64,

    #[default(true)]
    #[arg(short = 's', long)]
    pub save: bool,

    #[default(false)]
    #[arg(short = 't', long)]
    pub save_timestamp: bool,

    #[default(800)]
    #[arg(short = 'x', long)]
    pub init_width: u32,

    #[default(600)]
    #[arg(short = 'y', long)]
    pub init_height: u32,

    #[default(0)]
    #[arg(long)]
    /// RNG seed, 0 draws one from entropy
    pub seed: u64,

    #[default(true)]
    #[arg(short = 'f', long)]
    /// feed the synthetic face cloud; off means free flocking
    pub face: bool,

    #[default(false)]
    #[arg(short = 'g', long)]
    /// use the grid neighbour tracker instead of the naive scan
    pub grid: bool,
}
