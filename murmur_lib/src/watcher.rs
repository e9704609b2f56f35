use std::{fs::OpenOptions, mem};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{options::SaveOptions, swarm::Swarm};

/// One sampled particle state, flattened for CSV.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct ParticleData {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub lifespan: f32,
    pub attracted: bool,
    pub time: u64,
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("could not write data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize data point: {0}")]
    Serialize(#[from] csv::Error),
}

/// Accumulates swarm samples over a run and writes them out as CSV.
/// Sampling is decimated: with a sample rate of n, every n-th tick is
/// recorded and `time` counts recorded frames, not raw ticks.
pub struct SwarmWatcher {
    samples: Vec<ParticleData>,
    render_ticker: u64,
    sample_rate: u64,
}

const PREFIX: &'static str = "swarm-data";

impl SwarmWatcher {
    pub fn new(sample_rate: u64) -> Self {
        SwarmWatcher {
            samples: Vec::new(),
            render_ticker: 0,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Triggers data collection
    pub fn watch(&mut self, swarm: &Swarm) {
        if !self.should_sample() {
            return;
        }

        let time = self.render_ticker / self.sample_rate;
        self.samples.extend(swarm.view().map(|particle| ParticleData {
            id: particle.id,
            x: particle.position.x,
            y: particle.position.y,
            lifespan: particle.lifespan,
            attracted: particle.is_attracted,
            time,
        }));
    }

    pub fn restart(&mut self) {
        self.samples.clear();
    }

    pub fn pop_data(&mut self) -> Vec<ParticleData> {
        mem::take(&mut self.samples)
    }

    /// Saves the collected data in CSV format, then returns it while
    /// emptying the watcher's memory.
    ///
    /// Depending on save options, either overwrites the fixed-name file
    /// or writes a new timestamped one.
    pub fn pop_data_save(
        &mut self,
        save_options: &SaveOptions,
    ) -> Result<Vec<ParticleData>, SaveError> {
        let data = self.pop_data();

        if !save_options.save_locations {
            return Ok(data);
        }

        if let Some(path) = &save_options.save_locations_path {
            let file_path = format!(
                "{path}{file_name}",
                file_name = SwarmWatcher::get_dataset_name(save_options, Utc::now())
            );

            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(file_path)?;
            let mut wtr = csv::Writer::from_writer(file);

            for row in data.iter() {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }

        Ok(data)
    }

    fn get_dataset_name(save_options: &SaveOptions, now: DateTime<Utc>) -> String {
        match save_options.save_locations_timestamp {
            true => {
                let datetime_part = now.timestamp_millis();
                format!(
                    "{prefix}_{datetime}.csv",
                    prefix = PREFIX,
                    datetime = datetime_part
                )
            }
            false => format!("{prefix}.csv", prefix = PREFIX),
        }
    }

    fn should_sample(&mut self) -> bool {
        self.render_ticker += 1;

        self.render_ticker % self.sample_rate == 0
    }
}
