//! One conversion run, from snapshot to container.
//!
//! The stages always run in the same order and never go back:
//!
//! ```text
//! Loaded -> [CylindricalResampled] -> UniformlyResampled -> Finalized -> Emitted
//! ```
//!
//! The first failing stage aborts the run and its error is returned unchanged.

use crate::config::ConversionConfig;
use crate::prelude::*;
use crate::{cylindrical, emit, finalize, loader, resample};

use std::path::PathBuf;

/// a completed pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[display(fmt = "loaded")]
    Loaded,
    #[display(fmt = "cylindrical resampled")]
    CylindricalResampled,
    #[display(fmt = "uniformly resampled")]
    UniformlyResampled,
    #[display(fmt = "finalized")]
    Finalized,
    #[display(fmt = "emitted")]
    Emitted,
}

/// what a successful run did
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    /// stages in the order they completed
    pub stages: Vec<Stage>,
    /// the container that was written
    pub output: PathBuf,
    /// extent of the stored dataset, `[nz, ny, nx]`
    pub shape: [usize; 3],
}

/// Runs a validated [`ConversionConfig`] against a [`GridSource`].
pub struct Converter<'a, S: ?Sized> {
    source: &'a S,
    config: &'a ConversionConfig,
    factors: RefinementFactors,
}

impl<'a, S> Converter<'a, S>
where
    S: GridSource + ?Sized,
{
    /// validate `config` up front, before any snapshot is touched
    pub fn new(source: &'a S, config: &'a ConversionConfig) -> Result<Self, Error> {
        config.validate()?;
        let factors = config.refinement_factors()?;

        Ok(Self {
            source,
            config,
            factors,
        })
    }

    /// Load, resample and finalize the configured field without writing it.
    ///
    /// Completed stages are appended to `stages`.
    pub fn record(&self, stages: &mut Vec<Stage>) -> Result<MeshRecord, Error> {
        let config = self.config;
        let snapshot = config.snapshot_ref()?;

        let loaded = loader::load(self.source, &snapshot, &config.load_request())?;
        stages.push(Stage::Loaded);

        let field = if loaded.geometry.is_cylindrical() {
            let rotated = cylindrical::to_cartesian_field(&loaded.field)?;
            stages.push(Stage::CylindricalResampled);
            rotated
        } else {
            loaded.field
        };

        let field = resample::resample(&field, self.factors, config.interpolation)?;
        stages.push(Stage::UniformlyResampled);

        let record = finalize::finalize(&field, &config.output.record, config.normalize)?
            .with_units(config.output.unit_si, config.output.unit_dimension);
        stages.push(Stage::Finalized);

        Ok(record)
    }

    /// run every stage and hand the record to `sink`
    #[instrument(skip_all, fields(snapshot = %self.config.snapshot.filename))]
    pub fn run(&self, sink: &mut dyn MeshSink) -> Result<ConversionReport, Error> {
        let mut stages = Vec::new();

        let outcome = self.record(&mut stages).and_then(|record| {
            let shape = record.shape();
            sink.store(record)?;
            let output = sink.flush()?;
            Ok((output, shape))
        });

        match outcome {
            Ok((output, shape)) => {
                stages.push(Stage::Emitted);
                info!(output = %output.display(), ?shape, "conversion finished");

                Ok(ConversionReport {
                    stages,
                    output,
                    shape,
                })
            }
            Err(e) => {
                let reached = stages.last().map(ToString::to_string);
                warn!(reached = ?reached, error = %e, "conversion failed");
                Err(e)
            }
        }
    }
}

/// Convert the snapshot named by `config` into the configured output container.
pub fn convert<S>(source: &S, config: &ConversionConfig) -> Result<ConversionReport, Error>
where
    S: GridSource + ?Sized,
{
    let converter = Converter::new(source, config)?;
    let mut sink = emit::open_sink(&config.output);
    converter.run(sink.as_mut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DenseSnapshot, MemorySource};

    fn planar_source(config: &ConversionConfig) -> MemorySource {
        let domain = DomainBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).unwrap();
        let values = Array3::from_shape_fn((4, 4, 1), |(i, j, _)| (i + j) as f32);
        let snapshot = DenseSnapshot::new("cartesian", 2, &domain, [4, 4, 1])
            .with_levels(2, 1)
            .with_field("density", values);

        MemorySource::new().with(&config.snapshot_ref().unwrap(), snapshot)
    }

    #[test]
    fn invalid_configuration_touches_nothing() {
        let mut config = ConversionConfig::new("runs", "plt_0001");
        config.refinement = [0, 1, 1];

        let source = MemorySource::new();
        assert!(matches!(
            Converter::new(&source, &config),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn cartesian_run_skips_rotation() {
        let mut config = ConversionConfig::new("runs", "plt_0001");
        config.level = 1;
        config.refinement = [2, 2, 1];

        let source = planar_source(&config);
        let converter = Converter::new(&source, &config).unwrap();

        let mut stages = Vec::new();
        let record = converter.record(&mut stages).unwrap();

        assert_eq!(
            stages,
            [Stage::Loaded, Stage::UniformlyResampled, Stage::Finalized]
        );
        // 4 cells refined once, then doubled
        assert_eq!(record.shape(), [1, 16, 16]);
        assert_eq!(record.name(), "e_density");
    }

    #[test]
    fn huge_refinement_is_an_error() {
        let mut config = ConversionConfig::new("runs", "plt_0001");
        config.level = 1;
        config.refinement = [i64::MAX, 1, 1];

        let source = planar_source(&config);
        let converter = Converter::new(&source, &config).unwrap();

        assert!(matches!(
            converter.record(&mut Vec::new()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn level_beyond_snapshot_is_rejected() {
        let mut config = ConversionConfig::new("runs", "plt_0001");
        config.level = 2;

        let source = planar_source(&config);
        let converter = Converter::new(&source, &config).unwrap();

        assert!(matches!(
            converter.record(&mut Vec::new()),
            Err(Error::InvalidInput(_))
        ));
    }
}
