use crate::core::featurizers::{FeatureArray, FeatureShape, FeaturizerError};
use crate::core::models::molecule::Molecule;
use crate::engine::config::{ErrorPolicy, FeaturizationConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, instrument, warn};

/// Features of one molecule, in conformer order then variant order.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeFeatures {
    pub index: usize,
    pub name: String,
    pub num_conformers: usize,
    pub features: Vec<FeatureArray>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeFailure {
    pub index: usize,
    pub name: String,
    pub error: FeaturizerError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturizationResult {
    pub shape: FeatureShape,
    pub molecules: Vec<MoleculeFeatures>,
    /// Molecules dropped under [`ErrorPolicy::Skip`]; always empty under `Abort`.
    pub failures: Vec<MoleculeFailure>,
}

impl FeaturizationResult {
    pub fn num_arrays(&self) -> usize {
        self.molecules.iter().map(|m| m.features.len()).sum()
    }
}

/// Random source for molecule `index` of a batch.
///
/// Seeded runs derive one generator per molecule from the base seed, so the output
/// does not depend on how the batch is split across threads.
pub fn molecule_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Featurizes a single molecule with the configured featurizer.
pub fn featurize_one(
    molecule: &Molecule,
    config: &FeaturizationConfig,
) -> Result<Vec<FeatureArray>, EngineError> {
    let featurizer = config.build_featurizer();
    let mut rng = molecule_rng(config.seed(), 0);
    featurizer
        .featurize_molecule(molecule, &mut rng)
        .map_err(|source| EngineError::Molecule {
            index: 0,
            name: molecule.name().to_string(),
            source,
        })
}

#[instrument(skip_all, name = "featurization_workflow", fields(molecules = molecules.len()))]
pub fn run(
    molecules: &[Molecule],
    config: &FeaturizationConfig,
    reporter: &ProgressReporter,
) -> Result<FeaturizationResult, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Featurizing",
    });
    let featurizer = config.build_featurizer();
    let shape = featurizer.output_shape();
    info!(
        kind = %config.kind,
        max_atoms = config.max_atoms,
        arrays_per_conformer = featurizer.arrays_per_conformer(),
        "Featurizing {} molecule(s).",
        molecules.len()
    );

    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });
    let seed = config.seed();
    let abort = config.error_policy == ErrorPolicy::Abort;
    // Lowest failing index seen so far; under Abort, molecules after it are not run.
    let first_failure = AtomicUsize::new(usize::MAX);
    let outcomes: Vec<Option<Result<Vec<FeatureArray>, FeaturizerError>>> = molecules
        .par_iter()
        .enumerate()
        .map(|(index, molecule)| {
            if abort && index > first_failure.load(Ordering::Relaxed) {
                return None;
            }
            let mut rng = molecule_rng(seed, index);
            let outcome = featurizer.featurize_molecule(molecule, &mut rng);
            if outcome.is_err() {
                first_failure.fetch_min(index, Ordering::Relaxed);
            }
            reporter.report(Progress::TaskIncrement);
            Some(outcome)
        })
        .collect();
    reporter.report(Progress::TaskFinish);

    let mut result = FeaturizationResult {
        shape,
        molecules: Vec::with_capacity(molecules.len()),
        failures: Vec::new(),
    };
    for (index, (molecule, outcome)) in molecules.iter().zip(outcomes).enumerate() {
        // Only molecules after an earlier failure are left unrun.
        let Some(outcome) = outcome else {
            continue;
        };
        match outcome {
            Ok(features) => result.molecules.push(MoleculeFeatures {
                index,
                name: molecule.name().to_string(),
                num_conformers: molecule.num_conformers(),
                features,
            }),
            Err(source) => match config.error_policy {
                ErrorPolicy::Abort => {
                    reporter.report(Progress::PhaseFinish);
                    return Err(EngineError::Molecule {
                        index,
                        name: molecule.name().to_string(),
                        source,
                    });
                }
                ErrorPolicy::Skip => {
                    warn!(index, name = molecule.name(), error = %source, "Skipping molecule.");
                    reporter.report(Progress::MoleculeSkipped {
                        index,
                        name: molecule.name().to_string(),
                    });
                    result.failures.push(MoleculeFailure {
                        index,
                        name: molecule.name().to_string(),
                        error: source,
                    });
                }
            },
        }
    }
    reporter.report(Progress::PhaseFinish);

    info!(
        "Featurization complete: {} array(s) from {} molecule(s), {} skipped.",
        result.num_arrays(),
        result.molecules.len(),
        result.failures.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::featurizers::permutation::PermutationStrategy;
    use crate::core::models::atom::Atom;
    use crate::core::models::molecule::Conformer;
    use crate::core::utils::fixtures::{propane, water};
    use crate::engine::config::{FeaturizationConfigBuilder, FeaturizerKind, RandomizationConfig};
    use nalgebra::Point3;
    use std::sync::Mutex;

    fn water_molecule() -> Molecule {
        Molecule::from_conformer("water", water())
    }

    fn oversized(n: usize) -> Molecule {
        let atoms = (0..n)
            .map(|i| Atom::new(6, Point3::new(2.5 * i as f64, 0.0, 0.0)))
            .collect();
        Molecule::from_conformer("oversized", Conformer::new(atoms))
    }

    fn config(max_atoms: usize, policy: ErrorPolicy) -> FeaturizationConfig {
        FeaturizationConfigBuilder::new()
            .max_atoms(max_atoms)
            .error_policy(policy)
            .build()
            .unwrap()
    }

    #[test]
    fn output_preserves_input_order() {
        let batch: Vec<Molecule> = (0..16)
            .map(|i| {
                let mut m = if i % 2 == 0 { water_molecule() } else { propane() };
                m.set_name(format!("m{}", i));
                m
            })
            .collect();
        let result =
            run(&batch, &config(12, ErrorPolicy::Abort), &ProgressReporter::new()).unwrap();

        assert_eq!(result.molecules.len(), 16);
        for (i, features) in result.molecules.iter().enumerate() {
            assert_eq!(features.index, i);
            assert_eq!(features.name, format!("m{}", i));
            assert_eq!(features.features.len(), 1);
            assert_eq!(features.features[0].shape(), result.shape);
        }
        assert_eq!(result.num_arrays(), 16);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn abort_policy_returns_first_failure() {
        let batch = vec![water_molecule(), oversized(5), oversized(6)];
        let err =
            run(&batch, &config(4, ErrorPolicy::Abort), &ProgressReporter::new()).unwrap_err();
        match err {
            EngineError::Molecule { index, name, source } => {
                assert_eq!(index, 1);
                assert_eq!(name, "oversized");
                assert_eq!(
                    source,
                    FeaturizerError::Capacity {
                        atoms: 5,
                        max_atoms: 4
                    }
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn abort_policy_stops_running_molecules_after_a_failure() {
        let mut batch = vec![oversized(5)];
        batch.extend(std::iter::repeat_n(propane(), 63));
        let attempted = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::TaskIncrement) {
                attempted.fetch_add(1, Ordering::SeqCst);
            }
        }));

        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let err = pool
            .install(|| run(&batch, &config(4, ErrorPolicy::Abort), &reporter))
            .unwrap_err();
        drop(reporter);

        assert!(matches!(err, EngineError::Molecule { index: 0, .. }));
        assert_eq!(attempted.into_inner(), 1);
    }

    #[test]
    fn abort_policy_reports_lowest_index_across_threads() {
        let batch: Vec<Molecule> = (0..32)
            .map(|i| if i == 9 || i == 20 { oversized(6) } else { water_molecule() })
            .collect();
        for _ in 0..8 {
            let err = run(&batch, &config(4, ErrorPolicy::Abort), &ProgressReporter::new())
                .unwrap_err();
            assert!(matches!(err, EngineError::Molecule { index: 9, .. }));
        }
    }

    #[test]
    fn skip_policy_records_failures_and_continues() {
        let batch = vec![oversized(5), water_molecule(), oversized(9), water_molecule()];
        let skipped = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::MoleculeSkipped { index, .. } = event {
                skipped.lock().unwrap().push(index);
            }
        }));
        let result = run(&batch, &config(4, ErrorPolicy::Skip), &reporter).unwrap();
        drop(reporter);

        assert_eq!(result.molecules.len(), 2);
        assert_eq!(result.molecules[0].index, 1);
        assert_eq!(result.molecules[1].index, 3);
        let failed: Vec<usize> = result.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![0, 2]);
        assert_eq!(skipped.into_inner().unwrap(), vec![0, 2]);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut randomization = RandomizationConfig::new(3, PermutationStrategy::Uniform);
        randomization.seed = Some(2024);
        let config = FeaturizationConfigBuilder::new()
            .max_atoms(11)
            .randomization(Some(randomization))
            .build()
            .unwrap();
        let batch = vec![propane(), propane(), water_molecule()];

        let a = run(&batch, &config, &ProgressReporter::new()).unwrap();
        let b = run(&batch, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.molecules[0].features.len(), 3);
        assert_eq!(a.num_arrays(), 9);
    }

    #[test]
    fn progress_counts_every_molecule() {
        let increments = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::TaskIncrement) {
                increments.fetch_add(1, Ordering::SeqCst);
            }
        }));
        let batch = vec![water_molecule(); 7];
        run(&batch, &config(3, ErrorPolicy::Abort), &reporter).unwrap();
        drop(reporter);
        assert_eq!(increments.into_inner(), 7);
    }

    #[test]
    fn featurize_one_uses_the_configured_kind() {
        let config = FeaturizationConfigBuilder::new()
            .kind(FeaturizerKind::Eigen)
            .max_atoms(8)
            .build()
            .unwrap();
        let features = featurize_one(&water_molecule(), &config).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].shape(), FeatureShape::Vector { len: 8 });
    }

    #[test]
    fn empty_batch_yields_empty_result() {
        let result = run(&[], &config(3, ErrorPolicy::Abort), &ProgressReporter::new()).unwrap();
        assert!(result.molecules.is_empty());
        assert_eq!(result.shape, FeatureShape::Matrix { rows: 3, cols: 3 });
    }
}
