use cmfeat::core::models::units::LengthUnit;
use cmfeat::engine::config::FeaturizerKind;

pub struct DefaultsConfig {
    pub kind: FeaturizerKind,
    pub max_atoms: usize,
    pub remove_hydrogens: bool,
    pub upper_triangular: bool,
    pub unit: LengthUnit,
    pub num_samples: usize,
    pub strategy: String,
    pub sigma: f64,
    pub include_unpermuted: bool,
    pub skip_failed: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            kind: FeaturizerKind::Matrix,
            max_atoms: 20,
            remove_hydrogens: false,
            upper_triangular: false,
            unit: LengthUnit::Angstrom,
            num_samples: 1,
            strategy: "uniform".to_string(),
            sigma: 1.0,
            include_unpermuted: false,
            skip_failed: false,
        }
    }
}
