use cmfeat::core::models::units::LengthUnit;
use cmfeat::engine::config::FeaturizationConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub unit: LengthUnit,
    pub core_config: FeaturizationConfig,
}
