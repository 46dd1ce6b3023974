pub mod settings;

pub use settings::ClinoteConfig;
