// Persistent settings: lanes, bindings, display, behaviour and feedback rules

pub mod binding;
pub mod rules;
pub mod settings;

pub use binding::Binding;
pub use rules::{PeripheryRuleConfig, SoundRuleConfig};
pub use settings::Settings;
