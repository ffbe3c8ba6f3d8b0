// Mistake classification over a stream of lane presses and releases

mod classifier;
mod mistake;
mod modular_range;

pub use classifier::{ClassifierConfig, ClassifierState, MistakeClassifier};
pub use mistake::{Mistake, MistakeKind};
pub use modular_range::modular_range;
