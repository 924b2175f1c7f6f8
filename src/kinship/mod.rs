pub mod classifier;
pub mod lexicon;

pub use classifier::{classify, Classifier, ClassifierOptions};
