//! Domain types: class vocabularies, class prompt encoding and prediction results.

pub mod result;
pub mod text_encoder;
pub mod vocabulary;

pub use result::{Detection, DetectionResult, Speed};
pub use text_encoder::ClipTextEncoder;
pub use vocabulary::{ClassPrompts, ClassSelection, TextEmbeddings, Vocabulary, fold_case};
