// Core exports
pub mod analyzer;
pub mod comparison;
pub mod extractor;
pub mod layers;
pub mod parser;
pub mod prompts;

pub use analyzer::NarrativeAnalyzer;
pub use comparison::{select_layers, ComparisonBuilder, ComparisonError};
pub use extractor::{assemble, parse_date, AttributeDefaults, AttributeExtractor, ExtractionError};
pub use parser::{parse_response, ParsedResponse};
