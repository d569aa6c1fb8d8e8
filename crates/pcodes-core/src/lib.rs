pub mod aggregator;
pub mod gazetteer;
pub mod store;

pub use aggregator::{Aggregator, CountryOutcome};
pub use gazetteer::{GazetteerExtraction, extract_gazetteer};
pub use store::CountryPcodeStore;
