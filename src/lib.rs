pub mod answer_builder;
pub mod cli;
pub mod error;
pub mod plant_expert;
pub mod plant_record;
pub mod safety;
pub mod search;
