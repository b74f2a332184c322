pub mod analyzers;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod output;
pub mod prepare;
pub mod report;
