pub mod timeseries_api;
