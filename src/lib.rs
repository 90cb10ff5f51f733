//! stay-insight: the data plane of an Airbnb-listings dashboard.
//!
//! Loads a listings CSV into an in-memory Polars frame, narrows it through a
//! cascading pipeline of selection stages (each stage's valid options are
//! enumerated from the frame already filtered by the stages before it), and
//! derives the grouped aggregate tables that feed the dashboard's charts.
//!
//! The presentation layer owns the current selections and re-runs
//! [`apply_stages`] plus whichever insight tables it needs on every widget
//! change; everything here is a pure function over the loaded frame.

mod aggregation;
mod error;
mod filter;
mod insights;
mod model;
pub mod schema;

pub use aggregation::{aggregate, sort_by, top_n, Aggregation};
pub use error::InsightError;
pub use filter::{
    apply_stages, enumerate_options, FilterOutcome, OptionSet, Predicate, Stage, StageView,
};
pub use insights::{
    avg_availability_by_country, avg_price_by_country, avg_price_by_room_type,
    availability_spread, geo_points, listings_by_country, listings_by_country_and_property,
    room_type_counts, top_hosts, top_property_types, AVG_AVAILABILITY, AVG_PRICE, LISTINGS,
};
pub use model::{JsonFileSource, ListingsModel, RawRecordSource};
pub use schema::{Field, FieldKind};
