//! Canned aggregate tables feeding the dashboard's fixed chart set.
//!
//! Each function takes an already-filtered frame and returns a small derived
//! table; nothing here caches or mutates. Column aliases are part of the
//! presentation contract.

use polars::prelude::*;

use crate::aggregation::{aggregate, sort_by, top_n, Aggregation};
use crate::error::InsightError;
use crate::schema::{availability, geo, listing, pricing, Field};

/// Listing count per group, produced by the count tables below.
pub const LISTINGS: &str = "listings";
/// Mean price per group.
pub const AVG_PRICE: &str = "avg_price";
/// Mean 365-day availability per group.
pub const AVG_AVAILABILITY: &str = "avg_availability";

fn counts_by(df: &DataFrame, field: Field) -> Result<DataFrame, InsightError> {
    aggregate(df, &[field], &[Aggregation::count(LISTINGS)])
}

/// Top `n` property types by listing count, descending (bar chart).
pub fn top_property_types(df: &DataFrame, n: usize) -> Result<DataFrame, InsightError> {
    top_n(&counts_by(df, Field::PropertyType)?, LISTINGS, n, true)
}

/// Top `n` hosts by listing count, descending (bar chart).
pub fn top_hosts(df: &DataFrame, n: usize) -> Result<DataFrame, InsightError> {
    top_n(&counts_by(df, Field::HostName)?, LISTINGS, n, true)
}

/// Listing count per room type (pie chart).
pub fn room_type_counts(df: &DataFrame) -> Result<DataFrame, InsightError> {
    counts_by(df, Field::RoomType)
}

/// Listing count per country (choropleth).
pub fn listings_by_country(df: &DataFrame) -> Result<DataFrame, InsightError> {
    counts_by(df, Field::Country)
}

/// Listing count per country and property type (sunburst).
pub fn listings_by_country_and_property(df: &DataFrame) -> Result<DataFrame, InsightError> {
    aggregate(
        df,
        &[Field::Country, Field::PropertyType],
        &[Aggregation::count(LISTINGS)],
    )
}

/// Mean price per room type, ascending by price (bar chart).
pub fn avg_price_by_room_type(df: &DataFrame) -> Result<DataFrame, InsightError> {
    let table = aggregate(
        df,
        &[Field::RoomType],
        &[Aggregation::mean(Field::Price, Some(AVG_PRICE))?],
    )?;
    sort_by(&table, AVG_PRICE, false)
}

/// Mean price per country (scatter-geo).
pub fn avg_price_by_country(df: &DataFrame) -> Result<DataFrame, InsightError> {
    aggregate(
        df,
        &[Field::Country],
        &[Aggregation::mean(Field::Price, Some(AVG_PRICE))?],
    )
}

/// Mean 365-day availability per country (scatter-geo).
///
/// Countries whose availability is entirely null would reduce to a null
/// mean; those rows are dropped rather than handed to the chart.
pub fn avg_availability_by_country(df: &DataFrame) -> Result<DataFrame, InsightError> {
    let table = aggregate(
        df,
        &[Field::Country],
        &[Aggregation::mean(Field::Availability365, Some(AVG_AVAILABILITY))?],
    )?;
    let out = table
        .lazy()
        .filter(col(AVG_AVAILABILITY).is_not_null())
        .collect()?;
    Ok(out)
}

/// Room type and 365-day availability per listing (box plot). Rows with null
/// availability are dropped.
pub fn availability_spread(df: &DataFrame) -> Result<DataFrame, InsightError> {
    let out = df
        .clone()
        .lazy()
        .select([col(listing::ROOM_TYPE), col(availability::AVAILABILITY_365)])
        .filter(col(availability::AVAILABILITY_365).is_not_null())
        .collect()?;
    Ok(out)
}

/// Name, country, coordinates, and price per listing (scatter map). Rows
/// with a null coordinate are dropped.
pub fn geo_points(df: &DataFrame) -> Result<DataFrame, InsightError> {
    let out = df
        .clone()
        .lazy()
        .select([
            col(listing::NAME),
            col(listing::COUNTRY),
            col(geo::LATITUDE),
            col(geo::LONGITUDE),
            col(pricing::PRICE),
        ])
        .filter(
            col(geo::LATITUDE)
                .is_not_null()
                .and(col(geo::LONGITUDE).is_not_null()),
        )
        .collect()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df!(
            "name" => ["a", "b", "c", "d"],
            "country" => ["Spain", "Spain", "France", "France"],
            "property_type" => ["Apartment", "House", "Apartment", "Loft"],
            "room_type" => ["Entire home/apt", "Private room", "Entire home/apt", "Private room"],
            "host_name" => ["ana", "ana", "bo", "cy"],
            "price" => [100.0, 200.0, 300.0, 100.0],
            "availability_365" => [Some(100.0), None, Some(300.0), Some(200.0)],
            "latitude" => [Some(40.4), Some(41.4), None, Some(48.9)],
            "longitude" => [Some(-3.7), Some(2.2), Some(2.3), None],
        )
        .unwrap()
    }

    #[test]
    fn top_property_types_orders_by_count() {
        let out = top_property_types(&sample(), 2).unwrap();
        let types: Vec<String> = out
            .column("property_type")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        assert_eq!(types, vec!["Apartment".to_string(), "House".to_string()]);
    }

    #[test]
    fn avg_price_by_room_type_sorted_ascending() {
        let out = avg_price_by_room_type(&sample()).unwrap();
        let expected = df!(
            "room_type" => ["Private room", "Entire home/apt"],
            "avg_price" => [150.0, 200.0],
        )
        .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn availability_spread_drops_null_rows() {
        let out = availability_spread(&sample()).unwrap();
        assert_eq!(out.height(), 3);
        assert_eq!(out.width(), 2);
    }

    #[test]
    fn geo_points_requires_both_coordinates() {
        let out = geo_points(&sample()).unwrap();
        assert_eq!(out.height(), 2);
    }
}
