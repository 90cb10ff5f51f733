//! Column-name constants and the typed field registry for the listings schema.
//! Single source of truth for every column the pipeline touches.

use serde::{Deserialize, Serialize};

// ── Listing identity / free-text columns ────────────────────────────────────
pub mod listing {
    pub const NAME: &str = "name";
    pub const STREET: &str = "street";
    pub const COUNTRY: &str = "country";
    pub const MARKET: &str = "market";
    pub const GOVERNMENT_AREA: &str = "government_area";
    pub const PROPERTY_TYPE: &str = "property_type";
    pub const ROOM_TYPE: &str = "room_type";
    pub const BED_TYPE: &str = "bed_type";
}

// ── Pricing columns ─────────────────────────────────────────────────────────
pub mod pricing {
    pub const PRICE: &str = "price";
}

// ── Availability horizons ───────────────────────────────────────────────────
pub mod availability {
    pub const AVAILABILITY_30: &str = "availability_30";
    pub const AVAILABILITY_60: &str = "availability_60";
    pub const AVAILABILITY_90: &str = "availability_90";
    pub const AVAILABILITY_365: &str = "availability_365";

    pub const ALL: [&str; 4] = [
        AVAILABILITY_30,
        AVAILABILITY_60,
        AVAILABILITY_90,
        AVAILABILITY_365,
    ];
}

// ── Review metrics ──────────────────────────────────────────────────────────
pub mod review {
    pub const NUMBER_OF_REVIEWS: &str = "number_of_reviews";
    pub const REVIEW_SCORE: &str = "review_score";
}

// ── Host attributes ─────────────────────────────────────────────────────────
pub mod host {
    pub const HOST_NAME: &str = "host_name";
    pub const HOST_LOCATION: &str = "host_location";
    pub const HOST_NEIGHBOURHOOD: &str = "host_neighbourhood";
    pub const HOST_RESPONSE_TIME: &str = "host_response_time";
}

// ── Structural attributes ───────────────────────────────────────────────────
pub mod structure {
    pub const BEDROOMS: &str = "bedrooms";
    pub const BEDS: &str = "beds";
    pub const ACCOMMODATES: &str = "accommodates";
}

// ── Geocoordinates ──────────────────────────────────────────────────────────
pub mod geo {
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
}

/// Whether a field carries category labels or numbers.
///
/// Categorical fields take set-membership predicates and act as group keys;
/// numeric fields take inclusive range predicates and feed reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Categorical,
    Numeric,
}

/// Typed handle for every column the pipeline may filter, group, or reduce by.
///
/// Stage and aggregation constructors take a `Field` rather than a raw column
/// name, so a reference to a column that does not exist (or a predicate of the
/// wrong shape for the column) is rejected when the pipeline is built, not
/// when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Name,
    Street,
    Country,
    Market,
    GovernmentArea,
    PropertyType,
    RoomType,
    BedType,
    HostName,
    HostLocation,
    HostNeighbourhood,
    HostResponseTime,
    Price,
    Availability30,
    Availability60,
    Availability90,
    Availability365,
    NumberOfReviews,
    ReviewScore,
    Bedrooms,
    Beds,
    Accommodates,
    Latitude,
    Longitude,
}

impl Field {
    /// Column name as it appears in the loaded DataFrame.
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => listing::NAME,
            Self::Street => listing::STREET,
            Self::Country => listing::COUNTRY,
            Self::Market => listing::MARKET,
            Self::GovernmentArea => listing::GOVERNMENT_AREA,
            Self::PropertyType => listing::PROPERTY_TYPE,
            Self::RoomType => listing::ROOM_TYPE,
            Self::BedType => listing::BED_TYPE,
            Self::HostName => host::HOST_NAME,
            Self::HostLocation => host::HOST_LOCATION,
            Self::HostNeighbourhood => host::HOST_NEIGHBOURHOOD,
            Self::HostResponseTime => host::HOST_RESPONSE_TIME,
            Self::Price => pricing::PRICE,
            Self::Availability30 => availability::AVAILABILITY_30,
            Self::Availability60 => availability::AVAILABILITY_60,
            Self::Availability90 => availability::AVAILABILITY_90,
            Self::Availability365 => availability::AVAILABILITY_365,
            Self::NumberOfReviews => review::NUMBER_OF_REVIEWS,
            Self::ReviewScore => review::REVIEW_SCORE,
            Self::Bedrooms => structure::BEDROOMS,
            Self::Beds => structure::BEDS,
            Self::Accommodates => structure::ACCOMMODATES,
            Self::Latitude => geo::LATITUDE,
            Self::Longitude => geo::LONGITUDE,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Name
            | Self::Street
            | Self::Country
            | Self::Market
            | Self::GovernmentArea
            | Self::PropertyType
            | Self::RoomType
            | Self::BedType
            | Self::HostName
            | Self::HostLocation
            | Self::HostNeighbourhood
            | Self::HostResponseTime => FieldKind::Categorical,
            Self::Price
            | Self::Availability30
            | Self::Availability60
            | Self::Availability90
            | Self::Availability365
            | Self::NumberOfReviews
            | Self::ReviewScore
            | Self::Bedrooms
            | Self::Beds
            | Self::Accommodates
            | Self::Latitude
            | Self::Longitude => FieldKind::Numeric,
        }
    }
}

/// Columns cast to Float64 at load time (non-strict; bad cells become null).
pub const NUMERIC_COLUMNS: [&str; 12] = [
    pricing::PRICE,
    availability::AVAILABILITY_30,
    availability::AVAILABILITY_60,
    availability::AVAILABILITY_90,
    availability::AVAILABILITY_365,
    review::NUMBER_OF_REVIEWS,
    review::REVIEW_SCORE,
    structure::BEDROOMS,
    structure::BEDS,
    structure::ACCOMMODATES,
    geo::LATITUDE,
    geo::LONGITUDE,
];
