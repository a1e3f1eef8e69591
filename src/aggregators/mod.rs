//! Chart-ready summaries over a filtered set of registrations.
//!
//! Every aggregator is a pure function of the records it is given. Each call
//! builds its own ordered counters, so results depend only on the input
//! order and running one twice gives identical output.

pub mod aggregate;
pub mod counter;
pub mod types;

pub use aggregate::{
    cafv_counts, city_counts, district_counts, make_max_range, make_model_popularity, map_points,
    model_year_counts, vehicle_type_counts, year_over_year_growth,
};
