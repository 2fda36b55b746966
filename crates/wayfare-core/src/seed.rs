//! # Seed Catalog
//!
//! Fixture data substituted when the remote catalog is unreachable or
//! answers without data, plus the sample bookings served by the simulated
//! backend. Treat this as data, not logic.

use chrono::{DateTime, NaiveDate, Utc};

use crate::money::Money;
use crate::types::{Booking, BookingStatus, Offering};

/// Category tabs offered by the catalog view. `All` clears the category filter.
pub const CATEGORIES: [&str; 7] = ["All", "Beach", "Adventure", "City", "Cultural", "Luxury", "Budget"];

/// Number of offerings shown in the featured strip.
pub const FEATURED_COUNT: usize = 3;

#[allow(clippy::too_many_arguments)]
fn offering(
    id: &str,
    title: &str,
    description: &str,
    destination: &str,
    price_cents: i64,
    duration_days: u32,
    max_travelers: u32,
    image: &str,
    category: &str,
    rating: f64,
    reviews: u32,
) -> Offering {
    Offering {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        destination: destination.to_string(),
        price: Money::from_cents(price_cents),
        duration_days,
        max_travelers,
        is_active: true,
        image_url: format!("https://images.unsplash.com/{}?w=800&h=600&fit=crop", image),
        category: category.to_string(),
        rating,
        reviews,
    }
}

/// The ten-item fixture catalog, in display order.
pub fn offerings() -> Vec<Offering> {
    vec![
        offering("1", "Sunny Beach Paradise", "Relaxing beach vacation with all-inclusive package",
            "Bali, Indonesia", 129_999, 7, 4, "photo-1537953773345-d172ccf13cf1", "Beach", 4.8, 156),
        offering("2", "Mountain Adventure", "Hiking and outdoor activities in the Alps",
            "Swiss Alps", 89_999, 5, 6, "photo-1506905925346-21bda4d32df4", "Adventure", 4.6, 89),
        offering("3", "City Break in Paris", "Romantic getaway in the City of Light",
            "Paris, France", 79_999, 4, 2, "photo-1499856871958-5b9627545d1a", "City", 4.9, 234),
        offering("4", "Safari Experience", "Wildlife safari in African savanna",
            "Serengeti, Tanzania", 249_999, 10, 8, "photo-1549366021-9f761d450615", "Adventure", 4.7, 67),
        offering("5", "Island Hopping", "Explore multiple Greek islands",
            "Greek Islands", 159_999, 8, 6, "photo-1570077188670-e3a8d69ac5ff", "Beach", 4.5, 123),
        offering("6", "Cultural Tour", "Historical sites and local culture",
            "Kyoto, Japan", 119_999, 6, 4, "photo-1545569341-9eb8b30979d9", "Cultural", 4.8, 98),
        offering("7", "Luxury Cruise", "Premium cruise experience",
            "Mediterranean Sea", 349_999, 12, 10, "photo-1544551763-46a013bb70d5", "Luxury", 4.9, 45),
        offering("8", "Backpacking Europe", "Budget-friendly European tour",
            "Multiple European Cities", 69_999, 14, 12, "photo-1488646953014-85cb44e25828", "Budget", 4.3, 178),
        offering("9", "Tropical Paradise", "Exotic beach destination",
            "Maldives", 189_999, 9, 4, "photo-1514282401047-d79a71a590e8", "Luxury", 4.9, 89),
        offering("10", "Winter Sports", "Skiing and snowboarding adventure",
            "Whistler, Canada", 149_999, 7, 6, "photo-1551524164-4876eb6e32a8", "Adventure", 4.6, 112),
    ]
}

/// Looks up a seed offering by id.
pub fn find_offering(id: &str) -> Option<Offering> {
    offerings().into_iter().find(|o| o.id == id)
}

/// The highest-rated seed offerings; ties keep catalog order.
pub fn featured() -> Vec<Offering> {
    let mut ranked = offerings();
    // sort_by is stable, so equal ratings stay in catalog order
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ranked.truncate(FEATURED_COUNT);
    ranked
}

/// Sample bookings for the signed-in user.
pub fn bookings() -> Vec<Booking> {
    let booking = |id: &str, package: &Offering, date: (i32, u32, u32), status, created: &str| {
        Booking {
            id: id.to_string(),
            travel_package_id: package.id.clone(),
            travel_package_title: package.title.clone(),
            travel_package_image: package.image_url.clone(),
            destination: package.destination.clone(),
            booking_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap_or_default(),
            travelers_count: 2,
            total_price: package.price * 2,
            status,
            created_at: created.parse::<DateTime<Utc>>().unwrap_or_default(),
        }
    };

    let catalog = offerings();
    vec![
        booking("1", &catalog[0], (2024, 9, 15), BookingStatus::Confirmed, "2024-08-01T10:30:00Z"),
        booking("2", &catalog[2], (2024, 8, 5), BookingStatus::Confirmed, "2024-07-15T14:20:00Z"),
        booking("3", &catalog[4], (2024, 12, 1), BookingStatus::Pending, "2024-08-02T09:15:00Z"),
    ]
}
