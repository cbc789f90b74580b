//! Real Las Vegas / Henderson places for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap via Overpass API.

use route_optimizer::Location;

/// A named place with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    /// Stop without an id; time windows fall back to `stop_<position>`.
    pub fn stop(&self) -> Location {
        Location::new(self.lat, self.lng)
    }

    /// Stop whose id is the place name.
    pub fn named_stop(&self) -> Location {
        Location::new(self.lat, self.lng).with_id(self.name)
    }
}

// ============================================================================
// Pickup points
// ============================================================================

pub const WYNN: Place = Place::new("Wynn Las Vegas", 36.1263781, -115.1658180);
pub const MGM_GRAND: Place = Place::new("MGM Grand", 36.1023654, -115.1688720);
pub const LONGHORN: Place = Place::new("Longhorn Casino", 36.1070664, -115.0591256);

// ============================================================================
// Strip stops, north to south
// ============================================================================

pub const SINATRA: Place = Place::new("Sinatra", 36.1300035, -115.1654850);
pub const CHARLIE_PALMER: Place = Place::new("Charlie Palmer Steak", 36.0910624, -115.1743364);

pub const STRIP: &[Place] = &[
    SINATRA,
    Place::new("Public House", 36.1219193, -115.1689317),
    Place::new("Brooklyn Bowl", 36.1175388, -115.1695094),
    Place::new("Caesars Palace", 36.1162, -115.1745),
    Place::new("Bellagio", 36.1126, -115.1767),
    Place::new("P.F. Chang's", 36.1103352, -115.1723830),
    Place::new("Hard Rock Cafe", 36.1041592, -115.1722166),
    CHARLIE_PALMER,
];

// ============================================================================
// Outlying stops
// ============================================================================

pub const HENDERSON: &[Place] = &[
    Place::new("Green Valley Ranch Area", 36.0308, -115.0825),
    Place::new("Sunset Station Area", 36.0614, -115.0631),
    Place::new("RibCage", 35.9949754, -115.0999810),
    Place::new("Naga", 36.0137634, -114.9928676),
];

pub const EAST_SIDE: &[Place] = &[
    Place::new("Pei Wei Town Square", 36.0810469, -115.1472694),
    Place::new("Hello Tokyo", 36.1161627, -115.0902096),
    Place::new("Roberto's Taco Shop", 36.1452953, -115.0478347),
];

pub fn all_places() -> Vec<Place> {
    let mut all = vec![WYNN, MGM_GRAND, LONGHORN];
    all.extend_from_slice(STRIP);
    all.extend_from_slice(HENDERSON);
    all.extend_from_slice(EAST_SIDE);
    all
}

#[test]
fn test_coordinates_in_vegas_area() {
    for place in all_places() {
        assert!(
            place.lat > 35.9 && place.lat < 36.3,
            "{} lat out of range: {}",
            place.name,
            place.lat
        );
        assert!(
            place.lng > -115.4 && place.lng < -114.8,
            "{} lng out of range: {}",
            place.name,
            place.lng
        );
    }
}
