/// Flat rate covering the first two kilometers, in pesos.
const BASE_FARE: u32 = 20;
/// Charge per started kilometer past the flat-rate distance.
const PER_KM: u32 = 5;
const FLAT_RATE_KM: f64 = 2.0;

/// Fare for a trip of the given road distance in meters.
///
/// Distances come straight from the routing service and are trusted as-is.
/// Any fraction of a kilometer past the flat-rate distance is billed as a
/// whole kilometer; a trip landing exactly on a kilometer mark is billed
/// into the next one, so 2.01 km and 2.99 km cost the same.
pub fn fare_for_distance(meters: f64) -> u32 {
    let km = meters / 1000.0;
    if km <= FLAT_RATE_KM {
        return BASE_FARE;
    }
    let increments = (km - FLAT_RATE_KM).floor() as u32 + 1;
    BASE_FARE + increments * PER_KM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_trips_pay_the_flat_rate() {
        assert_eq!(fare_for_distance(0.0), 20);
        assert_eq!(fare_for_distance(350.0), 20);
        assert_eq!(fare_for_distance(1999.0), 20);
        assert_eq!(fare_for_distance(2000.0), 20);
    }

    #[test]
    fn fractional_excess_bills_a_whole_kilometer() {
        assert_eq!(fare_for_distance(2001.0), 25);
        assert_eq!(fare_for_distance(2010.0), 25);
        assert_eq!(fare_for_distance(2990.0), 25);
    }

    #[test]
    fn longer_trips_step_per_kilometer() {
        assert_eq!(fare_for_distance(2500.0), 25);
        assert_eq!(fare_for_distance(3000.0), 30);
        assert_eq!(fare_for_distance(4999.0), 35);
    }
}
