//! Uniform random sampling of city pairs.
//!
//! Start and end are drawn independently over the whole catalog, so a
//! pair may route a city to itself.

use rand::Rng;
use trip_dataset_models::CityPair;

use crate::Catalog;

/// Draws two independent indices, each uniform over `[0, len)`.
///
/// # Panics
///
/// Panics if `len` is zero.
pub fn sample_indices<R: Rng + ?Sized>(rng: &mut R, len: usize) -> (usize, usize) {
    (rng.random_range(0..len), rng.random_range(0..len))
}

/// Draws a random [`CityPair`] from the catalog.
pub fn sample_pair<R: Rng + ?Sized>(rng: &mut R, catalog: &Catalog) -> CityPair {
    let (start, end) = sample_indices(rng, catalog.len());
    let cities = catalog.cities();

    CityPair {
        start: cities[start].to_city(),
        end: cities[end].to_city(),
    }
}

/// Draws `count` independent pairs.
pub fn sample_pairs<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &Catalog,
    count: usize,
) -> Vec<CityPair> {
    (0..count).map(|_| sample_pair(rng, catalog)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use trip_dataset_models::CityRecord;

    fn catalog(size: usize) -> Catalog {
        let cities = (0..size)
            .map(|i| CityRecord {
                id: i as u64,
                department_code: "01".to_string(),
                insee_code: format!("01{i:03}"),
                zip_code: "01000".to_string(),
                name: format!("City {i}"),
                slug: None,
                gps_lat: 45.0 + i as f64,
                gps_lng: 4.0 + i as f64,
            })
            .collect();
        Catalog::new(cities).unwrap()
    }

    #[test]
    fn indices_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..20 {
            for _ in 0..500 {
                let (a, b) = sample_indices(&mut rng, len);
                assert!(a < len);
                assert!(b < len);
            }
        }
    }

    #[test]
    fn single_city_catalog_pairs_city_with_itself() {
        let mut rng = StdRng::seed_from_u64(1);
        let pair = sample_pair(&mut rng, &catalog(1));
        assert_eq!(pair.start, pair.end);
        assert_eq!(pair.start.name, "City 0");
    }

    #[test]
    fn indices_are_roughly_uniform_including_both_ends() {
        const LEN: usize = 5;
        const TRIALS: usize = 50_000;

        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0usize; LEN];
        for _ in 0..TRIALS {
            let (a, b) = sample_indices(&mut rng, LEN);
            counts[a] += 1;
            counts[b] += 1;
        }

        let expected = (2 * TRIALS / LEN) as f64;
        for (index, &count) in counts.iter().enumerate() {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(
                deviation < 0.05,
                "index {index} drawn {count} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn sampled_pair_carries_catalog_coordinates() {
        let catalog = catalog(3);
        let mut rng = StdRng::seed_from_u64(3);

        for pair in sample_pairs(&mut rng, &catalog, 100) {
            let start = catalog
                .cities()
                .iter()
                .find(|c| c.name == pair.start.name)
                .unwrap();
            assert!((start.gps_lat - pair.start.lat).abs() < f64::EPSILON);
            assert!((start.gps_lng - pair.start.lng).abs() < f64::EPSILON);
        }
    }
}
