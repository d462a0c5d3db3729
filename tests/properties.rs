use cellgrid::{BruteForce, CellList, SpatialIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_points(rng: &mut StdRng, count: usize, extent: f64) -> Vec<[f64; 3]> {
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            ]
        })
        .collect()
}

fn random_center(rng: &mut StdRng, list: &CellList) -> [f64; 3] {
    let b = list.bounds();
    [
        rng.gen_range(b.min[0]..=b.max[0]),
        rng.gen_range(b.min[1]..=b.max[1]),
        rng.gen_range(b.min[2]..=b.max[2]),
    ]
}

fn as_set(v: &[usize]) -> HashSet<usize> {
    v.iter().copied().collect()
}

#[test]
fn test_every_point_in_exactly_one_cell() {
    let mut rng = StdRng::seed_from_u64(1);
    for &cell_size in &[0.3, 1.0, 2.5, 7.0, 100.0] {
        let points = random_points(&mut rng, 500, 10.0);
        let list = CellList::new(points.clone(), cell_size).unwrap();

        let mut seen = vec![0usize; points.len()];
        for cell in list.cells().iter() {
            for &i in cell {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1), "cell size {}: {:?}", cell_size, seen);

        // And that cell is the one the indexer assigns to the point.
        for (i, p) in points.iter().enumerate() {
            let cell = list.indexer().cell_index(p);
            assert!(list.cells().contents(cell).contains(&i));
        }

        let max = list.cells().iter().map(|c| c.len()).max().unwrap();
        assert_eq!(list.max_population(), max);
    }
}

#[test]
fn test_radius_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(2);
    let points = random_points(&mut rng, 1000, 15.0);
    let brute = BruteForce::new(points.clone());

    for &cell_size in &[0.5, 2.0, 4.0, 50.0] {
        let list = CellList::new(points.clone(), cell_size).unwrap();
        for _ in 0..50 {
            let center = random_center(&mut rng, &list);
            let radius = rng.gen_range(0.0..8.0);
            let fast = SpatialIndex::query_radius(&list, &center, radius).unwrap();
            let slow = brute.query_radius(&center, radius).unwrap();
            assert_eq!(fast.len(), as_set(&fast).len(), "Duplicate indices in result");
            assert_eq!(as_set(&fast), as_set(&slow), "cell size {}, center {:?}, radius {}", cell_size, center, radius);
        }
    }
}

#[test]
fn test_radius_at_point_locations() {
    let mut rng = StdRng::seed_from_u64(3);
    let points = random_points(&mut rng, 300, 5.0);
    let list = CellList::new(points.clone(), 1.2).unwrap();
    let brute = BruteForce::new(points.clone());

    for p in &points {
        let fast = list.query_radius(p, 1.7).unwrap();
        let slow = brute.query_radius(p, 1.7).unwrap();
        assert_eq!(as_set(&fast), as_set(&slow));
    }
}

#[test]
fn test_radius_monotonicity() {
    let mut rng = StdRng::seed_from_u64(4);
    let list = CellList::new(random_points(&mut rng, 800, 10.0), 1.5).unwrap();

    for _ in 0..30 {
        let center = random_center(&mut rng, &list);
        let r1 = rng.gen_range(0.0..5.0);
        let r2 = r1 + rng.gen_range(0.0..5.0);
        let small = as_set(&list.query_radius(&center, r1).unwrap());
        let large = as_set(&list.query_radius(&center, r2).unwrap());
        assert!(small.is_subset(&large), "r1 = {}, r2 = {}", r1, r2);
    }
}

#[test]
fn test_box_is_superset_of_radius() {
    let mut rng = StdRng::seed_from_u64(5);
    let list = CellList::new(random_points(&mut rng, 800, 10.0), 2.0).unwrap();

    for _ in 0..30 {
        let center = random_center(&mut rng, &list);
        let radius = rng.gen_range(0.0..6.0);
        let box_radius = (radius / list.cell_size()).floor() as usize + 1;
        let coarse = as_set(&list.query_box(&center, box_radius).unwrap());
        let exact = as_set(&list.query_radius(&center, radius).unwrap());
        assert!(exact.is_subset(&coarse));
    }
}

#[test]
fn test_buffer_results_match_allocated_results() {
    let mut rng = StdRng::seed_from_u64(6);
    let list = CellList::new(random_points(&mut rng, 600, 10.0), 1.0).unwrap();

    for box_radius in 0..4 {
        let mut buffer = vec![usize::MAX; list.buffer_len(box_radius)];
        for _ in 0..20 {
            let center = random_center(&mut rng, &list);
            let len = list.query_box_into(&center, box_radius, &mut buffer).unwrap();
            assert!(len <= list.buffer_len(box_radius));
            assert_eq!(&buffer[..len], list.query_box(&center, box_radius).unwrap().as_slice());
        }
    }

    let radius = 2.3;
    let box_radius = list.box_radius_for(radius).unwrap();
    let mut buffer = vec![0; list.buffer_len(box_radius)];
    for _ in 0..20 {
        let center = random_center(&mut rng, &list);
        let len = list.query_radius_into(&center, radius, &mut buffer).unwrap();
        assert_eq!(&buffer[..len], list.query_radius(&center, radius).unwrap().as_slice());
    }
}

#[test]
fn test_box_query_is_a_cube_of_cells() {
    let mut rng = StdRng::seed_from_u64(7);
    let list = CellList::new(random_points(&mut rng, 500, 10.0), 1.5).unwrap();

    for _ in 0..20 {
        let center = random_center(&mut rng, &list);
        let box_radius = rng.gen_range(0..3usize);
        let c = list.indexer().cell_index(&center);

        let expected: HashSet<usize> = list
            .points()
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                let cell = list.indexer().cell_index(p);
                (0..3).all(|axis| cell[axis].abs_diff(c[axis]) <= box_radius)
            })
            .map(|(i, _)| i)
            .collect();

        assert_eq!(as_set(&list.query_box(&center, box_radius).unwrap()), expected);
    }
}

#[test]
fn test_selection_matches_filtered_brute_force() {
    let mut rng = StdRng::seed_from_u64(8);
    let points = random_points(&mut rng, 500, 8.0);
    let selection: Vec<bool> = (0..points.len()).map(|i| i % 3 != 0).collect();
    let list = CellList::builder(points.clone())
        .cell_size(1.0)
        .selection(selection.clone())
        .build()
        .unwrap();
    let brute = BruteForce::new(points.clone());

    for _ in 0..30 {
        let center = random_center(&mut rng, &list);
        let fast = as_set(&list.query_radius(&center, 2.5).unwrap());
        let slow: HashSet<usize> = brute
            .query_radius(&center, 2.5)
            .unwrap()
            .into_iter()
            .filter(|&i| selection[i])
            .collect();
        assert_eq!(fast, slow);
    }
}

#[test]
fn test_batch_queries_match_single_queries() {
    let mut rng = StdRng::seed_from_u64(9);
    let list = CellList::new(random_points(&mut rng, 700, 10.0), 1.3).unwrap();
    let centers: Vec<[f64; 3]> = (0..64).map(|_| random_center(&mut rng, &list)).collect();

    let radius_batch = list.query_radius_many(&centers, 2.0).unwrap();
    let box_batch = list.query_box_many(&centers, 1).unwrap();
    assert_eq!(radius_batch.len(), centers.len());
    for (i, center) in centers.iter().enumerate() {
        assert_eq!(radius_batch[i], list.query_radius(center, 2.0).unwrap());
        assert_eq!(box_batch[i], list.query_box(center, 1).unwrap());
    }

    let mut with_outlier = centers.clone();
    with_outlier.push([1e6, 0.0, 0.0]);
    assert!(list.query_radius_many(&with_outlier, 2.0).is_err());
    assert!(list.query_box_many(&with_outlier, 1).is_err());
}

#[test]
fn test_adjacency_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(10);
    let points = random_points(&mut rng, 200, 5.0);
    let list = CellList::new(points.clone(), 1.0).unwrap();
    let adjacency = list.adjacency_matrix(1.5).unwrap();

    for i in 0..points.len() {
        for j in 0..points.len() {
            let d = cellgrid::distance::euclidean(&points[i], &points[j]);
            assert_eq!(adjacency.get(i, j), d <= 1.5, "Mismatch at ({}, {})", i, j);
        }
        assert!(adjacency.get(i, i));
    }
}

#[test]
fn test_radius_forms_agree() {
    let mut rng = StdRng::seed_from_u64(11);
    let points = random_points(&mut rng, 900, 12.0);
    let list = CellList::new(points.clone(), 1.7).unwrap();
    let brute = BruteForce::new(points);

    for &radius in &[0.0, 0.9, 1.7, 3.4, 5.25] {
        let centers: Vec<[f64; 3]> = (0..40).map(|_| random_center(&mut rng, &list)).collect();
        let batch = list.query_radius_many(&centers, radius).unwrap();
        let mut buffer = vec![usize::MAX; list.buffer_len(list.box_radius_for(radius).unwrap())];

        for (center, from_batch) in centers.iter().zip(&batch) {
            let allocated = list.query_radius(center, radius).unwrap();
            let len = list.query_radius_into(center, radius, &mut buffer).unwrap();

            assert_eq!(&buffer[..len], allocated.as_slice(), "radius {}, center {:?}", radius, center);
            assert_eq!(from_batch, &allocated, "radius {}, center {:?}", radius, center);
            assert_eq!(as_set(&allocated), as_set(&brute.query_radius(center, radius).unwrap()));
        }
    }
}

#[test]
fn test_box_batch_matches_single_queries() {
    let mut rng = StdRng::seed_from_u64(12);
    let list = CellList::new(random_points(&mut rng, 400, 6.0), 0.8).unwrap();
    let centers: Vec<[f64; 3]> = (0..50).map(|_| random_center(&mut rng, &list)).collect();

    for box_radius in 0..4 {
        let batch = list.query_box_many(&centers, box_radius).unwrap();
        for (center, hits) in centers.iter().zip(&batch) {
            assert_eq!(hits, &list.query_box(center, box_radius).unwrap());
        }
    }
}
