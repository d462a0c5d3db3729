//! Euclidean distance helpers.

/// Euclidean distance between two points.
#[inline]
pub fn euclidean(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Lazily yields the distance from `center` to each of `points`, in order.
///
/// Accepts any source of coordinates, so callers can gather points by index
/// without collecting them first.
pub fn distance_iter<'a, I>(points: I, center: &'a [f64; 3]) -> impl Iterator<Item = f64> + 'a
where
    I: IntoIterator<Item = [f64; 3]>,
    I::IntoIter: 'a,
{
    points.into_iter().map(move |p| euclidean(&p, center))
}

/// Distances from `center` to each of `points`, in order.
pub fn distance(points: &[[f64; 3]], center: &[f64; 3]) -> Vec<f64> {
    distance_iter(points.iter().copied(), center).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let d = distance(&[[3.0, 4.0, 0.0], [0.0, 0.0, 0.0], [1.0, 2.0, 2.0]], &[0.0, 0.0, 0.0]);
        assert_eq!(d, vec![5.0, 0.0, 3.0]);
        assert!(distance(&[], &[1.0, 1.0, 1.0]).is_empty());
    }

    #[test]
    fn test_distance_iter_by_index() {
        let points = [[3.0, 4.0, 0.0], [0.0, 0.0, 0.0], [1.0, 2.0, 2.0]];
        let picked: Vec<f64> = distance_iter([2, 0].iter().map(|&i| points[i]), &[0.0, 0.0, 0.0]).collect();
        assert_eq!(picked, vec![3.0, 5.0]);
    }
}
