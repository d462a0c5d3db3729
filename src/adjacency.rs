/// Dense boolean adjacency matrix of a point set, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    size: usize,
    data: Vec<bool>,
}

impl AdjacencyMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![false; size * size],
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.data[i * self.size + j]
    }

    pub fn set(&mut self, i: usize, j: usize) {
        self.data[i * self.size + j] = true;
    }

    pub fn row(&self, i: usize) -> &[bool] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    /// Column indices set in row `i`.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(i).iter().enumerate().filter(|&(_, &a)| a).map(|(j, _)| j)
    }

    /// Number of set entries.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&a| a).count()
    }
}
