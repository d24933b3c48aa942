/// Dense cube of `f32` samples with `points^3` entries, stored contiguously.
///
/// Linear layout is `(i * points + j) * points + k`, so `k` (the z index)
/// varies fastest in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelArray {
    points: usize,
    data: Vec<f32>,
}

impl ChannelArray {
    /// Creates a zero-filled array with `points` samples per axis.
    pub fn zeros(points: usize) -> Self {
        Self {
            points,
            data: vec![0.0; points * points * points],
        }
    }

    #[inline]
    pub fn points(&self) -> usize {
        self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        assert!(
            i < self.points && j < self.points && k < self.points,
            "index ({i}, {j}, {k}) outside array of {} points per axis",
            self.points
        );
        (i * self.points + j) * self.points + k
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f32 {
        self.data[self.offset(i, j, k)]
    }

    #[inline]
    pub fn add(&mut self, i: usize, j: usize, k: usize, value: f32) {
        let offset = self.offset(i, j, k);
        self.data[offset] += value;
    }

    pub fn fill_zero(&mut self) {
        self.data.fill(0.0);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Sum of all samples, accumulated in `f64`.
    pub fn total(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }
}

impl std::ops::AddAssign<&ChannelArray> for ChannelArray {
    fn add_assign(&mut self, rhs: &ChannelArray) {
        assert_eq!(
            self.points, rhs.points,
            "cannot add channel arrays of different sizes"
        );
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a += *b;
        }
    }
}
