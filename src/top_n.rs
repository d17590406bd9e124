/// Insertion-sorted list of the `n` best (index, score) pairs seen so far.
///
/// A candidate is placed ahead of the first entry it strictly beats, so among
/// equal scores the one offered first keeps the better rank. Empty slots
/// score negative infinity and are never reported.
pub struct TopN {
    capacity: usize,
    entries: Vec<(usize, f32)>,
}

impl TopN {
    pub fn new(capacity: usize) -> Self {
        TopN {
            capacity,
            entries: Vec::with_capacity(capacity.min(1024)),
        }
    }

    /// Offer a candidate; returns whether it made the list.
    pub fn offer(&mut self, index: usize, score: f32) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let Some(pos) = self.rank_of(score) else {
            return false;
        };
        if self.entries.len() == self.capacity {
            self.entries.pop();
        }
        self.entries.insert(pos, (index, score));
        true
    }

    // First slot whose score is strictly below `score`, counting empty slots.
    fn rank_of(&self, score: f32) -> Option<usize> {
        match self.entries.iter().position(|&(_, s)| score > s) {
            Some(pos) => Some(pos),
            None if self.entries.len() < self.capacity && score > f32::NEG_INFINITY => {
                Some(self.entries.len())
            }
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best first.
    pub fn into_sorted_vec(self) -> Vec<(usize, f32)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_best_in_descending_order() {
        let mut top = TopN::new(3);
        for (i, s) in [0.1, 0.9, 0.5, 0.7, 0.2].into_iter().enumerate() {
            top.offer(i, s);
        }
        assert_eq!(top.into_sorted_vec(), vec![(1, 0.9), (3, 0.7), (2, 0.5)]);
    }

    #[test]
    fn ties_keep_earlier_candidate() {
        let mut top = TopN::new(2);
        top.offer(0, 0.5);
        top.offer(1, 0.5);
        top.offer(2, 0.5);
        assert_eq!(top.into_sorted_vec(), vec![(0, 0.5), (1, 0.5)]);
    }

    #[test]
    fn reports_only_filled_slots() {
        let mut top = TopN::new(5);
        top.offer(7, -3.0);
        top.offer(8, -1.5);
        assert_eq!(top.len(), 2);
        assert_eq!(top.into_sorted_vec(), vec![(8, -1.5), (7, -3.0)]);
    }

    #[test]
    fn huge_capacity_is_not_reserved_up_front() {
        let mut top = TopN::new(usize::MAX);
        top.offer(0, 0.5);
        top.offer(1, 0.7);
        assert_eq!(top.into_sorted_vec(), vec![(1, 0.7), (0, 0.5)]);
    }

    #[test]
    fn zero_capacity_accepts_nothing() {
        let mut top = TopN::new(0);
        assert!(!top.offer(0, 1.0));
        assert!(top.is_empty());
    }

    #[test]
    fn rejects_worse_than_full_list() {
        let mut top = TopN::new(1);
        assert!(top.offer(0, 0.3));
        assert!(!top.offer(1, 0.2));
        assert!(top.offer(2, 0.4));
        assert_eq!(top.into_sorted_vec(), vec![(2, 0.4)]);
    }
}
