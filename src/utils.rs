//! Small helpers shared across modules: display formatting and the lazy grounding
//! enumeration spec.md 4.3.3 requires for the goal's per-predicate `end-p` conjunction.

use std::fmt::{Display, Error, Formatter};

pub use streaming_iterator::StreamingIterator;

#[allow(clippy::while_let_on_iterator)]
pub fn disp_iter<T: Display>(f: &mut Formatter<'_>, iterable: &[T], sep: &str) -> Result<(), Error> {
    let mut i = iterable.iter();
    if let Some(first) = i.next() {
        write!(f, "{first}")?;
        while let Some(other) = i.next() {
            write!(f, "{sep}")?;
            write!(f, "{other}")?;
        }
    }
    Ok(())
}

/// Streams every combination that can be drawn from a vector of cloneable iterators,
/// one value per iterator, without ever materializing the full cartesian product.
///
/// `enumerate(vec![0..2, 5..7])` streams `[0,5]`, `[0,6]`, `[1,5]`, `[1,6]` one at a time.
/// This is what keeps the goal-grounding and the `forall`-effect grounding in the LTL
/// compiler from allocating a container sized to the product of every parameter's type.
pub fn enumerate<Item, Iter: Iterator<Item = Item> + Clone>(
    generators: Vec<Iter>,
) -> impl StreamingIterator<Item = [Item]> {
    Combination::new(generators)
}

struct Combination<Item, Iterable> {
    gen: Vec<Iterable>,
    cur: Vec<Iterable>,
    sol: Vec<Item>,
    is_first: bool,
    finished: bool,
}

impl<Item, Iterable: Iterator<Item = Item> + Clone> Combination<Item, Iterable> {
    fn new(generators: Vec<Iterable>) -> Self {
        let size = generators.len();
        Combination {
            gen: generators.clone(),
            cur: generators,
            sol: Vec::with_capacity(size),
            is_first: true,
            finished: false,
        }
    }
}

impl<I, It: Iterator<Item = I> + Clone> StreamingIterator for Combination<I, It> {
    type Item = [I];

    fn advance(&mut self) {
        if self.finished {
            return;
        } else if self.is_first && self.gen.is_empty() {
            // no generators: stream the single empty combination, then stop
            self.is_first = false;
            return;
        } else if !self.is_first {
            if self.sol.is_empty() {
                self.finished = true;
                return;
            }
            debug_assert_eq!(self.sol.len(), self.gen.len());
            self.sol.pop();
        }
        self.is_first = false;
        loop {
            let lvl = self.sol.len();
            if let Some(i) = self.cur[lvl].next() {
                self.sol.push(i);
            } else {
                if self.sol.is_empty() {
                    self.finished = true;
                    return;
                }
                self.sol.pop();
                self.cur[lvl] = self.gen[lvl].clone();
            }
            if self.sol.len() == self.gen.len() {
                return;
            }
        }
    }

    fn get(&self) -> Option<&[I]> {
        if self.finished || self.sol.len() != self.gen.len() {
            None
        } else {
            Some(self.sol.as_slice())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_product() {
        let mut it = enumerate(vec![0..2, 5..7]);
        let mut out = Vec::new();
        while let Some(combo) = it.next() {
            out.push(combo.to_vec());
        }
        assert_eq!(out, vec![vec![0, 5], vec![0, 6], vec![1, 5], vec![1, 6]]);
    }

    #[test]
    fn enumerate_empty_generator_list() {
        let mut it = enumerate::<i32, std::ops::Range<i32>>(vec![]);
        let mut out = Vec::new();
        while let Some(combo) = it.next() {
            out.push(combo.to_vec());
        }
        assert_eq!(out, vec![Vec::<i32>::new()]);
    }

    #[test]
    fn enumerate_handles_empty_type() {
        let mut it = enumerate(vec![0..0, 5..7]);
        let mut out = Vec::new();
        while let Some(combo) = it.next() {
            out.push(combo.to_vec());
        }
        assert!(out.is_empty());
    }
}
