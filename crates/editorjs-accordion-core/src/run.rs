//! Sibling-run resolution.
//!
//! The run is never stored. Each call walks the live sibling chain again,
//! since the host may have reordered, inserted or removed blocks since the
//! last walk.

/// A block in document order that can step to its next sibling.
pub trait BlockNode: Sized {
    /// The next block after this one, if any.
    fn next_block(&self) -> Option<Self>;

    /// Whether this block is an accordion header (carries the boundary marker).
    fn is_accordion_header(&self) -> bool;
}

/// Lazy walk over the blocks following a header.
///
/// Yields at most `remaining` blocks and stops before the first block that
/// is itself an accordion header.
#[derive(Debug, Clone)]
pub struct SiblingRun<N> {
    next: Option<N>,
    remaining: u32,
}

impl<N: BlockNode> Iterator for SiblingRun<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        if self.remaining == 0 {
            return None;
        }
        let candidate = self.next.take()?;
        if candidate.is_accordion_header() {
            self.remaining = 0;
            return None;
        }
        self.remaining -= 1;
        self.next = candidate.next_block();
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next.is_none() {
            (0, Some(0))
        } else {
            (0, Some(self.remaining as usize))
        }
    }
}

impl<N: BlockNode> std::iter::FusedIterator for SiblingRun<N> {}

/// Start a walk over up to `declared` blocks after `header`.
pub fn resolve_run<N: BlockNode>(header: &N, declared: u32) -> SiblingRun<N> {
    SiblingRun {
        next: header.next_block(),
        remaining: declared,
    }
}

/// A position in an ordered slice of blocks.
///
/// Lets callers resolve runs over plain data (block type names, JSON blocks)
/// without a DOM.
#[derive(Debug)]
pub struct SliceBlock<'a, T> {
    blocks: &'a [T],
    index: usize,
    is_header: fn(&T) -> bool,
}

impl<T> Clone for SliceBlock<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SliceBlock<'_, T> {}

impl<'a, T> SliceBlock<'a, T> {
    pub fn new(blocks: &'a [T], index: usize, is_header: fn(&T) -> bool) -> Option<Self> {
        (index < blocks.len()).then_some(Self {
            blocks,
            index,
            is_header,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self) -> &'a T {
        &self.blocks[self.index]
    }
}

impl<T> BlockNode for SliceBlock<'_, T> {
    fn next_block(&self) -> Option<Self> {
        Self::new(self.blocks, self.index + 1, self.is_header)
    }

    fn is_accordion_header(&self) -> bool {
        (self.is_header)(self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_header(kind: &&str) -> bool {
        *kind == "accordion"
    }

    fn run_indices(blocks: &[&str], header: usize, declared: u32) -> Vec<usize> {
        let start = SliceBlock::new(blocks, header, is_header).unwrap();
        resolve_run(&start, declared).map(|b| b.index()).collect()
    }

    #[test]
    fn test_full_run() {
        let blocks = ["accordion", "p", "p", "p", "p"];
        assert_eq!(run_indices(&blocks, 0, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_truncated_by_document_end() {
        let blocks = ["p", "accordion", "p", "list"];
        assert_eq!(run_indices(&blocks, 1, 5), vec![2, 3]);
    }

    #[test]
    fn test_truncated_by_next_header() {
        let blocks = ["accordion", "p", "accordion", "p", "p"];
        assert_eq!(run_indices(&blocks, 0, 4), vec![1]);
        assert_eq!(run_indices(&blocks, 2, 4), vec![3, 4]);
    }

    #[test]
    fn test_header_directly_after_header() {
        let blocks = ["accordion", "accordion", "p"];
        assert!(run_indices(&blocks, 0, 3).is_empty());
    }

    #[test]
    fn test_header_at_end() {
        let blocks = ["p", "accordion"];
        assert!(run_indices(&blocks, 1, 3).is_empty());
    }

    #[test]
    fn test_restartable() {
        let blocks = ["accordion", "p", "p"];
        let start = SliceBlock::new(&blocks, 0, is_header).unwrap();
        let first: Vec<_> = resolve_run(&start, 2).map(|b| b.index()).collect();
        let second: Vec<_> = resolve_run(&start, 2).map(|b| b.index()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fused_after_boundary() {
        let blocks = ["accordion", "accordion", "p"];
        let start = SliceBlock::new(&blocks, 0, is_header).unwrap();
        let mut run = resolve_run(&start, 3);
        assert!(run.next().is_none());
        assert!(run.next().is_none());
    }
}
