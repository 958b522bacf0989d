use super::{BlockStorage, BlockTypeIndex, Position};

pub struct BlockCoordIter<'a> {
    parent: &'a BlockStorage,
    inner: std::iter::Enumerate<std::slice::Iter<'a, BlockTypeIndex>>,
}

impl<'a> BlockCoordIter<'a> {
    pub(super) fn new(parent: &'a BlockStorage) -> Self {
        Self {
            parent,
            inner: parent.blocks.iter().enumerate(),
        }
    }
}

impl<'a> Iterator for BlockCoordIter<'a> {
    type Item = (Position, BlockTypeIndex);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(i, v)| {
            // Recompute the coordinates from the linear index rather than tracking them.
            let i = i as u32;
            let x = i % self.parent.extents[0];
            let z = (i / self.parent.zsi) % self.parent.extents[2];
            let y = (i / self.parent.ysi) % self.parent.extents[1];
            (Position::new(x as i32, y as i32, z as i32), *v)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
