use crate::grids::{Dimensions, Direction, GridError};

pub type BlockId = usize;

#[derive(Debug, Clone)]
pub struct Block {
    pub x: usize,
    pub y: usize,

    /// visited at least once by the walk
    pub occupied: bool,
    /// currently on the active path
    pub in_history: bool,

    parent: Option<BlockId>,
    children: Vec<BlockId>,
}

impl Block {
    fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            occupied: false,
            in_history: false,
            parent: None,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    #[cfg(test)]
    pub fn children(&self) -> &[BlockId] {
        &self.children
    }

    #[inline]
    pub fn has_child(&self, other: BlockId) -> bool {
        self.children.contains(&other)
    }

    /// True when a tree edge joins this block and `other`. Off-grid (`None`) is never connected.
    pub fn connected_to(&self, other: Option<BlockId>) -> bool {
        match other {
            Some(other) => self.parent == Some(other) || self.has_child(other),
            None => false,
        }
    }
}

pub struct BlockGrid {
    pub dims: Dimensions,

    blocks: Vec<Block>,
    // fixed at construction since dims never change
    neighbors: Vec<Vec<BlockId>>,
}

impl BlockGrid {
    pub fn with_dims(columns: usize, rows: usize) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::Empty { columns, rows });
        }

        let dims = Dimensions { columns, rows };
        let blocks = (0..dims.len())
            .map(|index| {
                let (x, y) = dims.coords_of(index);
                Block::new(x, y)
            })
            .collect();

        let mut grid = Self {
            dims,
            blocks,
            neighbors: Vec::new(),
        };
        let neighbors: Vec<Vec<BlockId>> = (0..dims.len())
            .map(|id| {
                Direction::ALL
                    .iter()
                    .filter_map(|dir| grid.neighbor_in(id, *dir))
                    .collect()
            })
            .collect();
        grid.neighbors = neighbors;

        Ok(grid)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> Option<BlockId> {
        if x < self.dims.columns && y < self.dims.rows {
            Some(self.dims.index_of(x, y))
        } else {
            None
        }
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }

    #[inline]
    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id]
    }

    #[cfg(test)]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block at a relative offset from `id`, if it lies on the grid.
    pub fn neighbor(&self, id: BlockId, rel_x: isize, rel_y: isize) -> Option<BlockId> {
        let block = &self.blocks[id];
        let x = block.x as isize + rel_x;
        let y = block.y as isize + rel_y;

        if x < 0 || y < 0 {
            return None;
        }

        self.index_of(x as usize, y as usize)
    }

    #[inline]
    pub fn neighbor_in(&self, id: BlockId, direction: Direction) -> Option<BlockId> {
        let (rel_x, rel_y) = direction.offset();
        self.neighbor(id, rel_x, rel_y)
    }

    /// In-bounds neighbors ordered left, right, up, down.
    #[inline]
    pub fn neighbors(&self, id: BlockId) -> &[BlockId] {
        &self.neighbors[id]
    }

    pub fn available_neighbors(&self, id: BlockId) -> Vec<BlockId> {
        self.neighbors(id)
            .iter()
            .copied()
            .filter(|n| !self.blocks[*n].occupied)
            .collect()
    }

    pub fn connect(&mut self, parent: BlockId, child: BlockId) {
        debug_assert!(
            self.blocks[child].parent.is_none(),
            "block {} already has a parent",
            child
        );

        self.blocks[parent].children.push(child);
        self.blocks[child].parent = Some(parent);
    }

    #[inline]
    pub fn connected(&self, one: BlockId, two: BlockId) -> bool {
        self.blocks[one].connected_to(Some(two))
    }
}
