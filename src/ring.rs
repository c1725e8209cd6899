//! Ring arithmetic over a node array with an optional hub at index 0.

/// Maps between ring positions and node indices.
///
/// With a hub, node 0 sits at the centre and ring position `r` is node
/// `r + 1`; without one, ring positions and node indices coincide. Ring
/// positions always wrap modulo [`Ring::len`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ring {
    len: usize,
    has_central: bool,
}

impl Ring {
    /// Ring over `node_count` nodes. Saturates to an empty ring when the hub
    /// is the only node.
    pub fn new(node_count: usize, has_central: bool) -> Self {
        let len = if has_central { node_count.saturating_sub(1) } else { node_count };
        Ring { len, has_central }
    }

    /// Number of ring nodes `B`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn has_central(&self) -> bool {
        self.has_central
    }

    /// Node index of the hub, if any.
    pub fn hub(&self) -> Option<usize> {
        self.has_central.then_some(0)
    }

    pub fn to_node_index(&self, ring_pos: usize) -> usize {
        if self.has_central { ring_pos + 1 } else { ring_pos }
    }

    /// Ring position of node `index`; `None` for the hub or out-of-range nodes.
    pub fn ring_position(&self, index: usize) -> Option<usize> {
        let pos = if self.has_central { index.checked_sub(1)? } else { index };
        (pos < self.len).then_some(pos)
    }

    /// Node index `offset` steps around the ring from `ring_pos`.
    ///
    /// Must not be called on an empty ring.
    pub fn step(&self, ring_pos: usize, offset: isize) -> usize {
        let len = self.len as isize;
        let wrapped = (ring_pos as isize + offset).rem_euclid(len) as usize;
        self.to_node_index(wrapped)
    }

    /// Node opposite `ring_pos`: the hub if there is one, else ring position
    /// `(r + B/2) mod B`. For odd `B` the half-turn rounds down.
    pub fn opposite(&self, ring_pos: usize) -> usize {
        match self.hub() {
            Some(hub) => hub,
            None => self.step(ring_pos, (self.len / 2) as isize),
        }
    }

    /// Node indices of the ring in ring order.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |r| self.to_node_index(r))
    }
}
